//! End-to-end pipeline runs against a mocked backend.

use chrono::DateTime;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shachu_backend::BackendClient;
use shachu_core::{AmenityCategory, Coordinate, OvernightWindow, SearchPolicy};
use shachu_pipeline::Pipeline;

fn center() -> Coordinate {
    Coordinate::new(26.2188, 127.6960).unwrap()
}

fn window() -> OvernightWindow {
    OvernightWindow {
        start_time: DateTime::parse_from_rfc3339("2026-10-17T18:00:00+09:00").unwrap(),
        duration_minutes: 840,
    }
}

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(
        &server.uri(),
        "anon-key",
        "get_parking_spots_sorted_by_fee",
        5,
        "shachu-test/0.1",
    )
    .expect("client construction should not fail")
}

async fn mount_amenities(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/toilets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "若狭公園トイレ", "lat": 26.2195, "lng": 127.6955}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/convenience_stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/hot_springs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

#[tokio::test]
async fn enriches_filters_and_keeps_fee_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_parking_spots_sorted_by_fee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 11,
                "name": "若狭第一パーキング",
                "lat": 26.2190,
                "lng": 127.6955,
                "rates": {"night_max": 400},
                "calculated_fee": 400,
                "nearest_convenience_store": "{\"name\":\"ローソン 若狭店\",\"distance_m\":90}"
            },
            {
                "id": 12,
                "name": "松山パーキング",
                "latitude": 26.2200,
                "longitude": 127.6990,
                "calculated_fee": 700
            },
            {
                "id": 13,
                "name": "遠方パーキング",
                "lat": 26.2300,
                "lng": 127.6960,
                "calculated_fee": 800
            },
            {
                "id": 14,
                "name": "位置不明パーキング",
                "calculated_fee": 900
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_amenities(&server).await;

    let backend = client(&server);
    let pipeline = Pipeline::new(&backend, &backend, SearchPolicy::default());
    let result = pipeline.run(center(), &window()).await;

    let ids: Vec<_> = result.iter().filter_map(|c| c.id.as_deref()).collect();
    assert_eq!(ids, vec!["11", "12"]);
    assert!(result.is_fee_ordered());

    let first = &result.as_slice()[0];
    assert_eq!(
        first
            .amenity(AmenityCategory::ConvenienceStore)
            .map(|a| a.name.as_str()),
        Some("ローソン 若狭店")
    );
    assert_eq!(
        first.amenity(AmenityCategory::Toilet).map(|a| a.name.as_str()),
        Some("若狭公園トイレ")
    );
    assert!(first.amenity(AmenityCategory::HotSpring).is_none());

    // The toilet is ~350 m from the second candidate, outside the 300 m radius.
    let second = &result.as_slice()[1];
    assert!(second.amenity(AmenityCategory::Toilet).is_none());
    assert!(second.distance_to_center_m < 500.0);
}

#[tokio::test]
async fn ranking_outage_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_parking_spots_sorted_by_fee"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    mount_amenities(&server).await;

    let backend = client(&server);
    let pipeline = Pipeline::new(&backend, &backend, SearchPolicy::default());
    let result = pipeline.run(center(), &window()).await;

    assert!(result.is_empty());
}

#[tokio::test]
async fn odd_fee_and_name_values_keep_the_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_parking_spots_sorted_by_fee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 21, "name": 101, "lat": 26.2190, "lng": 127.6955, "calculated_fee": 300},
            {"id": 22, "name": "久米パーキング", "lat": 26.2185, "lng": 127.6965, "calculated_fee": "要問合せ"}
        ])))
        .mount(&server)
        .await;
    mount_amenities(&server).await;

    let backend = client(&server);
    let pipeline = Pipeline::new(&backend, &backend, SearchPolicy::default());
    let result = pipeline.run(center(), &window()).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.as_slice()[0].name, "101");
    assert_eq!(result.as_slice()[1].name, "久米パーキング");
    assert_eq!(result.as_slice()[1].calculated_fee, None);
    assert!(result.is_fee_ordered());
}
