//! End-to-end controller flows with the real HTTP clients against mocks.

use obhavo_core::Controller;
use obhavo_core::favorites::RestFavoritesStore;
use obhavo_core::lookup::OpenWeatherLookup;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE_PATH: &str = "/rest/v1/weather_favorites";

fn lookup_against(server: &MockServer) -> Box<OpenWeatherLookup> {
    Box::new(
        OpenWeatherLookup::new("test-key".to_string())
            .with_base_url(format!("{}/data/2.5/weather", server.uri())),
    )
}

fn store_against(server: &MockServer) -> Box<RestFavoritesStore> {
    Box::new(RestFavoritesStore::new(server.uri(), "secret-key"))
}

#[tokio::test]
async fn rejected_tashkent_search_lands_the_fog_payload_in_state() {
    let weather = MockServer::start().await;
    let table = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
        .mount(&weather)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&table)
        .await;

    let mut ctl = Controller::new(lookup_against(&weather), store_against(&table));
    ctl.init().await;
    ctl.submit("Tashkent").await;

    let snap = ctl.snapshot().expect("snapshot must be set");
    assert_eq!(snap.name, "Tashkent");
    assert_eq!(snap.country, "UZ");
    assert_eq!(snap.temp_c, -1);
    // A rejection is recovered silently, not surfaced as an error.
    assert!(ctl.error().is_none());
}

#[tokio::test]
async fn offline_search_shows_message_and_demo_payload() {
    let table = MockServer::start().await;
    let dead_weather_uri = {
        // A pooled `MockServer::start()` keeps its listener alive after drop;
        // a bare server from the builder actually frees the port.
        let server = MockServer::builder().start().await;
        format!("{}/data/2.5/weather", server.uri())
    };

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&table)
        .await;

    let mut ctl = Controller::new(
        Box::new(OpenWeatherLookup::new("test-key".to_string()).with_base_url(dead_weather_uri)),
        store_against(&table),
    );
    ctl.init().await;
    ctl.submit("London").await;

    assert!(ctl.error().is_some());
    assert!(!ctl.error().unwrap().is_empty());
    let snap = ctl.snapshot().expect("snapshot must be set");
    assert_eq!(snap.condition, "Clouds");
    assert_eq!(snap.description, "Bulutli");
}

#[tokio::test]
async fn add_favorite_posts_then_relists() {
    let weather = MockServer::start().await;
    let table = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Bukhara",
            "sys": { "country": "UZ", "sunrise": 1_700_000_000_i64, "sunset": 1_700_030_000_i64 },
            "main": { "temp": 19.2, "feels_like": 18.0, "humidity": 40, "pressure": 1016 },
            "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "wind": { "speed": 2.5, "deg": 140 },
            "visibility": 10000
        })))
        .mount(&weather)
        .await;
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&table)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "city_name": "Bukhara",
            "country": "UZ",
            "latitude": 0.0,
            "longitude": 0.0,
            "notes": "",
            "created_at": "2026-08-29T10:00:00+00:00",
            "updated_at": null
        }])))
        .mount(&table)
        .await;

    let mut ctl = Controller::new(lookup_against(&weather), store_against(&table));
    ctl.submit("Bukhara").await;
    ctl.add_favorite().await;

    assert_eq!(ctl.favorites().len(), 1);
    assert_eq!(ctl.favorites()[0].city_name, "Bukhara");
    assert_eq!(ctl.favorites()[0].country, "UZ");
    assert_eq!(ctl.favorites()[0].notes(), "");
}
