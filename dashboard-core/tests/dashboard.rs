//! End-to-end flows through the dashboard against a mock backend.

use std::sync::Arc;

use dashboard_core::{
    ApiClient, ApiError, ClearOutcome, Dashboard, HistoryError, SearchError, SearchPhase, Session,
    format::temperature_label,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather(city: &str, country: &str) -> serde_json::Value {
    serde_json::json!({
        "city": city,
        "country": country,
        "temperature": 15.5,
        "feels_like": 14.0,
        "temp_min": 13.0,
        "temp_max": 17.0,
        "humidity": 72,
        "pressure": 1012,
        "wind_speed": 3.5,
        "wind_deg": 200,
        "weather": "Rain",
        "weather_description": "light rain",
        "weather_icon": "10d",
        "clouds": 90,
        "visibility": 8.0,
        "sunrise": "07:01",
        "sunset": "17:12",
        "timezone": 0,
        "lat": 51.5085,
        "lon": -0.1257
    })
}

fn history(entries: &[(i64, &str, &str, f64)]) -> serde_json::Value {
    let history: Vec<_> = entries
        .iter()
        .map(|(id, city, country, temperature)| {
            serde_json::json!({
                "id": id,
                "city_name": city,
                "country": country,
                "temperature": temperature,
                "weather_description": "light rain",
                "humidity": 72,
                "wind_speed": 3.5,
                "timestamp": "2024-01-05T14:30:00"
            })
        })
        .collect();
    serde_json::json!({ "count": history.len(), "history": history })
}

fn dashboard(server: &MockServer) -> Dashboard {
    let client = ApiClient::new(server.uri()).unwrap();
    Dashboard::new(Session::new(Arc::new(client)))
}

#[tokio::test]
async fn london_then_atlantis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather("London", "GB")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "Atlantis"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "City not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Only the successful search refreshes history.
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[(1, "London", "GB", 15.5)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dash = dashboard(&mock_server);

    let snapshot = dash.submit("London").await.unwrap();
    assert_eq!(snapshot.city, "London");
    assert_eq!(snapshot.country, "GB");

    let entries = dash.history().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].city_name, "London");
    assert_eq!(temperature_label(entries[0].temperature), "16°C");

    let err = dash.submit("Atlantis").await.unwrap_err();
    assert_eq!(err, SearchError::Api(ApiError::NotFound("City not found".into())));

    let state = dash.search().state();
    assert_eq!(state.phase, SearchPhase::Failed);
    assert_eq!(state.visible_error(), Some("City not found"));
    assert!(state.visible_snapshot().is_none());
    assert_eq!(dash.history().entries(), entries);
}

#[tokio::test]
async fn empty_input_issues_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dash = dashboard(&mock_server);
    let err = dash.submit("   ").await.unwrap_err();

    assert_eq!(err.to_string(), "Please enter a city name");
    assert_eq!(dash.search().state().visible_error(), Some("Please enter a city name"));
}

#[tokio::test]
async fn history_click_searches_by_city_label() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[(4, "Paris", "FR", 18.0)])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather("Paris", "FR")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dash = dashboard(&mock_server);
    dash.mount().await;

    let city = dash.history().entries()[0].city_name.clone();
    let snapshot = dash.select_history_entry(&city).await.unwrap();

    // Current conditions, not the stored 18.0.
    assert_eq!(snapshot.temperature, 15.5);
    assert_eq!(dash.search().state().query, "Paris");
}

#[tokio::test]
async fn failed_clear_keeps_list_and_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[
            (2, "Paris", "FR", 18.0),
            (1, "London", "GB", 15.5),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Failed to clear search history"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dash = dashboard(&mock_server);
    dash.mount().await;

    let err = dash.clear_history(|_| true).await.unwrap_err();

    assert_eq!(
        err,
        HistoryError::Clear(ApiError::Server {
            status: 500,
            message: "Failed to clear search history".into()
        })
    );
    assert_eq!(dash.history().entries().len(), 2);
    assert!(!dash.history().is_clearing());
}

#[tokio::test]
async fn successful_clear_empties_without_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[(1, "London", "GB", 15.5)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Search history cleared successfully",
            "deleted_count": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dash = dashboard(&mock_server);
    dash.mount().await;

    let outcome = dash.clear_history(|_| true).await.unwrap();

    assert_eq!(outcome, ClearOutcome::Cleared { deleted: 1 });
    assert!(dash.history().is_empty());
}

#[tokio::test]
async fn unreachable_backend_leaves_dashboard_usable() {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let dash = Dashboard::new(Session::new(Arc::new(client)));

    dash.mount().await;
    assert!(dash.history().is_empty());

    let err = dash.submit("London").await.unwrap_err();
    assert_eq!(err.to_string(), "No response from server. Please check your connection.");
    assert!(!dash.search().is_loading());
}
