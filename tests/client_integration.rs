//! Integration tests for OpenMeteoClient using wiremock.

mod common;

use chrono::{TimeZone, Utc};
use common::{client, forecast_body, location, FORECAST_PATH};
use openmeteo_exporter::client::ClientError;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "45.52"))
        .and(query_param("longitude", "-122.68"))
        .and(query_param("timezone", "America/Los_Angeles"))
        .and(query_param("forecast_days", "1"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(18.5, &[22.1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshot = client(&mock_server).forecast(&location()).await.unwrap();

    assert_eq!(12.3, snapshot.elevation);
    assert_eq!(-25200, snapshot.utc_offset_seconds);
    assert_eq!(Some(18.5), snapshot.current.temperature_2m);
    assert_eq!(vec![Some(22.1)], snapshot.daily.temperature_2m_max);
    assert_eq!(
        Utc.with_ymd_and_hms(2024, 7, 1, 17, 45, 0).unwrap(),
        snapshot.current_time().unwrap()
    );
}

#[tokio::test]
async fn test_forecast_requests_all_variables() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("current", openmeteo_exporter::fields::current_variables()))
        .and(query_param("daily", openmeteo_exporter::fields::daily_variables()))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(18.5, &[22.1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(client(&mock_server).forecast(&location()).await.is_ok());
}

#[tokio::test]
async fn test_forecast_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°."
        })))
        .mount(&mock_server)
        .await;

    let res = client(&mock_server).forecast(&location()).await;

    match res {
        Err(ClientError::Unexpected(status, _)) => assert_eq!(StatusCode::BAD_REQUEST, status),
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_forecast_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let res = client(&mock_server).forecast(&location()).await;
    assert!(matches!(res, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_forecast_missing_daily_field() {
    let mock_server = MockServer::start().await;
    let mut body = forecast_body(18.5, &[22.1]);
    body["daily"].as_object_mut().unwrap().remove("rain_sum");

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let res = client(&mock_server).forecast(&location()).await;
    assert!(matches!(res, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_forecast_empty_daily() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(18.5, &[])))
        .mount(&mock_server)
        .await;

    let res = client(&mock_server).forecast(&location()).await;
    assert!(matches!(res, Err(ClientError::EmptyDaily("time"))));
}

#[tokio::test]
async fn test_forecast_misaligned_daily() {
    let mock_server = MockServer::start().await;
    let mut body = forecast_body(18.5, &[22.1, 23.0]);
    body["daily"]["uv_index_max"] = json!([7.2]);

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let res = client(&mock_server).forecast(&location()).await;
    assert!(matches!(
        res,
        Err(ClientError::MisalignedDaily {
            field: "uv_index_max",
            expected: 2,
            actual: 1
        })
    ));
}
