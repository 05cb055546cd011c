#![allow(clippy::unwrap_used)]
// Integration tests for `OsrmClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schoolmap_api::{Error, OsrmClient, Waypoint};

const ROUTE_PATH: &str = "/route/v1/driving/98.66,3.59;98.67,3.58";

async fn setup() -> (MockServer, OsrmClient) {
    let server = MockServer::start().await;
    let client = OsrmClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        "driving",
    );
    (server, client)
}

fn waypoints() -> [Waypoint; 2] {
    [
        Waypoint { lat: 3.59, lng: 98.66 },
        Waypoint { lat: 3.58, lng: 98.67 },
    ]
}

#[tokio::test]
async fn test_route_ok_returns_alternatives_in_order() {
    let (server, client) = setup().await;

    let body = json!({
        "code": "Ok",
        "routes": [
            {
                "distance": 2450.3,
                "duration": 312.0,
                "legs": [{
                    "distance": 2450.3,
                    "duration": 312.0,
                    "steps": [
                        {
                            "distance": 120.0,
                            "duration": 20.0,
                            "name": "Jalan Gatot Subroto",
                            "maneuver": { "type": "depart", "bearing_after": 92 }
                        },
                        {
                            "distance": 2330.3,
                            "duration": 292.0,
                            "name": "Jalan Iskandar Muda",
                            "maneuver": { "type": "turn", "modifier": "right" }
                        },
                        {
                            "distance": 0.0,
                            "duration": 0.0,
                            "name": "",
                            "maneuver": { "type": "arrive" }
                        }
                    ]
                }]
            },
            { "distance": 2800.0, "duration": 360.0, "legs": [] }
        ]
    });

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .and(query_param("steps", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let routes = client.route(&waypoints()).await.unwrap();

    assert_eq!(routes.len(), 2);
    assert!((routes[0].distance - 2450.3).abs() < 1e-9);
    let steps = &routes[0].legs[0].steps;
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1].maneuver.kind, "turn");
    assert_eq!(steps[1].maneuver.modifier.as_deref(), Some("right"));
    assert_eq!(steps[2].name, "");
}

#[tokio::test]
async fn test_route_no_route_is_mapped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&server)
        .await;

    let result = client.route(&waypoints()).await;

    match result {
        Err(Error::NoRoute { message }) => {
            assert_eq!(message, "Impossible route between points");
        }
        other => panic!("expected NoRoute, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_route_ok_without_routes_is_no_route() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "Ok", "routes": [] })))
        .mount(&server)
        .await;

    let result = client.route(&waypoints()).await;
    assert!(matches!(result, Err(Error::NoRoute { .. })));
}

#[tokio::test]
async fn test_route_unknown_code_is_directions_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "InvalidQuery",
            "message": "Query string malformed"
        })))
        .mount(&server)
        .await;

    let result = client.route(&waypoints()).await;

    match result {
        Err(Error::Directions { code, message }) => {
            assert_eq!(code, "InvalidQuery");
            assert_eq!(message, "Query string malformed");
        }
        other => panic!("expected Directions error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_route_gateway_error_without_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.route(&waypoints()).await;

    match result {
        Err(ref e @ Error::Api { status, .. }) => {
            assert_eq!(status, 502);
            assert!(e.is_transient());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_route_requires_two_waypoints() {
    let (_server, client) = setup().await;

    let result = client.route(&[Waypoint { lat: 3.59, lng: 98.66 }]).await;
    assert!(matches!(result, Err(Error::InvalidData(_))));
}
