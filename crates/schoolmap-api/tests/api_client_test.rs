#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schoolmap_api::{ApiClient, Error, Geometry, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Schools ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_schools() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "uuid": "0f8e2a9c-1111-4c1d-9a55-000000000001",
            "nama": "SD Negeri 060843",
            "npsn": "10210871",
            "alamat": "Jl. Gatot Subroto No. 1",
            "status": "NEGERI",
            "bentuk_pendidikan": "SD",
            "akreditasi": "A",
            "jumlah_guru": 14,
            "jumlah_murid": 320,
            "lat": 3.5911,
            "lng": 98.6601,
            "kelurahan_id": 3
        },
        {
            "uuid": "0f8e2a9c-1111-4c1d-9a55-000000000002",
            "nama": "SMP Swasta Methodist",
            "npsn": 10210999,
            "alamat": null,
            "status": "SWASTA",
            "bentuk_pendidikan": "SMP",
            "akreditasi": "B",
            "jumlah_guru": null,
            "jumlah_murid": "410",
            "lat": 3.5802,
            "lng": 98.6712
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/schools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let schools = client.list_schools().await.unwrap();

    assert_eq!(schools.len(), 2);
    assert_eq!(schools[0].name.as_deref(), Some("SD Negeri 060843"));
    assert_eq!(schools[0].region_id, Some(3));
    assert_eq!(schools[0].teacher_count, Some(14));
    assert_eq!(schools[1].npsn.as_deref(), Some("10210999"));
    assert_eq!(schools[1].address, None);
    assert_eq!(schools[1].teacher_count, None);
    assert_eq!(schools[1].student_count, Some(410));
}

#[tokio::test]
async fn test_list_schools_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/schools"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Failed to fetch sekolah data" })),
        )
        .mount(&server)
        .await;

    let result = client.list_schools().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to fetch sekolah data");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_schools_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/schools"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_schools().await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_accredited_not_found_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/schools/accredited"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "message": "No accredited schools found" })),
        )
        .mount(&server)
        .await;

    let schools = client.list_accredited_schools().await.unwrap();
    assert!(schools.is_empty());
}

// ── Regions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_regions() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": 3,
        "kelurahan": "Sei Sikambing B",
        "kecamatan": "Medan Sunggal",
        "provinsi": "Sumatera Utara",
        "kode_pos": 20122,
        "luas": 1.42,
        "geometry": {
            "type": "MultiPolygon",
            "coordinates": [[[[98.63, 3.58], [98.65, 3.58], [98.65, 3.60], [98.63, 3.58]]]]
        }
    }]);

    Mock::given(method("GET"))
        .and(path("/api/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let regions = client.list_regions().await.unwrap();

    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].name, "Sei Sikambing B");
    assert_eq!(regions[0].district.as_deref(), Some("Medan Sunggal"));
    assert_eq!(regions[0].postal_code.as_deref(), Some("20122"));
    assert!(matches!(regions[0].geometry, Some(Geometry::MultiPolygon { .. })));
}

#[tokio::test]
async fn test_region_stats() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": 3,
        "kelurahan": "Sei Sikambing B",
        "kecamatan": "Medan Sunggal",
        "total_schools": "9",
        "sd_count": "6",
        "smp_count": "2",
        "sma_count": "1"
    }]);

    Mock::given(method("GET"))
        .and(path("/api/regions/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.list_region_stats().await.unwrap();

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_schools, 9);
    assert_eq!(stats[0].sd_count + stats[0].smp_count + stats[0].sma_count, 9);
}

// ── User location ───────────────────────────────────────────────────

#[tokio::test]
async fn test_save_user_location_sends_identity() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(base_url, Some("tester"), &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/user-location"))
        .and(header("x-user-id", "tester"))
        .and(body_json(json!({ "lat": 3.59, "lng": 98.67 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Location saved successfully",
            "data": { "lat": 3.59, "lng": 98.67, "timestamp": 1_718_000_000_000_i64 }
        })))
        .mount(&server)
        .await;

    let saved = client.save_user_location(3.59, 98.67).await.unwrap();

    assert!((saved.lat - 3.59).abs() < f64::EPSILON);
    assert!(saved.recorded_at().is_some());
}

#[tokio::test]
async fn test_get_user_location_missing_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-location"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": "No location data found for this user" })),
        )
        .mount(&server)
        .await;

    assert!(client.get_user_location().await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_user_location() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lat": 3.6,
            "lng": 98.7,
            "timestamp": 1_718_000_000_000_i64
        })))
        .mount(&server)
        .await;

    let loc = client.get_user_location().await.unwrap().unwrap();
    assert!((loc.lng - 98.7).abs() < f64::EPSILON);
}
