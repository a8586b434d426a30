//! Catalog loaders against a mock HTTP server and temporary files.

use std::io::Write;
use std::time::Duration;

use assert_matches::assert_matches;
use hospital_supply_api::{
    catalog::{loader_from_config, CatalogLoader, FileCatalogLoader, HttpCatalogLoader},
    config::CatalogConfig,
    errors::ServiceError,
};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn contracts_document() -> serde_json::Value {
    json!([
        {
            "Código Producto": "1001",
            "Licitacion": "LP-SA-014-2024",
            "Contrato": "CT-1001",
            "Proveedor": "Lácteos del Norte",
            "Descripción": "Leche entera",
            "Unidad": "Litro",
            "Grupo": "Lácteos",
            "Precio Unitario": 22.5,
            "Cantidad Maxima": 1000,
            "Cantidad Consumida": 250,
            "Cantidad Disponible": 750
        },
        {
            "Código Producto": "2001",
            "Proveedor": "Abarrotes Jalisco",
            "Descripción": "Arroz blanco",
            "Cantidad Maxima": "500",
            "Cantidad Consumida": "120"
        }
    ])
}

#[tokio::test]
async fn http_loader_maps_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contracts.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contracts_document()))
        .expect(1)
        .mount(&server)
        .await;

    let loader = HttpCatalogLoader::new(
        &format!("{}/contracts.json", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let items = loader.load_catalog().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_id, "1001");
    assert_eq!(items[0].unit_price, Decimal::new(225, 1));
    assert_eq!(items[1].provider_id, "Abarrotes Jalisco");
    assert_eq!(items[1].available_quantity, Decimal::from(380));
    assert_eq!(items[1].unit, "N/A");
}

#[tokio::test]
async fn http_loader_surfaces_status_in_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contracts.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let loader = HttpCatalogLoader::new(
        &format!("{}/contracts.json", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let err = loader.load_catalog().await.unwrap_err();

    assert_matches!(&err, ServiceError::CatalogLoadFailure(message) if message.contains("404 Not Found"));
}

#[tokio::test]
async fn http_loader_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let loader = HttpCatalogLoader::new(&server.uri(), Duration::from_secs(5)).unwrap();
    assert_matches!(
        loader.load_catalog().await,
        Err(ServiceError::CatalogLoadFailure(_))
    );
}

#[test]
fn malformed_url_is_rejected_up_front() {
    assert_matches!(
        HttpCatalogLoader::new("not a url", Duration::from_secs(1)),
        Err(ServiceError::InvalidInput(_))
    );
}

#[tokio::test]
async fn file_loader_reads_contracts_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contracts_document().to_string().as_bytes())
        .unwrap();

    let loader = FileCatalogLoader::new(file.path());
    let items = loader.load_catalog().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].description, "Leche entera");
    assert!(loader.describe().starts_with("file:"));
}

#[tokio::test]
async fn configured_loader_defaults_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contracts.json");
    std::fs::write(&path, "[]").unwrap();

    let config = CatalogConfig {
        path: path.clone(),
        ..CatalogConfig::default()
    };
    let loader = loader_from_config(&config).unwrap();
    assert!(loader.load_catalog().await.unwrap().is_empty());
}
