use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

use wms_auth::{Session, SessionToken};
use wms_client::{ClientConfig, ClientError, HttpBackend, InventoryBackend};
use wms_core::{LocationId, ProductId, StockStatusId};
use wms_inventory::{Direction, TransactionItem, TransactionRequest};

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
    request_id: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    posted: Arc<Mutex<Vec<Recorded>>>,
    seen_auth: Arc<Mutex<Vec<Option<String>>>>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

async fn product_by_code(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> axum::response::Response {
    state.seen_auth.lock().unwrap().push(header(&headers, "authorization"));
    match code.as_str() {
        "SKU123" => Json(json!({
            "id": 7,
            "code": "SKU123",
            "name": "Widget",
            "purchase_price": "1200.00",
            "selling_price": "1500.00"
        }))
        .into_response(),
        "A B/1" => Json(json!({ "id": 8, "code": "A B/1", "name": "Odd code" })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Produk tidak ditemukan" })))
            .into_response(),
    }
}

async fn locations() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "A1", "capacity": 100, "used_capacity": 20 },
        { "id": 2, "name": "B2" },
        { "id": 3, "name": "C3", "capacity": "100.00", "used_capacity": "40.00" }
    ]))
}

async fn stock_statuses() -> Json<Value> {
    Json(json!({ "data": [{ "id": 1, "name": "Good" }, { "id": 2, "name": "Damaged" }] }))
}

async fn specific_stock(Path((product, location)): Path<(i64, i64)>) -> axum::response::Response {
    match (product, location) {
        (7, 1) => Json(json!({ "system_count": 50 })).into_response(),
        (7, 2) => Json(json!({ "system_count": "0" })).into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn transaction(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(direction): Path<String>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    let quantity = body["items"][0]["quantity"].as_u64().unwrap_or(0);
    state.posted.lock().unwrap().push(Recorded {
        path: format!("/api/transactions/{direction}"),
        authorization: header(&headers, "authorization"),
        request_id: header(&headers, "x-request-id"),
        body,
    });

    if quantity > 1000 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "Stok tidak mencukupi" })),
        )
            .into_response();
    }
    if direction == "in" {
        (StatusCode::CREATED, "").into_response()
    } else {
        let body = json!({ "message": "ok", "transaction_id": 99 });
        (StatusCode::CREATED, Json(body)).into_response()
    }
}

struct TestServer {
    base_url: String,
    state: StubState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let state = StubState::default();
        let api = Router::new()
            .route("/products/by-code/:code", get(product_by_code))
            .route("/locations", get(locations))
            .route("/stock-statuses", get(stock_statuses))
            .route("/stocks/specific/:product/:location", get(specific_stock))
            .route("/transactions/:direction", post(transaction))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    fn client(&self) -> HttpBackend {
        let config = ClientConfig::new(&self.base_url).unwrap();
        HttpBackend::new(&config, Session::new(SessionToken::new("test-token"))).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn resolves_product_by_code_with_bearer_token() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let product = client.product_by_code("SKU123").await.unwrap();
    assert_eq!(product.id, ProductId::from_raw(7));
    assert_eq!(product.name, "Widget");
    assert_eq!(product.pricing.purchase_price, Some(1200.0));

    let seen = srv.state.seen_auth.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bearer test-token".to_string())]);
}

#[tokio::test]
async fn unknown_code_maps_to_not_found() {
    let srv = TestServer::spawn().await;
    let err = srv.client().product_by_code("NOPE").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn codes_with_reserved_characters_are_path_encoded() {
    let srv = TestServer::spawn().await;
    let product = srv.client().product_by_code("A B/1").await.unwrap();
    assert_eq!(product.id, ProductId::from_raw(8));
}

#[tokio::test]
async fn lists_master_data_in_both_envelope_shapes() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let locations = client.list_locations().await.unwrap();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0].name, "A1");
    assert_eq!(locations[2].remaining_capacity(), Some(60.0));

    let statuses = client.list_stock_statuses().await.unwrap();
    assert_eq!(statuses[0].id, StockStatusId::from_raw(1));
    assert_eq!(statuses[1].name, "Damaged");
}

#[tokio::test]
async fn fetches_system_count_including_zero_and_failure() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let widget = ProductId::from_raw(7);

    assert_eq!(client.system_count(widget, LocationId::from_raw(1)).await, Ok(50));
    assert_eq!(client.system_count(widget, LocationId::from_raw(2)).await, Ok(0));

    let err = client
        .system_count(widget, LocationId::from_raw(3))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }), "got {err:?}");
}

fn request(quantity: u64) -> TransactionRequest {
    TransactionRequest {
        notes: "Stock opname: recount (variance -5)".to_string(),
        items: vec![TransactionItem {
            product_id: ProductId::from_raw(7),
            location_id: LocationId::from_raw(1),
            quantity,
            stock_status_id: StockStatusId::from_raw(1),
            purchase_price: Some(1200.0),
            selling_price: None,
        }],
    }
}

#[tokio::test]
async fn posts_transactions_to_directional_endpoint() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let receipt = client.record_transaction(Direction::Out, &request(5)).await.unwrap();
    assert_eq!(receipt.id, Some(99));

    let receipt = client.record_transaction(Direction::In, &request(2)).await.unwrap();
    assert_eq!(receipt.id, None);

    let posted = srv.state.posted.lock().unwrap().clone();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].path, "/api/transactions/out");
    assert_eq!(posted[1].path, "/api/transactions/in");
    assert_eq!(posted[0].authorization.as_deref(), Some("Bearer test-token"));
    assert!(posted[0].request_id.is_some());
    assert_ne!(posted[0].request_id, posted[1].request_id);
    assert_eq!(posted[0].body["items"][0]["quantity"], 5);
    assert_eq!(posted[0].body["items"][0]["selling_price"], Value::Null);
}

#[tokio::test]
async fn backend_validation_message_is_surfaced() {
    let srv = TestServer::spawn().await;
    let err = srv
        .client()
        .record_transaction(Direction::Out, &request(5000))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Api {
            status: 422,
            message: "Stok tidak mencukupi".to_string()
        }
    );
    assert_eq!(err.operator_message(), "Stok tidak mencukupi");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(&format!("http://{addr}/api")).unwrap();
    let client = HttpBackend::new(&config, Session::new(SessionToken::new("t"))).unwrap();
    let err = client.list_locations().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
}
