use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures::StreamExt;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::{
    self, Message, client::IntoClientRequest, http::header::AUTHORIZATION,
};
use tower::ServiceExt;

use api_types::order::{OrderChange, OrderChangeKind};
use engine::Engine;
use migration::MigratorTrait;
use server::{ServerConfig, ServerState, router};

fn storage_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tableorder-api-{}-{name}", std::process::id()))
}

async fn setup(name: &str) -> (Router, ServerState) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine
        .create_admin("staff@example.com", "s3cret")
        .await
        .unwrap();

    let storage_dir = storage_dir(name);
    std::fs::create_dir_all(&storage_dir).unwrap();
    let config = ServerConfig {
        storage_dir,
        public_url: "http://test.local".to_string(),
        ..ServerConfig::default()
    };

    let state = ServerState::new(engine, &config);
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn sign_in(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/sign-in",
            None,
            json!({"email": "staff@example.com", "password": "s3cret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn seed_catalog(app: &Router, token: &str) -> (i64, i64) {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/categories",
            Some(token),
            json!({"id": "ayam", "label": "Ayam", "emoji": "🍗"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, a) = send(
        app,
        json_request(
            "POST",
            "/menu",
            Some(token),
            json!({"name": "Ayam Goreng", "price": 15000, "category_id": "ayam"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, b) = send(
        app,
        json_request(
            "POST",
            "/menu",
            Some(token),
            json!({"name": "Ayam Bakar", "price": 18000, "category_id": "ayam"}),
        ),
    )
    .await;
    (a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap())
}

#[tokio::test]
async fn admin_routes_require_a_valid_token() {
    let (app, _state) = setup("auth").await;

    let (status, _) = send(
        &app,
        json_request("POST", "/categories", None, json!({"id": "x", "label": "X", "emoji": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/orders", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/sign-in",
            None,
            json!({"email": "staff@example.com", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let token = sign_in(&app).await;
    let (status, body) = send(&app, get("/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "staff@example.com");

    let (status, _) = send(
        &app,
        json_request("POST", "/auth/sign-out", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get("/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_menu_reads() {
    let (app, _state) = setup("menu").await;
    let token = sign_in(&app).await;
    let (a, b) = seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        json_request("PATCH", &format!("/menu/{b}"), Some(&token), json!({"available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/menu?category=ayam", None)).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], a);

    let (_, body) = send(&app, get("/menu?search=BAKAR", None)).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/categories", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"][0]["id"], "ayam");

    let (status, _) = send(&app, get("/menu/9999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_flow_publishes_changes() {
    let (app, state) = setup("orders").await;
    let token = sign_in(&app).await;
    let (a, b) = seed_catalog(&app, &token).await;
    let mut feed = state.events.subscribe();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            None,
            json!({
                "customer_name": "Budi",
                "table_number": "7",
                "total_price": 48000,
                "payment_method": "qris",
                "items": [
                    {"menu_item_id": a, "quantity": 2, "price_at_order": 15000, "notes": "no onion"},
                    {"menu_item_id": b, "quantity": 1, "price_at_order": 18000}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(
        feed.recv().await.unwrap(),
        OrderChange {
            kind: OrderChangeKind::Insert,
            order_id: id.clone(),
        }
    );

    let (status, order) = send(&app, get(&format!("/orders/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_method"], "qris");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["menu_item"]["name"], "Ayam Goreng");

    let (status, _) = send(&app, get("/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, updated) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/orders/{id}/status"),
            Some(&token),
            json!({"status": "confirmed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(feed.recv().await.unwrap().kind, OrderChangeKind::Update);

    let (_, listed) = send(&app, get("/orders?status=confirmed", Some(&token))).await;
    assert_eq!(listed["orders"].as_array().unwrap().len(), 1);
    let (_, listed) = send(&app, get("/orders?status=pending", Some(&token))).await;
    assert!(listed["orders"].as_array().unwrap().is_empty());

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/orders/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(feed.recv().await.unwrap().kind, OrderChangeKind::Delete);
}

#[tokio::test]
async fn order_feed_pushes_json_frames_over_websocket() {
    let (app, state) = setup("feed").await;
    let token = sign_in(&app).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, app.clone()).into_future());
    let url = format!("ws://{addr}/orders/events");

    let anonymous = tokio_tungstenite::connect_async(url.as_str()).await;
    assert!(matches!(
        anonymous,
        Err(tungstenite::Error::Http(ref res)) if res.status().as_u16() == 401
    ));

    let mut request = url.as_str().into_client_request().unwrap();
    request
        .headers_mut()
        .insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let (mut socket, _) = tokio_tungstenite::connect_async(request).await.unwrap();

    state.events.publish(OrderChangeKind::Insert, "o-42");

    let Message::Text(text) = socket.next().await.unwrap().unwrap() else {
        panic!("expected a text frame");
    };
    let change: OrderChange = serde_json::from_str(text.as_str()).unwrap();
    assert_eq!(
        change,
        OrderChange {
            kind: OrderChangeKind::Insert,
            order_id: "o-42".to_string(),
        }
    );
}

#[tokio::test]
async fn invalid_orders_are_rejected() {
    let (app, state) = setup("invalid").await;
    let token = sign_in(&app).await;
    let (a, _) = seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            None,
            json!({
                "customer_name": "Budi",
                "table_number": "7",
                "total_price": 15000,
                "payment_method": "kasir",
                "items": [
                    {"menu_item_id": a, "quantity": 1, "price_at_order": 15000},
                    {"menu_item_id": 31337, "quantity": 1, "price_at_order": 1}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            None,
            json!({
                "customer_name": "",
                "table_number": "7",
                "total_price": 0,
                "payment_method": "kasir",
                "items": []
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let orders = state.engine.list_orders(None).await.unwrap();
    assert!(orders.is_empty());
}

fn upload_request(token: &str, filename: &str) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fakepng\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/images")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn uploaded_image_is_served_back() {
    let (app, _state) = setup("images").await;
    let token = sign_in(&app).await;

    let (status, uploaded) = send(&app, upload_request(&token, "dish.PNG")).await;
    assert_eq!(status, StatusCode::CREATED);
    let filename = uploaded["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_eq!(
        uploaded["url"],
        format!("http://test.local/images/{filename}")
    );

    let response = app
        .clone()
        .oneshot(get(&format!("/images/{filename}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/png"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fakepng");

    let (status, _) = send(&app, get("/images/missing.png", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn image_storage_failure_is_a_server_error() {
    let (app, _state) = setup("images-broken").await;
    let token = sign_in(&app).await;

    // A plain file where the storage directory should be makes every write fail.
    let dir = storage_dir("images-broken");
    std::fs::remove_dir_all(&dir).unwrap();
    std::fs::write(&dir, b"not a directory").unwrap();

    let (status, body) = send(&app, upload_request(&token, "dish.png")).await;
    std::fs::remove_file(&dir).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "failed to store image");
}
