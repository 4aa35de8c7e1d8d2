use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use crate::{
    auth, categories,
    events::{self, OrderEvents},
    images::{self, ImageStore},
    menu, orders,
};
use engine::{Engine, EngineError};

/// Runtime options of the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory holding uploaded menu images.
    pub storage_dir: PathBuf,
    /// Base URL clients use to reach this server, used to build image URLs.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage_dir: PathBuf::from("./storage/menu-images"),
            public_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub events: OrderEvents,
    pub(crate) images: ImageStore,
}

impl ServerState {
    pub fn new(engine: Engine, config: &ServerConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            events: OrderEvents::new(),
            images: ImageStore::new(config.storage_dir.clone(), &config.public_url),
        }
    }
}

/// Resolve the bearer token to a session and attach it to the request.
async fn require_session(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let token = auth_header.token();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let session = match state.engine.session_user(token).await {
        Ok(session) => session,
        Err(EngineError::Unauthorized(_)) => return Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            tracing::error!("session lookup failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Build the full router. Admin routes require `Authorization: Bearer <token>`.
pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/categories", get(categories::list))
        .route("/menu", get(menu::list))
        .route("/menu/{id}", get(menu::get))
        .route("/orders", post(orders::create))
        .route("/orders/{id}", get(orders::get))
        .route("/images/{name}", get(images::get))
        .route("/auth/sign-in", post(auth::sign_in));

    let admin = Router::new()
        .route("/categories", post(categories::create))
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::delete),
        )
        .route("/menu", post(menu::create))
        .route("/menu/{id}", patch(menu::update).delete(menu::delete))
        .route("/orders", get(orders::list))
        .route("/orders/events", get(events::stream))
        .route("/orders/{id}", axum::routing::delete(orders::delete))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route(
            "/images",
            post(images::upload).layer(DefaultBodyLimit::max(images::MAX_UPLOAD_BYTES)),
        )
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    public.merge(admin).with_state(state)
}

pub async fn run(engine: Engine, config: ServerConfig) {
    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tokio::fs::create_dir_all(&config.storage_dir).await?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, &config);
    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
