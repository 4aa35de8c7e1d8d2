//! Drives [`App`] against a small in-process API.

use api_types::auth::SessionView;
use axum::{Json, Router};

use super::App;
use crate::config::AppConfig;

/// Serve `router` on a free local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, router).into_future());
    format!("http://{addr}")
}

/// An app with a fresh state file, talking to `base_url`.
pub fn app_for(base_url: String, name: &str) -> App {
    let state_path = std::env::temp_dir().join(format!(
        "tableorder-tui-{}-{name}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&state_path);
    App::new(AppConfig {
        base_url,
        state_path,
        ..AppConfig::default()
    })
    .unwrap()
}

/// `POST /auth/sign-in` that accepts anyone.
pub async fn signed_in() -> Json<SessionView> {
    Json(SessionView {
        token: "t0ken".to_string(),
        email: "staff@example.com".to_string(),
    })
}
