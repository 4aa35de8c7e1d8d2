//! Typed access to the HTTP API. Every call returns `Result<T, ClientError>`
//! and logs its failure; nothing is swallowed here.

pub mod events;

pub use events::OrderFeed;

use std::path::Path;

use api_types::{
    auth::{CurrentUser, SessionView, SignIn},
    category::{CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryView},
    menu::{MenuItemNew, MenuItemUpdate, MenuItemView, MenuListResponse, MenuQuery},
    order::{
        OrderCreated, OrderListResponse, OrderNew, OrderQuery, OrderStatus, OrderStatusUpdate,
        OrderView,
    },
    upload::ImageUploaded,
};
use reqwest::{RequestBuilder, Response, Url, multipart};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::watch;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not signed in")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Server(String),
    #[error("connection failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("live connection failed: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

pub fn error_for_status(status: u16, body: String) -> ClientError {
    match status {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

async fn error_from(res: Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    error_for_status(status.as_u16(), body)
}

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    session: watch::Sender<Option<SessionView>>,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        let (session, _) = watch::channel(None);
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn token(&self) -> std::result::Result<String, ClientError> {
        self.session
            .borrow()
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(ClientError::Unauthorized)
    }

    fn authed(&self, request: RequestBuilder) -> std::result::Result<RequestBuilder, ClientError> {
        Ok(request.bearer_auth(self.token()?))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = request.send().await?;
        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(error_from(res).await)
    }

    async fn send_empty(&self, request: RequestBuilder) -> std::result::Result<(), ClientError> {
        let res = request.send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from(res).await)
    }

    // Auth

    /// Watch the admin session; `None` while signed out.
    pub fn subscribe_auth(&self) -> watch::Receiver<Option<SessionView>> {
        self.session.subscribe()
    }

    pub fn signed_in_email(&self) -> Option<String> {
        self.session
            .borrow()
            .as_ref()
            .map(|session| session.email.clone())
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<SessionView, ClientError> {
        let payload = SignIn {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.endpoint("auth/sign-in")?).json(&payload);
        let session: SessionView = self
            .send(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, "sign in failed"))?;
        tracing::info!(email = %session.email, "signed in");
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Revokes the token on the server. The local session is dropped even
    /// when the server call fails.
    pub async fn sign_out(&self) -> std::result::Result<(), ClientError> {
        let request = self.authed(self.http.post(self.endpoint("auth/sign-out")?))?;
        let result = self
            .send_empty(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, "sign out failed"));
        self.session.send_replace(None);
        result
    }

    /// Drop the local session without calling the server, e.g. after a 401.
    pub fn clear_session(&self) {
        self.session.send_replace(None);
    }

    pub async fn current_user(&self) -> std::result::Result<CurrentUser, ClientError> {
        let request = self.authed(self.http.get(self.endpoint("auth/me")?))?;
        self.send(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, "current user failed"))
    }

    // Categories

    pub async fn categories(&self) -> std::result::Result<Vec<CategoryView>, ClientError> {
        let request = self.http.get(self.endpoint("categories")?);
        self.send::<CategoryListResponse>(request)
            .await
            .map(|res| res.categories)
            .inspect_err(|err| tracing::warn!(%err, "list categories failed"))
    }

    pub async fn create_category(
        &self,
        payload: &CategoryCreate,
    ) -> std::result::Result<CategoryView, ClientError> {
        let request = self.authed(self.http.post(self.endpoint("categories")?))?;
        self.send(request.json(payload))
            .await
            .inspect_err(|err| tracing::warn!(%err, id = %payload.id, "create category failed"))
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &CategoryUpdate,
    ) -> std::result::Result<CategoryView, ClientError> {
        let url = self.endpoint(&format!("categories/{id}"))?;
        let request = self.authed(self.http.patch(url))?;
        self.send(request.json(payload))
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "update category failed"))
    }

    pub async fn delete_category(&self, id: &str) -> std::result::Result<(), ClientError> {
        let url = self.endpoint(&format!("categories/{id}"))?;
        let request = self.authed(self.http.delete(url))?;
        self.send_empty(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "delete category failed"))
    }

    // Menu

    async fn menu(&self, query: &MenuQuery) -> std::result::Result<Vec<MenuItemView>, ClientError> {
        let request = self.http.get(self.endpoint("menu")?).query(query);
        self.send::<MenuListResponse>(request)
            .await
            .map(|res| res.items)
            .inspect_err(|err| tracing::warn!(%err, ?query, "list menu failed"))
    }

    pub async fn menu_all(&self) -> std::result::Result<Vec<MenuItemView>, ClientError> {
        self.menu(&MenuQuery::default()).await
    }

    /// Items of one category ordered by name. Sold out items are left out
    /// unless `include_unavailable` is set.
    pub async fn menu_by_category(
        &self,
        category_id: &str,
        include_unavailable: bool,
    ) -> std::result::Result<Vec<MenuItemView>, ClientError> {
        self.menu(&MenuQuery {
            category: Some(category_id.to_string()),
            search: None,
            include_unavailable: include_unavailable.then_some(true),
        })
        .await
    }

    pub async fn search_menu(
        &self,
        term: &str,
    ) -> std::result::Result<Vec<MenuItemView>, ClientError> {
        self.menu(&MenuQuery {
            category: None,
            search: Some(term.to_string()),
            include_unavailable: None,
        })
        .await
    }

    pub async fn menu_item(&self, id: i32) -> std::result::Result<MenuItemView, ClientError> {
        let request = self.http.get(self.endpoint(&format!("menu/{id}"))?);
        self.send(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "get menu item failed"))
    }

    pub async fn create_menu_item(
        &self,
        payload: &MenuItemNew,
    ) -> std::result::Result<MenuItemView, ClientError> {
        let request = self.authed(self.http.post(self.endpoint("menu")?))?;
        self.send(request.json(payload))
            .await
            .inspect_err(|err| tracing::warn!(%err, name = %payload.name, "create menu item failed"))
    }

    pub async fn update_menu_item(
        &self,
        id: i32,
        payload: &MenuItemUpdate,
    ) -> std::result::Result<MenuItemView, ClientError> {
        let url = self.endpoint(&format!("menu/{id}"))?;
        let request = self.authed(self.http.patch(url))?;
        self.send(request.json(payload))
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "update menu item failed"))
    }

    pub async fn set_available(
        &self,
        id: i32,
        available: bool,
    ) -> std::result::Result<MenuItemView, ClientError> {
        let patch = MenuItemUpdate {
            available: Some(available),
            ..MenuItemUpdate::default()
        };
        self.update_menu_item(id, &patch).await
    }

    pub async fn delete_menu_item(&self, id: i32) -> std::result::Result<(), ClientError> {
        let url = self.endpoint(&format!("menu/{id}"))?;
        let request = self.authed(self.http.delete(url))?;
        self.send_empty(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "delete menu item failed"))
    }

    // Images

    pub async fn upload_image(
        &self,
        path: &Path,
    ) -> std::result::Result<ImageUploaded, ClientError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::Validation("invalid image path".to_string()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ClientError::Validation(format!("cannot read image: {err}")))?;
        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part("file", part);
        let request = self.authed(self.http.post(self.endpoint("images")?))?;
        self.send(request.multipart(form))
            .await
            .inspect_err(|err| tracing::warn!(%err, path = %path.display(), "image upload failed"))
    }

    /// Upload `path` and return its URL, or `previous` when the upload fails.
    pub async fn upload_image_or_keep(
        &self,
        path: &Path,
        previous: Option<String>,
    ) -> Option<String> {
        match self.upload_image(path).await {
            Ok(uploaded) => Some(uploaded.url),
            Err(_) => previous,
        }
    }

    // Orders

    pub async fn create_order(
        &self,
        payload: &OrderNew,
    ) -> std::result::Result<OrderCreated, ClientError> {
        let request = self.http.post(self.endpoint("orders")?).json(payload);
        let created: OrderCreated = self
            .send(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, "create order failed"))?;
        tracing::info!(order_id = %created.id, "order placed");
        Ok(created)
    }

    pub async fn order(&self, id: &str) -> std::result::Result<OrderView, ClientError> {
        let request = self.http.get(self.endpoint(&format!("orders/{id}"))?);
        self.send(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "get order failed"))
    }

    /// Newest first; `status` narrows the list to one stage.
    pub async fn orders(
        &self,
        status: Option<OrderStatus>,
    ) -> std::result::Result<Vec<OrderView>, ClientError> {
        let request = self.authed(self.http.get(self.endpoint("orders")?))?;
        self.send::<OrderListResponse>(request.query(&OrderQuery { status }))
            .await
            .map(|res| res.orders)
            .inspect_err(|err| tracing::warn!(%err, ?status, "list orders failed"))
    }

    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> std::result::Result<OrderView, ClientError> {
        let url = self.endpoint(&format!("orders/{id}/status"))?;
        let request = self.authed(self.http.patch(url))?;
        self.send(request.json(&OrderStatusUpdate { status }))
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "update order status failed"))
    }

    pub async fn delete_order(&self, id: &str) -> std::result::Result<(), ClientError> {
        let url = self.endpoint(&format!("orders/{id}"))?;
        let request = self.authed(self.http.delete(url))?;
        self.send_empty(request)
            .await
            .inspect_err(|err| tracing::warn!(%err, id, "delete order failed"))
    }

    /// Open the live order feed; see [`events::subscribe`].
    pub fn order_events(&self) -> std::result::Result<OrderFeed, ClientError> {
        let url = self.endpoint("orders/events")?;
        let token = self.token()?;
        Ok(events::subscribe(url, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(
            error_for_status(401, String::new()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            error_for_status(404, String::new()),
            ClientError::NotFound
        ));
        assert!(
            matches!(error_for_status(409, "exists".into()), ClientError::Conflict(m) if m == "exists")
        );
        assert!(
            matches!(error_for_status(422, "bad price".into()), ClientError::Validation(m) if m == "bad price")
        );
        assert!(matches!(
            error_for_status(500, "boom".into()),
            ClientError::Server(_)
        ));
    }

    #[test]
    fn admin_calls_need_a_session() {
        let client = Client::new("http://127.0.0.1:3000").unwrap();
        assert!(client.signed_in_email().is_none());
        assert!(matches!(client.token(), Err(ClientError::Unauthorized)));
        assert!(matches!(
            client.order_events(),
            Err(ClientError::Unauthorized)
        ));
    }

    #[test]
    fn auth_subscribers_see_session_changes() {
        let client = Client::new("http://127.0.0.1:3000").unwrap();
        let mut auth = client.subscribe_auth();
        client.session.send_replace(Some(SessionView {
            token: "t".to_string(),
            email: "staff@example.com".to_string(),
        }));
        assert!(auth.has_changed().unwrap());
        assert_eq!(
            auth.borrow_and_update().as_ref().map(|s| s.email.as_str()),
            Some("staff@example.com")
        );
        assert_eq!(client.token().unwrap(), "t");
    }

    #[tokio::test]
    async fn failed_upload_keeps_previous_image() {
        let client = Client::new("http://127.0.0.1:3000").unwrap();
        let kept = client
            .upload_image_or_keep(
                Path::new("/definitely/missing/photo.png"),
                Some("http://127.0.0.1:3000/images/old.png".to_string()),
            )
            .await;
        assert_eq!(
            kept.as_deref(),
            Some("http://127.0.0.1:3000/images/old.png")
        );
    }
}
