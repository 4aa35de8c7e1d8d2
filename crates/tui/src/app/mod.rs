pub mod admin;
pub mod customer;
pub mod form;

#[cfg(test)]
mod test_support;

use std::time::{Duration, Instant};

use api_types::{
    auth::SessionView,
    order::OrderNew,
};
use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::watch;

use crate::{
    client::{Client, ClientError, OrderFeed},
    config::AppConfig,
    error::{AppError, Result},
    store::{LocalState, table_from_link},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use admin::{AdminSection, AdminState, Confirm, DashboardStats, Editor, EditorKind};
pub use customer::{CustomerState, DetailState, HistoryView, Overlay};

const TOAST_TTL: Duration = Duration::from_secs(3);
const HISTORY_POLL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Login,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub local: LocalState,
    pub customer: CustomerState,
    pub login: LoginState,
    pub admin: AdminState,
    pub toast: Option<ToastState>,
    pub currency: String,
    pub timezone: chrono_tz::Tz,
    pub base_url: String,
}

impl AppState {
    /// Whether keys should go to a text field rather than act as shortcuts.
    pub fn is_typing(&self) -> bool {
        match self.screen {
            Screen::Login => true,
            Screen::Admin => self.admin.editor.is_some(),
            Screen::Menu => match &self.customer.overlay {
                Overlay::Detail(_) => true,
                Overlay::Checkout(checkout) => checkout.active_text().is_some(),
                Overlay::History => false,
                Overlay::None => self.customer.search.is_some(),
            },
        }
    }
}

/// Banner text for a failed call.
pub fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Session expired, sign in again.".to_string(),
        ClientError::Forbidden => "Not allowed.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        ClientError::Conflict(msg) | ClientError::Validation(msg) | ClientError::Server(msg) => {
            msg.clone()
        }
        ClientError::Transport(_) => "Server unreachable.".to_string(),
        ClientError::Socket(_) => "Live updates disconnected.".to_string(),
    }
}

fn login_message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Invalid email or password.".to_string(),
        other => message_for_error(other),
    }
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    auth: watch::Receiver<Option<SessionView>>,
    order_events: Option<OrderFeed>,
    pending_order: Option<OrderNew>,
    history_polled_at: Option<Instant>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let auth = client.subscribe_auth();
        let timezone = config.timezone()?;

        let mut local = LocalState::load(&config.state_path)?;
        let inbound = config
            .table
            .clone()
            .or_else(|| config.link.as_deref().and_then(table_from_link));
        if local.table.adopt_link_param(inbound.as_deref()) {
            tracing::info!(table = %local.table.table_number(), "table number taken from link");
            local.save(&config.state_path)?;
        }

        let state = AppState {
            screen: Screen::Menu,
            local,
            customer: CustomerState::default(),
            login: LoginState::default(),
            admin: AdminState::default(),
            toast: None,
            currency: config.currency.clone(),
            timezone,
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            config,
            client,
            state,
            auth,
            order_events: None,
            pending_order: None,
            history_polled_at: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.load_menu().await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            // Submitted after the loading frame has been drawn.
            if let Some(order) = self.pending_order.take() {
                self.submit_order(order).await;
                continue;
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            self.tick().await;
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key, self.state.is_typing());
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if action == AppAction::None {
            return;
        }

        match self.state.screen {
            Screen::Menu => self.handle_customer(action).await,
            Screen::Login => self.handle_login(action).await,
            Screen::Admin => self.handle_admin(action).await,
        }
    }

    async fn tick(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.state.toast = None;
        }

        if self.auth.has_changed().unwrap_or(false) {
            let session = self.auth.borrow_and_update().clone();
            self.on_session_change(session);
        }

        self.drain_order_events().await;

        if matches!(self.state.customer.overlay, Overlay::History)
            && self
                .history_polled_at
                .is_none_or(|at| at.elapsed() >= HISTORY_POLL)
        {
            self.load_history().await;
        }
    }

    fn on_session_change(&mut self, session: Option<SessionView>) {
        match session {
            Some(session) => {
                self.state.admin.email = session.email;
            }
            None => {
                self.state.admin.email.clear();
                self.state.admin.live = false;
                self.order_events = None;
                if self.state.screen == Screen::Admin {
                    self.state.screen = Screen::Login;
                }
            }
        }
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    /// Write the local state; a failure is reported but does not stop the app.
    fn persist(&mut self) {
        if let Err(err) = self.state.local.save(&self.config.state_path) {
            tracing::warn!(%err, path = %self.config.state_path.display(), "saving local state failed");
            self.toast(ToastLevel::Error, "Could not save local state");
        }
    }

    // Login

    async fn handle_login(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.login.message = None;
                self.state.screen = Screen::Menu;
            }
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                self.state.login.focus = match self.state.login.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            AppAction::Backspace => {
                self.active_login_field_mut().pop();
            }
            AppAction::Input(ch) => self.active_login_field_mut().push(ch),
            AppAction::Submit => self.attempt_login().await,
            _ => {}
        }
    }

    fn active_login_field_mut(&mut self) -> &mut String {
        match self.state.login.focus {
            LoginField::Email => &mut self.state.login.email,
            LoginField::Password => &mut self.state.login.password,
        }
    }

    async fn attempt_login(&mut self) {
        let email = self.state.login.email.trim().to_string();
        let password = self.state.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.state.login.message = Some("Fill in email and password.".to_string());
            return;
        }

        match self.client.sign_in(&email, &password).await {
            Ok(session) => {
                self.state.login.password.clear();
                self.state.login.message = None;
                self.state.admin.email = session.email;
                self.state.screen = Screen::Admin;
                self.open_admin().await;
            }
            Err(err) => {
                self.state.login.message = Some(login_message_for_error(&err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_banners() {
        assert_eq!(
            login_message_for_error(&ClientError::Unauthorized),
            "Invalid email or password."
        );
        assert_eq!(
            message_for_error(&ClientError::Validation("price must not be negative".into())),
            "price must not be negative"
        );
        assert_eq!(
            message_for_error(&ClientError::Unauthorized),
            "Session expired, sign in again."
        );
    }

    #[tokio::test]
    async fn losing_the_session_drops_the_live_feed() {
        let mut app = test_support::app_for("http://127.0.0.1:9".to_string(), "session-drop");
        let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
        app.order_events = Some(OrderFeed::from_channel(rx));
        app.state.admin.live = true;
        app.state.screen = Screen::Admin;

        app.on_session_change(None);

        assert!(app.order_events.is_none());
        assert!(!app.state.admin.live);
        assert_eq!(app.state.screen, Screen::Login);
    }
}
