//! Staff side: dashboard, live order list, menu and category management.

use std::path::Path;

use api_types::{
    category::{CategoryCreate, CategoryUpdate, CategoryView},
    menu::{MenuItemNew, MenuItemUpdate, MenuItemView},
    order::{OrderStatus, OrderView},
};
use chrono::{NaiveDate, Utc};
use tokio::sync::mpsc::error::TryRecvError;

use super::{
    App, Screen, ToastLevel,
    form::{FormField, FormState},
    message_for_error,
};
use crate::{client::ClientError, ui::keymap::AppAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminSection {
    #[default]
    Dashboard,
    Orders,
    Menu,
    Categories,
}

impl AdminSection {
    pub const ALL: [AdminSection; 4] = [
        Self::Dashboard,
        Self::Orders,
        Self::Menu,
        Self::Categories,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Orders => "Orders",
            Self::Menu => "Menu",
            Self::Categories => "Categories",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub pending: usize,
    pub confirmed: usize,
    /// Completed orders created today.
    pub completed_today: usize,
    /// Sum of completed orders created today.
    pub revenue_today: i64,
}

impl DashboardStats {
    pub fn from_orders(orders: &[OrderView], tz: chrono_tz::Tz, today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for order in orders {
            let created_today = order.created_at.with_timezone(&tz).date_naive() == today;
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Confirmed => stats.confirmed += 1,
                OrderStatus::Completed if created_today => {
                    stats.completed_today += 1;
                    stats.revenue_today += order.total_price;
                }
                _ => {}
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    NewMenuItem,
    EditMenuItem { id: i32, image: Option<String> },
    NewCategory,
    EditCategory { id: String },
}

#[derive(Debug, Clone)]
pub struct Editor {
    pub kind: EditorKind,
    pub form: FormState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    SetAvailable {
        id: i32,
        name: String,
        available: bool,
    },
    DeleteMenuItem {
        id: i32,
        name: String,
    },
    DeleteCategory {
        id: String,
        label: String,
    },
    DeleteOrder {
        id: String,
        customer: String,
    },
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Self::SetAvailable {
                name,
                available: true,
                ..
            } => format!("Mark \"{name}\" as available?"),
            Self::SetAvailable { name, .. } => format!("Mark \"{name}\" as sold out?"),
            Self::DeleteMenuItem { name, .. } => format!("Delete menu item \"{name}\"?"),
            Self::DeleteCategory { label, .. } => {
                format!("Delete category \"{label}\"? Its items are kept.")
            }
            Self::DeleteOrder { customer, .. } => format!("Delete the order of {customer}?"),
        }
    }
}

/// What the image field of the menu editor asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Keep,
    Clear,
    Url(String),
    Upload(String),
}

pub fn image_input(value: &str, previous: Option<&str>) -> ImageInput {
    let value = value.trim();
    if value.is_empty() {
        return match previous {
            Some(_) => ImageInput::Clear,
            None => ImageInput::Keep,
        };
    }
    if Some(value) == previous {
        return ImageInput::Keep;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return ImageInput::Url(value.to_string());
    }
    ImageInput::Upload(value.to_string())
}

#[derive(Debug, Default)]
pub struct AdminState {
    pub section: AdminSection,
    pub email: String,
    /// Every order, newest first; feeds the dashboard.
    pub all_orders: Vec<OrderView>,
    /// Orders matching `order_filter`.
    pub orders: Vec<OrderView>,
    pub order_filter: Option<OrderStatus>,
    pub orders_selected: usize,
    pub menu: Vec<MenuItemView>,
    pub menu_selected: usize,
    pub categories: Vec<CategoryView>,
    pub categories_selected: usize,
    pub editor: Option<Editor>,
    pub confirm: Option<Confirm>,
    /// Whether the realtime order stream is connected.
    pub live: bool,
    pub error: Option<String>,
}

impl AdminState {
    pub fn selected_order(&self) -> Option<&OrderView> {
        self.orders.get(self.orders_selected)
    }

    pub fn selected_menu_item(&self) -> Option<&MenuItemView> {
        self.menu.get(self.menu_selected)
    }

    pub fn selected_category(&self) -> Option<&CategoryView> {
        self.categories.get(self.categories_selected)
    }

    pub fn stats(&self, tz: chrono_tz::Tz) -> DashboardStats {
        let today = Utc::now().with_timezone(&tz).date_naive();
        DashboardStats::from_orders(&self.all_orders, tz, today)
    }

    fn next_filter(&mut self) {
        self.order_filter = match self.order_filter {
            None => Some(OrderStatus::ALL[0]),
            Some(current) => OrderStatus::ALL
                .iter()
                .position(|status| *status == current)
                .and_then(|idx| OrderStatus::ALL.get(idx + 1).copied()),
        };
        self.orders_selected = 0;
    }

    fn move_selection(&mut self, down: bool) {
        let (selected, len) = match self.section {
            AdminSection::Dashboard => return,
            AdminSection::Orders => (&mut self.orders_selected, self.orders.len()),
            AdminSection::Menu => (&mut self.menu_selected, self.menu.len()),
            AdminSection::Categories => (&mut self.categories_selected, self.categories.len()),
        };
        if down {
            if *selected + 1 < len {
                *selected += 1;
            }
        } else {
            *selected = selected.saturating_sub(1);
        }
    }
}

fn clamp(selected: &mut usize, len: usize) {
    *selected = (*selected).min(len.saturating_sub(1));
}

fn menu_form(title: &str, item: Option<&MenuItemView>, default_category: &str) -> FormState {
    FormState::new(
        title,
        vec![
            FormField::text("Name", item.map(|i| i.name.clone()).unwrap_or_default()),
            FormField::number(
                "Price",
                item.map(|i| i.price.to_string()).unwrap_or_default(),
            ),
            FormField::text(
                "Description",
                item.map(|i| i.description.clone()).unwrap_or_default(),
            ),
            FormField::text(
                "Category",
                item.map(|i| i.category_id.clone())
                    .unwrap_or_else(|| default_category.to_string()),
            ),
            FormField::text(
                "Image",
                item.and_then(|i| i.image.clone()).unwrap_or_default(),
            ),
            FormField::toggle("Available", item.is_none_or(|i| i.available)),
        ],
    )
}

fn category_form(title: &str, category: Option<&CategoryView>) -> FormState {
    let mut fields = Vec::new();
    if category.is_none() {
        fields.push(FormField::text("Id", ""));
    }
    fields.push(FormField::text(
        "Label",
        category.map(|c| c.label.clone()).unwrap_or_default(),
    ));
    fields.push(FormField::text(
        "Emoji",
        category.map(|c| c.emoji.clone()).unwrap_or_default(),
    ));
    fields.push(FormField::number(
        "Sort order",
        category.map(|c| c.sort_order.to_string()).unwrap_or_default(),
    ));
    FormState::new(title, fields)
}

impl App {
    /// Load everything the admin screen shows and connect the order stream.
    pub(super) async fn open_admin(&mut self) {
        match self.client.current_user().await {
            Ok(user) => self.state.admin.email = user.email,
            Err(err) => return self.admin_failed("Session check failed", &err),
        }
        self.reload_orders().await;
        self.reload_admin_menu().await;
        self.connect_order_events();
    }

    fn connect_order_events(&mut self) {
        if self.order_events.is_some() {
            return;
        }
        match self.client.order_events() {
            Ok(feed) => {
                self.order_events = Some(feed);
                self.state.admin.live = true;
            }
            Err(err) => {
                self.state.admin.live = false;
                self.admin_failed("Live updates unavailable", &err);
            }
        }
    }

    /// Every order change reloads the whole list, one reload per change.
    pub(super) async fn drain_order_events(&mut self) {
        loop {
            let Some(feed) = self.order_events.as_mut() else {
                return;
            };
            match feed.try_recv() {
                Ok(change) => {
                    tracing::debug!(order_id = %change.order_id, kind = ?change.kind, "order changed");
                    self.reload_orders().await;
                }
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.order_events = None;
                    self.state.admin.live = false;
                    return;
                }
            }
        }
    }

    fn admin_failed(&mut self, what: &str, err: &ClientError) {
        if matches!(err, ClientError::Unauthorized) {
            self.client.clear_session();
            self.state.login.message = Some(message_for_error(err));
            self.state.screen = Screen::Login;
            return;
        }
        self.state.admin.error = Some(format!("{what}: {}", message_for_error(err)));
    }

    async fn reload_orders(&mut self) {
        let all = match self.client.orders(None).await {
            Ok(orders) => orders,
            Err(err) => return self.admin_failed("Failed to load orders", &err),
        };
        let filtered = match self.state.admin.order_filter {
            None => all.clone(),
            Some(status) => match self.client.orders(Some(status)).await {
                Ok(orders) => orders,
                Err(err) => return self.admin_failed("Failed to load orders", &err),
            },
        };
        let admin = &mut self.state.admin;
        admin.all_orders = all;
        admin.orders = filtered;
        admin.error = None;
        clamp(&mut admin.orders_selected, admin.orders.len());
    }

    async fn reload_admin_menu(&mut self) {
        let categories = match self.client.categories().await {
            Ok(categories) => categories,
            Err(err) => return self.admin_failed("Failed to load categories", &err),
        };
        let menu = match self.client.menu_all().await {
            Ok(menu) => menu,
            Err(err) => return self.admin_failed("Failed to load menu", &err),
        };
        let admin = &mut self.state.admin;
        admin.categories = categories;
        admin.menu = menu;
        clamp(&mut admin.categories_selected, admin.categories.len());
        clamp(&mut admin.menu_selected, admin.menu.len());
    }

    pub(super) async fn handle_admin(&mut self, action: AppAction) {
        if self.state.admin.editor.is_some() {
            return self.handle_editor(action).await;
        }
        if self.state.admin.confirm.is_some() {
            return self.handle_confirm(action).await;
        }

        match action {
            AppAction::Input(ch @ '1'..='4') => {
                let idx = ch as usize - '1' as usize;
                self.state.admin.section = AdminSection::ALL[idx];
            }
            AppAction::NextField => {
                let idx = AdminSection::ALL
                    .iter()
                    .position(|s| *s == self.state.admin.section)
                    .unwrap_or(0);
                self.state.admin.section = AdminSection::ALL[(idx + 1) % AdminSection::ALL.len()];
            }
            AppAction::Up | AppAction::Input('k') => self.state.admin.move_selection(false),
            AppAction::Down | AppAction::Input('j') => self.state.admin.move_selection(true),
            AppAction::Input('r') => {
                self.connect_order_events();
                self.reload_orders().await;
                self.reload_admin_menu().await;
            }
            AppAction::Input('L') => {
                let result = self.client.sign_out().await;
                self.state.screen = Screen::Menu;
                match result {
                    Ok(()) => self.toast(ToastLevel::Info, "Signed out"),
                    Err(err) => self.toast(
                        ToastLevel::Error,
                        format!("Sign out failed on the server: {}", message_for_error(&err)),
                    ),
                }
            }
            AppAction::Cancel => {
                self.state.screen = Screen::Menu;
                self.load_menu().await;
            }
            _ => match self.state.admin.section {
                AdminSection::Dashboard => {}
                AdminSection::Orders => self.handle_orders_key(action).await,
                AdminSection::Menu => self.handle_menu_key(action),
                AdminSection::Categories => self.handle_categories_key(action),
            },
        }
    }

    async fn handle_orders_key(&mut self, action: AppAction) {
        let AppAction::Input(ch) = action else {
            return;
        };
        if ch == 'f' {
            self.state.admin.next_filter();
            self.reload_orders().await;
            return;
        }
        let Some(order) = self.state.admin.selected_order().cloned() else {
            return;
        };
        let target = match ch {
            'c' => OrderStatus::Confirmed,
            'x' => OrderStatus::Cancelled,
            'd' => OrderStatus::Completed,
            'D' => {
                self.state.admin.confirm = Some(Confirm::DeleteOrder {
                    id: order.id,
                    customer: order.customer_name,
                });
                return;
            }
            _ => return,
        };
        if !order.status.ui_transitions().contains(&target) {
            self.toast(
                ToastLevel::Error,
                format!("Cannot move a {} order to {}", order.status.as_str(), target.as_str()),
            );
            return;
        }
        match self.client.update_order_status(&order.id, target).await {
            Ok(_) => {
                self.toast(ToastLevel::Success, format!("Order {}", target.as_str()));
                self.reload_orders().await;
            }
            Err(err) => self.admin_failed("Failed to update order", &err),
        }
    }

    fn handle_menu_key(&mut self, action: AppAction) {
        let AppAction::Input(ch) = action else {
            return;
        };
        let admin = &mut self.state.admin;
        let selected = admin.selected_menu_item().cloned();
        match (ch, selected) {
            ('n', _) => {
                let default_category = admin
                    .selected_category()
                    .map(|c| c.id.clone())
                    .unwrap_or_default();
                admin.editor = Some(Editor {
                    kind: EditorKind::NewMenuItem,
                    form: menu_form("New menu item", None, &default_category),
                });
            }
            ('e', Some(item)) => {
                admin.editor = Some(Editor {
                    kind: EditorKind::EditMenuItem {
                        id: item.id,
                        image: item.image.clone(),
                    },
                    form: menu_form("Edit menu item", Some(&item), ""),
                });
            }
            ('a', Some(item)) => {
                admin.confirm = Some(Confirm::SetAvailable {
                    id: item.id,
                    name: item.name,
                    available: !item.available,
                });
            }
            ('D', Some(item)) => {
                admin.confirm = Some(Confirm::DeleteMenuItem {
                    id: item.id,
                    name: item.name,
                });
            }
            _ => {}
        }
    }

    fn handle_categories_key(&mut self, action: AppAction) {
        let AppAction::Input(ch) = action else {
            return;
        };
        let admin = &mut self.state.admin;
        let selected = admin.selected_category().cloned();
        match (ch, selected) {
            ('n', _) => {
                admin.editor = Some(Editor {
                    kind: EditorKind::NewCategory,
                    form: category_form("New category", None),
                });
            }
            ('e', Some(category)) => {
                admin.editor = Some(Editor {
                    kind: EditorKind::EditCategory {
                        id: category.id.clone(),
                    },
                    form: category_form("Edit category", Some(&category)),
                });
            }
            ('D', Some(category)) => {
                admin.confirm = Some(Confirm::DeleteCategory {
                    id: category.id,
                    label: category.label,
                });
            }
            _ => {}
        }
    }

    async fn handle_confirm(&mut self, action: AppAction) {
        let accepted = match action {
            AppAction::Input('y') | AppAction::Submit => true,
            AppAction::Input('n') | AppAction::Cancel => false,
            _ => return,
        };
        let Some(confirm) = self.state.admin.confirm.take() else {
            return;
        };
        if !accepted {
            return;
        }

        let result = match &confirm {
            Confirm::SetAvailable { id, available, .. } => {
                self.client.set_available(*id, *available).await.map(|_| ())
            }
            Confirm::DeleteMenuItem { id, .. } => self.client.delete_menu_item(*id).await,
            Confirm::DeleteCategory { id, .. } => self.client.delete_category(id).await,
            Confirm::DeleteOrder { id, .. } => self.client.delete_order(id).await,
        };
        match result {
            Ok(()) => {
                self.toast(ToastLevel::Success, "Done");
                match confirm {
                    Confirm::DeleteOrder { .. } => self.reload_orders().await,
                    _ => self.reload_admin_menu().await,
                }
            }
            Err(err) => self.admin_failed("Action failed", &err),
        }
    }

    async fn handle_editor(&mut self, action: AppAction) {
        let Some(editor) = self.state.admin.editor.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.admin.editor = None,
            AppAction::NextField | AppAction::Down => editor.form.next(),
            AppAction::PrevField | AppAction::Up => editor.form.prev(),
            AppAction::Backspace => editor.form.backspace(),
            AppAction::Input(ch) => editor.form.input(ch),
            AppAction::Submit => {
                let editor = editor.clone();
                match self.save_editor(&editor).await {
                    Ok(message) => {
                        self.state.admin.editor = None;
                        self.toast(ToastLevel::Success, message);
                        self.reload_admin_menu().await;
                    }
                    Err(message) => {
                        if let Some(open) = self.state.admin.editor.as_mut() {
                            open.form.message = Some(message);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Returns the success toast, or the message to show inside the form.
    async fn save_editor(&mut self, editor: &Editor) -> Result<String, String> {
        let form = &editor.form;
        match &editor.kind {
            EditorKind::NewMenuItem | EditorKind::EditMenuItem { .. } => {
                let name = form.trimmed("Name");
                if name.is_empty() {
                    return Err("Name is required".to_string());
                }
                let price: i64 = form
                    .trimmed("Price")
                    .parse()
                    .map_err(|_| "Price must be a whole number".to_string())?;
                let category_id = form.trimmed("Category").to_string();
                if !self.state.admin.categories.iter().any(|c| c.id == category_id) {
                    return Err(format!("Unknown category \"{category_id}\""));
                }
                let previous = match &editor.kind {
                    EditorKind::EditMenuItem { image, .. } => image.clone(),
                    _ => None,
                };
                let image = match image_input(form.value("Image"), previous.as_deref()) {
                    ImageInput::Keep => None,
                    ImageInput::Clear => Some(String::new()),
                    ImageInput::Url(url) => Some(url),
                    ImageInput::Upload(path) => {
                        let uploaded = self
                            .client
                            .upload_image_or_keep(Path::new(&path), previous.clone())
                            .await;
                        if uploaded == previous {
                            self.toast(ToastLevel::Error, "Image upload failed, image unchanged");
                            None
                        } else {
                            uploaded
                        }
                    }
                };
                let description = form.trimmed("Description").to_string();
                let available = form.checked("Available");

                let result = match &editor.kind {
                    EditorKind::EditMenuItem { id, .. } => {
                        let patch = MenuItemUpdate {
                            name: Some(name.to_string()),
                            price: Some(price),
                            description: Some(description),
                            category_id: Some(category_id),
                            image,
                            available: Some(available),
                        };
                        self.client.update_menu_item(*id, &patch).await
                    }
                    _ => {
                        let item = MenuItemNew {
                            name: name.to_string(),
                            price,
                            description: Some(description).filter(|d| !d.is_empty()),
                            category_id,
                            image: image.filter(|url| !url.is_empty()),
                            available: Some(available),
                        };
                        self.client.create_menu_item(&item).await
                    }
                };
                result
                    .map(|item| format!("Saved {}", item.name))
                    .map_err(|err| message_for_error(&err))
            }
            EditorKind::NewCategory | EditorKind::EditCategory { .. } => {
                let label = form.trimmed("Label").to_string();
                if label.is_empty() {
                    return Err("Label is required".to_string());
                }
                let emoji = form.trimmed("Emoji").to_string();
                let sort_order = match form.trimmed("Sort order") {
                    "" => None,
                    raw => Some(
                        raw.parse::<i32>()
                            .map_err(|_| "Sort order must be a number".to_string())?,
                    ),
                };
                let result = match &editor.kind {
                    EditorKind::EditCategory { id } => {
                        let patch = CategoryUpdate {
                            label: Some(label),
                            emoji: Some(emoji),
                            sort_order,
                        };
                        self.client.update_category(id, &patch).await
                    }
                    _ => {
                        let id = form.trimmed("Id").to_string();
                        if id.is_empty() {
                            return Err("Id is required".to_string());
                        }
                        let category = CategoryCreate {
                            id,
                            label,
                            emoji,
                            sort_order,
                        };
                        self.client.create_category(&category).await
                    }
                };
                result
                    .map(|category| format!("Saved {}", category.label))
                    .map_err(|err| message_for_error(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use api_types::order::{OrderChange, OrderChangeKind, OrderListResponse};
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        app::test_support::{app_for, serve, signed_in},
        client::OrderFeed,
    };

    fn order(status: OrderStatus, total: i64, created: chrono::DateTime<Utc>) -> OrderView {
        OrderView {
            id: format!("{status:?}-{total}"),
            customer_name: "Budi".to_string(),
            table_number: "A1".to_string(),
            total_price: total,
            payment_method: Default::default(),
            status,
            notes: None,
            created_at: created,
            updated_at: created,
            items: Vec::new(),
        }
    }

    #[test]
    fn dashboard_counts_and_revenue_of_today() {
        let tz = chrono_tz::Asia::Jakarta;
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        // 20:00 UTC on the 9th is 03:00 on the 10th in Jakarta.
        let early_today = Utc.with_ymd_and_hms(2026, 3, 9, 20, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();

        let orders = vec![
            order(OrderStatus::Pending, 10_000, early_today),
            order(OrderStatus::Pending, 12_000, yesterday),
            order(OrderStatus::Confirmed, 20_000, early_today),
            order(OrderStatus::Completed, 35_000, early_today),
            order(OrderStatus::Completed, 50_000, yesterday),
            order(OrderStatus::Cancelled, 99_000, early_today),
        ];
        let stats = DashboardStats::from_orders(&orders, tz, today);
        assert_eq!(
            stats,
            DashboardStats {
                pending: 2,
                confirmed: 1,
                completed_today: 1,
                revenue_today: 35_000,
            }
        );
    }

    #[test]
    fn image_field_decides_what_to_send() {
        let old = Some("http://host/images/a.png");
        assert_eq!(image_input("http://host/images/a.png", old), ImageInput::Keep);
        assert_eq!(image_input("  ", old), ImageInput::Clear);
        assert_eq!(image_input("", None), ImageInput::Keep);
        assert_eq!(
            image_input("https://cdn.example.com/b.jpg", old),
            ImageInput::Url("https://cdn.example.com/b.jpg".to_string())
        );
        assert_eq!(
            image_input("./photos/rendang.jpg", old),
            ImageInput::Upload("./photos/rendang.jpg".to_string())
        );
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut admin = AdminState::default();
        let mut seen = Vec::new();
        for _ in 0..=OrderStatus::ALL.len() {
            admin.next_filter();
            seen.push(admin.order_filter);
        }
        assert_eq!(seen[0], Some(OrderStatus::Pending));
        assert_eq!(seen[OrderStatus::ALL.len() - 1], Some(OrderStatus::Cancelled));
        assert_eq!(seen[OrderStatus::ALL.len()], None);
    }

    #[test]
    fn confirm_prompts_name_the_target() {
        let confirm = Confirm::SetAvailable {
            id: 1,
            name: "Rendang".to_string(),
            available: false,
        };
        assert_eq!(confirm.prompt(), "Mark \"Rendang\" as sold out?");
    }

    #[tokio::test]
    async fn every_order_change_reloads_the_list() {
        let reloads = Arc::new(AtomicUsize::new(0));
        let counter = reloads.clone();
        let router = Router::new()
            .route("/auth/sign-in", post(signed_in))
            .route(
                "/orders",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Json(OrderListResponse { orders: Vec::new() })
                    }
                }),
            );
        let mut app = app_for(serve(router).await, "reloads");
        app.client.sign_in("staff@example.com", "pw").await.unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        app.order_events = Some(OrderFeed::from_channel(rx));
        app.state.admin.live = true;
        for id in ["o-1", "o-2", "o-3"] {
            tx.send(OrderChange {
                kind: OrderChangeKind::Insert,
                order_id: id.to_string(),
            })
            .unwrap();
        }

        app.drain_order_events().await;
        assert_eq!(reloads.load(Ordering::SeqCst), 3);
        assert!(app.state.admin.live);

        drop(tx);
        app.drain_order_events().await;
        assert_eq!(reloads.load(Ordering::SeqCst), 3);
        assert!(app.order_events.is_none());
        assert!(!app.state.admin.live);
    }

    #[tokio::test]
    async fn failed_server_sign_out_is_reported() {
        let router = Router::new()
            .route("/auth/sign-in", post(signed_in))
            .route(
                "/auth/sign-out",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({"error": "session store down"})),
                    )
                }),
            );
        let mut app = app_for(serve(router).await, "sign-out");
        app.client.sign_in("staff@example.com", "pw").await.unwrap();
        app.state.screen = Screen::Admin;

        app.handle_admin(AppAction::Input('L')).await;

        assert_eq!(app.state.screen, Screen::Menu);
        assert!(app.client.signed_in_email().is_none());
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(
            toast.message,
            "Sign out failed on the server: session store down"
        );
    }
}
