//! Customer side: browsing the menu, the cart, checkout and order history.

use std::time::Instant;

use api_types::{
    category::CategoryView,
    menu::MenuItemView,
    order::{OrderNew, OrderView},
};

use super::{App, Screen, ToastLevel, message_for_error};
use crate::{
    checkout::{CheckoutField, CheckoutPhase, CheckoutState},
    client::ClientError,
    store::CartEntry,
    ui::keymap::AppAction,
};

#[derive(Debug)]
pub struct DetailState {
    pub item: MenuItemView,
    pub quantity: u32,
    pub note: String,
}

impl DetailState {
    pub fn new(item: MenuItemView) -> Self {
        Self {
            item,
            quantity: 1,
            note: String::new(),
        }
    }

    pub fn increase(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub fn decrease(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    pub fn subtotal(&self) -> i64 {
        self.item.price * i64::from(self.quantity)
    }

    pub fn cart_entry(&self) -> CartEntry {
        CartEntry {
            id: self.item.id,
            name: self.item.name.clone(),
            price: self.item.price,
            category: self.item.category_id.clone(),
            notes: self.note.trim().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    Detail(DetailState),
    Checkout(CheckoutState),
    History,
}

#[derive(Debug, Default)]
pub struct HistoryView {
    pub orders: Vec<OrderView>,
    /// Ids the server no longer knows about.
    pub missing: usize,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct CustomerState {
    pub categories: Vec<CategoryView>,
    pub category: usize,
    /// Whole catalog, used for the per-category counts.
    pub catalog: Vec<MenuItemView>,
    /// Items on screen: the current category or search results.
    pub items: Vec<MenuItemView>,
    pub selected: usize,
    /// Search prompt being edited.
    pub search: Option<String>,
    /// Term of the results currently on screen.
    pub search_term: Option<String>,
    pub cart_selected: usize,
    pub overlay: Overlay,
    pub history: HistoryView,
    pub error: Option<String>,
}

impl CustomerState {
    pub fn current_category(&self) -> Option<&CategoryView> {
        self.categories.get(self.category)
    }

    pub fn available_in(&self, category_id: &str) -> usize {
        self.catalog
            .iter()
            .filter(|item| item.category_id == category_id && item.available)
            .count()
    }

    pub fn category_label(&self, category_id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.label.as_str())
    }

    pub fn selected_item(&self) -> Option<&MenuItemView> {
        self.items.get(self.selected)
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn shift_category(&mut self, forward: bool) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        self.category = if forward {
            (self.category + 1) % len
        } else {
            (self.category + len - 1) % len
        };
    }
}

impl App {
    pub(super) async fn load_menu(&mut self) {
        let customer = &mut self.state.customer;
        match self.client.categories().await {
            Ok(categories) => {
                customer.categories = categories;
                if customer.category >= customer.categories.len() {
                    customer.category = 0;
                }
            }
            Err(err) => {
                customer.error = Some(format!("Failed to load menu: {}", message_for_error(&err)));
                return;
            }
        }
        match self.client.menu_all().await {
            Ok(items) => customer.catalog = items,
            Err(err) => {
                customer.error = Some(format!("Failed to load menu: {}", message_for_error(&err)));
                return;
            }
        }
        self.load_category_items().await;
    }

    async fn load_category_items(&mut self) {
        let customer = &mut self.state.customer;
        customer.search_term = None;
        customer.selected = 0;
        let Some(category_id) = customer.current_category().map(|c| c.id.clone()) else {
            customer.items.clear();
            return;
        };
        // Sold out dishes stay on the grid, greyed out.
        match self.client.menu_by_category(&category_id, true).await {
            Ok(items) => {
                customer.items = items;
                customer.error = None;
            }
            Err(err) => {
                customer.items.clear();
                customer.error = Some(format!("Failed to load menu: {}", message_for_error(&err)));
            }
        }
    }

    async fn run_search(&mut self, term: String) {
        let customer = &mut self.state.customer;
        match self.client.search_menu(&term).await {
            Ok(items) => {
                customer.items = items;
                customer.selected = 0;
                customer.search_term = Some(term);
                customer.error = None;
            }
            Err(err) => {
                customer.error = Some(format!("Search failed: {}", message_for_error(&err)));
            }
        }
    }

    pub(super) async fn load_history(&mut self) {
        self.history_polled_at = Some(Instant::now());
        let ids = self.state.local.history.order_ids().to_vec();
        let mut view = HistoryView::default();
        for id in ids {
            match self.client.order(&id).await {
                Ok(order) => view.orders.push(order),
                Err(ClientError::NotFound) => view.missing += 1,
                Err(err) => {
                    view.error = Some(format!(
                        "Failed to load orders: {}",
                        message_for_error(&err)
                    ));
                }
            }
        }
        self.state.customer.history = view;
    }

    pub(super) async fn submit_order(&mut self, order: OrderNew) {
        let Overlay::Checkout(checkout) = &mut self.state.customer.overlay else {
            return;
        };
        checkout
            .submit(&self.client, &order, &mut self.state.local.history)
            .await;
        if matches!(checkout.phase, CheckoutPhase::Success { .. }) {
            self.persist();
        }
    }

    pub(super) async fn handle_customer(&mut self, action: AppAction) {
        match self.state.customer.overlay {
            Overlay::Detail(_) => self.handle_detail(action),
            Overlay::Checkout(_) => self.handle_checkout(action),
            Overlay::History => self.handle_history(action).await,
            Overlay::None if self.state.local.cart.is_open() => self.handle_cart(action),
            Overlay::None if self.state.customer.search.is_some() => {
                self.handle_search(action).await;
            }
            Overlay::None => self.handle_menu(action).await,
        }
    }

    async fn handle_menu(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.state.customer.select_prev(),
            AppAction::Down | AppAction::Input('j') => self.state.customer.select_next(),
            AppAction::Left | AppAction::Input('h') => {
                self.state.customer.shift_category(false);
                self.load_category_items().await;
            }
            AppAction::Right | AppAction::Input('l') => {
                self.state.customer.shift_category(true);
                self.load_category_items().await;
            }
            AppAction::Submit => self.open_detail(),
            AppAction::Cancel if self.state.customer.search_term.is_some() => {
                self.load_category_items().await;
            }
            AppAction::Input('/') => self.state.customer.search = Some(String::new()),
            AppAction::Input('c') => {
                self.state.customer.cart_selected = 0;
                self.state.local.cart.toggle();
            }
            AppAction::Input('o') => {
                self.state.customer.overlay = Overlay::History;
                self.history_polled_at = None;
            }
            AppAction::Input('a') => {
                if self.client.signed_in_email().is_some() {
                    self.state.screen = Screen::Admin;
                    self.open_admin().await;
                } else {
                    self.state.screen = Screen::Login;
                }
            }
            AppAction::Input('r') => self.load_menu().await,
            AppAction::Input('t') => {
                self.state.local.table.clear();
                self.persist();
                self.toast(ToastLevel::Info, "Table number cleared");
            }
            _ => {}
        }
    }

    fn open_detail(&mut self) {
        let Some(item) = self.state.customer.selected_item().cloned() else {
            return;
        };
        if !item.available {
            self.toast(ToastLevel::Error, format!("{} is not available", item.name));
            return;
        }
        self.state.customer.overlay = Overlay::Detail(DetailState::new(item));
    }

    async fn handle_search(&mut self, action: AppAction) {
        let Some(search) = self.state.customer.search.as_mut() else {
            return;
        };
        match action {
            AppAction::Input(ch) => search.push(ch),
            AppAction::Backspace => {
                search.pop();
            }
            AppAction::Cancel => self.state.customer.search = None,
            AppAction::Submit => {
                let term = search.trim().to_string();
                self.state.customer.search = None;
                if term.is_empty() {
                    self.load_category_items().await;
                } else {
                    self.run_search(term).await;
                }
            }
            _ => {}
        }
    }

    fn handle_detail(&mut self, action: AppAction) {
        let Overlay::Detail(detail) = &mut self.state.customer.overlay else {
            return;
        };
        match action {
            AppAction::Left | AppAction::Down => detail.decrease(),
            AppAction::Right | AppAction::Up => detail.increase(),
            AppAction::Input(ch) => detail.note.push(ch),
            AppAction::Backspace => {
                detail.note.pop();
            }
            AppAction::Cancel => self.state.customer.overlay = Overlay::None,
            AppAction::Submit => {
                let entry = detail.cart_entry();
                let quantity = detail.quantity;
                self.state.local.cart.add_item(entry.clone(), Some(quantity));
                self.state.customer.overlay = Overlay::None;
                self.persist();
                self.toast(
                    ToastLevel::Success,
                    format!("Added {quantity} × {}", entry.name),
                );
            }
            _ => {}
        }
    }

    fn handle_cart(&mut self, action: AppAction) {
        let cart = &mut self.state.local.cart;
        let selected = self.state.customer.cart_selected;
        let line = cart.items().get(selected).cloned();
        let mut changed = false;

        match action {
            AppAction::Up => {
                self.state.customer.cart_selected = selected.saturating_sub(1);
            }
            AppAction::Down => {
                if selected + 1 < cart.items().len() {
                    self.state.customer.cart_selected = selected + 1;
                }
            }
            AppAction::Right | AppAction::Input('+') => {
                if let Some(line) = line {
                    cart.update_quantity(line.id, i64::from(line.quantity) + 1, &line.notes);
                    changed = true;
                }
            }
            AppAction::Left | AppAction::Input('-') => {
                if let Some(line) = line {
                    cart.update_quantity(line.id, i64::from(line.quantity) - 1, &line.notes);
                    changed = true;
                }
            }
            AppAction::Input('d') => {
                if let Some(line) = line {
                    cart.remove_item(line.id, &line.notes);
                    changed = true;
                }
            }
            AppAction::Submit | AppAction::Input('o') => {
                if cart.is_empty() {
                    self.toast(ToastLevel::Info, "Your cart is empty");
                } else {
                    let table = self.state.local.table.table_number().to_string();
                    self.state.customer.overlay = Overlay::Checkout(CheckoutState::new(&table));
                }
            }
            AppAction::Cancel | AppAction::Input('c') => cart.close(),
            _ => {}
        }

        if changed {
            let len = self.state.local.cart.items().len();
            let selected = &mut self.state.customer.cart_selected;
            *selected = (*selected).min(len.saturating_sub(1));
            self.persist();
        }
    }

    fn handle_checkout(&mut self, action: AppAction) {
        let Overlay::Checkout(checkout) = &mut self.state.customer.overlay else {
            return;
        };
        match checkout.phase.clone() {
            CheckoutPhase::Loading => {}
            CheckoutPhase::Success { .. } => {
                if matches!(action, AppAction::Submit | AppAction::Cancel) {
                    checkout.dismiss(&mut self.state.local.cart);
                    self.state.customer.overlay = Overlay::None;
                    self.persist();
                }
            }
            CheckoutPhase::Form => match action {
                AppAction::Cancel => self.state.customer.overlay = Overlay::None,
                AppAction::NextField | AppAction::PrevField | AppAction::Down | AppAction::Up => {
                    checkout.next_field();
                }
                AppAction::Left | AppAction::Right | AppAction::Input(' ')
                    if checkout.focus == CheckoutField::Payment =>
                {
                    checkout.toggle_payment();
                }
                AppAction::Input(ch) => {
                    if let Some(field) = checkout.active_text_mut() {
                        field.push(ch);
                    }
                }
                AppAction::Backspace => {
                    if let Some(field) = checkout.active_text_mut() {
                        field.pop();
                    }
                }
                AppAction::Submit => {
                    self.pending_order = checkout.begin(&self.state.local.cart);
                }
                _ => {}
            },
        }
    }

    async fn handle_history(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel | AppAction::Input('o') => {
                self.state.customer.overlay = Overlay::None;
                self.history_polled_at = None;
            }
            AppAction::Input('r') => self.load_history().await,
            AppAction::Input('x') => {
                self.state.local.history.clear();
                self.state.customer.history = HistoryView::default();
                self.persist();
            }
            _ => {}
        }
    }
}
