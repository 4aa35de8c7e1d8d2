//! Checkout form: validation, order assembly and the submit lifecycle.

use std::future::Future;

use api_types::order::{OrderCreated, OrderItemNew, OrderNew, PaymentMethod};

use crate::{
    client::{Client, ClientError},
    store::{CartStore, HistoryStore},
};

pub const MIN_NAME_CHARS: usize = 2;

/// Anything that can place an order. The real implementation is [`Client`].
pub trait OrderSubmitter {
    fn submit(&self, order: &OrderNew) -> impl Future<Output = Result<OrderCreated, ClientError>>;
}

impl OrderSubmitter for Client {
    async fn submit(&self, order: &OrderNew) -> Result<OrderCreated, ClientError> {
        self.create_order(order).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Name,
    Table,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    Form,
    Loading,
    Success { order_id: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub table: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.table.is_none()
    }
}

#[derive(Debug)]
pub struct CheckoutState {
    pub customer_name: String,
    pub table_number: String,
    pub payment_method: PaymentMethod,
    pub focus: CheckoutField,
    pub phase: CheckoutPhase,
    pub errors: FieldErrors,
    /// Banner for a failed submission.
    pub message: Option<String>,
}

/// Short code shown to the customer, e.g. `PRM-3F2A9C1B`.
pub fn success_code(order_id: &str) -> String {
    let head: String = order_id.chars().take(8).collect();
    format!("PRM-{}", head.to_uppercase())
}

impl CheckoutState {
    pub fn new(saved_table: &str) -> Self {
        Self {
            customer_name: String::new(),
            table_number: saved_table.to_string(),
            payment_method: PaymentMethod::default(),
            focus: CheckoutField::Name,
            phase: CheckoutPhase::Form,
            errors: FieldErrors::default(),
            message: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            CheckoutField::Name => CheckoutField::Table,
            CheckoutField::Table => CheckoutField::Payment,
            CheckoutField::Payment => CheckoutField::Name,
        };
    }

    pub fn toggle_payment(&mut self) {
        self.payment_method = match self.payment_method {
            PaymentMethod::Kasir => PaymentMethod::Qris,
            PaymentMethod::Qris => PaymentMethod::Kasir,
        };
    }

    pub fn active_text(&self) -> Option<&str> {
        if self.phase != CheckoutPhase::Form {
            return None;
        }
        match self.focus {
            CheckoutField::Name => Some(&self.customer_name),
            CheckoutField::Table => Some(&self.table_number),
            CheckoutField::Payment => None,
        }
    }

    pub fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            CheckoutField::Name => Some(&mut self.customer_name),
            CheckoutField::Table => Some(&mut self.table_number),
            CheckoutField::Payment => None,
        }
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        let name = self.customer_name.trim();
        if name.is_empty() {
            errors.name = Some("Name is required".to_string());
        } else if name.chars().count() < MIN_NAME_CHARS {
            errors.name = Some(format!("Name needs at least {MIN_NAME_CHARS} characters"));
        }
        if self.table_number.trim().is_empty() {
            errors.table = Some("Table number is required".to_string());
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// The order as it will be sent: the cart total and one line per cart
    /// line carrying its price snapshot.
    pub fn build_order(&self, cart: &CartStore) -> OrderNew {
        OrderNew {
            customer_name: self.customer_name.trim().to_string(),
            table_number: self.table_number.trim().to_string(),
            total_price: cart.total(),
            payment_method: self.payment_method,
            notes: None,
            items: cart
                .items()
                .iter()
                .map(|line| OrderItemNew {
                    menu_item_id: line.id,
                    quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                    price_at_order: line.price,
                    notes: Some(line.notes.clone()),
                })
                .collect(),
        }
    }

    /// Validate and move to `Loading`. Returns the order to send, or `None`
    /// when the form has to be corrected first.
    pub fn begin(&mut self, cart: &CartStore) -> Option<OrderNew> {
        if self.phase != CheckoutPhase::Form {
            return None;
        }
        self.message = None;
        if !self.validate() {
            return None;
        }
        if cart.is_empty() {
            self.message = Some("Your cart is empty".to_string());
            return None;
        }
        self.phase = CheckoutPhase::Loading;
        Some(self.build_order(cart))
    }

    pub async fn submit<S: OrderSubmitter>(
        &mut self,
        submitter: &S,
        order: &OrderNew,
        history: &mut HistoryStore,
    ) {
        match submitter.submit(order).await {
            Ok(created) => {
                history.push_front(created.id.clone());
                self.phase = CheckoutPhase::Success {
                    order_id: created.id,
                };
            }
            Err(err) => {
                self.message = Some(format!("Failed to submit order: {err}"));
                self.phase = CheckoutPhase::Form;
            }
        }
    }

    /// Leave the success screen. The cart is emptied only here, so a failed
    /// or abandoned checkout keeps it.
    pub fn dismiss(&mut self, cart: &mut CartStore) {
        if matches!(self.phase, CheckoutPhase::Success { .. }) {
            cart.clear();
            cart.close();
        }
    }
}
