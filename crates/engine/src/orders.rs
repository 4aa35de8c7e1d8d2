//! The module contains `Order`, its line items and the order tables.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{EngineError, ResultEngine};

/// Lifecycle stage of an order.
///
/// Stored as its lowercase name. The engine overwrites the status without
/// checking the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidId(format!(
                "invalid order status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Pay at the counter.
    Kasir,
    /// QR payment.
    Qris,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kasir => "kasir",
            Self::Qris => "qris",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "kasir" => Ok(Self::Kasir),
            "qris" => Ok(Self::Qris),
            other => Err(EngineError::InvalidId(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

/// One line of an order being placed.
#[derive(Clone, Debug)]
pub struct NewOrderLine {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price_at_order: i64,
    pub notes: Option<String>,
}

/// An order being placed, together with its lines.
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub customer_name: String,
    pub table_number: String,
    /// Computed by the client and stored as given.
    pub total_price: i64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Sum of `price_at_order * quantity` over the lines.
    pub fn lines_total(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| line.price_at_order * i64::from(line.quantity))
            .sum()
    }
}

/// A stored order line, joined with the menu item it refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderLine {
    pub id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price_at_order: i64,
    pub notes: Option<String>,
    /// Name and category of the menu item, if it still exists.
    pub menu_item: Option<(String, String)>,
}

/// Denormalized order: the order row plus its lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub table_number: String,
    pub total_price: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub(crate) fn from_model(model: Model, lines: Vec<OrderLine>) -> ResultEngine<Self> {
        Ok(Self {
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            status: OrderStatus::try_from(model.status.as_str())?,
            id: model.id,
            customer_name: model.customer_name,
            table_number: model.table_number,
            total_price: model.total_price,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lines,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_name: String,
    pub table_number: String,
    pub total_price: i64,
    pub payment_method: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    Items,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
