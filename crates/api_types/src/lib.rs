use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        /// Slug chosen by the admin (e.g. `ayam`).
        pub id: String,
        pub label: String,
        pub emoji: String,
        pub sort_order: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub id: String,
        pub label: String,
        pub emoji: String,
        /// Defaults to `0` when absent.
        pub sort_order: Option<i32>,
    }

    /// Partial update: absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub label: Option<String>,
        pub emoji: Option<String>,
        pub sort_order: Option<i32>,
    }
}

pub mod menu {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MenuItemView {
        pub id: i32,
        pub name: String,
        /// Price in the smallest currency unit.
        pub price: i64,
        pub description: String,
        pub category_id: String,
        /// Public URL of the item image.
        pub image: Option<String>,
        pub available: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MenuListResponse {
        pub items: Vec<MenuItemView>,
    }

    /// Query string of `GET /menu`.
    ///
    /// With `category` only available items of that category are returned,
    /// ordered by name; `include_unavailable=true` keeps the sold out ones.
    /// With `search` every item whose name or description
    /// contains the term (case-insensitive) is returned. Without either the
    /// whole catalog is returned ordered by id.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MenuQuery {
        pub category: Option<String>,
        pub search: Option<String>,
        pub include_unavailable: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MenuItemNew {
        pub name: String,
        pub price: i64,
        pub description: Option<String>,
        pub category_id: String,
        pub image: Option<String>,
        /// Defaults to `true` when absent.
        pub available: Option<bool>,
    }

    /// Partial update: absent fields are left untouched.
    ///
    /// An empty `image` or `description` clears the stored value.
    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    pub struct MenuItemUpdate {
        pub name: Option<String>,
        pub price: Option<i64>,
        pub description: Option<String>,
        pub category_id: Option<String>,
        pub image: Option<String>,
        pub available: Option<bool>,
    }
}

pub mod order {
    use super::*;

    /// How the customer intends to pay. Payment itself is confirmed manually
    /// by the staff.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum PaymentMethod {
        /// Pay at the counter.
        #[default]
        Kasir,
        /// Pay with a QR payment.
        Qris,
    }

    impl PaymentMethod {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Kasir => "kasir",
                Self::Qris => "qris",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Kasir => "Pay at counter",
                Self::Qris => "QR payment",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum OrderStatus {
        Pending,
        Confirmed,
        Preparing,
        Completed,
        Cancelled,
    }

    impl OrderStatus {
        pub const ALL: [OrderStatus; 5] = [
            Self::Pending,
            Self::Confirmed,
            Self::Preparing,
            Self::Completed,
            Self::Cancelled,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Confirmed => "confirmed",
                Self::Preparing => "preparing",
                Self::Completed => "completed",
                Self::Cancelled => "cancelled",
            }
        }

        /// Customer-facing description of the stage.
        pub fn label(self) -> &'static str {
            match self {
                Self::Pending => "Waiting for confirmation",
                Self::Confirmed => "Being cooked",
                Self::Preparing => "Being prepared",
                Self::Completed => "Done",
                Self::Cancelled => "Cancelled",
            }
        }

        pub fn is_terminal(self) -> bool {
            matches!(self, Self::Completed | Self::Cancelled)
        }

        /// Transitions the admin dashboard offers from this status.
        ///
        /// The store itself accepts any overwrite; this is the only place the
        /// forward-only lifecycle is encoded.
        pub fn ui_transitions(self) -> &'static [OrderStatus] {
            match self {
                Self::Pending => &[Self::Confirmed, Self::Cancelled],
                Self::Confirmed => &[Self::Completed],
                Self::Preparing | Self::Completed | Self::Cancelled => &[],
            }
        }
    }

    impl TryFrom<&str> for OrderStatus {
        type Error = String;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            Self::ALL
                .into_iter()
                .find(|status| status.as_str() == value)
                .ok_or_else(|| format!("invalid order status: {value}"))
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OrderItemNew {
        pub menu_item_id: i32,
        pub quantity: i32,
        /// Cart price snapshot; later catalog changes do not affect it.
        pub price_at_order: i64,
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        pub customer_name: String,
        pub table_number: String,
        /// Client-computed total, stored as given.
        pub total_price: i64,
        pub payment_method: PaymentMethod,
        pub notes: Option<String>,
        pub items: Vec<OrderItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderCreated {
        pub id: String,
    }

    /// Name and category of the menu item an order line refers to.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MenuItemRef {
        pub name: String,
        pub category_id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OrderItemView {
        pub id: i32,
        pub menu_item_id: i32,
        pub quantity: i32,
        pub price_at_order: i64,
        pub notes: Option<String>,
        /// `None` when the menu item was deleted after the order was placed.
        pub menu_item: Option<MenuItemRef>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: String,
        pub customer_name: String,
        pub table_number: String,
        pub total_price: i64,
        pub payment_method: PaymentMethod,
        pub status: OrderStatus,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub items: Vec<OrderItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderListResponse {
        pub orders: Vec<OrderView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OrderQuery {
        pub status: Option<OrderStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderStatusUpdate {
        pub status: OrderStatus,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum OrderChangeKind {
        Insert,
        Update,
        Delete,
    }

    /// One text frame on the `GET /orders/events` WebSocket.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OrderChange {
        pub kind: OrderChangeKind,
        pub order_id: String,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignIn {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SessionView {
        /// Bearer token for the admin endpoints.
        pub token: String,
        pub email: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CurrentUser {
        pub email: String,
    }
}

pub mod upload {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImageUploaded {
        pub filename: String,
        /// Public URL the image can be fetched from.
        pub url: String,
    }
}

#[cfg(test)]
mod tests {
    use super::order::{OrderChange, OrderChangeKind, OrderStatus, PaymentMethod};

    #[test]
    fn enums_use_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Qris).unwrap(),
            "\"qris\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
        let change = OrderChange {
            kind: OrderChangeKind::Update,
            order_id: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#"{"kind":"update","order_id":"abc"}"#
        );
    }

    #[test]
    fn status_parses_from_its_own_string() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(OrderStatus::try_from("served").is_err());
    }

    #[test]
    fn ui_only_moves_forward() {
        assert_eq!(
            OrderStatus::Pending.ui_transitions(),
            &[OrderStatus::Confirmed, OrderStatus::Cancelled]
        );
        assert_eq!(
            OrderStatus::Confirmed.ui_transitions(),
            &[OrderStatus::Completed]
        );
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.ui_transitions().is_empty());
        }
        assert!(
            OrderStatus::ALL
                .iter()
                .all(|status| !status.ui_transitions().contains(&OrderStatus::Pending))
        );
    }
}
