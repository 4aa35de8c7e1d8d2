//! Restaurant menu and order store.
//!
//! The [`Engine`] owns the database connection and exposes the operations the
//! HTTP layer needs: category and menu management, order placement and status
//! tracking, and admin authentication.

pub use categories::{Category, CategoryNew, CategoryPatch};
pub use error::EngineError;
pub use menu_items::{MenuFilter, MenuItem, MenuItemNew, MenuItemPatch};
pub use ops::{Engine, EngineBuilder, SeedReport};
pub use orders::{NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, PaymentMethod};
pub use sessions::Session;

mod categories;
mod error;
mod menu_items;
mod ops;
mod order_items;
mod orders;
mod sessions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
