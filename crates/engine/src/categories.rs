//! Menu categories.
//!
//! A category is identified by a slug chosen by the admin. Menu items point
//! at it through `menu_items.category_id`, without a foreign key: deleting a
//! category leaves its items in place.

use sea_orm::entity::prelude::*;

/// A category as returned by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub sort_order: i32,
}

/// Input for [`Engine::create_category`](crate::Engine::create_category).
#[derive(Clone, Debug)]
pub struct CategoryNew {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub sort_order: i32,
}

/// Partial update of a category. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub label: Option<String>,
    pub emoji: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            emoji: model.emoji,
            sort_order: model.sort_order,
        }
    }
}
