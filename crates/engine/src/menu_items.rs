//! The module contains `MenuItem` and its table.

use sea_orm::entity::prelude::*;

/// A dish or drink on the menu.
///
/// `price` is expressed in the smallest currency unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub category_id: String,
    pub image: Option<String>,
    pub available: bool,
}

#[derive(Clone, Debug)]
pub struct MenuItemNew {
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub category_id: String,
    pub image: Option<String>,
    pub available: bool,
}

/// Partial update of a menu item. `None` leaves the field untouched.
///
/// `Some("")` for `description` or `image` clears the stored value.
#[derive(Clone, Debug, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub image: Option<String>,
    pub available: Option<bool>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.image.is_none()
            && self.available.is_none()
    }
}

/// Which slice of the catalog to read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuFilter {
    /// Every item, ordered by id.
    All,
    /// Available items of one category, ordered by name.
    Category(String),
    /// Every item of one category, sold out included, ordered by name.
    WholeCategory(String),
    /// Items whose name or description contains the term, ignoring case.
    Search(String),
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub category_id: String,
    pub image: Option<String>,
    pub available: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MenuItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description.unwrap_or_default(),
            category_id: model.category_id,
            image: model.image,
            available: model.available,
        }
    }
}
