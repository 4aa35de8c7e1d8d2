use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, MenuFilter, MenuItem, MenuItemNew, MenuItemPatch, ResultEngine, categories,
    menu_items,
    util::{ensure_price, normalize_optional_text, normalize_required, search_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Read the catalog.
    ///
    /// - [`MenuFilter::All`] returns every item, available or not, by id.
    /// - [`MenuFilter::Category`] returns only available items, by name.
    /// - [`MenuFilter::WholeCategory`] is the same without the availability check.
    /// - [`MenuFilter::Search`] matches name or description case-insensitively.
    ///   A blank term behaves like `All`.
    pub async fn list_menu_items(&self, filter: MenuFilter) -> ResultEngine<Vec<MenuItem>> {
        let models = match &filter {
            MenuFilter::All | MenuFilter::Search(_) => {
                menu_items::Entity::find()
                    .order_by_asc(menu_items::Column::Id)
                    .all(&self.database)
                    .await?
            }
            MenuFilter::Category(category_id) => {
                menu_items::Entity::find()
                    .filter(menu_items::Column::CategoryId.eq(category_id.clone()))
                    .filter(menu_items::Column::Available.eq(true))
                    .order_by_asc(menu_items::Column::Name)
                    .all(&self.database)
                    .await?
            }
            MenuFilter::WholeCategory(category_id) => {
                menu_items::Entity::find()
                    .filter(menu_items::Column::CategoryId.eq(category_id.clone()))
                    .order_by_asc(menu_items::Column::Name)
                    .all(&self.database)
                    .await?
            }
        };

        let items = models.into_iter().map(MenuItem::from);
        let items = match filter {
            MenuFilter::Search(term) if !term.trim().is_empty() => {
                let needle = search_key(term.trim());
                items
                    .filter(|item| {
                        search_key(&item.name).contains(&needle)
                            || search_key(&item.description).contains(&needle)
                    })
                    .collect()
            }
            _ => items.collect(),
        };
        Ok(items)
    }

    pub async fn menu_item(&self, id: i32) -> ResultEngine<MenuItem> {
        menu_items::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(MenuItem::from)
            .ok_or_else(|| EngineError::KeyNotFound("menu item not exists".to_string()))
    }

    /// Add a dish to the menu. The category must exist.
    pub async fn create_menu_item(&self, input: MenuItemNew) -> ResultEngine<MenuItem> {
        let name = normalize_required(&input.name, "menu item name")?;
        ensure_price(input.price)?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            require_category(&db_tx, &input.category_id).await?;

            let model = menu_items::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                price: ActiveValue::Set(input.price),
                description: ActiveValue::Set(normalize_optional_text(
                    input.description.as_deref(),
                )),
                category_id: ActiveValue::Set(input.category_id.clone()),
                image: ActiveValue::Set(normalize_optional_text(input.image.as_deref())),
                available: ActiveValue::Set(input.available),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(id = model.id, "menu item created");
            Ok(MenuItem::from(model))
        })
    }

    /// Apply a partial update and refresh `updated_at`.
    pub async fn update_menu_item(&self, id: i32, patch: MenuItemPatch) -> ResultEngine<MenuItem> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required(name, "menu item name"))
            .transpose()?;
        if let Some(price) = patch.price {
            ensure_price(price)?;
        }

        with_tx!(self, |db_tx| {
            let model = menu_items::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("menu item not exists".to_string()))?;
            if patch.is_empty() {
                return Ok(MenuItem::from(model));
            }

            let mut active: menu_items::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(price) = patch.price {
                active.price = ActiveValue::Set(price);
            }
            if let Some(description) = patch.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }
            if let Some(category_id) = patch.category_id.as_deref() {
                require_category(&db_tx, category_id).await?;
                active.category_id = ActiveValue::Set(category_id.to_string());
            }
            if let Some(image) = patch.image.as_deref() {
                active.image = ActiveValue::Set(normalize_optional_text(Some(image)));
            }
            if let Some(available) = patch.available {
                active.available = ActiveValue::Set(available);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(MenuItem::from(model))
        })
    }

    /// Shortcut for the availability toggle.
    pub async fn set_menu_item_available(&self, id: i32, available: bool) -> ResultEngine<MenuItem> {
        self.update_menu_item(
            id,
            MenuItemPatch {
                available: Some(available),
                ..MenuItemPatch::default()
            },
        )
        .await
    }

    /// Remove a dish. Past order lines keep their `menu_item_id`.
    pub async fn delete_menu_item(&self, id: i32) -> ResultEngine<()> {
        let res = menu_items::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("menu item not exists".to_string()));
        }
        Ok(())
    }
}

async fn require_category(db_tx: &DatabaseTransaction, category_id: &str) -> ResultEngine<()> {
    categories::Entity::find_by_id(category_id.to_string())
        .one(db_tx)
        .await?
        .map(|_| ())
        .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
}
