use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryNew, CategoryPatch, EngineError, ResultEngine, categories,
    util::{normalize_required, normalize_slug},
};

use super::{Engine, with_tx};

impl Engine {
    /// List every category, `sort_order` ascending (ties broken by id).
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::SortOrder)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn category(&self, id: &str) -> ResultEngine<Category> {
        categories::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Category::from)
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Create a category with an admin-chosen slug.
    pub async fn create_category(&self, input: CategoryNew) -> ResultEngine<Category> {
        let id = normalize_slug(&input.id)?;
        let label = normalize_required(&input.label, "category label")?;
        let emoji = input.emoji.trim().to_string();

        with_tx!(self, |db_tx| {
            if categories::Entity::find_by_id(id.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(id));
            }

            let model = categories::ActiveModel {
                id: ActiveValue::Set(id),
                label: ActiveValue::Set(label),
                emoji: ActiveValue::Set(emoji),
                sort_order: ActiveValue::Set(input.sort_order),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    /// Apply a partial update. The slug itself cannot change.
    pub async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        let label = patch
            .label
            .as_deref()
            .map(|label| normalize_required(label, "category label"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            let mut active: categories::ActiveModel = model.into();
            if let Some(label) = label {
                active.label = ActiveValue::Set(label);
            }
            if let Some(emoji) = patch.emoji {
                active.emoji = ActiveValue::Set(emoji.trim().to_string());
            }
            if let Some(sort_order) = patch.sort_order {
                active.sort_order = ActiveValue::Set(sort_order);
            }
            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Delete a category. Menu items referencing it are left untouched.
    pub async fn delete_category(&self, id: &str) -> ResultEngine<()> {
        let res = categories::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }
}
