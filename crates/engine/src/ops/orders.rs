use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, NewOrder, Order, OrderLine, OrderStatus, ResultEngine, menu_items, order_items,
    orders,
    util::{ensure_price, normalize_optional_text, normalize_required},
};

use super::{Engine, with_tx};

impl Engine {
    /// Place an order together with its lines.
    ///
    /// Either the order and all of its lines are stored, or nothing is. Every
    /// referenced menu item must exist at the time of placement.
    pub async fn create_order(&self, order: NewOrder) -> ResultEngine<String> {
        let customer_name = normalize_required(&order.customer_name, "customer name")?;
        let table_number = normalize_required(&order.table_number, "table number")?;
        if order.lines.is_empty() {
            return Err(EngineError::InvalidAmount(
                "order must contain at least one item".to_string(),
            ));
        }
        ensure_price(order.total_price)?;
        for line in &order.lines {
            if line.quantity < 1 {
                return Err(EngineError::InvalidAmount(format!(
                    "quantity must be >= 1, got {}",
                    line.quantity
                )));
            }
            ensure_price(line.price_at_order)?;
        }

        let computed = order.lines_total();
        if computed != order.total_price {
            tracing::warn!(
                claimed = order.total_price,
                computed,
                "order total does not match its lines"
            );
        }

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            orders::ActiveModel {
                id: ActiveValue::Set(order_id.clone()),
                customer_name: ActiveValue::Set(customer_name),
                table_number: ActiveValue::Set(table_number),
                total_price: ActiveValue::Set(order.total_price),
                payment_method: ActiveValue::Set(order.payment_method.as_str().to_string()),
                status: ActiveValue::Set(OrderStatus::Pending.as_str().to_string()),
                notes: ActiveValue::Set(normalize_optional_text(order.notes.as_deref())),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            let wanted: HashSet<i32> = order.lines.iter().map(|l| l.menu_item_id).collect();
            let found = menu_items::Entity::find()
                .filter(menu_items::Column::Id.is_in(wanted.iter().copied()))
                .all(&db_tx)
                .await?;
            if found.len() != wanted.len() {
                let known: HashSet<i32> = found.iter().map(|m| m.id).collect();
                let mut missing: Vec<i32> = wanted.difference(&known).copied().collect();
                missing.sort_unstable();
                return Err(EngineError::KeyNotFound(format!(
                    "menu items not exist: {missing:?}"
                )));
            }

            let lines = order.lines.iter().map(|line| order_items::ActiveModel {
                id: ActiveValue::NotSet,
                order_id: ActiveValue::Set(order_id.clone()),
                menu_item_id: ActiveValue::Set(line.menu_item_id),
                quantity: ActiveValue::Set(line.quantity),
                price_at_order: ActiveValue::Set(line.price_at_order),
                notes: ActiveValue::Set(normalize_optional_text(line.notes.as_deref())),
            });
            order_items::Entity::insert_many(lines).exec(&db_tx).await?;

            tracing::info!(order_id = %order_id, total = order.total_price, "order placed");
            Ok(order_id.clone())
        })
    }

    /// Fetch one order with its lines and the menu items they refer to.
    pub async fn order(&self, id: &str) -> ResultEngine<Order> {
        let model = orders::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))?;
        let mut orders = self.join_lines(&self.database, vec![model]).await?;
        orders
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))
    }

    /// Every order, newest first, optionally restricted to one status.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> ResultEngine<Vec<Order>> {
        let mut query = orders::Entity::find().order_by_desc(orders::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        let models = query.all(&self.database).await?;
        self.join_lines(&self.database, models).await
    }

    /// Overwrite the status of an order. The previous status is not checked.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ResultEngine<Order> {
        with_tx!(self, |db_tx| {
            let model = orders::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))?;

            let mut active: orders::ActiveModel = model.into();
            active.status = ActiveValue::Set(status.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;

            let mut joined = self.join_lines(&db_tx, vec![model]).await?;
            joined
                .pop()
                .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))
        })
    }

    /// Delete an order. Its lines go with it.
    pub async fn delete_order(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            order_items::Entity::delete_many()
                .filter(order_items::Column::OrderId.eq(id.to_string()))
                .exec(&db_tx)
                .await?;
            let res = orders::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("order not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Attach lines and menu item info to a batch of orders, keeping their order.
    async fn join_lines<C: ConnectionTrait>(
        &self,
        db: &C,
        models: Vec<orders::Model>,
    ) -> ResultEngine<Vec<Order>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let line_models = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_items::Column::Id)
            .all(db)
            .await?;

        let item_ids: HashSet<i32> = line_models.iter().map(|l| l.menu_item_id).collect();
        let items: HashMap<i32, (String, String)> = if item_ids.is_empty() {
            HashMap::new()
        } else {
            menu_items::Entity::find()
                .filter(menu_items::Column::Id.is_in(item_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|m| (m.id, (m.name, m.category_id)))
                .collect()
        };

        let mut by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for line in line_models {
            by_order
                .entry(line.order_id.clone())
                .or_default()
                .push(OrderLine {
                    id: line.id,
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                    price_at_order: line.price_at_order,
                    notes: line.notes,
                    menu_item: items.get(&line.menu_item_id).cloned(),
                });
        }

        models
            .into_iter()
            .map(|model| {
                let lines = by_order.remove(&model.id).unwrap_or_default();
                Order::from_model(model, lines)
            })
            .collect()
    }
}
