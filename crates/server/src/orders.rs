//! Order API endpoints
//!
//! Placing and reading an order is public: customers never sign in. Listing,
//! status changes and deletion are reserved to staff.

use api_types::order::{
    MenuItemRef, OrderChangeKind, OrderCreated, OrderItemView, OrderListResponse, OrderNew,
    OrderQuery, OrderStatus, OrderStatusUpdate, OrderView, PaymentMethod,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewOrder, NewOrderLine, Order, Session};

use crate::{ServerError, server::ServerState};

fn engine_status(status: OrderStatus) -> engine::OrderStatus {
    match status {
        OrderStatus::Pending => engine::OrderStatus::Pending,
        OrderStatus::Confirmed => engine::OrderStatus::Confirmed,
        OrderStatus::Preparing => engine::OrderStatus::Preparing,
        OrderStatus::Completed => engine::OrderStatus::Completed,
        OrderStatus::Cancelled => engine::OrderStatus::Cancelled,
    }
}

fn api_status(status: engine::OrderStatus) -> OrderStatus {
    match status {
        engine::OrderStatus::Pending => OrderStatus::Pending,
        engine::OrderStatus::Confirmed => OrderStatus::Confirmed,
        engine::OrderStatus::Preparing => OrderStatus::Preparing,
        engine::OrderStatus::Completed => OrderStatus::Completed,
        engine::OrderStatus::Cancelled => OrderStatus::Cancelled,
    }
}

fn order_view(order: Order) -> OrderView {
    OrderView {
        id: order.id,
        customer_name: order.customer_name,
        table_number: order.table_number,
        total_price: order.total_price,
        payment_method: match order.payment_method {
            engine::PaymentMethod::Kasir => PaymentMethod::Kasir,
            engine::PaymentMethod::Qris => PaymentMethod::Qris,
        },
        status: api_status(order.status),
        notes: order.notes,
        created_at: order.created_at,
        updated_at: order.updated_at,
        items: order
            .lines
            .into_iter()
            .map(|line| OrderItemView {
                id: line.id,
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
                price_at_order: line.price_at_order,
                notes: line.notes,
                menu_item: line
                    .menu_item
                    .map(|(name, category_id)| MenuItemRef { name, category_id }),
            })
            .collect(),
    }
}

/// Place an order with its lines in one request.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderNew>,
) -> Result<(StatusCode, Json<OrderCreated>), ServerError> {
    let order = NewOrder {
        customer_name: payload.customer_name,
        table_number: payload.table_number,
        total_price: payload.total_price,
        payment_method: match payload.payment_method {
            PaymentMethod::Kasir => engine::PaymentMethod::Kasir,
            PaymentMethod::Qris => engine::PaymentMethod::Qris,
        },
        notes: payload.notes,
        lines: payload
            .items
            .into_iter()
            .map(|item| NewOrderLine {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price_at_order: item.price_at_order,
                notes: item.notes,
            })
            .collect(),
    };

    let id = state.engine.create_order(order).await?;
    state.events.publish(OrderChangeKind::Insert, &id);
    Ok((StatusCode::CREATED, Json(OrderCreated { id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state.engine.order(&id).await?;
    Ok(Json(order_view(order)))
}

/// List orders newest first, optionally by status.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<OrderListResponse>, ServerError> {
    let orders = state
        .engine
        .list_orders(query.status.map(engine_status))
        .await?;
    Ok(Json(OrderListResponse {
        orders: orders.into_iter().map(order_view).collect(),
    }))
}

pub async fn update_status(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state
        .engine
        .update_order_status(&id, engine_status(payload.status))
        .await?;
    tracing::info!(by = %session.email, order_id = %id, status = payload.status.as_str(), "order status changed");
    state.events.publish(OrderChangeKind::Update, &id);
    Ok(Json(order_view(order)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_order(&id).await?;
    tracing::info!(by = %session.email, order_id = %id, "order deleted");
    state.events.publish(OrderChangeKind::Delete, &id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_lossless() {
        for status in OrderStatus::ALL {
            assert_eq!(api_status(engine_status(status)), status);
            assert_eq!(engine_status(status).as_str(), status.as_str());
        }
    }
}
