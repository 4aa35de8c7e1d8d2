//! Category API endpoints

use api_types::category::{CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Category, CategoryNew, CategoryPatch, Session};

use crate::{ServerError, server::ServerState};

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        label: category.label,
        emoji: category.emoji,
        sort_order: category.sort_order,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state.engine.list_categories().await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(category_view).collect(),
    }))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(CategoryNew {
            id: payload.id,
            label: payload.label,
            emoji: payload.emoji,
            sort_order: payload.sort_order.unwrap_or(0),
        })
        .await?;
    tracing::info!(by = %session.email, id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            &id,
            CategoryPatch {
                label: payload.label,
                emoji: payload.emoji,
                sort_order: payload.sort_order,
            },
        )
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&id).await?;
    tracing::info!(by = %session.email, %id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
