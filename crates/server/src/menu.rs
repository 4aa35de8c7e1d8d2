//! Menu API endpoints

use api_types::menu::{MenuItemNew, MenuItemUpdate, MenuItemView, MenuListResponse, MenuQuery};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{MenuFilter, MenuItem, MenuItemPatch, Session};

use crate::{ServerError, server::ServerState};

fn menu_item_view(item: MenuItem) -> MenuItemView {
    MenuItemView {
        id: item.id,
        name: item.name,
        price: item.price,
        description: item.description,
        category_id: item.category_id,
        image: item.image,
        available: item.available,
    }
}

/// `category` wins over `search` when both are given.
fn filter_for(query: MenuQuery) -> MenuFilter {
    match (query.category, query.search) {
        (Some(category), _) if !category.trim().is_empty() => {
            let category = category.trim().to_string();
            if query.include_unavailable.unwrap_or(false) {
                MenuFilter::WholeCategory(category)
            } else {
                MenuFilter::Category(category)
            }
        }
        (_, Some(search)) => MenuFilter::Search(search),
        _ => MenuFilter::All,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuListResponse>, ServerError> {
    let items = state.engine.list_menu_items(filter_for(query)).await?;
    Ok(Json(MenuListResponse {
        items: items.into_iter().map(menu_item_view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<MenuItemView>, ServerError> {
    let item = state.engine.menu_item(id).await?;
    Ok(Json(menu_item_view(item)))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemNew>,
) -> Result<(StatusCode, Json<MenuItemView>), ServerError> {
    let item = state
        .engine
        .create_menu_item(engine::MenuItemNew {
            name: payload.name,
            price: payload.price,
            description: payload.description,
            category_id: payload.category_id,
            image: payload.image,
            available: payload.available.unwrap_or(true),
        })
        .await?;
    tracing::info!(by = %session.email, id = item.id, "menu item created");
    Ok((StatusCode::CREATED, Json(menu_item_view(item))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<MenuItemUpdate>,
) -> Result<Json<MenuItemView>, ServerError> {
    let item = state
        .engine
        .update_menu_item(
            id,
            MenuItemPatch {
                name: payload.name,
                price: payload.price,
                description: payload.description,
                category_id: payload.category_id,
                image: payload.image,
                available: payload.available,
            },
        )
        .await?;
    Ok(Json(menu_item_view(item)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_menu_item(id).await?;
    tracing::info!(by = %session.email, id, "menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_takes_precedence_over_search() {
        let filter = filter_for(MenuQuery {
            category: Some("ayam".to_string()),
            search: Some("goreng".to_string()),
            include_unavailable: None,
        });
        assert_eq!(filter, MenuFilter::Category("ayam".to_string()));
    }

    #[test]
    fn include_unavailable_reads_the_whole_category() {
        let filter = filter_for(MenuQuery {
            category: Some(" ayam ".to_string()),
            search: None,
            include_unavailable: Some(true),
        });
        assert_eq!(filter, MenuFilter::WholeCategory("ayam".to_string()));

        let filter = filter_for(MenuQuery {
            category: None,
            search: None,
            include_unavailable: Some(true),
        });
        assert_eq!(filter, MenuFilter::All);
    }

    #[test]
    fn blank_category_falls_back() {
        let filter = filter_for(MenuQuery {
            category: Some("  ".to_string()),
            search: None,
            include_unavailable: None,
        });
        assert_eq!(filter, MenuFilter::All);

        let filter = filter_for(MenuQuery {
            category: None,
            search: Some("teh".to_string()),
            include_unavailable: None,
        });
        assert_eq!(filter, MenuFilter::Search("teh".to_string()));
    }
}
