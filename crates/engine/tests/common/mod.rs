use sea_orm::{Database, DatabaseConnection};

use engine::{CategoryNew, Engine, MenuItem, MenuItemNew};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[allow(dead_code)]
pub async fn add_category(engine: &Engine, id: &str, sort_order: i32) {
    engine
        .create_category(CategoryNew {
            id: id.to_string(),
            label: id.to_uppercase(),
            emoji: String::new(),
            sort_order,
        })
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn add_item(engine: &Engine, category: &str, name: &str, price: i64) -> MenuItem {
    engine
        .create_menu_item(MenuItemNew {
            name: name.to_string(),
            price,
            description: None,
            category_id: category.to_string(),
            image: None,
            available: true,
        })
        .await
        .unwrap()
}
