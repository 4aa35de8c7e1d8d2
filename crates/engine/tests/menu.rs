mod common;

use engine::{CategoryNew, CategoryPatch, EngineError, MenuFilter, MenuItemNew, MenuItemPatch};

use common::{add_category, add_item, engine_with_db};

#[tokio::test]
async fn categories_are_listed_by_sort_order() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "minuman", 2).await;
    add_category(&engine, "ayam", 0).await;
    add_category(&engine, "ikan", 1).await;

    let ids: Vec<String> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["ayam", "ikan", "minuman"]);
}

#[tokio::test]
async fn duplicate_category_slug_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;

    let err = engine
        .create_category(CategoryNew {
            id: " AYAM ".to_string(),
            label: "Chicken".to_string(),
            emoji: String::new(),
            sort_order: 3,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("ayam".to_string()));
}

#[tokio::test]
async fn update_category_keeps_untouched_fields() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 4).await;

    let updated = engine
        .update_category(
            "ayam",
            CategoryPatch {
                emoji: Some("🍗".to_string()),
                ..CategoryPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.label, "AYAM");
    assert_eq!(updated.emoji, "🍗");
    assert_eq!(updated.sort_order, 4);
}

#[tokio::test]
async fn deleting_category_keeps_its_items() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    let item = add_item(&engine, "ayam", "Ayam Goreng", 15000).await;

    engine.delete_category("ayam").await.unwrap();

    let still_there = engine.menu_item(item.id).await.unwrap();
    assert_eq!(still_there.category_id, "ayam");
    assert!(matches!(
        engine.delete_category("ayam").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn menu_item_requires_existing_category() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_menu_item(MenuItemNew {
            name: "Ayam Goreng".to_string(),
            price: 15000,
            description: None,
            category_id: "ayam".to_string(),
            image: None,
            available: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    let err = engine
        .create_menu_item(MenuItemNew {
            name: "Ayam Goreng".to_string(),
            price: -1,
            description: None,
            category_id: "ayam".to_string(),
            image: None,
            available: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn category_filter_returns_available_items_by_name() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    add_category(&engine, "nasi", 1).await;
    add_item(&engine, "ayam", "Ayam Pop", 20000).await;
    let hidden = add_item(&engine, "ayam", "Ayam Bakar", 18000).await;
    add_item(&engine, "ayam", "Ayam Goreng", 15000).await;
    add_item(&engine, "nasi", "Nasi Putih", 5000).await;

    engine
        .set_menu_item_available(hidden.id, false)
        .await
        .unwrap();

    let names: Vec<String> = engine
        .list_menu_items(MenuFilter::Category("ayam".to_string()))
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Ayam Goreng", "Ayam Pop"]);

    let shelf: Vec<(String, bool)> = engine
        .list_menu_items(MenuFilter::WholeCategory("ayam".to_string()))
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.name, i.available))
        .collect();
    assert_eq!(
        shelf,
        vec![
            ("Ayam Bakar".to_string(), false),
            ("Ayam Goreng".to_string(), true),
            ("Ayam Pop".to_string(), true),
        ]
    );

    // The full listing still shows the unavailable item.
    let all = engine.list_menu_items(MenuFilter::All).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().any(|i| i.id == hidden.id && !i.available));
}

#[tokio::test]
async fn search_matches_name_or_description_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "daging", 0).await;
    add_item(&engine, "daging", "Rendang Daging", 28000).await;
    add_item(&engine, "daging", "Gulai Daging", 25000).await;
    engine
        .create_menu_item(MenuItemNew {
            name: "Kalio".to_string(),
            price: 26000,
            description: Some("A wet RENDANG".to_string()),
            category_id: "daging".to_string(),
            image: None,
            available: true,
        })
        .await
        .unwrap();

    let names: Vec<String> = engine
        .list_menu_items(MenuFilter::Search("rendang".to_string()))
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Rendang Daging", "Kalio"]);

    let blank = engine
        .list_menu_items(MenuFilter::Search("   ".to_string()))
        .await
        .unwrap();
    assert_eq!(blank.len(), 3);
}

#[tokio::test]
async fn update_menu_item_applies_only_given_fields() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    add_category(&engine, "ikan", 1).await;
    let item = add_item(&engine, "ayam", "Ayam Goreng", 15000).await;

    let updated = engine
        .update_menu_item(
            item.id,
            MenuItemPatch {
                price: Some(16000),
                category_id: Some("ikan".to_string()),
                image: Some("abc_1.png".to_string()),
                ..MenuItemPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ayam Goreng");
    assert_eq!(updated.price, 16000);
    assert_eq!(updated.category_id, "ikan");
    assert_eq!(updated.image.as_deref(), Some("abc_1.png"));

    let cleared = engine
        .update_menu_item(
            item.id,
            MenuItemPatch {
                image: Some(String::new()),
                ..MenuItemPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.image, None);

    let err = engine
        .update_menu_item(
            item.id,
            MenuItemPatch {
                category_id: Some("missing".to_string()),
                ..MenuItemPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn availability_toggle_changes_only_the_flag() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    let item = add_item(&engine, "ayam", "Ayam Bakar", 18000).await;

    let sold_out = engine.set_menu_item_available(item.id, false).await.unwrap();
    assert!(!sold_out.available);
    assert_eq!(sold_out.name, item.name);
    assert_eq!(sold_out.price, item.price);
    assert_eq!(sold_out.description, item.description);
    assert_eq!(sold_out.category_id, item.category_id);
    assert_eq!(sold_out.image, item.image);

    let back = engine.set_menu_item_available(item.id, true).await.unwrap();
    assert!(back.available);
}

#[tokio::test]
async fn delete_menu_item_then_lookup_fails() {
    let (engine, _db) = engine_with_db().await;
    add_category(&engine, "ayam", 0).await;
    let item = add_item(&engine, "ayam", "Ayam Goreng", 15000).await;

    engine.delete_menu_item(item.id).await.unwrap();
    assert!(matches!(
        engine.menu_item(item.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn seed_inserts_default_menu_once() {
    let (engine, _db) = engine_with_db().await;

    let report = engine.seed_default_menu().await.unwrap();
    assert_eq!(report.categories, 6);
    assert_eq!(report.menu_items, 25);

    let categories = engine.list_categories().await.unwrap();
    assert_eq!(categories[0].id, "ayam");
    assert_eq!(categories[5].id, "sambal");

    let nasi = engine
        .list_menu_items(MenuFilter::Category("nasi".to_string()))
        .await
        .unwrap();
    assert_eq!(nasi.len(), 2);

    let again = engine.seed_default_menu().await.unwrap();
    assert_eq!(again.categories, 0);
    assert_eq!(
        engine.list_menu_items(MenuFilter::All).await.unwrap().len(),
        25
    );
}
