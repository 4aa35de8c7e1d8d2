use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, TransactionTrait, prelude::*};

use crate::{ResultEngine, categories, menu_items};

use super::{Engine, with_tx};

/// What [`Engine::seed_default_menu`] inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub menu_items: usize,
}

const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("ayam", "Ayam", "🍗"),
    ("daging", "Daging", "🥩"),
    ("ikan", "Ikan", "🐟"),
    ("minuman", "Minuman", "🥤"),
    ("nasi", "Nasi", "🍚"),
    ("sambal", "Sambal", "🌶️"),
];

// (category, name, price, description)
const DEFAULT_MENU: &[(&str, &str, i64, &str)] = &[
    ("ayam", "Ayam Goreng", 15000, "Fried chicken in yellow spices, crisp outside and tender inside"),
    ("ayam", "Ayam Bakar", 18000, "Grilled chicken with a hot and fragrant rica-rica rub"),
    ("ayam", "Ayam Pop", 20000, "Padang-style steamed then fried chicken, pale and tender"),
    ("ayam", "Ayam Rendang", 22000, "Chicken slow-cooked in rich rendang spices"),
    ("ayam", "Ayam Gulai", 19000, "Chicken in a thick yellow gulai curry"),
    ("daging", "Rendang Daging", 28000, "Classic Padang beef rendang"),
    ("daging", "Dendeng Balado", 30000, "Thin crispy beef with spicy balado chili"),
    ("daging", "Gulai Daging", 25000, "Beef in a yellow gulai curry"),
    ("daging", "Kalio Daging", 26000, "Beef in a wet, milder rendang sauce"),
    ("daging", "Daging Bakar", 27000, "Grilled spiced beef"),
    ("ikan", "Ikan Goreng", 18000, "Crispy fried fish"),
    ("ikan", "Ikan Bakar", 22000, "Grilled fish with sweet soy glaze"),
    ("ikan", "Gulai Ikan", 24000, "Fish in a yellow gulai curry"),
    ("ikan", "Ikan Asam Padeh", 26000, "Fish in a sour and spicy broth"),
    ("ikan", "Ikan Balado", 25000, "Fried fish topped with balado chili"),
    ("minuman", "Es Teh Manis", 5000, "Iced sweet tea"),
    ("minuman", "Teh Tawar Hangat", 3000, "Hot unsweetened tea"),
    ("minuman", "Es Jeruk", 8000, "Fresh iced orange juice"),
    ("minuman", "Kelapa Muda", 12000, "Young coconut served chilled"),
    ("minuman", "Es Campur", 15000, "Shaved ice with mixed fruit and jelly"),
    ("nasi", "Nasi Putih", 5000, "Steamed white rice"),
    ("nasi", "Nasi Uduk", 8000, "Rice cooked in coconut milk"),
    ("sambal", "Sambal Hijau", 5000, "Green chili sambal"),
    ("sambal", "Sambal Merah", 5000, "Red chili sambal"),
    ("sambal", "Sambal Lado", 6000, "Padang-style coarse chili sambal"),
];

impl Engine {
    /// Insert the default restaurant menu.
    ///
    /// Does nothing when at least one category already exists.
    pub async fn seed_default_menu(&self) -> ResultEngine<SeedReport> {
        with_tx!(self, |db_tx| {
            if categories::Entity::find().count(&db_tx).await? > 0 {
                tracing::info!("categories already present, skipping seed");
                return Ok(SeedReport::default());
            }

            let cats = DEFAULT_CATEGORIES
                .iter()
                .enumerate()
                .map(|(pos, (id, label, emoji))| categories::ActiveModel {
                    id: ActiveValue::Set((*id).to_string()),
                    label: ActiveValue::Set((*label).to_string()),
                    emoji: ActiveValue::Set((*emoji).to_string()),
                    sort_order: ActiveValue::Set(i32::try_from(pos).unwrap_or(i32::MAX)),
                });
            categories::Entity::insert_many(cats).exec(&db_tx).await?;

            let now = Utc::now();
            let items = DEFAULT_MENU
                .iter()
                .map(|(category, name, price, description)| menu_items::ActiveModel {
                    id: ActiveValue::NotSet,
                    name: ActiveValue::Set((*name).to_string()),
                    price: ActiveValue::Set(*price),
                    description: ActiveValue::Set(Some((*description).to_string())),
                    category_id: ActiveValue::Set((*category).to_string()),
                    image: ActiveValue::Set(None),
                    available: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                });
            menu_items::Entity::insert_many(items).exec(&db_tx).await?;

            Ok(SeedReport {
                categories: DEFAULT_CATEGORIES.len(),
                menu_items: DEFAULT_MENU.len(),
            })
        })
    }
}
