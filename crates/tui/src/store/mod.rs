//! Customer-side state kept between runs: cart, table number and the ids of
//! placed orders. Everything lives in one JSON document.

pub mod cart;
pub mod history;
pub mod table;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use cart::{CartEntry, CartItem, CartStore};
pub use history::HistoryStore;
pub use table::{TableStore, table_from_link};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default)]
    pub cart: CartStore,
    #[serde(default)]
    pub table: TableStore,
    #[serde(default)]
    pub history: HistoryStore,
}

impl LocalState {
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}
