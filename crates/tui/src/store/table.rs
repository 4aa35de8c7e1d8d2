use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableStore {
    table_number: String,
}

impl TableStore {
    pub fn table_number(&self) -> &str {
        &self.table_number
    }

    pub fn set(&mut self, table: &str) {
        self.table_number = table.trim().to_string();
    }

    pub fn clear(&mut self) {
        self.table_number.clear();
    }

    /// Apply the table handed over by a scanned link. A stored table number
    /// wins; the customer has to clear it before a new link takes effect.
    ///
    /// Returns whether the store changed.
    pub fn adopt_link_param(&mut self, table: Option<&str>) -> bool {
        let Some(table) = table.map(str::trim).filter(|t| !t.is_empty()) else {
            return false;
        };
        if !self.table_number.is_empty() {
            return false;
        }
        self.set(table);
        true
    }
}

/// Extract the `table` query parameter from a table QR link.
pub fn table_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "table")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_param_fills_empty_store() {
        let mut table = TableStore::default();
        assert!(table.adopt_link_param(Some("A1")));
        assert_eq!(table.table_number(), "A1");
    }

    #[test]
    fn link_param_never_overwrites() {
        let mut table = TableStore::default();
        table.set("7");
        assert!(!table.adopt_link_param(Some("A1")));
        assert_eq!(table.table_number(), "7");

        table.clear();
        assert!(table.adopt_link_param(Some("A1")));
        assert_eq!(table.table_number(), "A1");
    }

    #[test]
    fn blank_link_param_is_ignored() {
        let mut table = TableStore::default();
        assert!(!table.adopt_link_param(Some("  ")));
        assert!(!table.adopt_link_param(None));
        assert_eq!(table.table_number(), "");
    }

    #[test]
    fn table_is_read_from_link() {
        assert_eq!(
            table_from_link("http://192.168.1.10:3000/?table=teras+2"),
            Some("teras 2".to_string())
        );
        assert_eq!(
            table_from_link("https://menu.example.com/?lang=id&table=A1"),
            Some("A1".to_string())
        );
        assert_eq!(table_from_link("https://menu.example.com/"), None);
        assert_eq!(table_from_link("not a link"), None);
    }
}
