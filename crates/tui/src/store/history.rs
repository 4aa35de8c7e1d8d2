use serde::{Deserialize, Serialize};

pub const MAX_ORDERS: usize = 10;

/// Ids of the orders placed from this device, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStore {
    order_ids: Vec<String>,
}

impl HistoryStore {
    pub fn order_ids(&self) -> &[String] {
        &self.order_ids
    }

    pub fn is_empty(&self) -> bool {
        self.order_ids.is_empty()
    }

    pub fn push_front(&mut self, order_id: String) {
        self.order_ids.insert(0, order_id);
        self.order_ids.truncate(MAX_ORDERS);
    }

    pub fn clear(&mut self) {
        self.order_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_capped() {
        let mut history = HistoryStore::default();
        for n in 0..=MAX_ORDERS {
            history.push_front(format!("order-{n}"));
        }
        assert_eq!(history.order_ids().len(), MAX_ORDERS);
        assert_eq!(history.order_ids()[0], "order-10");
        assert!(!history.order_ids().contains(&"order-0".to_string()));
    }

    #[test]
    fn clear_empties() {
        let mut history = HistoryStore::default();
        history.push_front("a".to_string());
        history.clear();
        assert!(history.is_empty());
    }
}
