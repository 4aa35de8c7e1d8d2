use serde::{Deserialize, Serialize};

/// One cart line. Lines are keyed by menu item id plus note, so the same dish
/// with two different notes is kept as two lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i32,
    pub name: String,
    /// Unit price captured when the line was added.
    pub price: i64,
    pub quantity: u32,
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

/// What the menu hands to the cart; quantity is passed separately.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub category: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartStore {
    items: Vec<CartItem>,
    #[serde(skip)]
    is_open: bool,
}

impl CartStore {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge into the line with the same id and note, or append a new one.
    /// `quantity` defaults to 1; zero adds nothing.
    pub fn add_item(&mut self, entry: CartEntry, quantity: Option<u32>) {
        let quantity = quantity.unwrap_or(1);
        if quantity == 0 {
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.id == entry.id && line.notes == entry.notes)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            id: entry.id,
            name: entry.name,
            price: entry.price,
            quantity,
            category: entry.category,
            notes: entry.notes,
        });
    }

    pub fn remove_item(&mut self, id: i32, notes: &str) {
        self.items
            .retain(|line| !(line.id == id && line.notes == notes));
    }

    /// Set the quantity of a line; zero or less removes it.
    pub fn update_quantity(&mut self, id: i32, quantity: i64, notes: &str) {
        if quantity <= 0 {
            self.remove_item(id, notes);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.id == id && line.notes == notes)
        {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(|line| line.price * i64::from(line.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i32, price: i64, notes: &str) -> CartEntry {
        CartEntry {
            id,
            name: format!("item {id}"),
            price,
            category: "ayam".to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn same_item_and_note_merge() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), None);
        cart.add_item(entry(1, 15_000, ""), Some(2));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn different_note_is_a_new_line() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), None);
        cart.add_item(entry(1, 15_000, "no chili"), None);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn zero_quantity_removes_only_matching_line() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), Some(2));
        cart.add_item(entry(1, 15_000, "extra rice"), None);
        cart.update_quantity(1, 0, "");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].notes, "extra rice");

        cart.update_quantity(1, -3, "extra rice");
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_follow_surviving_lines() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), Some(2));
        cart.add_item(entry(2, 5_000, ""), None);
        cart.add_item(entry(3, 8_000, ""), Some(4));
        assert_eq!(cart.total(), 15_000 * 2 + 5_000 + 8_000 * 4);

        cart.remove_item(3, "");
        cart.update_quantity(2, 3, "");
        assert_eq!(cart.total(), 15_000 * 2 + 5_000 * 3);
        assert_eq!(cart.item_count(), 5);

        cart.clear();
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn update_of_unknown_line_is_ignored() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), None);
        cart.update_quantity(9, 4, "");
        cart.remove_item(1, "other note");
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn open_flag_is_not_serialized() {
        let mut cart = CartStore::default();
        cart.add_item(entry(1, 15_000, ""), None);
        cart.toggle();
        assert!(cart.is_open());

        let json = serde_json::to_string(&cart).unwrap();
        assert!(!json.contains("is_open"));
        let restored: CartStore = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_open());
        assert_eq!(restored.items(), cart.items());
    }
}
