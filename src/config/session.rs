use serde::{Deserialize, Serialize};

use super::{CargoItem, ClientRecord};

/// The invoice being edited: one client and an append-only cart.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Session {
    #[serde(default)]
    pub client: ClientRecord,
    #[serde(default)]
    items: Vec<CargoItem>,
}

impl Session {
    pub fn items(&self) -> &[CargoItem] {
        &self.items
    }

    pub fn add_item(&mut self, item: CargoItem) {
        self.items.push(item);
    }

    /// Drop every cargo item. The client record is left in place.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(desc: &str) -> CargoItem {
        CargoItem::new(desc, 10.0, 1.0, 0.0, false).unwrap()
    }

    #[test]
    fn add_preserves_order() {
        let mut session = Session::default();
        session.add_item(item("first"));
        session.add_item(item("second"));

        let names: Vec<_> = session.items().iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn clear_empties_cart_but_keeps_client() {
        let mut session = Session::default();
        session.client.name = "Ana".to_string();
        session.add_item(item("Caja"));

        session.clear();

        assert!(session.is_empty());
        assert_eq!(session.client.name, "Ana");
    }

    #[test]
    fn toml_round_trip_keeps_items() {
        let mut session = Session::default();
        session.add_item(CargoItem::new("Caja", 100.0, 2.5, 10.0, true).unwrap());

        let text = toml::to_string_pretty(&session).unwrap();
        let back: Session = toml::from_str(&text).unwrap();
        assert_eq!(back, session);
    }
}
