// src/shopcarts/shopcart_structs.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single line item in a customer's shopcart.
/// Identified by the composite key (customer_id, product_id); there is no
/// surrogate id anywhere in the service.
/// Derives FromRow so query results map straight onto it.
/// Decoding requires all five fields with their exact types; keys beyond
/// the five are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShopCartItem {
    pub customer_id: i32,
    pub product_id: i32,
    pub name: String,
    pub quantity: i32,
    // Negative prices are accepted as-is; discount lines use them.
    pub price: f64,
}

impl ShopCartItem {
    /// The composite key addressing this item.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            customer_id: self.customer_id,
            product_id: self.product_id,
        }
    }
}

/// Value type for the composite key. Cheap to copy, hashable, and printable
/// in the form the log lines and error messages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub customer_id: i32,
    pub product_id: i32,
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "customer '{}', product '{}'",
            self.customer_id, self.product_id
        )
    }
}

/// Query-string filters accepted by the collection listing.
/// Values arrive as raw strings and are parsed by the handler so that a bad
/// value ("abc" for price) becomes a 400 rather than a silent mismatch.
#[derive(Debug, Deserialize)]
pub struct ShopCartQuery {
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub product_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_carries_both_halves() {
        let item = ShopCartItem {
            customer_id: 7,
            product_id: 3,
            name: "wrench".to_string(),
            quantity: 2,
            price: 9.99,
        };
        assert_eq!(
            item.key(),
            ItemKey {
                customer_id: 7,
                product_id: 3
            }
        );
    }

    #[test]
    fn key_display_matches_log_form() {
        let key = ItemKey {
            customer_id: 7,
            product_id: 3,
        };
        assert_eq!(key.to_string(), "customer '7', product '3'");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = r#"{
            "customer_id": 1,
            "product_id": 2,
            "name": "soap",
            "quantity": 1,
            "price": 2.5,
            "color": "green"
        }"#;
        let item: ShopCartItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.name, "soap");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, 2.5);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let body = r#"{"customer_id": 1, "product_id": 2, "name": "soap"}"#;
        assert!(serde_json::from_str::<ShopCartItem>(body).is_err());
    }
}
