use crate::domain::model::{Cart, Product};
use crate::utils::error::Result;

pub fn encode_cart(cart: &Cart) -> Result<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Decodes a stored cart. Corrupt text yields an empty cart; duplicate ids
/// keep their first entry.
pub fn decode_cart(data: &str) -> Cart {
    match serde_json::from_str::<Vec<Product>>(data) {
        Ok(entries) => {
            let (cart, dropped) = Cart::from_entries(entries);
            if dropped > 0 {
                tracing::warn!("Dropped {} duplicate cart entries", dropped);
            }
            cart
        }
        Err(e) => {
            tracing::warn!("Stored cart is corrupt, starting empty: {}", e);
            Cart::new()
        }
    }
}
