use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ProductId = u64;

/// Product details as returned by the product lookup. Display fields
/// (title, price, image, ...) are opaque to the cart and kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A cart entry: product details plus the quantity held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub amount: u32,
}

impl Product {
    pub fn from_details(details: ProductDetails, amount: u32) -> Self {
        let mut fields = details.fields;
        // 查詢結果若帶 amount 欄位，以購物車數量為準
        fields.remove("amount");
        Self {
            id: details.id,
            fields,
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered cart contents. Insertion order is the order of first addition and
/// there is at most one entry per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw entries, keeping the first entry of each id.
    /// Returns the cart and the number of dropped duplicates.
    pub fn from_entries(entries: Vec<Product>) -> (Self, usize) {
        let mut items: Vec<Product> = Vec::with_capacity(entries.len());
        let mut dropped = 0;
        for entry in entries {
            if items.iter().any(|p| p.id == entry.id) {
                dropped += 1;
            } else {
                items.push(entry);
            }
        }
        (Self { items }, dropped)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|p| p.id == product_id)
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    pub fn get_mut(&mut self, product_id: ProductId) -> Option<&mut Product> {
        self.items.iter_mut().find(|p| p.id == product_id)
    }

    /// Appends a new entry. Callers check for an existing entry first.
    pub(crate) fn push(&mut self, product: Product) {
        debug_assert!(self.get(product.id).is_none());
        self.items.push(product);
    }

    pub(crate) fn set_amount(&mut self, product_id: ProductId, amount: u32) -> Option<&Product> {
        let entry = self.get_mut(product_id)?;
        entry.amount = amount;
        Some(&*entry)
    }

    pub(crate) fn remove_at(&mut self, position: usize) -> Product {
        self.items.remove(position)
    }

    /// Sum of all entry amounts.
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.amount)).sum()
    }
}
