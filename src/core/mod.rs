pub mod cart_store;
pub mod codec;

pub use crate::domain::model::{Cart, Product, ProductDetails, ProductId, Stock, UpdateProductAmount};
pub use crate::domain::ports::{CartStorage, Notifier, StockService};
pub use crate::utils::error::Result;
pub use cart_store::{CartOperation, CartRules, CartStore, StoreSettings};
