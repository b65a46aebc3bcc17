pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCommand, CliConfig};

pub use adapters::{HttpStockService, LocalStorage, MemoryStorage, RecordingNotifier, TracingNotifier};
pub use config::CartConfig;
pub use crate::core::cart_store::{CartRules, CartStore, StoreSettings};
pub use domain::model::{Cart, Product, ProductDetails, ProductId, Stock, UpdateProductAmount};
pub use domain::notification::{Notification, NotificationLevel};
pub use utils::error::{CartError, ErrorCategory, Result};
