use crate::domain::model::{ProductDetails, ProductId, Stock};
use crate::domain::notification::Notification;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable key-value store holding the serialized cart.
pub trait CartStorage: Send + Sync {
    fn load(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn save(&self, key: &str, data: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Remote lookups of stock levels and product details.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock>;
    async fn get_product(&self, product_id: ProductId) -> Result<ProductDetails>;
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[async_trait]
impl<T: StockService + ?Sized> StockService for std::sync::Arc<T> {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        (**self).get_stock(product_id).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductDetails> {
        (**self).get_product(product_id).await
    }
}
