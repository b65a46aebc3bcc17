use crate::config::toml_config::DEFAULT_CART_KEY;
use crate::core::codec::{decode_cart, encode_cart};
use crate::domain::model::{Cart, Product, ProductId, Stock, UpdateProductAmount};
use crate::domain::notification::Notification;
use crate::domain::ports::{CartStorage, Notifier, StockService};
use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const STOCK_EXCEEDED_MESSAGE: &str = "requested quantity exceeds stock";

/// Behaviour switches for the two known asymmetries of the cart.
/// Both default to the historical behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartRules {
    /// When false, removing the entry at position 0 is rejected.
    pub allow_remove_first_entry: bool,
    /// When false, the first add of a product skips the stock lookup.
    pub check_stock_on_first_add: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub key: String,
    pub rules: CartRules,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
            rules: CartRules::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOperation::Add => "failed to add product",
            CartOperation::Remove => "failed to remove product",
            CartOperation::UpdateAmount => "failed to update quantity",
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CartOperation::Add => "add_product",
            CartOperation::Remove => "remove_product",
            CartOperation::UpdateAmount => "update_product_amount",
        };
        f.write_str(name)
    }
}

/// Cart state container.
///
/// Every mutation runs read-validate-mutate-persist under one lock: the new
/// cart is computed from a copy, written to storage, and only then replaces
/// the in-memory cart. A rejected or failed operation leaves both copies
/// untouched and emits exactly one notification.
pub struct CartStore<K: StockService, S: CartStorage> {
    stock: K,
    storage: S,
    notifier: Arc<dyn Notifier>,
    settings: StoreSettings,
    cart: Mutex<Cart>,
}

impl<K: StockService, S: CartStorage> CartStore<K, S> {
    /// Loads the persisted cart. A missing key or corrupt content starts an
    /// empty cart; storage read errors are returned.
    pub async fn open(
        stock: K,
        storage: S,
        notifier: Arc<dyn Notifier>,
        settings: StoreSettings,
    ) -> Result<Self> {
        let cart = match storage.load(&settings.key).await? {
            Some(data) => decode_cart(&data),
            None => Cart::new(),
        };
        tracing::debug!("Opened cart '{}' with {} entries", settings.key, cart.len());

        Ok(Self {
            stock,
            storage,
            notifier,
            settings,
            cart: Mutex::new(cart),
        })
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    pub async fn product(&self, product_id: ProductId) -> Option<Product> {
        self.cart.lock().await.get(product_id).cloned()
    }

    /// Adds one unit of `product_id`, returning the resulting entry.
    pub async fn add_product(&self, product_id: ProductId) -> Result<Product> {
        let mut cart = self.cart.lock().await;
        let planned = self.plan_add(&cart, product_id).await;
        self.apply(CartOperation::Add, &mut cart, planned).await
    }

    /// Removes `product_id`, returning the removed entry.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Product> {
        let mut cart = self.cart.lock().await;
        let planned = self.plan_remove(&cart, product_id);
        self.apply(CartOperation::Remove, &mut cart, planned).await
    }

    /// Sets the amount of an entry already in the cart. Negative amounts are
    /// ignored and return `Ok(None)` without any lookup or write.
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Option<Product>> {
        if request.amount < 0 {
            tracing::debug!(
                "Ignoring negative amount {} for product {}",
                request.amount,
                request.product_id
            );
            return Ok(None);
        }

        let mut cart = self.cart.lock().await;
        let planned = self.plan_update(&cart, request).await;
        self.apply(CartOperation::UpdateAmount, &mut cart, planned)
            .await
            .map(Some)
    }

    async fn plan_add(&self, cart: &Cart, product_id: ProductId) -> Result<(Cart, Product)> {
        let mut next = cart.clone();

        if let Some(current) = cart.get(product_id) {
            let requested = u64::from(current.amount) + 1;
            let stock = self.stock.get_stock(product_id).await?;
            let amount = check_stock(product_id, requested, &stock)?;

            let updated = next
                .set_amount(product_id, amount)
                .cloned()
                .ok_or(CartError::ProductNotFound { product_id })?;
            return Ok((next, updated));
        }

        if self.settings.rules.check_stock_on_first_add {
            let stock = self.stock.get_stock(product_id).await?;
            check_stock(product_id, 1, &stock)?;
        }

        let mut details = self.stock.get_product(product_id).await?;
        if details.id != product_id {
            tracing::warn!(
                "Product lookup for {} returned id {}, keeping the requested id",
                product_id,
                details.id
            );
            details.id = product_id;
        }

        let product = Product::from_details(details, 1);
        next.push(product.clone());
        Ok((next, product))
    }

    fn plan_remove(&self, cart: &Cart, product_id: ProductId) -> Result<(Cart, Product)> {
        let position = cart
            .position(product_id)
            .ok_or(CartError::ProductNotFound { product_id })?;

        // 第一筆不可刪除，除非規則允許
        if position == 0 && !self.settings.rules.allow_remove_first_entry {
            return Err(CartError::InvalidPosition {
                product_id,
                position,
            });
        }

        let mut next = cart.clone();
        let removed = next.remove_at(position);
        Ok((next, removed))
    }

    async fn plan_update(
        &self,
        cart: &Cart,
        request: UpdateProductAmount,
    ) -> Result<(Cart, Product)> {
        let product_id = request.product_id;
        let stock = self.stock.get_stock(product_id).await?;
        let amount = check_stock(product_id, request.amount.unsigned_abs(), &stock)?;

        let mut next = cart.clone();
        let updated = next
            .set_amount(product_id, amount)
            .cloned()
            .ok_or(CartError::ProductNotFound { product_id })?;
        Ok((next, updated))
    }

    async fn apply<T>(
        &self,
        operation: CartOperation,
        cart: &mut Cart,
        planned: Result<(Cart, T)>,
    ) -> Result<T> {
        let outcome = match planned {
            Ok((next, value)) => match self.persist(&next).await {
                Ok(()) => Ok((next, value)),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok((next, value)) => {
                *cart = next;
                tracing::info!("{} committed, cart has {} entries", operation, cart.len());
                Ok(value)
            }
            Err(e) => {
                self.report(operation, &e);
                Err(e)
            }
        }
    }

    async fn persist(&self, cart: &Cart) -> Result<()> {
        let data = encode_cart(cart)?;
        self.storage.save(&self.settings.key, &data).await
    }

    fn report(&self, operation: CartOperation, err: &CartError) {
        tracing::warn!("{} rejected: {}", operation, err);

        let notification = if err.is_stock_exceeded() {
            Notification::warning(STOCK_EXCEEDED_MESSAGE)
        } else {
            Notification::error(operation.failure_message())
        };
        self.notifier.notify(notification);
    }
}

fn check_stock(product_id: ProductId, requested: u64, stock: &Stock) -> Result<u32> {
    let exceeded = || CartError::StockExceeded {
        product_id,
        requested,
        available: stock.amount,
    };

    if requested > u64::from(stock.amount) {
        return Err(exceeded());
    }
    u32::try_from(requested).map_err(|_| exceeded())
}
