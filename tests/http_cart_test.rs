use anyhow::Result;
use cart_store::config::toml_config::CartConfig;
use cart_store::{
    CartStore, ErrorCategory, HttpStockService, LocalStorage, RecordingNotifier,
    UpdateProductAmount,
};
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn config_for(server: &MockServer, temp_dir: &TempDir) -> Result<CartConfig> {
    let toml_content = format!(
        r#"
[storage]
path = "{}"

[stock_service]
base_url = "{}"
timeout_seconds = 5
"#,
        temp_dir.path().to_str().unwrap().replace('\\', "/"),
        server.base_url()
    );
    Ok(CartConfig::from_toml_str(&toml_content)?)
}

async fn open_store(
    config: &CartConfig,
    notifier: &RecordingNotifier,
) -> Result<CartStore<HttpStockService, LocalStorage>> {
    let stock = HttpStockService::from_config(&config.stock_service)?;
    let storage = LocalStorage::new(config.storage.path.clone());
    Ok(CartStore::open(
        stock,
        storage,
        Arc::new(notifier.clone()),
        config.store_settings(),
    )
    .await?)
}

#[tokio::test]
async fn test_end_to_end_cart_over_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let product_mock = server.mock(|when, then| {
        when.method(GET).path("/products/1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": 1,
                "title": "Tênis de Caminhada Leve Confortável",
                "price": 179.9,
                "image": "https://example.com/1.jpg"
            }));
    });
    let stock_mock = server.mock(|when, then| {
        when.method(GET).path("/stock/1");
        then.status(200)
            .json_body(serde_json::json!({"id": 1, "amount": 3}));
    });

    let config = config_for(&server, &temp_dir)?;
    let notifier = RecordingNotifier::new();
    let store = open_store(&config, &notifier).await?;

    store.add_product(1).await?;
    stock_mock.assert_hits(0);

    store.add_product(1).await?;
    store
        .update_product_amount(UpdateProductAmount {
            product_id: 1,
            amount: 3,
        })
        .await?;

    let err = store.add_product(1).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::StockExceeded);

    product_mock.assert_hits(1);
    stock_mock.assert_hits(3);
    assert_eq!(notifier.messages(), vec!["requested quantity exceeds stock"]);

    // 重新開啟後讀回同樣的購物車
    let reopened = open_store(&config, &RecordingNotifier::new()).await?;
    let cart = reopened.cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].amount, 3);
    assert_eq!(
        cart.items()[0].fields.get("title"),
        Some(&serde_json::json!("Tênis de Caminhada Leve Confortável"))
    );

    let stored = std::fs::read_to_string(temp_dir.path().join("_RocketShoes_cart.json"))?;
    let value: serde_json::Value = serde_json::from_str(&stored)?;
    assert_eq!(value[0]["amount"], 3);
    assert_eq!(value[0]["price"], 179.9);

    Ok(())
}

#[tokio::test]
async fn test_unknown_product_fails_add() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let product_mock = server.mock(|when, then| {
        when.method(GET).path("/products/99");
        then.status(404).json_body(serde_json::json!({}));
    });

    let config = config_for(&server, &temp_dir)?;
    let notifier = RecordingNotifier::new();
    let store = open_store(&config, &notifier).await?;

    let err = store.add_product(99).await.unwrap_err();

    product_mock.assert();
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(store.cart().await.is_empty());
    assert_eq!(notifier.messages(), vec!["failed to add product"]);
    assert!(!temp_dir.path().join("_RocketShoes_cart.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_server_error_on_stock_lookup_keeps_cart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/products/2");
        then.status(200)
            .json_body(serde_json::json!({"id": 2, "title": "Tênis VR"}));
    });
    let stock_mock = server.mock(|when, then| {
        when.method(GET).path("/stock/2");
        then.status(500);
    });

    let config = config_for(&server, &temp_dir)?;
    let notifier = RecordingNotifier::new();
    let store = open_store(&config, &notifier).await?;

    store.add_product(2).await?;
    let err = store
        .update_product_amount(UpdateProductAmount {
            product_id: 2,
            amount: 2,
        })
        .await
        .unwrap_err();

    stock_mock.assert();
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert_eq!(store.product(2).await.map(|p| p.amount), Some(1));
    assert_eq!(notifier.messages(), vec!["failed to update quantity"]);

    Ok(())
}
