use cart_store::utils::error::ErrorSeverity;
use cart_store::utils::{logger, validation::Validate};
use cart_store::{
    Cart, CartCommand, CartError, CartStore, CliConfig, HttpStockService, LocalStorage,
    TracingNotifier, UpdateProductAmount,
};
use clap::Parser;
use std::sync::Arc;

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 Cart ({} items)", cart.total_amount());
    for product in cart.items() {
        let title = product
            .fields
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown");
        println!("  #{:<6} x{:<4} {}", product.id, product.amount, title);
    }
}

fn exit_code(e: &CartError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::Medium => 3,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 4,
    }
}

async fn run(cli: &CliConfig) -> Result<(), CartError> {
    let config = cli.resolve()?;
    config.validate()?;

    logger::init_logger(config.logging.verbose, config.logging.json);
    tracing::debug!("Resolved config: {:?}", config);

    let stock = HttpStockService::from_config(&config.stock_service)?;
    let storage = LocalStorage::new(config.storage.path.clone());
    let store = CartStore::open(
        stock,
        storage,
        Arc::new(TracingNotifier),
        config.store_settings(),
    )
    .await?;

    match cli.command {
        CartCommand::Show => {}
        CartCommand::Add { product_id } => {
            let product = store.add_product(product_id).await?;
            println!("✅ Product {} now x{}", product.id, product.amount);
        }
        CartCommand::Remove { product_id } => {
            let product = store.remove_product(product_id).await?;
            println!("✅ Removed product {}", product.id);
        }
        CartCommand::Update { product_id, amount } => {
            match store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await?
            {
                Some(product) => println!("✅ Product {} now x{}", product.id, product.amount),
                None => println!("ℹ️ Negative amount ignored"),
            }
        }
    }

    print_cart(&store.cart().await);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if let Err(e) = run(&cli).await {
        tracing::debug!("Error category: {:?}", e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}
