use crate::config::toml_config::CartConfig;
use crate::domain::model::ProductId;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart-store")]
#[command(about = "Shopping cart backed by a remote stock service")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override stock_service.base_url
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override storage.path
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    /// 載入配置檔（若有）並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<CartConfig> {
        let mut config = match &self.config {
            Some(path) => CartConfig::from_file(path)?,
            None => CartConfig::default(),
        };

        if let Some(api_url) = &self.api_url {
            config.stock_service.base_url = api_url.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.path = data_dir.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_with_negative_amount() {
        let cli = CliConfig::parse_from(["cart-store", "update", "3", "-1"]);
        match cli.command {
            CartCommand::Update { product_id, amount } => {
                assert_eq!(product_id, 3);
                assert_eq!(amount, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_apply_without_config_file() {
        let cli = CliConfig::parse_from([
            "cart-store",
            "--api-url",
            "http://stock:9000",
            "--data-dir",
            "/var/lib/cart",
            "-v",
            "show",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.stock_service.base_url, "http://stock:9000");
        assert_eq!(config.storage.path, "/var/lib/cart");
        assert!(config.logging.verbose);
    }
}
