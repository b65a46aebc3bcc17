use crate::adapters::http::{DEFAULT_PRODUCT_PATH, DEFAULT_STOCK_PATH};
use crate::core::cart_store::{CartRules, StoreSettings};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_PATH: &str = "./.cart-store";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    pub storage: StorageConfig,
    pub stock_service: StockServiceConfig,
    pub rules: CartRules,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORAGE_PATH.to_string(),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockServiceConfig {
    pub base_url: String,
    pub stock_path: String,
    pub product_path: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

impl Default for StockServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stock_path: DEFAULT_STOCK_PATH.to_string(),
            product_path: DEFAULT_PRODUCT_PATH.to_string(),
            timeout_seconds: None,
            headers: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl CartConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            CartError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            key: self.storage.key.clone(),
            rules: self.rules,
        }
    }
}

impl Validate for CartConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("stock_service.base_url", &self.stock_service.base_url)?;
        validation::validate_id_template("stock_service.stock_path", &self.stock_service.stock_path)?;
        validation::validate_id_template(
            "stock_service.product_path",
            &self.stock_service.product_path,
        )?;

        if let Some(timeout) = self.stock_service.timeout_seconds {
            validation::validate_range("stock_service.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_path("storage.path", &self.storage.path)?;
        validation::validate_non_empty_string("storage.key", &self.storage.key)?;

        Ok(())
    }
}
