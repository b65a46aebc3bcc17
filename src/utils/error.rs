use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    ApiStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Requested quantity {requested} of product {product_id} exceeds stock ({available})")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("Product {product_id} is not in the cart")]
    ProductNotFound { product_id: ProductId },

    #[error("Product {product_id} cannot be removed from position {position}")]
    InvalidPosition {
        product_id: ProductId,
        position: usize,
    },
}

/// 錯誤分類，呼叫端可以直接比對結果種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    StockExceeded,
    NotFound,
    InvalidPosition,
    Transport,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::StockExceeded { .. } => ErrorCategory::StockExceeded,
            CartError::ProductNotFound { .. } => ErrorCategory::NotFound,
            CartError::InvalidPosition { .. } => ErrorCategory::InvalidPosition,
            CartError::ApiError(_) | CartError::ApiStatusError { .. } => ErrorCategory::Transport,
            CartError::IoError(_) | CartError::SerializationError(_) => ErrorCategory::Persistence,
            CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::StockExceeded => ErrorSeverity::Low,
            ErrorCategory::NotFound | ErrorCategory::InvalidPosition => ErrorSeverity::High,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Persistence | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::StockExceeded => "Lower the requested quantity to the available stock",
            ErrorCategory::NotFound => "Add the product to the cart before changing it",
            ErrorCategory::InvalidPosition => {
                "Enable rules.allow_remove_first_entry to remove the first cart entry"
            }
            ErrorCategory::Transport => "Check that the stock service is reachable and retry",
            ErrorCategory::Persistence => "Check that the storage directory is writable",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::StockExceeded { .. } => "Requested quantity exceeds stock".to_string(),
            CartError::ProductNotFound { product_id } => {
                format!("Product {} is not in the cart", product_id)
            }
            CartError::InvalidPosition { product_id, .. } => {
                format!("Product {} cannot be removed", product_id)
            }
            CartError::ApiError(_) | CartError::ApiStatusError { .. } => {
                "The stock service could not be reached".to_string()
            }
            CartError::IoError(_) | CartError::SerializationError(_) => {
                "The cart could not be saved".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_stock_exceeded(&self) -> bool {
        self.category() == ErrorCategory::StockExceeded
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_rejections_are_categorized() {
        let err = CartError::StockExceeded {
            product_id: 1,
            requested: 6,
            available: 5,
        };
        assert_eq!(err.category(), ErrorCategory::StockExceeded);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.is_stock_exceeded());

        let err = CartError::InvalidPosition {
            product_id: 1,
            position: 0,
        };
        assert_eq!(err.category(), ErrorCategory::InvalidPosition);
        assert!(!err.is_stock_exceeded());
    }

    #[test]
    fn test_status_error_is_transport() {
        let err = CartError::ApiStatusError {
            status: 503,
            url: "http://localhost/stock/1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_error_is_persistence() {
        let err: CartError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert_eq!(err.user_friendly_message(), "The cart could not be saved");
    }
}
