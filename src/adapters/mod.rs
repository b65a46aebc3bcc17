// Adapters layer: concrete implementations of the domain ports (storage, http, notifications).

pub mod http;
pub mod notify;
pub mod storage;

pub use http::HttpStockService;
pub use notify::{RecordingNotifier, TracingNotifier};
pub use storage::{LocalStorage, MemoryStorage};
