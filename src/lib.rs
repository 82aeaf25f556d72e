pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::storage::JsonFileStore;
pub use core::catalog::Catalog;
pub use domain::model::{CatalogStats, Item, Patron};
pub use domain::ports::{CatalogObserver, CatalogStore, ConfigProvider, NullObserver, TracingObserver};
pub use utils::error::{LmsError, Result};
