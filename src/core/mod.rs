pub mod catalog;

pub use crate::domain::model::{CatalogStats, Item, Patron};
pub use crate::domain::ports::{CatalogObserver, CatalogStore, ConfigProvider};
pub use crate::utils::error::Result;
