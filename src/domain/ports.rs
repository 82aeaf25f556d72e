use crate::core::catalog::Catalog;
use crate::domain::model::{Item, Patron};
use crate::utils::error::Result;
use std::path::Path;

/// Persistence port for the catalog's two collections.
pub trait CatalogStore {
    /// Writes the whole catalog to `target`, overwriting existing content.
    fn save(&self, catalog: &Catalog, target: &Path) -> Result<()>;

    /// Replaces the catalog's collections with the content of `target`.
    /// A missing `target` leaves the catalog unchanged.
    fn load(&self, target: &Path, catalog: &mut Catalog) -> Result<()>;
}

pub trait ConfigProvider {
    fn data_path(&self) -> &str;
    fn pretty_output(&self) -> bool;
}

/// Observer for catalog mutations. Constructed by the caller and handed to
/// the catalog explicitly; there is no process-wide logger singleton.
pub trait CatalogObserver {
    fn item_added(&self, _item: &Item) {}
    fn item_removed(&self, _item_id: &str) {}
    fn patron_registered(&self, _patron: &Patron) {}
    fn patron_removed(&self, _patron_id: &str) {}
    fn loan_created(&self, _patron_id: &str, _item_id: &str, _remaining: u32) {}
    fn loan_returned(&self, _patron_id: &str, _item_id: &str, _available: u32) {}
}

/// Ignores every event. Default observer for embedders that do their own
/// reporting.
#[derive(Debug, Clone, Default)]
pub struct NullObserver;

impl CatalogObserver for NullObserver {}

/// Forwards catalog events to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl CatalogObserver for TracingObserver {
    fn item_added(&self, item: &Item) {
        tracing::info!(
            "Item added: {} \"{}\" ({} copies)",
            item.id,
            item.title,
            item.capacity
        );
    }

    fn item_removed(&self, item_id: &str) {
        tracing::info!("Item removed: {}", item_id);
    }

    fn patron_registered(&self, patron: &Patron) {
        tracing::info!("Patron registered: {} ({})", patron.id, patron.name);
    }

    fn patron_removed(&self, patron_id: &str) {
        tracing::info!("Patron removed: {}", patron_id);
    }

    fn loan_created(&self, patron_id: &str, item_id: &str, remaining: u32) {
        tracing::info!(
            "Lent {} to {} ({} copies remaining)",
            item_id,
            patron_id,
            remaining
        );
    }

    fn loan_returned(&self, patron_id: &str, item_id: &str, available: u32) {
        tracing::info!(
            "{} returned {} ({} copies available)",
            patron_id,
            item_id,
            available
        );
    }
}
