use crate::domain::model::{CatalogStats, Item, Patron};
use crate::domain::ports::{CatalogObserver, NullObserver};
use crate::utils::error::{LmsError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Aggregate root owning the item and patron collections. All lending state
/// is mutated here and nowhere else, so the availability and referential
/// invariants hold before and after every call, whether it succeeds or fails.
pub struct Catalog {
    items: HashMap<String, Item>,
    patrons: HashMap<String, Patron>,
    observer: Box<dyn CatalogObserver>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_observer(Box::new(NullObserver))
    }

    pub fn with_observer(observer: Box<dyn CatalogObserver>) -> Self {
        Self {
            items: HashMap::new(),
            patrons: HashMap::new(),
            observer,
        }
    }

    pub fn add_item(&mut self, item: Item) -> Result<()> {
        if self.items.contains_key(&item.id) {
            return Err(LmsError::DuplicateIdError {
                id: item.id.clone(),
            });
        }
        self.observer.item_added(&item);
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Removes an item that has no outstanding loans and returns it.
    pub fn remove_item(&mut self, item_id: &str) -> Result<Item> {
        match self.items.entry(item_id.to_string()) {
            Entry::Vacant(_) => Err(LmsError::NotFoundError {
                id: item_id.to_string(),
            }),
            Entry::Occupied(entry) => {
                let outstanding = entry.get().on_loan();
                if outstanding > 0 {
                    return Err(LmsError::OutstandingLoansError {
                        id: item_id.to_string(),
                        outstanding,
                    });
                }
                let item = entry.remove();
                self.observer.item_removed(item_id);
                Ok(item)
            }
        }
    }

    /// Case-insensitive substring search over title, author and external
    /// code. Recomputed on every call; no index is kept.
    pub fn search_items<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Item> + 'a {
        let needle = query.to_lowercase();
        self.items.values().filter(move |item| {
            item.title.to_lowercase().contains(&needle)
                || item.author.to_lowercase().contains(&needle)
                || item.code.to_lowercase().contains(&needle)
        })
    }

    pub fn register_patron(&mut self, patron: Patron) -> Result<()> {
        if self.patrons.contains_key(&patron.id) {
            return Err(LmsError::DuplicateIdError {
                id: patron.id.clone(),
            });
        }
        self.observer.patron_registered(&patron);
        self.patrons.insert(patron.id.clone(), patron);
        Ok(())
    }

    /// Removes a patron whose holdings are empty and returns the record.
    pub fn remove_patron(&mut self, patron_id: &str) -> Result<Patron> {
        match self.patrons.entry(patron_id.to_string()) {
            Entry::Vacant(_) => Err(LmsError::NotFoundError {
                id: patron_id.to_string(),
            }),
            Entry::Occupied(entry) => {
                let count = entry.get().holdings().len();
                if count > 0 {
                    return Err(LmsError::NonEmptyHoldingsError {
                        id: patron_id.to_string(),
                        count,
                    });
                }
                let patron = entry.remove();
                self.observer.patron_removed(patron_id);
                Ok(patron)
            }
        }
    }

    /// Moves one copy of `item_id` into the patron's holdings. Both
    /// mutations land together or not at all.
    pub fn lend(&mut self, patron_id: &str, item_id: &str) -> Result<()> {
        let patron = self
            .patrons
            .get_mut(patron_id)
            .ok_or_else(|| LmsError::NotFoundError {
                id: patron_id.to_string(),
            })?;
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| LmsError::NotFoundError {
                id: item_id.to_string(),
            })?;

        if patron.holds(item_id) {
            return Err(LmsError::AlreadyHeldError {
                patron_id: patron_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        // Last fallible step; the take below cannot fail after the
        // already-held check.
        item.decrement_availability()?;
        patron.take(item_id);
        self.observer
            .loan_created(patron_id, item_id, item.available());
        Ok(())
    }

    /// Moves one copy of `item_id` back from the patron's holdings.
    pub fn return_item(&mut self, patron_id: &str, item_id: &str) -> Result<()> {
        let patron = self
            .patrons
            .get_mut(patron_id)
            .ok_or_else(|| LmsError::NotFoundError {
                id: patron_id.to_string(),
            })?;
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| LmsError::NotFoundError {
                id: item_id.to_string(),
            })?;

        if !patron.holds(item_id) {
            return Err(LmsError::NotHeldError {
                patron_id: patron_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        // An OverReturnError here means the stored counts disagree with the
        // holdings; nothing has been mutated yet, so state stays consistent.
        item.increment_availability()?;
        patron.release(item_id);
        self.observer
            .loan_returned(patron_id, item_id, item.available());
        Ok(())
    }

    /// Full scan over both collections; no side effects.
    pub fn compute_statistics(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total_items: self.items.len(),
            total_patrons: self.patrons.len(),
            ..CatalogStats::default()
        };
        for item in self.items.values() {
            if item.is_fully_available() {
                stats.fully_available += 1;
            } else if item.available() == 0 {
                stats.fully_loaned += 1;
            }
        }
        stats
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    pub fn patron(&self, patron_id: &str) -> Option<&Patron> {
        self.patrons.get(patron_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn patrons(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.values()
    }

    /// Wholesale replacement used by the storage adapter after it has
    /// validated the loaded collections.
    pub(crate) fn replace_collections(
        &mut self,
        items: HashMap<String, Item>,
        patrons: HashMap<String, Patron>,
    ) {
        self.items = items;
        self.patrons = patrons;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LmsError;

    fn item(id: &str, title: &str, capacity: u32) -> Item {
        Item::new(id, title, "Author", format!("code-{}", id), capacity).unwrap()
    }

    fn patron(id: &str, name: &str) -> Patron {
        Patron::new(id, name, format!("{}@example.com", id)).unwrap()
    }

    #[test]
    fn test_add_item_rejects_duplicate_id() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        assert!(matches!(
            catalog.add_item(item("B1", "Another Title", 3)),
            Err(LmsError::DuplicateIdError { .. })
        ));
    }

    #[test]
    fn test_lend_until_capacity_exhausted() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();
        catalog.register_patron(patron("P2", "Grace")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        assert_eq!(catalog.item("B1").unwrap().available(), 0);

        assert!(matches!(
            catalog.lend("P2", "B1"),
            Err(LmsError::CapacityError { .. })
        ));
        // The failed lend left no partial state behind.
        assert!(!catalog.patron("P2").unwrap().holds("B1"));
        assert_eq!(catalog.item("B1").unwrap().available(), 0);
    }

    #[test]
    fn test_lend_rejects_unknown_ids() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        assert!(matches!(
            catalog.lend("P9", "B1"),
            Err(LmsError::NotFoundError { .. })
        ));
        assert!(matches!(
            catalog.lend("P1", "B9"),
            Err(LmsError::NotFoundError { .. })
        ));
        assert_eq!(catalog.item("B1").unwrap().available(), 1);
    }

    #[test]
    fn test_relend_of_held_item_is_an_error() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 3)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        assert!(matches!(
            catalog.lend("P1", "B1"),
            Err(LmsError::AlreadyHeldError { .. })
        ));
        // Availability unchanged by the rejected second lend.
        assert_eq!(catalog.item("B1").unwrap().available(), 2);
    }

    #[test]
    fn test_return_twice_hits_the_idempotence_boundary() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        catalog.return_item("P1", "B1").unwrap();
        assert!(matches!(
            catalog.return_item("P1", "B1"),
            Err(LmsError::NotHeldError { .. })
        ));
        assert_eq!(catalog.item("B1").unwrap().available(), 1);
    }

    #[test]
    fn test_remove_patron_lifecycle() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        assert!(matches!(
            catalog.remove_patron("P1"),
            Err(LmsError::NonEmptyHoldingsError { count: 1, .. })
        ));

        catalog.return_item("P1", "B1").unwrap();
        let removed = catalog.remove_patron("P1").unwrap();
        assert_eq!(removed.id, "P1");
        assert!(catalog.patron("P1").is_none());
    }

    #[test]
    fn test_remove_item_with_outstanding_loans_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 2)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        assert!(matches!(
            catalog.remove_item("B1"),
            Err(LmsError::OutstandingLoansError { outstanding: 1, .. })
        ));

        catalog.return_item("P1", "B1").unwrap();
        let removed = catalog.remove_item("B1").unwrap();
        assert_eq!(removed.id, "B1");
        assert!(catalog.item("B1").is_none());
    }

    #[test]
    fn test_remove_unknown_ids() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.remove_item("B9"),
            Err(LmsError::NotFoundError { .. })
        ));
        assert!(matches!(
            catalog.remove_patron("P9"),
            Err(LmsError::NotFoundError { .. })
        ));
    }

    #[test]
    fn test_search_is_case_insensitive_and_restartable() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.add_item(item("B2", "Web Development", 1)).unwrap();

        let hits: Vec<&str> = catalog
            .search_items("python")
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(hits, ["B1"]);

        // A fresh call recomputes the same sequence.
        assert_eq!(catalog.search_items("python").count(), 1);
        assert_eq!(catalog.search_items("nothing-matches").count(), 0);
    }

    #[test]
    fn test_search_matches_author_and_code() {
        let mut catalog = Catalog::new();
        catalog
            .add_item(Item::new("B1", "Python Mastery", "Guido", "ISBN-0042", 1).unwrap())
            .unwrap();

        assert_eq!(catalog.search_items("GUIDO").count(), 1);
        assert_eq!(catalog.search_items("isbn-0042").count(), 1);
    }

    #[test]
    fn test_statistics_on_empty_catalog_are_all_zero() {
        let catalog = Catalog::new();
        assert_eq!(catalog.compute_statistics(), CatalogStats::default());
    }

    #[test]
    fn test_statistics_counts_availability_classes() {
        let mut catalog = Catalog::new();
        catalog.add_item(item("B1", "Python Mastery", 1)).unwrap();
        catalog.add_item(item("B2", "Web Development", 2)).unwrap();
        catalog.add_item(item("B3", "Databases", 1)).unwrap();
        catalog.register_patron(patron("P1", "Ada")).unwrap();

        catalog.lend("P1", "B1").unwrap();
        catalog.lend("P1", "B2").unwrap();

        let stats = catalog.compute_statistics();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_patrons, 1);
        // B3 untouched, B1 exhausted, B2 partially lent counts as neither.
        assert_eq!(stats.fully_available, 1);
        assert_eq!(stats.fully_loaned, 1);
    }
}
