use crate::core::catalog::Catalog;
use crate::domain::model::{Item, Patron};
use crate::domain::ports::CatalogStore;
use crate::utils::error::{LmsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk form of an item. Kept separate from the domain type so loading
/// goes through explicit validation instead of trusting the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemRecord {
    id: String,
    title: String,
    author: String,
    code: String,
    capacity: u32,
    available: u32,
}

impl ItemRecord {
    fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            author: item.author.clone(),
            code: item.code.clone(),
            capacity: item.capacity,
            available: item.available(),
        }
    }

    fn into_item(self) -> Result<Item> {
        if self.id.trim().is_empty() {
            return Err(LmsError::CorruptDataError {
                context: "items".to_string(),
                reason: "empty item id".to_string(),
            });
        }
        if self.capacity == 0 {
            return Err(LmsError::CorruptDataError {
                context: "items".to_string(),
                reason: format!("item {} has zero capacity", self.id),
            });
        }
        if self.available > self.capacity {
            return Err(LmsError::CorruptDataError {
                context: "items".to_string(),
                reason: format!(
                    "item {} has {} available but capacity {}",
                    self.id, self.available, self.capacity
                ),
            });
        }
        Ok(Item::restore(
            self.id,
            self.title,
            self.author,
            self.code,
            self.capacity,
            self.available,
        ))
    }
}

/// On-disk form of a patron; holdings keep their stored order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PatronRecord {
    id: String,
    name: String,
    contact: String,
    holdings: Vec<String>,
}

impl PatronRecord {
    fn from_patron(patron: &Patron) -> Self {
        Self {
            id: patron.id.clone(),
            name: patron.name.clone(),
            contact: patron.contact.clone(),
            holdings: patron.holdings().to_vec(),
        }
    }

    fn into_patron(self) -> Result<Patron> {
        if self.id.trim().is_empty() {
            return Err(LmsError::CorruptDataError {
                context: "patrons".to_string(),
                reason: "empty patron id".to_string(),
            });
        }
        for (index, item_id) in self.holdings.iter().enumerate() {
            if self.holdings[..index].contains(item_id) {
                return Err(LmsError::CorruptDataError {
                    context: "patrons".to_string(),
                    reason: format!("patron {} holds {} twice", self.id, item_id),
                });
            }
        }
        Ok(Patron::restore(
            self.id,
            self.name,
            self.contact,
            self.holdings,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    items: Vec<ItemRecord>,
    patrons: Vec<PatronRecord>,
}

/// Stores the catalog as a single JSON document with `items` and `patrons`
/// collections, sorted by id for stable output.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl CatalogStore for JsonFileStore {
    fn save(&self, catalog: &Catalog, target: &Path) -> Result<()> {
        let mut items: Vec<ItemRecord> = catalog.items().map(ItemRecord::from_item).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));

        let mut patrons: Vec<PatronRecord> =
            catalog.patrons().map(PatronRecord::from_patron).collect();
        patrons.sort_by(|a, b| a.id.cmp(&b.id));

        let file = CatalogFile { items, patrons };
        let payload = if self.pretty {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_json::to_string(&file)?
        };

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(target, payload)?;

        tracing::debug!(
            "Saved {} item(s) and {} patron(s) to {}",
            file.items.len(),
            file.patrons.len(),
            target.display()
        );
        Ok(())
    }

    fn load(&self, target: &Path, catalog: &mut Catalog) -> Result<()> {
        if !target.exists() {
            tracing::debug!("No catalog file at {}, keeping current state", target.display());
            return Ok(());
        }

        let content = fs::read_to_string(target)?;
        let file: CatalogFile = serde_json::from_str(&content)?;

        let mut items: HashMap<String, Item> = HashMap::with_capacity(file.items.len());
        for record in file.items {
            let item = record.into_item()?;
            let id = item.id.clone();
            if items.insert(id.clone(), item).is_some() {
                return Err(LmsError::CorruptDataError {
                    context: "items".to_string(),
                    reason: format!("duplicate item id {}", id),
                });
            }
        }

        let mut patrons: HashMap<String, Patron> = HashMap::with_capacity(file.patrons.len());
        for record in file.patrons {
            let patron = record.into_patron()?;
            let id = patron.id.clone();
            if patrons.insert(id.clone(), patron).is_some() {
                return Err(LmsError::CorruptDataError {
                    context: "patrons".to_string(),
                    reason: format!("duplicate patron id {}", id),
                });
            }
        }

        // Holdings must reference known items, and per item the holder count
        // must reconcile with capacity - available.
        let mut holder_counts: HashMap<String, u32> = HashMap::new();
        for patron in patrons.values() {
            for item_id in patron.holdings() {
                if !items.contains_key(item_id) {
                    return Err(LmsError::CorruptDataError {
                        context: "patrons".to_string(),
                        reason: format!("patron {} holds unknown item {}", patron.id, item_id),
                    });
                }
                *holder_counts.entry(item_id.clone()).or_insert(0) += 1;
            }
        }
        for item in items.values() {
            let held = holder_counts.get(item.id.as_str()).copied().unwrap_or(0);
            if held != item.on_loan() {
                return Err(LmsError::CorruptDataError {
                    context: "items".to_string(),
                    reason: format!(
                        "item {} has {} holder(s) but {} on loan",
                        item.id,
                        held,
                        item.on_loan()
                    ),
                });
            }
        }

        tracing::debug!(
            "Loaded {} item(s) and {} patron(s) from {}",
            items.len(),
            patrons.len(),
            target.display()
        );
        catalog.replace_collections(items, patrons);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_record_rejects_available_above_capacity() {
        let record = ItemRecord {
            id: "B1".to_string(),
            title: "Python Mastery".to_string(),
            author: "Guido".to_string(),
            code: "ISBN-1".to_string(),
            capacity: 2,
            available: 3,
        };
        assert!(matches!(
            record.into_item(),
            Err(LmsError::CorruptDataError { .. })
        ));
    }

    #[test]
    fn test_item_record_rejects_zero_capacity() {
        let record = ItemRecord {
            id: "B1".to_string(),
            title: "Python Mastery".to_string(),
            author: "Guido".to_string(),
            code: "ISBN-1".to_string(),
            capacity: 0,
            available: 0,
        };
        assert!(matches!(
            record.into_item(),
            Err(LmsError::CorruptDataError { .. })
        ));
    }

    #[test]
    fn test_patron_record_rejects_duplicate_holdings() {
        let record = PatronRecord {
            id: "P1".to_string(),
            name: "Ada".to_string(),
            contact: "ada@example.com".to_string(),
            holdings: vec!["B1".to_string(), "B2".to_string(), "B1".to_string()],
        };
        assert!(matches!(
            record.into_patron(),
            Err(LmsError::CorruptDataError { .. })
        ));
    }

    #[test]
    fn test_records_preserve_fields() {
        let item = Item::new("B1", "Python Mastery", "Guido", "ISBN-1", 3).unwrap();
        let restored = ItemRecord::from_item(&item).into_item().unwrap();
        assert_eq!(restored, item);

        let patron = Patron::new("P1", "Ada", "ada@example.com").unwrap();
        let restored = PatronRecord::from_patron(&patron).into_patron().unwrap();
        assert_eq!(restored, patron);
    }
}
