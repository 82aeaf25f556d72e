use crate::utils::error::{LmsError, Result};

/// A catalog entry with a finite number of lendable copies.
///
/// `available` is private on purpose: only the [`Catalog`](crate::Catalog)
/// moves copies in and out, so `0 <= available <= capacity` holds at all
/// times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub author: String,
    pub code: String,
    pub capacity: u32,
    available: u32,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        code: impl Into<String>,
        capacity: u32,
    ) -> Result<Self> {
        let id = id.into();
        let title = title.into();

        if id.trim().is_empty() {
            return Err(LmsError::ValidationError {
                message: "item id cannot be empty".to_string(),
            });
        }
        if title.trim().is_empty() {
            return Err(LmsError::ValidationError {
                message: format!("item {} title cannot be empty", id),
            });
        }
        if capacity == 0 {
            return Err(LmsError::ValidationError {
                message: format!("item {} capacity must be at least 1", id),
            });
        }

        Ok(Self {
            id,
            title,
            author: author.into(),
            code: code.into(),
            capacity,
            available: capacity,
        })
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn is_fully_available(&self) -> bool {
        self.available == self.capacity
    }

    /// Number of copies currently out on loan.
    pub fn on_loan(&self) -> u32 {
        self.capacity - self.available
    }

    pub(crate) fn decrement_availability(&mut self) -> Result<()> {
        if self.available == 0 {
            return Err(LmsError::CapacityError {
                id: self.id.clone(),
            });
        }
        self.available -= 1;
        Ok(())
    }

    pub(crate) fn increment_availability(&mut self) -> Result<()> {
        if self.available == self.capacity {
            return Err(LmsError::OverReturnError {
                id: self.id.clone(),
            });
        }
        self.available += 1;
        Ok(())
    }

    /// Rebuilds an item from persisted fields. The storage adapter validates
    /// the fields before calling this.
    pub(crate) fn restore(
        id: String,
        title: String,
        author: String,
        code: String,
        capacity: u32,
        available: u32,
    ) -> Self {
        Self {
            id,
            title,
            author,
            code,
            capacity,
            available,
        }
    }
}

/// A registered borrower. Holdings stay in the order the loans were made and
/// never contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patron {
    pub id: String,
    pub name: String,
    pub contact: String,
    holdings: Vec<String>,
}

impl Patron {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(LmsError::ValidationError {
                message: "patron id cannot be empty".to_string(),
            });
        }
        if name.trim().is_empty() {
            return Err(LmsError::ValidationError {
                message: format!("patron {} name cannot be empty", id),
            });
        }

        Ok(Self {
            id,
            name,
            contact: contact.into(),
            holdings: Vec::new(),
        })
    }

    pub fn holdings(&self) -> &[String] {
        &self.holdings
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.holdings.iter().any(|held| held == item_id)
    }

    /// Adds `item_id` to the holdings. Returns false (and leaves the holdings
    /// alone) if it is already present.
    pub(crate) fn take(&mut self, item_id: &str) -> bool {
        if self.holds(item_id) {
            return false;
        }
        self.holdings.push(item_id.to_string());
        true
    }

    /// Removes `item_id` from the holdings. Returns false if it was not held.
    pub(crate) fn release(&mut self, item_id: &str) -> bool {
        match self.holdings.iter().position(|held| held == item_id) {
            Some(index) => {
                self.holdings.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn restore(id: String, name: String, contact: String, holdings: Vec<String>) -> Self {
        Self {
            id,
            name,
            contact,
            holdings,
        }
    }
}

/// Aggregate counts produced by [`Catalog::compute_statistics`](crate::Catalog::compute_statistics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_items: usize,
    pub total_patrons: usize,
    pub fully_available: usize,
    pub fully_loaned: usize,
}
