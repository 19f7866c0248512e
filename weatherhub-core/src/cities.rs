use std::cell::RefCell;

use crate::error::CoreError;
use crate::signal::Signal;

/// One selectable entry: a display name plus a stable lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub name: String,
    pub key: String,
}

/// Inclusive index range carried by insertion notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub first: usize,
    pub last: usize,
}

/// Ordered, append-only list of selectable cities, addressed by a stable
/// 0-based index for the lifetime of the process.
///
/// Structural mutation is bracketed: `rows_about_to_be_inserted` fires with
/// the range computed before the push, the push happens, then
/// `rows_inserted` fires with the same range. A consuming view can
/// therefore pre-allocate a row before the data exists there, or lazily
/// re-query the count on either side of the mutation.
#[derive(Debug, Default)]
pub struct CityList {
    entries: RefCell<Vec<CityEntry>>,
    rows_about_to_be_inserted: Signal<RowRange>,
    rows_inserted: Signal<RowRange>,
}

impl CityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed seed list the application ships with.
    pub fn with_default_cities() -> Self {
        let list = Self::new();
        for name in [
            "beijing", "shanghai", "guangzhou", "shenzhen", "hangzhou", "nanjing", "wuhan",
            "chengdu", "xian", "chongqing",
        ] {
            list.add(name, None);
        }
        list
    }

    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Strict accessor; out-of-range indices are an error.
    pub fn at(&self, index: usize) -> Result<CityEntry, CoreError> {
        let entries = self.entries.borrow();
        entries
            .get(index)
            .cloned()
            .ok_or(CoreError::OutOfRange { index, len: entries.len() })
    }

    /// Appends an entry; `key` defaults to `name` when absent.
    pub fn add(&self, name: impl Into<String>, key: Option<String>) {
        let name = name.into();
        let key = key.unwrap_or_else(|| name.clone());

        let position = self.entries.borrow().len();
        let range = RowRange { first: position, last: position };

        self.rows_about_to_be_inserted.emit(&range);
        self.entries.borrow_mut().push(CityEntry { name, key });
        self.rows_inserted.emit(&range);
    }

    /// Lenient accessor backing optional view lookups: out of range yields
    /// an empty string, because "nothing selected" is a normal state there.
    pub fn name_at(&self, index: usize) -> String {
        self.entries.borrow().get(index).map(|e| e.name.clone()).unwrap_or_default()
    }

    /// Lenient key accessor; see [`CityList::name_at`].
    pub fn key_at(&self, index: usize) -> String {
        self.entries.borrow().get(index).map(|e| e.key.clone()).unwrap_or_default()
    }

    /// All display names in index order.
    pub fn names(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|e| e.name.clone()).collect()
    }

    /// Fires before each insertion, with the range the insertion will occupy.
    pub fn rows_about_to_be_inserted(&self) -> &Signal<RowRange> {
        &self.rows_about_to_be_inserted
    }

    /// Fires after each insertion, with the range it now occupies.
    pub fn rows_inserted(&self) -> &Signal<RowRange> {
        &self.rows_inserted
    }
}
