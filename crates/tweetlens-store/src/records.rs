//! Record storage keyed by auto-incrementing id.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use parking_lot::RwLock;
use rand::seq::IteratorRandom;
use tweetlens_core::Record;

use crate::StoreError;

#[derive(Debug)]
struct Inner {
    records: BTreeMap<i64, Record>,
    next_id: i64,
}

/// Thread-safe record table. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct TweetStore {
    inner: RwLock<Inner>,
}

impl Default for TweetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Allocate the next id and store the record `build` produces for it.
    ///
    /// The id is only consumed when `build` succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `build`.
    pub fn insert<F>(&self, build: F) -> Result<Record, StoreError>
    where
        F: FnOnce(i64) -> Result<Record, StoreError>,
    {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        let mut record = build(id)?;
        record.id = id;
        inner.next_id += 1;
        inner.records.insert(id, record.clone());
        Ok(record)
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<Record> {
        self.inner.read().records.get(&id).cloned()
    }

    /// Every record in ascending id order.
    #[must_use]
    pub fn all(&self) -> Vec<Record> {
        self.inner.read().records.values().cloned().collect()
    }

    /// Records for the given ids, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the first unknown id.
    pub fn get_many(&self, ids: &[i64]) -> Result<Vec<Record>, StoreError> {
        let inner = self.inner.read();
        ids.iter()
            .map(|id| {
                inner
                    .records
                    .get(id)
                    .cloned()
                    .ok_or(StoreError::NotFound(*id))
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// A uniformly random record, or `None` when the store is empty.
    #[must_use]
    pub fn random(&self) -> Option<Record> {
        let inner = self.inner.read();
        inner.records.values().choose(&mut rand::rng()).cloned()
    }

    /// Records whose id lies in `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] when `start > end` or `start < 1`.
    pub fn range_by_id(&self, start: i64, end: i64) -> Result<Vec<Record>, StoreError> {
        if start < 1 {
            return Err(StoreError::InvalidQuery(format!(
                "start_id must be at least 1, got {start}"
            )));
        }
        if start > end {
            return Err(StoreError::InvalidQuery(format!(
                "start_id {start} is after end_id {end}"
            )));
        }
        Ok(self
            .inner
            .read()
            .records
            .range(start..=end)
            .map(|(_, r)| r.clone())
            .collect())
    }

    /// Records created on any UTC day in `start..=end`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] when `start > end`.
    pub fn filter_by_date(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Record>, StoreError> {
        if start > end {
            return Err(StoreError::InvalidQuery(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        let mut hits: Vec<Record> = self
            .inner
            .read()
            .records
            .values()
            .filter(|r| {
                let day = r.created_at.date_naive();
                day >= start && day <= end
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(hits)
    }

    /// Records whose cleaned text contains `keyword`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for a blank keyword.
    pub fn search_keyword(&self, keyword: &str) -> Result<Vec<Record>, StoreError> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Err(StoreError::InvalidQuery("keyword must not be blank".to_string()));
        }
        Ok(self
            .inner
            .read()
            .records
            .values()
            .filter(|r| r.cleaned_text.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    /// Apply `change` to a copy of record `id` and store it if `change` succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or the error
    /// returned by `change`.
    pub fn update<F>(&self, id: i64, change: F) -> Result<Record, StoreError>
    where
        F: FnOnce(&mut Record) -> Result<(), StoreError>,
    {
        let mut inner = self.inner.write();
        let stored = inner.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let mut updated = stored.clone();
        change(&mut updated)?;
        updated.id = id;
        *stored = updated.clone();
        Ok(updated)
    }

    /// Remove record `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&self, id: i64) -> Result<Record, StoreError> {
        self.inner
            .write()
            .records
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Parse a `YYYYMMDD` date.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDate`] unless `value` is exactly eight digits
/// forming a real calendar date.
pub fn parse_compact_date(value: &str) -> Result<NaiveDate, StoreError> {
    let invalid = || StoreError::InvalidDate {
        value: value.to_string(),
    };
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| invalid())
}
