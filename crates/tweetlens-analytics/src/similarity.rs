//! In-memory nearest-neighbour index over record vectors.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::vectorizer::Vector;

/// One ranked hit from a similarity query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarRecord {
    pub id: i64,
    /// Cosine similarity; `0.0` when either vector carries no signal.
    pub similarity: f32,
}

/// Maps record ids to vectors behind a single readers-writer lock.
///
/// Writers replace whole vectors, so a query never observes a partial one.
/// Queries are a linear scan over every stored vector.
#[derive(Debug)]
pub struct SimilarityIndex {
    dimensions: usize,
    entries: RwLock<BTreeMap<i64, Vector>>,
}

impl SimilarityIndex {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert or replace the vector stored for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the vector length does
    /// not match the index dimensions.
    pub fn upsert(&self, id: i64, vector: Vector) -> Result<(), AnalyticsError> {
        self.check_dimensions(&vector)?;
        self.entries.write().insert(id, vector);
        Ok(())
    }

    /// Drop the vector for `id`. Returns whether one was stored.
    pub fn remove(&self, id: i64) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Replace the whole index in one write.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if any vector has the wrong
    /// length; the index is left untouched in that case.
    pub fn rebuild<I>(&self, entries: I) -> Result<(), AnalyticsError>
    where
        I: IntoIterator<Item = (i64, Vector)>,
    {
        let mut fresh = BTreeMap::new();
        for (id, vector) in entries {
            self.check_dimensions(&vector)?;
            fresh.insert(id, vector);
        }
        *self.entries.write() = fresh;
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.entries.read().contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of the vector stored for `id`.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<Vector> {
        self.entries.read().get(&id).cloned()
    }

    /// Top `n` stored records by descending similarity to `vector`.
    ///
    /// Ties are broken by ascending id. Returns fewer than `n` hits when the
    /// index holds fewer records.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n` is zero.
    pub fn query(&self, vector: &Vector, n: usize) -> Result<Vec<SimilarRecord>, AnalyticsError> {
        check_n(n)?;
        let entries = self.entries.read();
        Ok(rank(&entries, vector, n, None))
    }

    /// Top `n` records most similar to the stored record `id`, excluding `id`.
    ///
    /// The stored vector and the scan are read under the same lock.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n` is zero and
    /// [`AnalyticsError::NotFound`] when `id` is not indexed.
    pub fn query_by_id(&self, id: i64, n: usize) -> Result<Vec<SimilarRecord>, AnalyticsError> {
        check_n(n)?;
        let entries = self.entries.read();
        let vector = entries.get(&id).ok_or(AnalyticsError::NotFound(id))?;
        Ok(rank(&entries, vector, n, Some(id)))
    }

    fn check_dimensions(&self, vector: &Vector) -> Result<(), AnalyticsError> {
        if vector.len() == self.dimensions {
            Ok(())
        } else {
            Err(AnalyticsError::InvalidArgument(format!(
                "vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )))
        }
    }
}

fn check_n(n: usize) -> Result<(), AnalyticsError> {
    if n == 0 {
        return Err(AnalyticsError::InvalidArgument(
            "n must be positive".to_string(),
        ));
    }
    Ok(())
}

fn rank(
    entries: &BTreeMap<i64, Vector>,
    query: &Vector,
    n: usize,
    exclude: Option<i64>,
) -> Vec<SimilarRecord> {
    let mut hits: Vec<SimilarRecord> = entries
        .iter()
        .filter(|(id, _)| Some(**id) != exclude)
        .map(|(id, v)| SimilarRecord {
            id: *id,
            similarity: query.cosine_similarity(v),
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    hits.truncate(n);
    hits
}
