//! Dataset catalog: the single entry point for dashboard data
//!
//! A lookup goes cache first; on a miss the endpoint is fetched, normalized and
//! stored. The cache lock is held for the whole miss, so two callers asking for
//! the same dataset at once cause one fetch, not two.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::Mutex;

use super::client::{DataError, OrdsClient, PageRequest, RecordSource};
use super::{normalize, Dataset, DatasetKind};
use crate::cache::TtlCache;

/// Cached, normalized access to every dataset of the API
pub struct Catalog<S = OrdsClient> {
    source: S,
    cache: Mutex<TtlCache<Dataset>>,
    page: PageRequest,
}

impl<S: RecordSource> Catalog<S> {
    /// Create a catalog over `source`
    ///
    /// # Arguments
    /// * `source` - Where raw records come from
    /// * `page` - Page size and record cap applied to every endpoint
    /// * `cache_timeout` - How long a fetched dataset stays fresh
    pub fn new(source: S, page: PageRequest, cache_timeout: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(TtlCache::new(cache_timeout)),
            page,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the dataset for `kind`, fetching it when the cache has no fresh copy
    ///
    /// # Returns
    /// * `Ok(Dataset)` - Possibly empty when the endpoint has no usable rows
    /// * `Err(DataError)` - The fetch failed; nothing was cached
    pub async fn fetch(&self, kind: DatasetKind) -> Result<Dataset, DataError> {
        let key = kind.cache_key();
        let mut cache = self.cache.lock().await;

        if let Some(dataset) = cache.get(&key) {
            tracing::debug!(dataset = %kind, rows = dataset.len(), "Cache hit");
            return Ok(dataset.clone());
        }

        tracing::debug!(dataset = %kind, "Cache miss");
        let records = match self.source.fetch_endpoint(kind.endpoint(), self.page).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    dataset = %kind,
                    partial = err.partial.len(),
                    error = %err.cause,
                    "Dataset fetch failed"
                );
                return Err(err.cause);
            }
        };

        if records.is_empty() {
            tracing::warn!(dataset = %kind, "Endpoint returned no records");
        }

        let dataset = normalize(kind, &records);
        cache.put(key, dataset.clone());
        Ok(dataset)
    }

    pub async fn fetch_weight_stay(&self) -> Result<Dataset, DataError> {
        self.fetch(DatasetKind::WeightStay).await
    }

    pub async fn fetch_diagnoses(&self) -> Result<Dataset, DataError> {
        self.fetch(DatasetKind::Diagnoses).await
    }

    pub async fn fetch_diagnosis_sex(&self) -> Result<Dataset, DataError> {
        self.fetch(DatasetKind::DiagnosisSex).await
    }

    pub async fn fetch_severity_mortality(&self) -> Result<Dataset, DataError> {
        self.fetch(DatasetKind::SeverityMortality).await
    }

    /// Fetches all four datasets in turn; one failing does not stop the others
    pub async fn fetch_all(&self) -> DatasetBundle {
        let mut results = BTreeMap::new();
        for kind in DatasetKind::ALL {
            results.insert(kind, self.fetch(kind).await);
        }

        let bundle = DatasetBundle { results };
        let failed = bundle.failures().len();
        if failed > 0 {
            tracing::warn!(failed, "Some datasets could not be loaded");
        } else {
            tracing::info!("All datasets loaded");
        }
        bundle
    }

    /// Drops one cached dataset, or all of them with `None`
    pub async fn invalidate(&self, kind: Option<DatasetKind>) {
        let key = kind.map(DatasetKind::cache_key);
        self.cache.lock().await.invalidate(key.as_deref());
        tracing::info!(dataset = ?kind.map(DatasetKind::name), "Cache invalidated");
    }
}

/// The four per-dataset results of one [`Catalog::fetch_all`]
#[derive(Debug)]
pub struct DatasetBundle {
    results: BTreeMap<DatasetKind, Result<Dataset, DataError>>,
}

impl DatasetBundle {
    /// Builds a bundle from explicit results; kinds left out count as empty
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (DatasetKind, Result<Dataset, DataError>)>,
    {
        Self {
            results: results.into_iter().collect(),
        }
    }

    /// The dataset for `kind`, or an empty one when it failed to load
    pub fn get(&self, kind: DatasetKind) -> Dataset {
        match self.results.get(&kind) {
            Some(Ok(dataset)) => dataset.clone(),
            _ => Dataset::empty(kind),
        }
    }

    /// Why `kind` failed to load, if it did
    pub fn error(&self, kind: DatasetKind) -> Option<&DataError> {
        match self.results.get(&kind) {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    /// Kinds that failed to load, in tag order
    pub fn failures(&self) -> Vec<DatasetKind> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// True when every dataset failed
    pub fn all_failed(&self) -> bool {
        DatasetKind::ALL
            .iter()
            .all(|kind| self.error(*kind).is_some())
    }
}

impl Default for DatasetBundle {
    fn default() -> Self {
        Self::from_results([])
    }
}
