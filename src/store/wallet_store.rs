use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::risk::BandCounts;

use super::record::WalletRecord;
use super::source;

/// In-memory index of scored wallets, loaded from the score file.
///
/// The file is read on first access (or on an explicit [`WalletStore::load`])
/// and shared as an immutable snapshot afterwards. The write lock doubles as
/// the load-once gate: concurrent first readers wait for a single load.
pub struct WalletStore {
    source: PathBuf,
    cache: RwLock<Option<Arc<Vec<WalletRecord>>>>,
}

impl WalletStore {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Read the score file and replace the cached collection.
    ///
    /// A missing or unreadable file yields an empty store; the condition is
    /// logged, not returned.
    pub fn load(&self) -> Arc<Vec<WalletRecord>> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let records = Arc::new(self.read_or_empty());
        *cache = Some(Arc::clone(&records));
        records
    }

    /// The cached collection, loading it first if nothing has been loaded yet.
    pub fn get_all(&self) -> Arc<Vec<WalletRecord>> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(records) = cache.as_ref() {
                return Arc::clone(records);
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded while we waited for the write lock
        if let Some(records) = cache.as_ref() {
            return Arc::clone(records);
        }
        let records = Arc::new(self.read_or_empty());
        *cache = Some(Arc::clone(&records));
        records
    }

    /// The `n` highest-scoring wallets, descending. Ties keep file order.
    pub fn get_top(&self, n: usize) -> Vec<WalletRecord> {
        let records = self.get_all();
        let mut ranked: Vec<&WalletRecord> = records.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        ranked.into_iter().take(n).cloned().collect()
    }

    /// Exact match on `wallet_id`. The first record wins if ids repeat.
    pub fn get_by_id(&self, wallet_id: &str) -> Option<WalletRecord> {
        self.get_all()
            .iter()
            .find(|w| w.wallet_id == wallet_id)
            .cloned()
    }

    /// Wallet counts per risk band.
    pub fn summary(&self) -> BandCounts {
        BandCounts::from_scores(self.get_all().iter().map(WalletRecord::score))
    }

    pub fn len(&self) -> usize {
        self.get_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_all().is_empty()
    }

    fn read_or_empty(&self) -> Vec<WalletRecord> {
        match source::read_records(&self.source) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    path = %self.source.display(),
                    error = %e,
                    "Wallet score source unavailable, serving an empty store"
                );
                Vec::new()
            }
        }
    }
}
