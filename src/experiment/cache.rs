use crate::pattern::encoder::EncoderOptions;
use crate::triangle::Raster;
use std::collections::HashMap;
use std::sync::Arc;

/// Key identifying a generated raster
///
/// Rasters are pure functions of these inputs, so entries never go stale.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RasterKey {
    /// Modulus
    pub modulus: u64,
    /// Row count
    pub rows: usize,
    /// Encoding applied to the residues
    pub encoder: EncoderOptions,
}

/// Memoization of rasters across runs of one session
#[derive(Default)]
pub struct TriangleCache {
    rasters: HashMap<RasterKey, Arc<Raster>>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl TriangleCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a cached raster or compute and store a new one
    ///
    /// Failed computations are not stored.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute_fn`
    pub fn get_or_try_insert<F, E>(&mut self, key: RasterKey, compute_fn: F) -> Result<Arc<Raster>, E>
    where
        F: FnOnce() -> Result<Raster, E>,
    {
        use std::collections::hash_map::Entry;

        match self.rasters.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                Ok(Arc::clone(entry.insert(Arc::new(compute_fn()?))))
            }
        }
    }

    /// Store a raster computed elsewhere, keeping any existing entry
    pub fn insert(&mut self, key: RasterKey, raster: Arc<Raster>) {
        self.rasters.entry(key).or_insert(raster);
    }

    /// Cached raster, if present
    pub fn get(&self, key: &RasterKey) -> Option<Arc<Raster>> {
        self.rasters.get(key).cloned()
    }

    /// Number of cached rasters
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}
