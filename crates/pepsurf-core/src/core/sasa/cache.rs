use crate::core::models::residue::Residue;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_CAPACITY: usize = 64;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    areas: Vec<f64>,
    inserted_at: Instant,
}

/// Caller-owned memo of complete oracle results.
///
/// Keys are fingerprints of (oracle name, residue set). Only batches where
/// every residue succeeded are stored. Eviction is oldest-first once
/// `capacity` is reached; entries older than `ttl` are treated as absent.
#[derive(Debug, Clone)]
pub struct SasaCache {
    entries: HashMap<u64, CacheEntry>,
    order: VecDeque<u64>,
    capacity: usize,
    ttl: Duration,
}

impl SasaCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn fingerprint(oracle_name: &str, residues: &[Residue]) -> u64 {
        let mut hasher = DefaultHasher::new();
        oracle_name.hash(&mut hasher);
        residues.len().hash(&mut hasher);
        for residue in residues {
            residue.code().hash(&mut hasher);
            residue.chain_id().hash(&mut hasher);
            residue.seq_index().hash(&mut hasher);
            for point in [residue.backbone(), residue.centroid()] {
                match point {
                    Some(p) => {
                        1u8.hash(&mut hasher);
                        for c in p.coords.iter() {
                            c.to_bits().hash(&mut hasher);
                        }
                    }
                    None => 0u8.hash(&mut hasher),
                }
            }
        }
        hasher.finish()
    }

    pub fn get(&mut self, key: u64) -> Option<Vec<f64>> {
        let expired = match self.entries.get(&key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.remove(key);
            return None;
        }
        self.entries.get(&key).map(|e| e.areas.clone())
    }

    pub fn insert(&mut self, key: u64, areas: Vec<f64>) {
        if self.entries.contains_key(&key) {
            self.remove(key);
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                areas,
                inserted_at: Instant::now(),
            },
        );
        self.order.push_back(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn remove(&mut self, key: u64) {
        self.entries.remove(&key);
        self.order.retain(|&k| k != key);
    }
}

impl Default for SasaCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}
