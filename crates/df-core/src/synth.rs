//! Level synthesis orchestration.
//!
//! The top-level entry point: picks a candidate strategy (external
//! provider or procedural fallback), heals the candidate, memoizes the
//! finished level by generation key, and notifies observers. Dungeon
//! generation must never block the caller's flow, so every failure short
//! of a malformed key is absorbed into a (possibly degraded) result.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_CACHE_CAPACITY;
use crate::error::GenerationError;
use crate::generation::{GenConstraints, ProcGen};
use crate::grid::LevelResult;
use crate::heal::Healer;
use crate::provider::{CandidateProvider, CandidateRequest};
use crate::rng::GenRng;

/// Identifies a cacheable, reproducible generation request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationKey {
    pub level_type: String,
    pub depth: i32,
    pub seed: u64,
}

impl GenerationKey {
    /// Validate raw caller inputs, deriving a seed when none was given
    ///
    /// The derived seed hashes (level_type, depth), so repeated seedless
    /// calls land on the same cache slot.
    pub fn new(
        level_type: &str,
        depth: i32,
        seed: Option<u64>,
    ) -> Result<Self, GenerationError> {
        let level_type = level_type.trim();
        if level_type.is_empty() {
            return Err(GenerationError::InvalidKey("level type is empty".into()));
        }
        if depth < 1 {
            return Err(GenerationError::InvalidKey(format!(
                "depth must be positive, got {depth}"
            )));
        }
        let seed = seed.unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            level_type.hash(&mut hasher);
            depth.hash(&mut hasher);
            hasher.finish()
        });
        Ok(Self {
            level_type: level_type.to_string(),
            depth,
            seed,
        })
    }
}

/// Bounded, insert-once cache of finished levels
///
/// Oldest-inserted entries are evicted first when the cache exceeds its
/// capacity. Entries are immutable once inserted; lookups hand out shared
/// references, never mutable aliases.
#[derive(Debug, Default)]
pub struct LevelCache {
    capacity: usize,
    entries: HashMap<GenerationKey, Arc<LevelResult>>,
    order: VecDeque<GenerationKey>,
}

impl LevelCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &GenerationKey) -> Option<Arc<LevelResult>> {
        self.entries.get(key).cloned()
    }

    /// Insert a finished level, evicting the oldest entry at capacity
    pub fn insert(&mut self, key: GenerationKey, level: Arc<LevelResult>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.contains_key(&key) {
            // Slots are written exactly once.
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, level);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &GenerationKey) -> bool {
        self.entries.contains_key(key)
    }
}

/// Observer of finished levels; fire-and-forget, no acknowledgment
pub type LevelObserver = Box<dyn Fn(&LevelResult) + Send>;

/// Top-level level synthesis entry point
///
/// Owns the cache, failure fallback policy, and observer list; composed
/// by whoever assembles the application rather than living behind a
/// global.
pub struct LevelSynthesizer {
    constraints: GenConstraints,
    healer: Healer,
    generator: ProcGen,
    provider: Option<Box<dyn CandidateProvider>>,
    cache: LevelCache,
    observers: Vec<LevelObserver>,
}

impl LevelSynthesizer {
    pub fn new(constraints: GenConstraints) -> Self {
        Self {
            generator: ProcGen::new(constraints.clone()),
            constraints,
            healer: Healer::default(),
            provider: None,
            cache: LevelCache::new(DEFAULT_CACHE_CAPACITY),
            observers: Vec::new(),
        }
    }

    /// Use an external candidate provider before the procedural fallback
    pub fn with_provider(mut self, provider: Box<dyn CandidateProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the default cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = LevelCache::new(capacity);
        self
    }

    /// Override the default healer configuration
    pub fn with_healer(mut self, healer: Healer) -> Self {
        self.healer = healer;
        self
    }

    /// Register an observer for finished levels
    ///
    /// Each observer sees at most one notification per successful
    /// generation; cache hits do not re-notify.
    pub fn subscribe(&mut self, observer: LevelObserver) {
        self.observers.push(observer);
    }

    pub fn cache(&self) -> &LevelCache {
        &self.cache
    }

    /// Generate (or fetch from cache) a guaranteed-playable level
    ///
    /// Only a malformed key fails the call. Provider failures fall back
    /// to the procedural generator; incomplete healing is logged and the
    /// best-effort level returned anyway.
    pub fn generate(
        &mut self,
        level_type: &str,
        depth: i32,
        seed: Option<u64>,
    ) -> Result<Arc<LevelResult>, GenerationError> {
        let key = GenerationKey::new(level_type, depth, seed)?;

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let mut result = self
            .request_candidate(&key)
            .unwrap_or_else(|| self.generator.generate(&mut GenRng::new(key.seed)));

        let report = self.healer.heal(&mut result.grid);
        if !report.complete {
            log::warn!(
                "healing incomplete for {}:{} (seed {}): returning best-effort level",
                key.level_type,
                key.depth,
                key.seed
            );
        }

        let level = Arc::new(result);
        self.cache.insert(key, Arc::clone(&level));
        for observer in &self.observers {
            observer(&level);
        }
        Ok(level)
    }

    /// Ask the external provider for a candidate, if one is configured
    ///
    /// Any provider error is logged and converted into "no candidate";
    /// it never reaches the caller.
    fn request_candidate(&mut self, key: &GenerationKey) -> Option<LevelResult> {
        let provider = self.provider.as_mut()?;
        let request = CandidateRequest {
            theme: key.level_type.clone(),
            depth: key.depth,
            constraints: self.constraints.clone(),
        };
        match provider.propose(&request) {
            Ok(candidate) => Some(candidate.into()),
            Err(err) => {
                log::warn!(
                    "candidate provider failed for {}:{}, using procedural fallback: {err}",
                    key.level_type,
                    key.depth
                );
                None
            }
        }
    }
}
