use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

pub const ENV_THREADS: &str = "GRAPH_PATHS_THREADS";
pub const ENV_SEED: &str = "GRAPH_PATHS_SEED";
pub const ENV_CUTOFF_HOPS: &str = "GRAPH_PATHS_CUTOFF_HOPS";

/// Upper bound accepted for `centrality_threads`.
pub const MAX_CENTRALITY_THREADS: usize = 1024;

/// Engine-wide knobs. Every field has a default, so a partial JSON document
/// (or an empty environment) yields a usable configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads for centrality. 0 = rayon's default (one per CPU).
    pub centrality_threads: usize,
    /// Seed for randomized edge selection and predecessor shuffling.
    /// `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Hop cutoff applied to simple-path iterators built `with_config`.
    pub default_cutoff_hops: Option<usize>,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `GRAPH_PATHS_THREADS`, `GRAPH_PATHS_SEED` and
    /// `GRAPH_PATHS_CUTOFF_HOPS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();
        if let Some(threads) = parse_var::<_, usize>(&lookup, ENV_THREADS)? {
            config.centrality_threads = threads;
        }
        config.seed = parse_var(&lookup, ENV_SEED)?;
        config.default_cutoff_hops = parse_var(&lookup, ENV_CUTOFF_HOPS)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.centrality_threads > MAX_CENTRALITY_THREADS {
            return Err(GraphError::InvalidConfig(format!(
                "centrality_threads must be at most {}, got {}",
                MAX_CENTRALITY_THREADS, self.centrality_threads
            )));
        }
        Ok(())
    }

    /// Random source for one query: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Dedicated pool sized by `centrality_threads`. `None` when the count
    /// is 0: callers run on rayon's global pool.
    pub fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.validate()?;
        if self.centrality_threads == 0 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.centrality_threads)
            .thread_name(|i| format!("graph-paths-{}", i))
            .build()
            .map(Some)
            .map_err(|e| GraphError::ThreadPool(e.to_string()))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| GraphError::InvalidConfig(format!("{}={:?}: {}", key, raw, e)))
}
