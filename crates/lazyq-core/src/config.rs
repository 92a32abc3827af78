//! Query configuration that downstream crates can serialize/deserialize.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// When stateful adapters (order-by, group, join) evaluate their predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Materialization {
    /// Build the heap/table/index the first time a position needs it.
    #[default]
    OnFirstUse,
    /// Build it while the adapter is being constructed.
    AtConstruction,
}

impl Materialization {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" | "on-first-use" | "on_first_use" => Ok(Materialization::OnFirstUse),
            "eager" | "at-construction" | "at_construction" => {
                Ok(Materialization::AtConstruction)
            }
            other => Err(Error::Config(format!("unknown materialization '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Materialization policy for order-by, group, and join.
    pub materialization: Materialization,

    /// Initial capacity for group/join hash indices. `None` lets the map grow.
    pub index_capacity_hint: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            materialization: Materialization::OnFirstUse,
            index_capacity_hint: None,
        }
    }
}

static CURRENT: Lazy<QueryConfig> = Lazy::new(QueryConfig::from_env);

impl QueryConfig {
    /// Process-wide configuration, read from the environment on first access.
    pub fn current() -> &'static QueryConfig {
        &CURRENT
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYQ_MATERIALIZATION`: `lazy` / `on-first-use` or `eager` / `at-construction`
    /// - `LAZYQ_INDEX_CAPACITY_HINT`: initial group/join index capacity
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYQ_MATERIALIZATION") {
            if let Ok(m) = Materialization::parse(&s) {
                cfg.materialization = m;
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_INDEX_CAPACITY_HINT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.index_capacity_hint = Some(v);
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_materialization(mut self, materialization: Materialization) -> Self {
        self.materialization = materialization;
        self
    }

    pub fn is_eager(&self) -> bool {
        self.materialization == Materialization::AtConstruction
    }
}
