//! Identifier generation and the phase id convention.
//!
//! Engines never mint ids from ambient state. Anything that needs a fresh
//! id takes an [`IdGenerator`] argument so callers (and tests) decide how
//! ids look.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::PERSISTED_PHASE_PREFIX;

/// Source of fresh opaque ids.
pub trait IdGenerator {
    /// Return a new id. `prefix` names the kind of record (`"bye"`, `"phase"`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Deterministic generator producing `prefix-1`, `prefix-2`, ...
///
/// The counter is shared across prefixes so every id it hands out is unique.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `last`, e.g. to continue a persisted sequence.
    pub fn starting_after(last: u64) -> Self {
        Self { next: last }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

/// Random v4 UUID generator for production callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4())
    }
}

/// Errors parsing a phase id
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("phase id is empty")]
    Empty,

    #[error("invalid persisted phase id: {0}")]
    InvalidPersisted(String),
}

/// Identity of a tournament phase.
///
/// Phases written to storage are addressed as `db-<numericId>`; phases the
/// engine just created carry a generated opaque id until the adapter layer
/// persists them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhaseId {
    Persisted(i64),
    Generated(String),
}

impl PhaseId {
    /// Mint a new, not yet persisted phase id.
    pub fn generate(ids: &mut dyn IdGenerator) -> Self {
        PhaseId::Generated(ids.next_id("phase"))
    }

    /// Storage-native key, if this phase has been persisted.
    pub fn storage_key(&self) -> Option<i64> {
        match self {
            PhaseId::Persisted(key) => Some(*key),
            PhaseId::Generated(_) => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, PhaseId::Persisted(_))
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseId::Persisted(key) => write!(f, "{PERSISTED_PHASE_PREFIX}{key}"),
            PhaseId::Generated(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for PhaseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        match s.strip_prefix(PERSISTED_PHASE_PREFIX) {
            Some(key) => key
                .parse::<i64>()
                .map(PhaseId::Persisted)
                .map_err(|_| IdError::InvalidPersisted(s.to_string())),
            None => Ok(PhaseId::Generated(s.to_string())),
        }
    }
}

impl TryFrom<String> for PhaseId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhaseId> for String {
    fn from(id: PhaseId) -> Self {
        id.to_string()
    }
}
