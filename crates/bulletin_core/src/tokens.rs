//! Token usage accounting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// Token counts reported by the oracle for one or more calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt: u64,
    /// Candidate (response) tokens
    pub candidates: u64,
    /// Total tokens as reported by the provider
    pub total: u64,
}

impl TokenUsage {
    /// Creates a usage record.
    pub fn new(prompt: u64, candidates: u64, total: u64) -> Self {
        Self {
            prompt,
            candidates,
            total,
        }
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            prompt: self.prompt + rhs.prompt,
            candidates: self.candidates + rhs.candidates,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

/// Token usage per research target.
///
/// # Examples
///
/// ```
/// use bulletin_core::{TokenLedger, TokenUsage};
///
/// let mut ledger = TokenLedger::default();
/// ledger.record("library", TokenUsage::new(10, 5, 15));
/// ledger.record("library", TokenUsage::new(1, 1, 2));
/// assert_eq!(ledger.total().total, 17);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenLedger {
    targets: BTreeMap<String, TokenUsage>,
}

impl TokenLedger {
    /// Adds `usage` to the running count for `target`.
    pub fn record(&mut self, target: &str, usage: TokenUsage) {
        *self.targets.entry(target.to_string()).or_default() += usage;
    }

    /// Usage for one target.
    pub fn get(&self, target: &str) -> Option<&TokenUsage> {
        self.targets.get(target)
    }

    /// Usage summed over every target.
    pub fn total(&self) -> TokenUsage {
        self.targets.values().copied().fold(TokenUsage::default(), Add::add)
    }

    /// Iterates targets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenUsage)> {
        self.targets.iter()
    }
}
