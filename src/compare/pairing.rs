//! Pairing base tables with their retrieval-augmented counterparts.

use crate::ingest::variant_identity;
use serde::{Deserialize, Serialize};

/// How a base model identity is matched against variant table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingRule {
    /// Identity contained (case-insensitively) in the variant name.
    /// Tolerates naming drift but lets `llama` match `rag_llama2`.
    #[default]
    Substring,
    /// Variant name minus its prefix must equal the identity.
    Exact,
}

/// Pairing settings: rule plus the prefix every variant name starts with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pairing {
    #[serde(default)]
    pub rule: PairingRule,
    #[serde(default = "default_variant_prefix")]
    pub variant_prefix: String,
}

fn default_variant_prefix() -> String {
    "rag".to_string()
}

impl Default for Pairing {
    fn default() -> Self {
        Self {
            rule: PairingRule::default(),
            variant_prefix: default_variant_prefix(),
        }
    }
}

impl Pairing {
    pub fn new(rule: PairingRule, variant_prefix: impl Into<String>) -> Self {
        Self {
            rule,
            variant_prefix: variant_prefix.into(),
        }
    }

    /// Does the variant named `candidate` pair with the base model `identity`?
    ///
    /// An empty identity pairs with nothing.
    pub fn matches(&self, identity: &str, candidate: &str) -> bool {
        let identity = identity.to_lowercase();
        if identity.is_empty() {
            return false;
        }
        let candidate_lower = candidate.to_lowercase();
        if !candidate_lower.starts_with(&self.variant_prefix.to_lowercase()) {
            return false;
        }
        match self.rule {
            PairingRule::Substring => candidate_lower.contains(&identity),
            PairingRule::Exact => self.is_exact(&identity, candidate),
        }
    }

    fn is_exact(&self, identity: &str, candidate: &str) -> bool {
        !identity.is_empty()
            && variant_identity(candidate, &self.variant_prefix).as_deref() == Some(identity)
    }

    /// Pair every identity in `identities` at once. `candidates` are expected
    /// in a stable order (file-name order when read from disk).
    ///
    /// Under the substring rule an exact identity match wins over the first
    /// loose match, so `llama` prefers `rag_llama` over `rag_llama2`.
    /// A candidate whose prefix-stripped name equals one of the identities
    /// belongs to that model and is never handed to another one by the
    /// substring rule. With bases `llama` and `llama2` and only
    /// `rag_llama2`, `llama` gets `None`.
    pub fn assign<'a, T>(
        &self,
        identities: &[&str],
        candidates: &'a [T],
        name: impl Fn(&T) -> &str,
    ) -> Vec<Option<&'a T>> {
        let identities: Vec<String> = identities.iter().map(|id| id.to_lowercase()).collect();
        let owners: Vec<Option<&str>> = candidates
            .iter()
            .map(|c| {
                identities
                    .iter()
                    .find(|id| self.is_exact(id, name(c)))
                    .map(String::as_str)
            })
            .collect();

        identities
            .iter()
            .map(|identity| {
                let open = candidates
                    .iter()
                    .zip(&owners)
                    .filter(|(_, owner)| owner.map_or(true, |o| o == identity.as_str()))
                    .map(|(c, _)| c);
                self.pick(identity, open, &name)
            })
            .collect()
    }

    fn pick<'a, T: 'a>(
        &self,
        identity: &str,
        candidates: impl Iterator<Item = &'a T>,
        name: &impl Fn(&T) -> &str,
    ) -> Option<&'a T> {
        let matched: Vec<&'a T> = candidates
            .filter(|c| self.matches(identity, name(*c)))
            .collect();
        matched
            .iter()
            .copied()
            .find(|c| self.is_exact(identity, name(*c)))
            .or_else(|| matched.first().copied())
    }
}
