//! Commit identifier and the deterministic identity chain
//!
//! Identities are 40-character hexadecimal strings standing in for content
//! hashes. No content is ever hashed: each identity is the SHA-1 of the
//! previous identity in the chain, so the sequence is a reproducible
//! function of how many commits the repository has minted. Repeated runs of
//! the same operation script therefore produce identical graphs, which is
//! what makes golden-output testing possible.

use sha1::{Digest, Sha1};

/// Opaque commit identifier
///
/// Assigned exactly once at commit construction, globally unique within a
/// repository, never reused or mutated. The only way to obtain one is from
/// a repository, so every identifier in circulation was minted by an
/// [`IdentityChain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    /// Get abbreviated form of the identifier
    ///
    /// # Returns
    ///
    /// First 7 characters of the identity (standard Git abbreviation)
    pub fn to_short_id(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic, reproducible chain of commit identities
///
/// Each repository owns its own chain, so independent simulations never
/// observe each other's sequence and parallel test cases stay isolated.
#[derive(Debug, Clone)]
pub struct IdentityChain {
    last: String,
}

impl IdentityChain {
    /// Chain seeded from the empty string, matching a freshly created
    /// repository.
    pub fn new() -> Self {
        Self {
            last: String::new(),
        }
    }

    /// Chain seeded from an arbitrary string, for simulations that must not
    /// collide with another repository's identities.
    pub fn seeded(seed: &str) -> Self {
        Self {
            last: seed.to_string(),
        }
    }

    /// Mint the next identity in the chain. Minting is reserved to the
    /// owning repository so identities never leak across repositories.
    pub(crate) fn next_id(&mut self) -> CommitId {
        let mut hasher = Sha1::new();
        hasher.update(self.last.as_bytes());
        let id = format!("{:x}", hasher.finalize());
        self.last = id.clone();
        CommitId(id)
    }
}

impl Default for IdentityChain {
    fn default() -> Self {
        Self::new()
    }
}
