use std::collections::HashSet;

use tracing::debug;

use crate::candidate::{CandidateDonor, IdentityKey};

/// Ordered set of candidates where the first one seen for an identity wins.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<IdentityKey>,
    candidates: Vec<CandidateDonor>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a candidate unless one already admitted shares any of its identity keys.
    ///
    /// Returns `true` if the candidate was admitted.
    pub fn insert(&mut self, candidate: CandidateDonor) -> bool {
        let keys = candidate.identity_keys();
        if let Some(key) = keys.iter().find(|key| self.seen.contains(*key)) {
            debug!(
                donor = %candidate.full_name,
                ?key,
                hospital_managed = candidate.is_hospital_managed(),
                "Skipping duplicate donor"
            );
            return false;
        }
        self.seen.extend(keys);
        self.candidates.push(candidate);
        true
    }

    /// Whether an admitted candidate already holds any of `keys`.
    pub fn is_claimed(&self, keys: &[IdentityKey]) -> bool {
        keys.iter().any(|key| self.seen.contains(key))
    }

    pub fn into_vec(self) -> Vec<CandidateDonor> {
        self.candidates
    }
}

/// Merge both donor populations, hospital-managed entries first.
pub fn merge_candidates(
    hospital_managed: impl IntoIterator<Item = CandidateDonor>,
    self_registered: impl IntoIterator<Item = CandidateDonor>,
) -> Vec<CandidateDonor> {
    let mut set = CandidateSet::new();
    for candidate in hospital_managed.into_iter().chain(self_registered) {
        set.insert(candidate);
    }
    set.into_vec()
}
