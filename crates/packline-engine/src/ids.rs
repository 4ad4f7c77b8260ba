use packline_types::identity::MAX_CASE_ID;
use packline_types::CaseId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of candidate shipping case ids.
///
/// Candidates need not be unique; the engine probes the ledger and draws
/// again on collision.
pub trait CaseIdSource: Send {
    fn next_candidate(&mut self) -> CaseId;
}

/// Uniformly random case ids from a seedable RNG.
pub struct SeededCaseIds {
    rng: StdRng,
}

impl SeededCaseIds {
    /// Deterministic sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sequence seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl CaseIdSource for SeededCaseIds {
    fn next_candidate(&mut self) -> CaseId {
        CaseId::from_offset(self.rng.gen_range(0..MAX_CASE_ID))
    }
}

impl std::fmt::Debug for SeededCaseIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededCaseIds").finish_non_exhaustive()
    }
}
