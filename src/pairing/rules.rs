use serde::{Deserialize, Serialize};

/// Attempts made before giving up, unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Which optional constraints apply to a draw, and how hard to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingRules {
    /// May a giver draw the same receiver as in the previous cycle?
    pub allow_repeat_of_prior_pairing: bool,
    /// May two participants give to each other in the same cycle?
    pub allow_mutual_pairing: bool,
    /// Number of shuffles tried before reporting failure.
    pub max_attempts: u32,
}

impl PairingRules {
    /// Rules that only enforce the derangement and the exclusions.
    pub fn relaxed() -> Self {
        Self {
            allow_repeat_of_prior_pairing: true,
            allow_mutual_pairing: true,
            ..Self::default()
        }
    }
}

impl Default for PairingRules {
    fn default() -> Self {
        Self {
            allow_repeat_of_prior_pairing: false,
            allow_mutual_pairing: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
