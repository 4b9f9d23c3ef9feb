use std::collections::HashMap;

use rand::{seq::SliceRandom, Rng};

use super::{
    assignment::check_pair, Assignment, Exclusions, InvalidInput, PairingError, PairingRules,
    Participant, PriorAssignment, Roster,
};

/// Draw a random assignment for `roster` that satisfies every constraint.
///
/// Each attempt shuffles the whole roster into a candidate receiver list and
/// pairs it positionally with the givers in roster order. The first pair that
/// breaks a constraint discards the attempt; there is no backtracking, which
/// keeps accepted assignments uniformly distributed over the valid ones.
///
/// Prior-cycle entries for givers not on the roster are ignored.
pub fn generate<R>(
    roster: &Roster,
    exclusions: &Exclusions,
    prior: &PriorAssignment,
    rules: &PairingRules,
    rng: &mut R,
) -> Result<Assignment, PairingError>
where
    R: Rng + ?Sized,
{
    if rules.max_attempts == 0 {
        return Err(InvalidInput::ZeroAttempts.into());
    }

    let givers = roster.as_slice();
    let mut receivers = givers.to_vec();
    for _ in 0..rules.max_attempts {
        receivers.shuffle(rng);
        if let Some(pairs) = attempt(givers, &receivers, exclusions, prior, rules) {
            return Ok(Assignment::from_checked(pairs));
        }
    }

    Err(PairingError::GenerationFailed {
        attempts: rules.max_attempts,
    })
}

/// Validate one candidate, pair by pair. `None` on the first violation.
fn attempt(
    givers: &[Participant],
    receivers: &[Participant],
    exclusions: &Exclusions,
    prior: &PriorAssignment,
    rules: &PairingRules,
) -> Option<PriorAssignment> {
    // Receiver -> giver for the pairs accepted so far in this attempt.
    let mut given_by: HashMap<&Participant, &Participant> = HashMap::with_capacity(givers.len());
    for (giver, receiver) in givers.iter().zip(receivers) {
        if check_pair(giver, receiver, exclusions, prior, rules).is_err() {
            return None;
        }
        if !rules.allow_mutual_pairing && given_by.get(giver) == Some(&receiver) {
            return None;
        }
        given_by.insert(receiver, giver);
    }

    Some(
        given_by
            .into_iter()
            .map(|(receiver, giver)| (giver.clone(), receiver.clone()))
            .collect(),
    )
}
