//! Running a draw for one cycle against the store.

use rand::Rng;

use crate::{
    error::Result,
    model::common::Cycle,
    pairing::{self, Assignment, PairingError, PairingRules, PriorAssignment, Roster},
    store::{AssignmentSink, ExclusionSource, HistorySource, RosterSource, WriteMode},
};

/// How to run a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    pub cycle: Cycle,
    pub rules: PairingRules,
    pub mode: WriteMode,
    /// Generate but do not store.
    pub dry_run: bool,
}

impl DrawOptions {
    /// Draw `cycle` with the given rules, refusing to overwrite.
    pub fn new(cycle: Cycle, rules: PairingRules) -> Self {
        Self {
            cycle,
            rules,
            mode: WriteMode::RejectExisting,
            dry_run: false,
        }
    }
}

/// Draw and store the pairs for one cycle.
///
/// The roster comes from `store`, the prior assignment is whatever `store`
/// holds for the previous cycle, and the exclusions come from `exclusions`.
pub async fn draw_cycle<S, E, R>(
    store: &S,
    exclusions: &E,
    options: &DrawOptions,
    rng: &mut R,
) -> Result<Assignment>
where
    S: RosterSource + HistorySource + AssignmentSink + Sync,
    E: ExclusionSource + Sync,
    R: Rng + Send,
{
    let cycle = options.cycle;
    let roster = Roster::new(store.list_participants().await?)?;
    let prior = store.get_assignment(cycle.previous()).await?;
    let exclusions = exclusions.get_exclusions().await?;
    info!(
        "Drawing pairs for {cycle} among {} participants",
        roster.len()
    );

    if prior.is_empty() {
        debug!("No pairs stored for {}, repeats cannot occur", cycle.previous());
    } else {
        warn_departed(&roster, &prior, cycle.previous());
    }
    let unknown = exclusions.unknown_participants(&roster);
    if !unknown.is_empty() {
        warn!(
            "Exclusions name non-participants: {}",
            unknown
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let assignment = match pairing::generate(&roster, &exclusions, &prior, &options.rules, rng) {
        Ok(assignment) => assignment,
        Err(PairingError::GenerationFailed { attempts }) => {
            error!("Failed to draw valid pairs for {cycle} after {attempts} attempts");
            return Err(PairingError::GenerationFailed { attempts }.into());
        }
        Err(e) => return Err(e.into()),
    };

    if options.dry_run {
        info!("Dry run: pairs for {cycle} drawn but not stored");
    } else {
        store
            .store_assignment(cycle, &assignment, options.mode)
            .await?;
        info!("Pairs for {cycle} drawn and stored");
    }
    Ok(assignment)
}

/// Verify and store pairs that were drawn some other way, e.g. before this
/// tool was in use. Only the derangement and the exclusions are enforced.
pub async fn record_cycle<S, E>(
    store: &S,
    exclusions: &E,
    cycle: Cycle,
    pairs: PriorAssignment,
    mode: WriteMode,
) -> Result<Assignment>
where
    S: RosterSource + AssignmentSink + Sync,
    E: ExclusionSource + Sync,
{
    let roster = Roster::new(store.list_participants().await?)?;
    let exclusions = exclusions.get_exclusions().await?;
    let assignment = Assignment::from_pairs(
        pairs,
        &roster,
        &exclusions,
        &PriorAssignment::new(),
        &PairingRules::relaxed(),
    )?;
    store.store_assignment(cycle, &assignment, mode).await?;
    info!("Recorded {} pairs for {cycle}", assignment.len());
    Ok(assignment)
}

/// Prior pairs involving people who have left are ignored; say so.
fn warn_departed(roster: &Roster, prior: &PriorAssignment, previous: Cycle) {
    for (giver, receiver) in prior {
        if !roster.contains(giver) {
            warn!("Ignoring {previous} pair {giver} -> {receiver}: {giver} is no longer participating");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::LevelFilter;
    use log4rs_test_utils::test_logging::init_logging_once_for;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        error::Error,
        model::common::ReceiverLookup,
        pairing::{Exclusions, Participant, Violation},
        store::{AssignmentLookup, MemoryStore},
    };

    const FAMILY: [&str; 6] = ["Max", "Anka", "Roswitha", "Jürgen", "Katharina", "Christoph"];

    fn pairs(list: &[(&str, &str)]) -> PriorAssignment {
        list.iter()
            .map(|(g, r)| (Participant::from(*g), Participant::from(*r)))
            .collect()
    }

    fn last_year() -> PriorAssignment {
        pairs(&[
            ("Max", "Jürgen"),
            ("Katharina", "Roswitha"),
            ("Roswitha", "Christoph"),
            ("Jürgen", "Anka"),
            ("Anka", "Katharina"),
            ("Christoph", "Max"),
        ])
    }

    #[tokio::test]
    async fn draws_against_last_cycle() {
        init_logging_once_for(["secret_santa"], LevelFilter::Debug, None);

        let cycle = Cycle::new(2026);
        for seed in 0..50 {
            let store = MemoryStore::with_participants(FAMILY);
            store.add_account("admin".into(), true).await.unwrap();
            store.seed_cycle(cycle.previous(), last_year()).await;

            let options = DrawOptions::new(cycle, PairingRules::default());
            let assignment = draw_cycle(
                &store,
                &Exclusions::example(),
                &options,
                &mut StdRng::seed_from_u64(seed),
            )
            .await
            .unwrap();

            assert!(assignment.receiver_of(&"admin".into()).is_none());
            for (giver, receiver) in last_year() {
                assert_ne!(assignment.receiver_of(&giver), Some(&receiver));
            }
            assert_eq!(&store.get_assignment(cycle).await.unwrap(), assignment.as_pairs());
            assert_eq!(
                store.get_receiver(&"Max".into(), cycle).await.unwrap(),
                ReceiverLookup::Assigned(assignment.receiver_of(&"Max".into()).unwrap().clone())
            );
        }
    }

    #[tokio::test]
    async fn dry_run_stores_nothing() {
        let store = MemoryStore::with_participants(FAMILY);
        let cycle = Cycle::new(2026);
        let options = DrawOptions {
            dry_run: true,
            ..DrawOptions::new(cycle, PairingRules::default())
        };
        draw_cycle(
            &store,
            &Exclusions::example(),
            &options,
            &mut StdRng::seed_from_u64(5),
        )
        .await
        .unwrap();
        assert!(store.get_assignment(cycle).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refuses_to_redraw_unless_asked() {
        let store = MemoryStore::with_participants(FAMILY);
        let cycle = Cycle::new(2026);
        let exclusions = Exclusions::example();
        let mut rng = StdRng::seed_from_u64(9);

        let options = DrawOptions::new(cycle, PairingRules::default());
        let first = draw_cycle(&store, &exclusions, &options, &mut rng)
            .await
            .unwrap();
        assert!(matches!(
            draw_cycle(&store, &exclusions, &options, &mut rng).await,
            Err(Error::CycleAlreadyDrawn(c)) if c == cycle
        ));
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), first.as_pairs());

        let redraw = DrawOptions {
            mode: WriteMode::Replace,
            ..options
        };
        let second = draw_cycle(&store, &exclusions, &redraw, &mut rng)
            .await
            .unwrap();
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), second.as_pairs());
    }

    #[tokio::test]
    async fn reports_exhaustion() {
        let store = MemoryStore::with_participants(["A", "B"]);
        let mut exclusions = Exclusions::new();
        exclusions.exclude_each_other("A", "B");
        let rules = PairingRules {
            max_attempts: 25,
            ..PairingRules::default()
        };
        let cycle = Cycle::new(2026);
        let result = draw_cycle(
            &store,
            &exclusions,
            &DrawOptions::new(cycle, rules),
            &mut StdRng::seed_from_u64(0),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Pairing(PairingError::GenerationFailed { attempts: 25 }))
        ));
        assert!(store.get_assignment(cycle).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn too_few_participants() {
        let store = MemoryStore::with_participants(["A"]);
        let result = draw_cycle(
            &store,
            &Exclusions::new(),
            &DrawOptions::new(Cycle::new(2026), PairingRules::default()),
            &mut StdRng::seed_from_u64(0),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Pairing(PairingError::InvalidInput(_)))
        ));
    }

    #[tokio::test]
    async fn records_history_as_it_happened() {
        let store = MemoryStore::with_participants(FAMILY);
        let cycle = Cycle::new(2025);
        // Recording checks the derangement and the exclusions, nothing else.
        let recorded = record_cycle(
            &store,
            &Exclusions::example(),
            cycle,
            last_year(),
            WriteMode::RejectExisting,
        )
        .await
        .unwrap();
        assert_eq!(recorded.into_pairs(), last_year());
        assert_eq!(store.get_assignment(cycle).await.unwrap(), last_year());

        let couple_swap = pairs(&[
            ("Max", "Anka"),
            ("Anka", "Max"),
            ("Roswitha", "Katharina"),
            ("Katharina", "Roswitha"),
            ("Jürgen", "Christoph"),
            ("Christoph", "Jürgen"),
        ]);
        assert!(matches!(
            record_cycle(
                &store,
                &Exclusions::example(),
                Cycle::new(2024),
                couple_swap,
                WriteMode::RejectExisting,
            )
            .await,
            Err(Error::Violation(Violation::Excluded { .. }))
        ));
    }
}
