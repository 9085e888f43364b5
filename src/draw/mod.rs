//! Moteur de tirage : attribution aléatoire donneur -> destinataire sous
//! contraintes (pas d'auto-attribution, exclusions orientées).
//!
//! Recherche aléatoire bornée : chaque essai est un appariement glouton, et
//! on recommence de zéro jusqu'à `max_attempts`. Un échec n'est donc pas une
//! preuve d'impossibilité, seulement l'absence de solution trouvée dans le
//! budget.

mod attempt;
mod types;

pub use types::{DrawError, DrawOptions, GiverOrder, Violation, DEFAULT_MAX_ATTEMPTS};

use crate::model::{Assignment, Exclusions, Participant, ParticipantId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Tire une attribution avec un générateur initialisé par l'OS.
pub fn draw(
    participants: &[Participant],
    exclusions: &Exclusions,
    opts: DrawOptions,
) -> Result<Assignment, DrawError> {
    draw_with_rng(participants, exclusions, opts, &mut rand::thread_rng())
}

/// Tire une attribution avec le générateur fourni.
///
/// Avec un générateur seedé, deux appels sur les mêmes entrées donnent le
/// même résultat. Les exclusions sont supposées ne référencer que des
/// participants de la liste.
pub fn draw_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    exclusions: &Exclusions,
    opts: DrawOptions,
    rng: &mut R,
) -> Result<Assignment, DrawError> {
    if opts.max_attempts == 0 {
        return Err(DrawError::ZeroAttempts);
    }
    let ids = distinct_ids(participants)?;
    if ids.len() < 2 {
        return Err(DrawError::NotEnoughParticipants { found: ids.len() });
    }

    let mut givers = ids.clone();
    for _ in 0..opts.max_attempts {
        if opts.giver_order == GiverOrder::Shuffled {
            givers.shuffle(rng);
        }
        if let Some(pairs) = attempt::try_once(&givers, &ids, exclusions, rng) {
            return Ok(Assignment::from_pairs(pairs));
        }
    }

    Err(DrawError::Infeasible {
        attempts: opts.max_attempts,
    })
}

fn distinct_ids(participants: &[Participant]) -> Result<Vec<&ParticipantId>, DrawError> {
    let mut seen = BTreeSet::new();
    participants
        .iter()
        .map(|p| {
            if seen.insert(&p.id) {
                Ok(&p.id)
            } else {
                Err(DrawError::DuplicateParticipant(p.id.clone()))
            }
        })
        .collect()
}

/// Vérifie qu'une attribution est une bijection sur `participants` qui
/// respecte l'interdiction d'auto-attribution et les exclusions.
pub fn verify(
    participants: &[Participant],
    exclusions: &Exclusions,
    assignment: &Assignment,
) -> Result<(), Violation> {
    let ids: BTreeSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
    let mut received = BTreeSet::new();

    for (giver, recipient) in assignment.iter() {
        if !ids.contains(giver) {
            return Err(Violation::UnknownParticipant(giver.clone()));
        }
        if !ids.contains(recipient) {
            return Err(Violation::UnknownParticipant(recipient.clone()));
        }
        if giver == recipient {
            return Err(Violation::SelfAssigned(giver.clone()));
        }
        if exclusions.contains(giver, recipient) {
            return Err(Violation::Excluded {
                giver: giver.clone(),
                recipient: recipient.clone(),
            });
        }
        if !received.insert(recipient) {
            return Err(Violation::DuplicateRecipient(recipient.clone()));
        }
    }

    // givers ⊆ ids et destinataires distincts : il reste à couvrir tout le monde
    if let Some(missing) = ids.iter().find(|id| assignment.recipient_of(id).is_none()) {
        return Err(Violation::MissingGiver((*missing).clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|n| Participant::with_id(ParticipantId::new(n), n).unwrap())
            .collect()
    }

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    #[test]
    fn three_without_exclusions_is_a_derangement() {
        let ps = people(&["A", "B", "C"]);
        let ex = Exclusions::new();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = draw_with_rng(&ps, &ex, DrawOptions::default(), &mut rng).unwrap();
            assert_eq!(a.len(), 3);
            verify(&ps, &ex, &a).unwrap();
        }
    }

    #[test]
    fn mutual_exclusion_of_two_is_infeasible() {
        let ps = people(&["A", "B"]);
        let ex: Exclusions = [(pid("A"), pid("B")), (pid("B"), pid("A"))]
            .into_iter()
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = draw_with_rng(&ps, &ex, DrawOptions::default(), &mut rng).unwrap_err();
        assert_eq!(err, DrawError::Infeasible { attempts: 1000 });
    }

    #[test]
    fn one_sided_exclusion_of_two_is_infeasible() {
        let ps = people(&["A", "B"]);
        let ex: Exclusions = [(pid("A"), pid("B"))].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let opts = DrawOptions {
            max_attempts: 10,
            ..DrawOptions::default()
        };
        assert_eq!(
            draw_with_rng(&ps, &ex, opts, &mut rng),
            Err(DrawError::Infeasible { attempts: 10 })
        );
    }

    #[test]
    fn giver_excluding_everyone_is_infeasible() {
        let ps = people(&["A", "B", "C"]);
        let ex: Exclusions = [(pid("A"), pid("B")), (pid("A"), pid("C"))]
            .into_iter()
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let opts = DrawOptions {
            max_attempts: 50,
            giver_order: GiverOrder::Shuffled,
        };
        assert!(matches!(
            draw_with_rng(&ps, &ex, opts, &mut rng),
            Err(DrawError::Infeasible { attempts: 50 })
        ));
    }

    #[test]
    fn exclusions_are_honoured() {
        let ps = people(&["A", "B", "C", "D"]);
        let ex: Exclusions = [(pid("A"), pid("B")), (pid("B"), pid("A")), (pid("C"), pid("D"))]
            .into_iter()
            .collect();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = draw_with_rng(&ps, &ex, DrawOptions::default(), &mut rng).unwrap();
            verify(&ps, &ex, &a).unwrap();
        }
    }

    #[test]
    fn rejects_small_or_duplicated_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let ex = Exclusions::new();
        let opts = DrawOptions::default();
        assert_eq!(
            draw_with_rng(&people(&["A"]), &ex, opts, &mut rng),
            Err(DrawError::NotEnoughParticipants { found: 1 })
        );
        assert_eq!(
            draw_with_rng(&[], &ex, opts, &mut rng),
            Err(DrawError::NotEnoughParticipants { found: 0 })
        );
        assert_eq!(
            draw_with_rng(&people(&["A", "A"]), &ex, opts, &mut rng),
            Err(DrawError::DuplicateParticipant(pid("A")))
        );
        let zero = DrawOptions {
            max_attempts: 0,
            ..opts
        };
        assert_eq!(
            draw_with_rng(&people(&["A", "B"]), &ex, zero, &mut rng),
            Err(DrawError::ZeroAttempts)
        );
    }

    #[test]
    fn same_seed_same_result() {
        let ps = people(&["A", "B", "C", "D", "E", "F"]);
        let ex: Exclusions = [(pid("A"), pid("B")), (pid("E"), pid("F"))]
            .into_iter()
            .collect();
        for order in [GiverOrder::Fixed, GiverOrder::Shuffled] {
            let opts = DrawOptions {
                giver_order: order,
                ..DrawOptions::default()
            };
            let first = draw_with_rng(&ps, &ex, opts, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
            let second = draw_with_rng(&ps, &ex, opts, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn verify_reports_each_violation() {
        let ps = people(&["A", "B", "C"]);
        let ex: Exclusions = [(pid("A"), pid("C"))].into_iter().collect();
        let mk = |pairs: &[(&str, &str)]| {
            Assignment::from_pairs(pairs.iter().map(|(g, r)| (pid(g), pid(r))).collect())
        };

        assert_eq!(
            verify(&ps, &ex, &mk(&[("A", "A"), ("B", "C"), ("C", "B")])),
            Err(Violation::SelfAssigned(pid("A")))
        );
        assert!(matches!(
            verify(&ps, &ex, &mk(&[("A", "C"), ("B", "A"), ("C", "B")])),
            Err(Violation::Excluded { .. })
        ));
        assert_eq!(
            verify(&ps, &ex, &mk(&[("A", "B"), ("B", "C")])),
            Err(Violation::MissingGiver(pid("C")))
        );
        assert_eq!(
            verify(&ps, &ex, &mk(&[("A", "B"), ("B", "A"), ("C", "A")])),
            Err(Violation::DuplicateRecipient(pid("A")))
        );
        assert_eq!(
            verify(&ps, &ex, &mk(&[("A", "B"), ("B", "Z"), ("C", "A")])),
            Err(Violation::UnknownParticipant(pid("Z")))
        );
        assert_eq!(verify(&ps, &ex, &mk(&[("A", "B"), ("B", "C"), ("C", "A")])), Ok(()));
    }
}
