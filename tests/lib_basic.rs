#![forbid(unsafe_code)]
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tirage::{
    reveal, verify, AssignmentStore, DrawError, DrawOptions, Event, ExclusionStore,
    ParticipantStore, RevealError, StoreError,
};

#[test]
fn full_event_flow() {
    let mut ev = Event::default();
    let alice = ev.add_participant("Alice").unwrap();
    let bob = ev.add_participant("Bob").unwrap();
    let chloe = ev.add_participant("Chloé").unwrap();
    let david = ev.add_participant("David").unwrap();

    // couples
    ev.add_exclusion(&alice.id, &bob.id).unwrap();
    ev.add_exclusion(&bob.id, &alice.id).unwrap();
    ev.add_exclusion(&chloe.id, &david.id).unwrap();
    ev.add_exclusion(&david.id, &chloe.id).unwrap();

    assert!(matches!(reveal(&mut ev, "alice"), Err(RevealError::NoDrawYet)));

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    ev.run_draw(DrawOptions::default(), &mut rng).unwrap();
    let assignment = ev.assignment().unwrap();
    verify(&ev.participants, &ev.exclusions, assignment).unwrap();

    for name in [" alice ", "BOB", "chloé", "David"] {
        let r = reveal(&mut ev, name).unwrap();
        assert!(r.first_time);
        assert!(!ev.exclusions().contains(&r.giver.id, &r.recipient.id));
    }
    assert_eq!(ev.pending_count(), 0);

    ev.reset_draw();
    assert!(ev.assignment().is_none());
    assert_eq!(ev.revealed_count(), 0);
}

#[test]
fn impossible_constraints_are_reported() {
    let mut ev = Event::default();
    let a = ev.add_participant("A").unwrap();
    let b = ev.add_participant("B").unwrap();
    ev.add_exclusion(&a.id, &b.id).unwrap();
    ev.add_exclusion(&b.id, &a.id).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = ev.run_draw(DrawOptions::default(), &mut rng).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Draw(DrawError::Infeasible { attempts: 1000 })
    ));
    assert!(ev.assignment().is_none());
}

#[test]
fn single_participant_is_rejected() {
    let mut ev = Event::default();
    ev.add_participant("Solo").unwrap();
    let err = ev
        .run_draw(DrawOptions::default(), &mut ChaCha8Rng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Draw(DrawError::NotEnoughParticipants { found: 1 })
    ));
}
