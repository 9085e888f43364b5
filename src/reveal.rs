use crate::model::Participant;
use crate::store::{AssignmentStore, ParticipantStore, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevealError {
    #[error("the draw has not been done yet, contact the organizer")]
    NoDrawYet,
    #[error("no participant named {0:?}, check the spelling")]
    NameNotFound(String),
    #[error("no recipient recorded for {0}, contact the organizer")]
    MissingRecipient(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Résultat d'une révélation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub giver: Participant,
    pub recipient: Participant,
    /// `true` si cet appel a marqué le participant comme ayant découvert son nom.
    pub first_time: bool,
}

/// Retrouve un participant par son nom (casse et espaces ignorés).
pub fn lookup<'a, S>(store: &'a S, name: &str) -> Result<&'a Participant, RevealError>
where
    S: ParticipantStore + ?Sized,
{
    store
        .participants()
        .iter()
        .find(|p| p.name_matches(name))
        .ok_or_else(|| RevealError::NameNotFound(name.trim().to_string()))
}

/// Révèle le destinataire attribué au participant `name` et le marque
/// comme ayant découvert son nom.
///
/// Un second appel pour le même participant renvoie le même destinataire
/// avec `first_time == false`.
pub fn reveal<S>(store: &mut S, name: &str) -> Result<Reveal, RevealError>
where
    S: ParticipantStore + AssignmentStore + ?Sized,
{
    let Some(assignment) = store.assignment() else {
        return Err(RevealError::NoDrawYet);
    };
    let giver = lookup(store, name)?.clone();

    let recipient = assignment
        .recipient_of(&giver.id)
        .and_then(|rid| store.participants().iter().find(|p| &p.id == rid))
        .cloned()
        .ok_or_else(|| RevealError::MissingRecipient(giver.name.clone()))?;

    let already = store.set_has_revealed(&giver.id, true)?;
    #[cfg(feature = "logging")]
    tracing::debug!(giver = %giver.id, first_time = !already, "recipient revealed");

    Ok(Reveal {
        giver: Participant {
            has_revealed: true,
            ..giver
        },
        recipient,
        first_time: !already,
    })
}
