use crate::draw::{self, DrawError, DrawOptions};
use crate::model::{Assignment, Event, Exclusions, ModelError, Participant, ParticipantId};
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("a participant cannot exclude themselves")]
    SelfExclusion,
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// Accès aux participants
pub trait ParticipantStore {
    fn participants(&self) -> &[Participant];
    fn add_participant(&mut self, name: &str) -> Result<Participant, StoreError>;
    /// Retire un participant et ses exclusions ; l'attribution courante est effacée.
    fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant, StoreError>;
    /// Retourne l'ancienne valeur du drapeau.
    fn set_has_revealed(&mut self, id: &ParticipantId, value: bool) -> Result<bool, StoreError>;
    fn reset_all_has_revealed(&mut self);
}

/// Accès à la relation d'exclusion
pub trait ExclusionStore {
    fn exclusions(&self) -> &Exclusions;
    fn add_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError>;
    fn remove_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError>;
    fn toggle_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError>;
}

/// Accès au résultat du tirage
pub trait AssignmentStore {
    fn assignment(&self) -> Option<&Assignment>;
    fn replace_assignment(&mut self, assignment: Assignment);
    fn clear_assignment(&mut self);
}

impl Event {
    fn ensure_known(&self, id: &ParticipantId) -> Result<(), StoreError> {
        match self.find_participant_by_id(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::UnknownParticipant(id.as_str().to_string())),
        }
    }

    fn ensure_pair(&self, giver: &ParticipantId, excluded: &ParticipantId) -> Result<(), StoreError> {
        if giver == excluded {
            return Err(StoreError::SelfExclusion);
        }
        self.ensure_known(giver)?;
        self.ensure_known(excluded)
    }

    /// Lance un tirage et remplace l'attribution en cas de succès.
    ///
    /// Les drapeaux de révélation sont remis à zéro. En cas d'échec,
    /// l'attribution précédente est conservée telle quelle.
    pub fn run_draw<R: Rng + ?Sized>(
        &mut self,
        opts: DrawOptions,
        rng: &mut R,
    ) -> Result<&Assignment, StoreError> {
        let assignment = draw::draw_with_rng(&self.participants, &self.exclusions, opts, rng)?;
        #[cfg(feature = "logging")]
        tracing::info!(pairs = assignment.len(), "draw completed");
        self.reset_all_has_revealed();
        Ok(self.assignment.insert(assignment))
    }

    /// Efface le tirage et les révélations.
    pub fn reset_draw(&mut self) {
        #[cfg(feature = "logging")]
        tracing::info!("draw reset");
        self.clear_assignment();
        self.reset_all_has_revealed();
    }
}

impl ParticipantStore for Event {
    fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn add_participant(&mut self, name: &str) -> Result<Participant, StoreError> {
        let participant = Participant::new(name)?;
        #[cfg(feature = "logging")]
        tracing::debug!(id = %participant.id, name = %participant.name, "participant added");
        self.participants.push(participant.clone());
        Ok(participant)
    }

    fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant, StoreError> {
        let pos = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::UnknownParticipant(id.as_str().to_string()))?;
        let removed = self.participants.remove(pos);
        self.exclusions.remove_participant(id);
        if self.assignment.take().is_some() {
            #[cfg(feature = "logging")]
            tracing::warn!(id = %id, "participant removed after draw, assignment cleared");
        }
        Ok(removed)
    }

    fn set_has_revealed(&mut self, id: &ParticipantId, value: bool) -> Result<bool, StoreError> {
        let participant = self
            .find_participant_mut_by_id(id)
            .ok_or_else(|| StoreError::UnknownParticipant(id.as_str().to_string()))?;
        Ok(std::mem::replace(&mut participant.has_revealed, value))
    }

    fn reset_all_has_revealed(&mut self) {
        for p in &mut self.participants {
            p.has_revealed = false;
        }
    }
}

impl ExclusionStore for Event {
    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    fn add_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError> {
        self.ensure_pair(giver, excluded)?;
        Ok(self.exclusions.insert(giver.clone(), excluded.clone()))
    }

    fn remove_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError> {
        self.ensure_pair(giver, excluded)?;
        Ok(self.exclusions.remove(giver, excluded))
    }

    fn toggle_exclusion(
        &mut self,
        giver: &ParticipantId,
        excluded: &ParticipantId,
    ) -> Result<bool, StoreError> {
        self.ensure_pair(giver, excluded)?;
        Ok(self.exclusions.toggle(giver, excluded))
    }
}

impl AssignmentStore for Event {
    fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    fn replace_assignment(&mut self, assignment: Assignment) {
        self.assignment = Some(assignment);
    }

    fn clear_assignment(&mut self) {
        self.assignment = None;
    }
}
