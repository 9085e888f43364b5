use crate::model::ParticipantId;
use thiserror::Error;

/// Nombre d'essais par défaut avant d'abandonner un tirage
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Ordre de traitement des donneurs à chaque essai
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GiverOrder {
    /// Ordre de la liste fournie. Les derniers donneurs voient un pool
    /// réduit et concentrent les échecs.
    #[default]
    Fixed,
    /// Ordre remélangé à chaque essai.
    Shuffled,
}

/// Options de tirage
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub max_attempts: u32,
    pub giver_order: GiverOrder,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            giver_order: GiverOrder::Fixed,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("at least 2 participants are required, found {found}")]
    NotEnoughParticipants { found: usize },
    #[error("participant listed twice: {0}")]
    DuplicateParticipant(ParticipantId),
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    /// Le budget d'essais est épuisé. Ce n'est pas une preuve d'impossibilité.
    #[error("no valid draw found after {attempts} attempt(s); try removing some exclusions")]
    Infeasible { attempts: u32 },
}

/// Défaut détecté par [`super::verify`] sur une attribution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{0} gives to themselves")]
    SelfAssigned(ParticipantId),
    #[error("{giver} is excluded from giving to {recipient}")]
    Excluded {
        giver: ParticipantId,
        recipient: ParticipantId,
    },
    #[error("{0} has no recipient")]
    MissingGiver(ParticipantId),
    #[error("{0} receives more than one gift")]
    DuplicateRecipient(ParticipantId),
    #[error("{0} is not a participant")]
    UnknownParticipant(ParticipantId),
}
