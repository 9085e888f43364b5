#![forbid(unsafe_code)]
//! Tirage — bibliothèque de Secret Santa locale (sans BD).
//!
//! - Participants, exclusions orientées (qui ne peut pas offrir à qui).
//! - Tirage aléatoire borné en essais ; échec explicite si rien n'est trouvé.
//! - Révélation par nom, une seule fois marquée par participant.
//! - Stockage fichiers (JSON/CSV).

pub mod draw;
pub mod model;
pub mod notification;
pub mod reveal;
pub mod store;

#[cfg(feature = "serde")]
pub mod io;
#[cfg(feature = "serde")]
pub mod storage;

pub use draw::{draw, draw_with_rng, verify, DrawError, DrawOptions, GiverOrder, Violation};
pub use model::{Assignment, Event, Exclusions, ModelError, Participant, ParticipantId};
pub use notification::{render_reveal, MessageRenderer, TextMessage};
pub use reveal::{lookup, reveal, Reveal, RevealError};
pub use store::{AssignmentStore, ExclusionStore, ParticipantStore, StoreError};
#[cfg(feature = "serde")]
pub use storage::{JsonStorage, Storage};
