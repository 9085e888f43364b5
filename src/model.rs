use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("participant name cannot be empty")]
    EmptyName,
}

/// Identifiant opaque d'un participant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Participant au tirage
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_revealed: bool,
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Crée un participant ; le nom est nettoyé (trim) et ne peut pas être vide.
    pub fn new<S: AsRef<str>>(name: S) -> Result<Self, ModelError> {
        Self::with_id(ParticipantId::random(), name)
    }

    pub fn with_id<S: AsRef<str>>(id: ParticipantId, name: S) -> Result<Self, ModelError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            has_revealed: false,
            created_at: Utc::now(),
        })
    }

    /// Compare un nom saisi au nom du participant (casse et espaces ignorés).
    pub fn name_matches(&self, input: &str) -> bool {
        normalize_name(&self.name) == normalize_name(input)
    }
}

pub(crate) fn normalize_name(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Relation d'exclusion orientée : donneur -> destinataires interdits.
///
/// Exclure A -> B n'implique pas B -> A. Les paires A -> A sont refusées,
/// l'auto-attribution étant toujours interdite par le tirage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "ExclusionMap", into = "ExclusionMap")
)]
pub struct Exclusions(BTreeMap<ParticipantId, BTreeSet<ParticipantId>>);

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute `giver -> excluded`. Retourne `false` si la paire existait déjà
    /// ou si c'est une auto-paire.
    pub fn insert(&mut self, giver: ParticipantId, excluded: ParticipantId) -> bool {
        if giver == excluded {
            return false;
        }
        self.0.entry(giver).or_default().insert(excluded)
    }

    pub fn remove(&mut self, giver: &ParticipantId, excluded: &ParticipantId) -> bool {
        let Some(set) = self.0.get_mut(giver) else {
            return false;
        };
        let removed = set.remove(excluded);
        if set.is_empty() {
            self.0.remove(giver);
        }
        removed
    }

    /// Bascule la paire ; retourne `true` si elle est présente après l'appel.
    pub fn toggle(&mut self, giver: &ParticipantId, excluded: &ParticipantId) -> bool {
        if self.remove(giver, excluded) {
            false
        } else {
            self.insert(giver.clone(), excluded.clone())
        }
    }

    pub fn contains(&self, giver: &ParticipantId, excluded: &ParticipantId) -> bool {
        self.0.get(giver).is_some_and(|set| set.contains(excluded))
    }

    pub fn forbidden_for(&self, giver: &ParticipantId) -> Option<&BTreeSet<ParticipantId>> {
        self.0.get(giver)
    }

    /// Supprime toutes les paires qui mentionnent `id` (donneur ou destinataire).
    pub fn remove_participant(&mut self, id: &ParticipantId) {
        self.0.remove(id);
        self.0.retain(|_, set| {
            set.remove(id);
            !set.is_empty()
        });
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> {
        self.0
            .iter()
            .flat_map(|(giver, set)| set.iter().map(move |excluded| (giver, excluded)))
    }
}

type ExclusionMap = BTreeMap<ParticipantId, BTreeSet<ParticipantId>>;

/// Reconstruit via `insert` : auto-paires et ensembles vides sont écartés.
impl From<ExclusionMap> for Exclusions {
    fn from(map: ExclusionMap) -> Self {
        map.into_iter()
            .flat_map(|(giver, set)| set.into_iter().map(move |excluded| (giver.clone(), excluded)))
            .collect()
    }
}

impl From<Exclusions> for ExclusionMap {
    fn from(exclusions: Exclusions) -> Self {
        exclusions.0
    }
}

impl FromIterator<(ParticipantId, ParticipantId)> for Exclusions {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, ParticipantId)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (giver, excluded) in iter {
            out.insert(giver, excluded);
        }
        out
    }
}

/// Résultat d'un tirage : donneur -> destinataire.
///
/// Immuable une fois produit ; un nouveau tirage le remplace en entier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Assignment(BTreeMap<ParticipantId, ParticipantId>);

impl Assignment {
    pub(crate) fn from_pairs(pairs: BTreeMap<ParticipantId, ParticipantId>) -> Self {
        Self(pairs)
    }

    pub fn recipient_of(&self, giver: &ParticipantId) -> Option<&ParticipantId> {
        self.0.get(giver)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> {
        self.0.iter()
    }

    pub fn givers(&self) -> impl Iterator<Item = &ParticipantId> {
        self.0.keys()
    }

    pub fn recipients(&self) -> impl Iterator<Item = &ParticipantId> {
        self.0.values()
    }
}

/// Document complet d'un événement Secret Santa
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    pub participants: Vec<Participant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclusions: Exclusions,
    #[cfg_attr(feature = "serde", serde(default))]
    pub assignment: Option<Assignment>,
}

impl Event {
    pub fn find_participant_by_id<'a>(&'a self, id: &ParticipantId) -> Option<&'a Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }
    pub fn find_participant_mut_by_id(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == id)
    }
    /// Premier participant (ordre de la liste) dont le nom correspond.
    pub fn find_participant_by_name<'a>(&'a self, name: &str) -> Option<&'a Participant> {
        self.participants.iter().find(|p| p.name_matches(name))
    }

    pub fn revealed_count(&self) -> usize {
        self.participants.iter().filter(|p| p.has_revealed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.participants.len() - self.revealed_count()
    }
}
