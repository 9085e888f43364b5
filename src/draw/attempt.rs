use crate::model::{Exclusions, ParticipantId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Un essai glouton : chaque donneur, dans l'ordre de `givers`, tire au hasard
/// parmi les destinataires encore libres qui ne lui sont pas interdits.
///
/// Retourne `None` dès qu'un donneur n'a plus de candidat ; rien n'est
/// conservé d'un essai raté.
pub(super) fn try_once<R: Rng + ?Sized>(
    givers: &[&ParticipantId],
    recipients: &[&ParticipantId],
    exclusions: &Exclusions,
    rng: &mut R,
) -> Option<BTreeMap<ParticipantId, ParticipantId>> {
    let mut remaining: Vec<&ParticipantId> = recipients.to_vec();
    let mut pairs = BTreeMap::new();

    for &giver in givers {
        let forbidden = exclusions.forbidden_for(giver);
        let valid: Vec<usize> = (0..remaining.len())
            .filter(|&idx| {
                let r = remaining[idx];
                r != giver && !forbidden.is_some_and(|set| set.contains(r))
            })
            .collect();

        let &picked = valid.choose(rng)?;
        let recipient = remaining.swap_remove(picked);
        pairs.insert(giver.clone(), recipient.clone());
    }

    Some(pairs)
}
