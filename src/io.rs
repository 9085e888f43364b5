use crate::model::{Event, ModelError, ParticipantId};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de noms de participants depuis CSV: header `name`
///
/// Les noms sont nettoyés (trim) ; une ligne vide fait échouer l'import.
/// L'ajout se fait ensuite via [`crate::store::ParticipantStore::add_participant`].
pub fn import_participants_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName)
                .with_context(|| format!("invalid participant row {}", line + 2));
        }
        out.push(name.to_string());
    }
    Ok(out)
}

/// Import d'exclusions: header `giver,excluded` (noms, casse ignorée).
///
/// Les noms sont résolus contre `event` ; un nom inconnu fait échouer l'import.
pub fn import_exclusions_csv<P: AsRef<Path>>(
    path: P,
    event: &Event,
) -> anyhow::Result<Vec<(ParticipantId, ParticipantId)>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let giver = rec.get(0).context("missing giver")?.trim();
        let excluded = rec.get(1).context("missing excluded")?.trim();
        if giver.is_empty() || excluded.is_empty() {
            bail!("invalid exclusion row (empty)");
        }
        out.push((resolve(event, giver)?, resolve(event, excluded)?));
    }
    Ok(out)
}

fn resolve(event: &Event, name: &str) -> anyhow::Result<ParticipantId> {
    event
        .find_participant_by_name(name)
        .map(|p| p.id.clone())
        .with_context(|| format!("unknown participant: {name}"))
}

/// Export JSON de l'événement (jolie mise en forme)
pub fn export_event_json<P: AsRef<Path>>(path: P, event: &Event) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(event)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du tirage: header `giver,recipient` (noms)
pub fn export_assignment_csv<P: AsRef<Path>>(path: P, event: &Event) -> anyhow::Result<()> {
    let Some(assignment) = &event.assignment else {
        bail!("no draw to export");
    };
    let name_of = |id: &ParticipantId| {
        event
            .find_participant_by_id(id)
            .map(|p| p.name.as_str())
            .unwrap_or("")
    };
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["giver", "recipient"])?;
    // ordre de la liste des participants, plus lisible que l'ordre des ids
    for p in &event.participants {
        if let Some(recipient) = assignment.recipient_of(&p.id) {
            w.write_record([p.name.as_str(), name_of(recipient)])?;
        }
    }
    w.flush()?;
    Ok(())
}
