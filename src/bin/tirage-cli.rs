#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tirage::{
    draw::{verify, DrawError, DrawOptions, GiverOrder, Violation, DEFAULT_MAX_ATTEMPTS},
    io,
    model::{Event, ParticipantId},
    notification::{render_reveal, TextMessage},
    reveal::reveal,
    storage::{JsonStorage, Storage},
    store::{AssignmentStore, ExclusionStore, ParticipantStore, StoreError},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de Secret Santa (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'événement
    #[arg(long, global = true, default_value = "secret-santa.json")]
    event: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un participant
    Add {
        #[arg(long)]
        name: String,
    },

    /// Retirer un participant (et ses exclusions)
    Remove {
        #[arg(long)]
        name: String,
    },

    /// Lister les participants et leurs exclusions
    List,

    /// Interdire à `giver` d'offrir à `excluded`
    Exclude {
        #[arg(long)]
        giver: String,
        #[arg(long)]
        excluded: String,
    },

    /// Lever une exclusion
    Allow {
        #[arg(long)]
        giver: String,
        #[arg(long)]
        excluded: String,
    },

    /// Importer des participants depuis un CSV (`name`)
    ImportParticipants {
        #[arg(long)]
        csv: String,
    },

    /// Importer des exclusions depuis un CSV (`giver,excluded`)
    ImportExclusions {
        #[arg(long)]
        csv: String,
    },

    /// Effectuer le tirage
    Draw {
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,
        /// Graine pour un tirage reproductible
        #[arg(long)]
        seed: Option<u64>,
        /// Remélanger l'ordre des donneurs à chaque essai
        #[arg(long)]
        shuffle_givers: bool,
    },

    /// Réinitialiser le tirage
    Reset,

    /// Découvrir à qui offrir un cadeau
    Reveal {
        #[arg(long)]
        name: String,
        /// Budget minimum affiché (ex. "15€")
        #[arg(long)]
        budget: Option<String>,
    },

    /// Exporter l'événement et/ou le tirage
    Export {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher l'état du tirage
    Status,
}

fn find_id(event: &Event, name: &str) -> Result<ParticipantId> {
    event
        .find_participant_by_name(name)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("unknown participant: {}", name))
}

/// Défaut de l'attribution enregistrée (participant ajouté après le tirage, édition manuelle...).
fn stale_draw(event: &Event) -> Option<Violation> {
    let assignment = event.assignment()?;
    verify(&event.participants, &event.exclusions, assignment).err()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.event)?;
    let mut event = storage.load_or_default()?;
    #[cfg(feature = "logging")]
    if let Some(v) = stale_draw(&event) {
        tracing::warn!(violation = %v, "stored draw no longer valid");
    }

    let code = match cli.cmd {
        Commands::Add { name } => {
            let p = event.add_participant(&name)?;
            storage.save(&event)?;
            println!("{} ({})", p.name, p.id);
            0
        }
        Commands::Remove { name } => {
            let id = find_id(&event, &name)?;
            let had_draw = event.assignment().is_some();
            let p = event.remove_participant(&id)?;
            storage.save(&event)?;
            println!("removed {}", p.name);
            if had_draw {
                eprintln!("draw cleared: run `draw` again");
            }
            0
        }
        Commands::List => {
            for p in event.participants() {
                let excluded: Vec<&str> = event
                    .exclusions()
                    .forbidden_for(&p.id)
                    .into_iter()
                    .flatten()
                    .filter_map(|id| event.find_participant_by_id(id))
                    .map(|x| x.name.as_str())
                    .collect();
                let state = if p.has_revealed { "revealed" } else { "pending" };
                if excluded.is_empty() {
                    println!("{} | {}", p.name, state);
                } else {
                    println!("{} | {} | ≠ {}", p.name, state, excluded.join(", "));
                }
            }
            0
        }
        Commands::Exclude { giver, excluded } => {
            let g = find_id(&event, &giver)?;
            let e = find_id(&event, &excluded)?;
            event.add_exclusion(&g, &e)?;
            storage.save(&event)?;
            0
        }
        Commands::Allow { giver, excluded } => {
            let g = find_id(&event, &giver)?;
            let e = find_id(&event, &excluded)?;
            event.remove_exclusion(&g, &e)?;
            storage.save(&event)?;
            0
        }
        Commands::ImportParticipants { csv } => {
            let names = io::import_participants_csv(csv)?;
            for name in &names {
                event.add_participant(name)?;
            }
            storage.save(&event)?;
            println!("imported {} participant(s)", names.len());
            0
        }
        Commands::ImportExclusions { csv } => {
            let pairs = io::import_exclusions_csv(csv, &event)?;
            for (g, e) in pairs {
                event.add_exclusion(&g, &e)?;
            }
            storage.save(&event)?;
            0
        }
        Commands::Draw {
            max_attempts,
            seed,
            shuffle_givers,
        } => {
            let opts = DrawOptions {
                max_attempts,
                giver_order: if shuffle_givers {
                    GiverOrder::Shuffled
                } else {
                    GiverOrder::Fixed
                },
            };
            let mut rng = match seed {
                Some(s) => ChaCha8Rng::seed_from_u64(s),
                None => ChaCha8Rng::from_entropy(),
            };
            match event.run_draw(opts, &mut rng) {
                Ok(assignment) => {
                    println!("draw completed: {} pair(s)", assignment.len());
                    storage.save(&event)?;
                    0
                }
                Err(StoreError::Draw(e @ DrawError::Infeasible { .. })) => {
                    eprintln!("{e}");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Reset => {
            event.reset_draw();
            storage.save(&event)?;
            0
        }
        Commands::Reveal { name, budget } => {
            let r = reveal(&mut event, &name)?;
            if r.first_time {
                storage.save(&event)?;
            }
            let renderer = TextMessage { budget };
            println!("{}", render_reveal(&r, &renderer));
            0
        }
        Commands::Export { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_event_json(path, &event)?;
            }
            if let Some(path) = out_csv {
                if let Some(v) = stale_draw(&event) {
                    bail!("draw no longer valid ({v}): run `draw` again");
                }
                io::export_assignment_csv(path, &event)?;
            }
            0
        }
        Commands::Status => match (event.assignment(), stale_draw(&event)) {
            (Some(_), Some(v)) => {
                println!("draw no longer valid ({v}): run `draw` again");
                2
            }
            (Some(a), None) => {
                println!(
                    "draw done ({} pairs): {} revealed, {} pending",
                    a.len(),
                    event.revealed_count(),
                    event.pending_count()
                );
                0
            }
            (None, _) => {
                println!(
                    "no draw yet: {} participant(s), {} exclusion(s)",
                    event.participants().len(),
                    event.exclusions().len()
                );
                0
            }
        },
    };

    std::process::exit(code);
}
