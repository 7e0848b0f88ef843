//! `badge`: command-line access to an officer identity graph.
//!
//! Reads `badge.toml` (or the path given with `--config`), opens the SQLite
//! store it names, and runs one subcommand. Entities are printed as JSON;
//! `export` prints CSV.
//!
//! # Usage
//!
//! ```text
//! badge officer add --first-name John --last-name Doe --gender M
//! badge state-id add <OFFICER_UID> --state NY --id-name "Tax ID Number" --value 958938
//! badge export > officers.csv
//! ```

mod config;

use std::{io::Read as _, path::PathBuf};

use anyhow::{Context as _, bail};
use badge_core::{
  citation::NewCitation,
  enums::{Ethnicity, Gender},
  ids::{OfficerUid, SourceId, StateIdKey},
  officer::{Attribute, NewOfficer, parse_date},
  relation::{EdgeLabel, Link},
  state_id::NewStateId,
  store::OfficerStore,
};
use badge_store_sqlite::SqliteStore;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "badge", version, about = "Officer identity graph")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "badge.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create, inspect and edit officers.
  #[command(subcommand)]
  Officer(OfficerCommand),

  /// Manage state-wide identifiers.
  #[command(subcommand)]
  StateId(StateIdCommand),

  /// Add a many-to-many edge from an officer, e.g. `MEMBER_OF_UNIT`.
  Link {
    officer: OfficerUid,
    /// Edge label, e.g. `MEMBER_OF_UNIT` or `NAMED_IN`.
    label:   String,
    target:  Uuid,
  },

  /// Record that a source substantiates attributes of an officer.
  Cite {
    officer: OfficerUid,
    source:  SourceId,
    /// Date the source speaks for (YYYY-MM-DD).
    #[arg(long)]
    as_of:   Option<String>,
    #[arg(long)]
    url:     Option<String>,
    /// JSON object mapping attribute names to the cited values.
    #[arg(long, default_value = "{}")]
    diff:    String,
  },

  /// Write every officer as CSV to stdout.
  Export,

  /// Read CSV from a file (or stdin) and create one officer per row.
  Import {
    /// Defaults to stdin.
    file: Option<PathBuf>,
  },

  /// Report state IDs that do not have exactly one owner.
  Audit,
}

#[derive(Subcommand)]
enum OfficerCommand {
  Add(OfficerFields),
  /// Print an officer with its state IDs, edges and citations.
  Show { uid: OfficerUid },
  /// Set one attribute. Omit the value to clear it.
  Set {
    uid:       OfficerUid,
    attribute: String,
    value:     Option<String>,
  },
  List,
}

#[derive(Args)]
struct OfficerFields {
  #[arg(long)]
  first_name:    Option<String>,
  #[arg(long)]
  middle_name:   Option<String>,
  #[arg(long)]
  last_name:     Option<String>,
  #[arg(long)]
  suffix:        Option<String>,
  #[arg(long)]
  ethnicity:     Option<String>,
  #[arg(long)]
  gender:        Option<String>,
  /// YYYY-MM-DD.
  #[arg(long)]
  date_of_birth: Option<String>,
  #[arg(long)]
  year_of_birth: Option<String>,
}

impl OfficerFields {
  fn into_new(self) -> badge_core::Result<NewOfficer> {
    Ok(NewOfficer {
      first_name:    self.first_name,
      middle_name:   self.middle_name,
      last_name:     self.last_name,
      suffix:        self.suffix,
      ethnicity:     self.ethnicity.as_deref().map(Ethnicity::parse).transpose()?,
      gender:        self.gender.as_deref().map(Gender::parse).transpose()?,
      date_of_birth: self
        .date_of_birth
        .as_deref()
        .map(|v| parse_date("date_of_birth", v))
        .transpose()?,
      year_of_birth: self.year_of_birth,
    })
  }
}

#[derive(Subcommand)]
enum StateIdCommand {
  /// Create a state ID owned by an officer.
  Add {
    owner:   OfficerUid,
    /// USPS jurisdiction code, e.g. `NY`.
    #[arg(long)]
    state:   String,
    #[arg(long)]
    id_name: Option<String>,
    #[arg(long)]
    value:   Option<String>,
  },
  /// Attach an existing state ID to an officer.
  Attach { key: StateIdKey, officer: OfficerUid },
  /// Move a state ID to a different officer.
  Reassign { key: StateIdKey, officer: OfficerUid },
  /// Print a state ID and its owner.
  Show { key: StateIdKey },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = Config::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Officer(cmd) => officer(&store, cmd).await,
    Command::StateId(cmd) => state_id(&store, cmd).await,
    Command::Link { officer, label, target } => {
      let link = Link::from_parts(EdgeLabel::parse(&label)?, target)?;
      print_json(&store.link(officer, link).await?)
    }
    Command::Cite { officer, source, as_of, url, diff } => {
      let diff: serde_json::Value =
        serde_json::from_str(&diff).context("--diff is not valid JSON")?;
      let mut input = NewCitation::new(officer, source).with_diff_json(diff)?;
      input.as_of = as_of.as_deref().map(|v| parse_date("as_of", v)).transpose()?;
      input.url = url;
      print_json(&store.cite(input).await?)
    }
    Command::Export => {
      let records: Vec<_> = store
        .list_officers()
        .await?
        .iter()
        .map(|o| o.record())
        .collect();
      print!("{}", badge_export::serialize(&records));
      Ok(())
    }
    Command::Import { file } => import(&store, file).await,
    Command::Audit => {
      let violations = store.audit_state_ids().await?;
      print_json(&violations)?;
      if !violations.is_empty() {
        bail!("{} state ID(s) violate the ownership rule", violations.len());
      }
      Ok(())
    }
  }
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

async fn officer(store: &SqliteStore, cmd: OfficerCommand) -> anyhow::Result<()> {
  match cmd {
    OfficerCommand::Add(fields) => {
      print_json(&store.add_officer(fields.into_new()?).await?)
    }
    OfficerCommand::Show { uid } => match store.materialize(uid).await? {
      Some(view) => print_json(&view),
      None => bail!("officer {uid} not found"),
    },
    OfficerCommand::Set { uid, attribute, value } => {
      let attr = Attribute::parse(&attribute)?;
      print_json(&store.set_attribute(uid, attr, value).await?)
    }
    OfficerCommand::List => print_json(&store.list_officers().await?),
  }
}

async fn state_id(store: &SqliteStore, cmd: StateIdCommand) -> anyhow::Result<()> {
  match cmd {
    StateIdCommand::Add { owner, state, id_name, value } => {
      let input = NewStateId::parse(owner, &state, id_name, value)?;
      print_json(&store.add_state_id(input).await?)
    }
    StateIdCommand::Attach { key, officer } => {
      print_json(&store.attach_state_id(key, officer).await?)
    }
    StateIdCommand::Reassign { key, officer } => {
      print_json(&store.reassign_state_id(key, officer).await?)
    }
    StateIdCommand::Show { key } => match store.get_state_id(key).await? {
      Some(owned) => print_json(&owned),
      None => bail!("state ID {key} not found"),
    },
  }
}

#[derive(Serialize)]
struct ImportSummary {
  created:  usize,
  rejected: usize,
}

/// Malformed rows and uid collisions are logged and skipped; everything
/// else is created.
async fn import(store: &SqliteStore, file: Option<PathBuf>) -> anyhow::Result<()> {
  let input = match &file {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("reading {}", path.display()))?,
    None => {
      let mut buf = String::new();
      std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
      buf
    }
  };

  let mut summary = ImportSummary { created: 0, rejected: 0 };
  for row in badge_export::parse(&input)? {
    let record = match row.record {
      Ok(record) => record,
      Err(e) => {
        tracing::warn!(line = row.line, "skipping row: {e}");
        summary.rejected += 1;
        continue;
      }
    };

    let (uid, new) = record.into_parts();
    match store.add_officer_with_uid(uid, new).await {
      Ok(_) => summary.created += 1,
      Err(e) if e.as_core().is_some() => {
        tracing::warn!(line = row.line, "skipping row: {e}");
        summary.rejected += 1;
      }
      Err(e) => return Err(e.into()),
    }
  }

  tracing::info!(created = summary.created, rejected = summary.rejected, "import finished");
  print_json(&summary)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
