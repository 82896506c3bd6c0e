//! Snapshot inspection command
//!
//! Usage: ggrc snapshot show --fixture <FILE>

use clap::{Args, Subcommand};
use ggrc_core::{Revision, RevisionCache, Snapshot};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// Resolve snapshots against the fixture's revisions and list their labels
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// YAML or JSON file with `revisions` and `snapshots` lists
    #[arg(long)]
    pub fixture: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SnapshotFixture {
    #[serde(default)]
    revisions: Vec<Revision>,
    #[serde(default)]
    snapshots: Vec<Snapshot>,
}

pub fn execute(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SnapshotCommand::Show(show_args) => execute_show(show_args),
    }
}

fn execute_show(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fixture: SnapshotFixture = crate::fixture::load(&args.fixture)?;

    let mut cache = RevisionCache::new();
    cache.extend(fixture.revisions);

    for mut snapshot in fixture.snapshots {
        snapshot.reinit(&cache);
        println!("{}", snapshot_line(&snapshot));
    }
    Ok(())
}

fn snapshot_line(snapshot: &Snapshot) -> String {
    let label = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{}\t{}",
        snapshot.id,
        label(snapshot.display_name()),
        label(snapshot.display_type())
    )
}
