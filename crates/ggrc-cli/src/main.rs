//! GGRC CLI
//!
//! Offline inspection of snapshot and ACL fixtures

use clap::{Parser, Subcommand};
use ggrc_core::logging_facility::{self, Profile};

mod commands;
mod fixture;

#[derive(Debug, Parser)]
#[command(name = "ggrc")]
#[command(about = "GGRC - snapshot and access control inspection", long_about = None)]
struct Cli {
    /// Logging profile (development, production); RUST_LOG overrides the filter
    #[arg(long, global = true, default_value = "production")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Snapshot operations
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Access control list operations
    Acl(commands::acl::AclArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Snapshot(args) => commands::snapshot::execute(args),
        Commands::Acl(args) => commands::acl::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
