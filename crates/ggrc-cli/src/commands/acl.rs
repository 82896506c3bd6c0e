//! ACL filter command
//!
//! Usage: ggrc acl filter --input <FILE>

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, Subcommand};
use ggrc_core::{filter_acl, ExError, ExErrorKind, Instance, InstanceBackend, ModelClass, ACL_ATTR};
use serde_json::Value;

#[derive(Debug, Args)]
pub struct AclArgs {
    #[command(subcommand)]
    pub command: AclCommand,
}

#[derive(Debug, Subcommand)]
pub enum AclCommand {
    /// Print an object's access control list without unsaved entries
    Filter(FilterArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// YAML or JSON file holding the object's attributes
    #[arg(long)]
    pub input: PathBuf,

    /// Model name reported in logs
    #[arg(long, default_value = "Control")]
    pub model: String,
}

/// Backend for fixtures read from disk; there is no server to talk to
struct OfflineBackend;

#[async_trait]
impl InstanceBackend for OfflineBackend {
    async fn save(&self, model: &str, _attrs: Value) -> Result<Value, ExError> {
        Err(offline("save", model))
    }

    async fn refresh(&self, model: &str, _id: Option<i64>) -> Result<Value, ExError> {
        Err(offline("refresh", model))
    }
}

fn offline(op: &str, model: &str) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op)
        .with_entity_id(model)
        .with_message("no server available in offline mode")
}

pub fn execute(args: AclArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        AclCommand::Filter(filter_args) => execute_filter(filter_args),
    }
}

fn execute_filter(args: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let attrs: Value = crate::fixture::load(&args.input)?;
    if !attrs.is_object() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("acl_filter")
            .with_entity_id(args.input.display().to_string())
            .with_message("fixture does not hold an object")
            .into());
    }

    let instance = Instance::new(ModelClass::new(args.model), attrs, Arc::new(OfflineBackend));
    filter_acl(&instance)?;

    let acl = instance.get(ACL_ATTR).unwrap_or_else(|| Value::Array(Vec::new()));
    println!("{}", serde_json::to_string_pretty(&acl)?);
    Ok(())
}
