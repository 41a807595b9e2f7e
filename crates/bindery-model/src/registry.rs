//! # Binding Registry
//!
//! A process-wide table from schema identity to the model type bound to
//! it. Binding is exclusive and permanent: once a definition is claimed,
//! every later claim on the same identity fails, whichever type makes it.
//! Reuse goes through [`SchemaDefinition::extend`], which carries a fresh
//! identity.
//!
//! [`SchemaDefinition::extend`]: bindery_schema::SchemaDefinition::extend

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use bindery_schema::SchemaId;

/// A schema identity was claimed twice.
#[derive(Error, Debug)]
#[error("schema '{schema}' is already bound to model '{existing}'; extend the schema to bind '{attempted}'")]
pub struct BindingError {
    /// Name of the schema whose identity was already claimed.
    pub schema: String,
    /// The model type holding the binding.
    pub existing: &'static str,
    /// The model type whose claim was rejected.
    pub attempted: &'static str,
}

fn registry() -> &'static Mutex<HashMap<SchemaId, &'static str>> {
    static REGISTRY: OnceLock<Mutex<HashMap<SchemaId, &'static str>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Claim a schema identity for a model type.
///
/// The presence check and the insert happen under one exclusive lock, so
/// two threads racing to bind the same definition cannot both succeed.
pub(crate) fn claim(
    schema_id: &SchemaId,
    schema_name: &str,
    model_name: &'static str,
) -> Result<(), BindingError> {
    let mut table = registry().lock();
    if let Some(existing) = table.get(schema_id).copied() {
        return Err(BindingError {
            schema: schema_name.to_string(),
            existing,
            attempted: model_name,
        });
    }
    table.insert(schema_id.clone(), model_name);
    debug!(schema = %schema_name, model = model_name, "bound schema to model");
    Ok(())
}

/// The model type a schema identity is bound to, if any.
pub fn bound_model(schema_id: &SchemaId) -> Option<&'static str> {
    registry().lock().get(schema_id).copied()
}
