use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::record::Record;

/// The schema number written with every collection. Bump when the
/// record layout changes incompatibly.
pub const SCHEMA: u32 = 1;

/// The envelope the collection is persisted in.
#[derive(Deserialize)]
struct Envelope {
    schema: u32,
    records: Vec<Record>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema: u32,
    records: &'a [Record],
}

/// Decodes a persisted collection value.
///
/// Accepts both the current envelope (`{"schema": 1, "records": [...]}`)
/// and the legacy bare array written before the envelope existed, so
/// existing journals migrate on their next write.
pub fn decode(raw: &str) -> Result<Vec<Record>, StoreError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|source| StoreError::MalformedCollection { source })?;

    if value.is_array() {
        return serde_json::from_value(value)
            .map_err(|source| StoreError::MalformedCollection { source });
    }

    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|source| StoreError::MalformedCollection { source })?;

    if envelope.schema != SCHEMA {
        return Err(StoreError::UnsupportedSchema(envelope.schema));
    }

    Ok(envelope.records)
}

/// Encodes a collection for persistence, always in the current
/// envelope.
pub fn encode(records: &[Record]) -> Result<String, StoreError> {
    let envelope = EnvelopeRef {
        schema: SCHEMA,
        records,
    };

    serde_json::to_string(&envelope).map_err(|source| StoreError::Serialize { source })
}
