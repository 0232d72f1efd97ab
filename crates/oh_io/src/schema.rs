//! crates/oh_io/src/schema.rs
//! Embedded JSON Schemas (Draft 2020-12) for every document the loaders accept.
//! Validation reports the first violation with its JSON Pointer.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::IoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    GiveawayEntries,
    TimeEntries,
    Teams,
}

impl SchemaKind {
    pub const fn name(self) -> &'static str {
        match self {
            SchemaKind::GiveawayEntries => "giveaway_entries",
            SchemaKind::TimeEntries => "time_entries",
            SchemaKind::Teams => "teams",
        }
    }

    fn source(self) -> &'static str {
        match self {
            SchemaKind::GiveawayEntries => GIVEAWAY_ENTRIES_SCHEMA,
            SchemaKind::TimeEntries => TIME_ENTRIES_SCHEMA,
            SchemaKind::Teams => TEAMS_SCHEMA,
        }
    }
}

const GIVEAWAY_ENTRIES_SCHEMA: &str = r##"{
  "type": "object",
  "required": ["entries"],
  "additionalProperties": false,
  "properties": {
    "giveaway_id": { "type": "string", "minLength": 1 },
    "entries": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["user_id", "entries"],
        "properties": {
          "user_id": { "$ref": "#/$defs/token" },
          "name": { "type": "string" },
          "entries": { "type": "integer", "minimum": 0, "maximum": 4294967295 }
        }
      }
    }
  },
  "$defs": {
    "token": { "type": "string", "pattern": "^[!-~]{1,128}$" }
  }
}"##;

const TIME_ENTRIES_SCHEMA: &str = r##"{
  "type": "object",
  "required": ["entries"],
  "additionalProperties": false,
  "properties": {
    "entries": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["user_id", "start", "end"],
        "additionalProperties": false,
        "properties": {
          "user_id": { "$ref": "#/$defs/token" },
          "start": { "type": "string", "minLength": 1 },
          "end": { "type": "string", "minLength": 1 },
          "note": { "type": "string" }
        }
      }
    }
  },
  "$defs": {
    "token": { "type": "string", "pattern": "^[!-~]{1,128}$" }
  }
}"##;

const TEAMS_SCHEMA: &str = r##"{
  "type": "object",
  "required": ["nonprofits", "teams"],
  "additionalProperties": false,
  "properties": {
    "nonprofits": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "name"],
        "additionalProperties": false,
        "properties": {
          "id": { "$ref": "#/$defs/token" },
          "name": { "type": "string" }
        }
      }
    },
    "teams": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "name"],
        "additionalProperties": false,
        "properties": {
          "id": { "$ref": "#/$defs/token" },
          "name": { "type": "string" },
          "nonprofit_id": { "oneOf": [ { "$ref": "#/$defs/token" }, { "type": "null" } ] }
        }
      }
    }
  },
  "$defs": {
    "token": { "type": "string", "pattern": "^[!-~]{1,128}$" }
  }
}"##;

/// Validate `instance` against the embedded schema for `kind`.
pub fn validate_value(kind: SchemaKind, instance: &Value) -> Result<(), IoError> {
    let schema: Value = serde_json::from_str(kind.source()).map_err(|e| IoError::Schema {
        pointer: "/".into(),
        msg: format!("embedded {} schema is not JSON: {e}", kind.name()),
    })?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(&schema)
        .map_err(|e| IoError::Schema {
            pointer: "/".into(),
            msg: format!("embedded {} schema does not compile: {e}", kind.name()),
        })?;

    let first = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(mut errors) => errors.next().map(|e| (e.instance_path.to_string(), e.to_string())),
    };
    match first {
        Some((ptr, msg)) => Err(IoError::Schema {
            pointer: if ptr.is_empty() { "/".into() } else { ptr },
            msg,
        }),
        None => Ok(()),
    }
}
