//! Core types for the mentorship service

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// A mentor. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mentor {
    /// ObjectId rendered as 24 hex digits
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A student, optionally assigned to one mentor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Student {
    /// ObjectId rendered as 24 hex digits
    pub id: String,
    pub name: String,
    pub email: String,
    /// Id of the assigned mentor; absent while unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor: Option<String>,
}

impl Student {
    pub fn is_assigned(&self) -> bool {
        self.mentor.is_some()
    }
}

/// Outcome of assigning one mentor to many students at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkAssignment {
    /// Students that exist among the requested ids
    pub matched_count: u64,
    /// Students whose mentor actually changed
    pub modified_count: u64,
}

/// Parse a path or body id, naming the offending field on failure
pub fn parse_id(field: &str, raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| Error::validation(format!("{} is not a valid id: '{}'", field, raw)))
}
