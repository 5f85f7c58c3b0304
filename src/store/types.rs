//! Core data types and error definitions for the student record store.

use schemars::{
    JsonSchema,
    r#gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while normalizing a student key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key was empty once surrounding whitespace was trimmed.
    #[error("student key must not be empty")]
    Empty,
}

/// Errors produced by record store lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record carries the requested key.
    #[error("student {0} not found")]
    NotFound(StudentKey),
    /// Insert attempted to reuse a key already present in the store.
    #[error("student {0} already exists")]
    DuplicateKey(StudentKey),
    /// Update payload carried a key that differs from the addressed record.
    #[error("student key cannot change from {path} to {body}")]
    KeyMismatch {
        /// Key addressed by the update call.
        path: StudentKey,
        /// Conflicting key supplied in the update payload.
        body: StudentKey,
    },
}

/// Canonical identifying key of a student record.
///
/// Keys arrive either as JSON strings or as non-negative JSON integers (surrogate ids and
/// matriculation numbers both show up in practice). They are normalized once, at the boundary,
/// into a trimmed string so `885112` and `"885112"` address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawKey", into = "String")]
pub struct StudentKey(String);

impl StudentKey {
    /// Normalize raw input into a key, rejecting blank values.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudentKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for StudentKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<StudentKey> for String {
    fn from(key: StudentKey) -> Self {
        key.0
    }
}

/// Wire representations accepted for a key.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Number(u64),
}

impl TryFrom<RawKey> for StudentKey {
    type Error = KeyError;

    fn try_from(raw: RawKey) -> Result<Self, Self::Error> {
        match raw {
            RawKey::Text(text) => Self::parse(&text),
            RawKey::Number(number) => Ok(Self::from(number)),
        }
    }
}

impl JsonSchema for StudentKey {
    fn schema_name() -> String {
        "StudentKey".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut integer = SchemaObject {
            instance_type: Some(InstanceType::Integer.into()),
            ..Default::default()
        };
        integer.number().minimum = Some(0.0);

        let mut schema = SchemaObject::default();
        schema.metadata().description = Some(
            "Unique student key (surrogate id or matriculation). Integers are normalized to strings."
                .to_string(),
        );
        schema.subschemas().any_of = Some(vec![
            generator.subschema_for::<String>(),
            Schema::Object(integer),
        ]);
        Schema::Object(schema)
    }
}

/// Academic term a student enrolled in, stored verbatim (e.g. `"2021-1"` or `2019`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnrollmentTerm {
    /// Free-form term label.
    Text(String),
    /// Numeric term encoding such as a bare year.
    Numeric(i64),
}

impl fmt::Display for EnrollmentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Numeric(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for EnrollmentTerm {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A student record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique, immutable identifying key.
    #[serde(alias = "id", alias = "matriculation")]
    pub key: StudentKey,
    /// Display name; not required to be unique.
    pub name: String,
    /// Opaque enrollment term label.
    pub enrollment_term: EnrollmentTerm,
    /// Number of credits completed so far.
    pub credits_completed: u32,
}

/// Insert payload. The key may be omitted, in which case the store assigns a surrogate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    /// Caller-chosen key; a numeric surrogate is assigned when absent.
    #[serde(default, alias = "id", alias = "matriculation")]
    pub key: Option<StudentKey>,
    /// Display name.
    pub name: String,
    /// Opaque enrollment term label.
    pub enrollment_term: EnrollmentTerm,
    /// Number of credits completed so far.
    pub credits_completed: u32,
}

impl From<Student> for NewStudent {
    fn from(student: Student) -> Self {
        Self {
            key: Some(student.key),
            name: student.name,
            enrollment_term: student.enrollment_term,
            credits_completed: student.credits_completed,
        }
    }
}

/// Partial update payload.
///
/// Only `name`, `enrollmentTerm`, and `creditsCompleted` are merged into the stored record.
/// A `key` may be echoed back (clients commonly resend the whole record) but must match the
/// addressed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    /// Optional echo of the record key; must equal the addressed key when present.
    #[serde(default, alias = "id", alias = "matriculation", skip_serializing_if = "Option::is_none")]
    pub key: Option<StudentKey>,
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement enrollment term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_term: Option<EnrollmentTerm>,
    /// Replacement credit count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_completed: Option<u32>,
}

impl StudentPatch {
    /// Overwrite the allowlisted fields present in this patch; the key is never touched.
    pub(crate) fn merge_into(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(term) = self.enrollment_term {
            student.enrollment_term = term;
        }
        if let Some(credits) = self.credits_completed {
            student.credits_completed = credits;
        }
    }
}
