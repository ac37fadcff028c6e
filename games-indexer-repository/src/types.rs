//! Request and response types for search collection operations.

use serde::{Deserialize, Serialize};

/// Schema payload used to create a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// The collection name.
    pub name: String,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldSpec>,
}

/// A single field definition inside a [`CollectionSchema`].
///
/// Flags that are `false` are left out of the payload so the service applies
/// its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub facet: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub infix: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldSpec {
    /// Create a required, non-faceted field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            facet: false,
            optional: false,
            infix: false,
        }
    }

    /// Mark the field as a facet.
    pub fn facet(mut self) -> Self {
        self.facet = true;
        self
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Enable infix (substring) search on the field.
    pub fn infix(mut self) -> Self {
        self.infix = true;
        self
    }
}

/// Field types used by the games collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float")]
    Float,
}

/// A named set of terms treated as interchangeable at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    /// Stable id; upserting the same id replaces the group.
    pub id: String,
    /// The equivalent terms.
    pub synonyms: Vec<String>,
}

impl SynonymGroup {
    pub fn new(id: impl Into<String>, synonyms: &[&str]) -> Self {
        Self {
            id: id.into(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Collection metadata returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default)]
    pub num_documents: u64,
}

/// Result of importing a single document.
///
/// This mirrors one line of the service's JSONL import response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportResult {
    /// Whether the document was accepted.
    pub success: bool,
    /// Error message if the document was rejected.
    #[serde(default)]
    pub error: Option<String>,
    /// The rejected document, echoed back by the service.
    #[serde(default)]
    pub document: Option<String>,
}

/// Summary of a batch import containing aggregate statistics and individual results.
///
/// Per-document rejections do not fail the batch; callers inspect `failed` and
/// `results` to report them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of accepted documents.
    pub succeeded: usize,
    /// Number of rejected documents.
    pub failed: usize,
    /// Individual results, in submission order.
    pub results: Vec<ImportResult>,
}

impl ImportSummary {
    /// Build a summary from per-document results.
    pub fn from_results(results: Vec<ImportResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
