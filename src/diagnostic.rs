use std::fmt;

use serde::Serialize;

use crate::resource::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Record lacks its identifier or required parent reference; skipped.
    MissingRequiredField,
    /// Record is not an object or has wrongly-typed fields; skipped.
    MalformedRecord,
    /// Identifier already seen in this category; the first record was kept.
    DuplicateRecord,
    /// Subnet associated with both Internet-facing and private route tables.
    AmbiguousClassification,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::MissingRequiredField => "missing_required_field",
            DiagnosticKind::MalformedRecord => "malformed_record",
            DiagnosticKind::DuplicateRecord => "duplicate_record",
            DiagnosticKind::AmbiguousClassification => "ambiguous_classification",
        }
    }

    pub fn is_informational(self) -> bool {
        matches!(
            self,
            DiagnosticKind::DuplicateRecord | DiagnosticKind::AmbiguousClassification
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub category: Category,
    pub resource_id: Option<String>,
    pub reason: String,
}

impl Diagnostic {
    pub fn missing_field(category: Category, resource_id: Option<String>, field: &str) -> Self {
        Self {
            kind: DiagnosticKind::MissingRequiredField,
            category,
            resource_id,
            reason: format!("missing required field `{field}`"),
        }
    }

    pub fn malformed(category: Category, resource_id: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MalformedRecord,
            category,
            resource_id,
            reason: reason.into(),
        }
    }

    pub fn duplicate(category: Category, resource_id: &str) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateRecord,
            category,
            resource_id: Some(resource_id.to_string()),
            reason: "duplicate identifier; first record kept".to_string(),
        }
    }

    pub fn ambiguous(subnet_id: &str, route_tables: &[&str]) -> Self {
        Self {
            kind: DiagnosticKind::AmbiguousClassification,
            category: Category::Subnet,
            resource_id: Some(subnet_id.to_string()),
            reason: format!(
                "associated with conflicting route tables ({}); classified public",
                route_tables.join(", ")
            ),
        }
    }

    pub fn resource_id_or_unknown(&self) -> &str {
        self.resource_id.as_deref().unwrap_or("<unknown>")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.category,
            self.resource_id_or_unknown(),
            self.reason
        )
    }
}
