//! Notebook document schema.
//!
//! A document is an object with an ordered `cells` array and a `metadata`
//! object. Each cell carries a `cell_type` tag, opaque `source` text and a
//! `metadata` object; code cells additionally carry `outputs` and a
//! nullable `execution_count`.
//!
//! Validation is structural and never fatal: an in-editor document may
//! reasonably diverge from the strict schema, so mismatches surface as
//! [`SchemaWarning`]s and the caller decides whether to block or warn.

use serde_json::Value;

use crate::error::SchemaWarning;

/// Closed vocabulary of cell kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
            CellKind::Raw => "raw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "code" => Some(CellKind::Code),
            "markdown" => Some(CellKind::Markdown),
            "raw" => Some(CellKind::Raw),
            _ => None,
        }
    }

    /// Whether cells of this kind carry an `outputs` array.
    pub fn has_outputs(&self) -> bool {
        match self {
            CellKind::Code => true,
            CellKind::Markdown | CellKind::Raw => false,
        }
    }
}

/// Validate a document against the notebook schema.
///
/// Returns one warning per structural violation, each carrying the pointer
/// path of the offending node. An empty result means the document is
/// schema-valid.
pub fn validate_document(doc: &Value) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();

    let Some(root) = doc.as_object() else {
        warnings.push(SchemaWarning::new("", "document root is not an object"));
        return warnings;
    };

    match root.get("cells") {
        None => warnings.push(SchemaWarning::new("/cells", "missing cells array")),
        Some(Value::Array(cells)) => {
            for (i, cell) in cells.iter().enumerate() {
                validate_cell(&format!("/cells/{i}"), cell, &mut warnings);
            }
        }
        Some(_) => warnings.push(SchemaWarning::new("/cells", "cells is not an array")),
    }

    match root.get("metadata") {
        None => warnings.push(SchemaWarning::new("/metadata", "missing metadata object")),
        Some(Value::Object(_)) => {}
        Some(_) => warnings.push(SchemaWarning::new("/metadata", "metadata is not an object")),
    }

    for field in ["nbformat", "nbformat_minor"] {
        if let Some(v) = root.get(field) {
            if !v.is_u64() {
                warnings.push(SchemaWarning::new(format!("/{field}"), "not an integer"));
            }
        }
    }

    warnings
}

fn validate_cell(path: &str, cell: &Value, warnings: &mut Vec<SchemaWarning>) {
    let Some(obj) = cell.as_object() else {
        warnings.push(SchemaWarning::new(path, "cell is not an object"));
        return;
    };

    let kind = match obj.get("cell_type") {
        None => {
            warnings.push(SchemaWarning::new(
                format!("{path}/cell_type"),
                "missing cell_type",
            ));
            None
        }
        Some(Value::String(s)) => {
            let kind = CellKind::from_str(s);
            if kind.is_none() {
                warnings.push(SchemaWarning::new(
                    format!("{path}/cell_type"),
                    format!("unknown cell_type {s:?}"),
                ));
            }
            kind
        }
        Some(_) => {
            warnings.push(SchemaWarning::new(
                format!("{path}/cell_type"),
                "cell_type is not a string",
            ));
            None
        }
    };

    match obj.get("source") {
        None => warnings.push(SchemaWarning::new(format!("{path}/source"), "missing source")),
        Some(Value::String(_)) => {}
        Some(_) => warnings.push(SchemaWarning::new(
            format!("{path}/source"),
            "source is not a string",
        )),
    }

    match obj.get("metadata") {
        None => warnings.push(SchemaWarning::new(
            format!("{path}/metadata"),
            "missing metadata object",
        )),
        Some(Value::Object(_)) => {}
        Some(_) => warnings.push(SchemaWarning::new(
            format!("{path}/metadata"),
            "metadata is not an object",
        )),
    }

    let Some(kind) = kind else { return };
    if kind.has_outputs() {
        match obj.get("outputs") {
            None => warnings.push(SchemaWarning::new(
                format!("{path}/outputs"),
                "code cell is missing outputs",
            )),
            Some(Value::Array(_)) => {}
            Some(_) => warnings.push(SchemaWarning::new(
                format!("{path}/outputs"),
                "outputs is not an array",
            )),
        }
        if let Some(count) = obj.get("execution_count") {
            if !count.is_null() && !count.is_u64() {
                warnings.push(SchemaWarning::new(
                    format!("{path}/execution_count"),
                    "execution_count is neither null nor an integer",
                ));
            }
        }
    } else if obj.contains_key("outputs") {
        warnings.push(SchemaWarning::new(
            format!("{path}/outputs"),
            format!("{} cell must not carry outputs", kind.as_str()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code_cell(source: &str) -> Value {
        json!({
            "cell_type": "code",
            "source": source,
            "metadata": {},
            "outputs": [],
            "execution_count": null
        })
    }

    #[test]
    fn valid_document_produces_no_warnings() {
        let doc = json!({
            "cells": [
                code_cell("x = 1\n"),
                {"cell_type": "markdown", "source": "# Title\n", "metadata": {}}
            ],
            "metadata": {"language_info": {"name": "python"}},
            "nbformat": 4,
            "nbformat_minor": 5
        });
        assert_eq!(validate_document(&doc), vec![]);
    }

    #[test]
    fn unknown_cell_kind_warns() {
        let doc = json!({
            "cells": [{"cell_type": "spreadsheet", "source": "", "metadata": {}}],
            "metadata": {}
        });
        let warnings = validate_document(&doc);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "/cells/0/cell_type");
    }

    #[test]
    fn markdown_cell_with_outputs_warns() {
        let doc = json!({
            "cells": [{"cell_type": "markdown", "source": "", "metadata": {}, "outputs": []}],
            "metadata": {}
        });
        let warnings = validate_document(&doc);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "/cells/0/outputs");
    }

    #[test]
    fn missing_required_fields_warn_per_field() {
        let doc = json!({"cells": [{}]});
        let warnings = validate_document(&doc);
        let paths: Vec<&str> = warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"/cells/0/cell_type"));
        assert!(paths.contains(&"/cells/0/source"));
        assert!(paths.contains(&"/cells/0/metadata"));
        assert!(paths.contains(&"/metadata"));
    }

    #[test]
    fn non_object_root_warns_once() {
        let warnings = validate_document(&json!([1, 2]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "");
    }

    #[test]
    fn cell_kind_vocabulary_is_closed() {
        assert_eq!(CellKind::from_str("code"), Some(CellKind::Code));
        assert_eq!(CellKind::from_str("markdown"), Some(CellKind::Markdown));
        assert_eq!(CellKind::from_str("raw"), Some(CellKind::Raw));
        assert_eq!(CellKind::from_str("heading"), None);
        assert!(CellKind::Code.has_outputs());
        assert!(!CellKind::Raw.has_outputs());
    }
}
