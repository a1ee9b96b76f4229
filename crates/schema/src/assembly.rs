//! Splices the current name sets into a deep copy of the template.

use crate::error::SchemaError;
use crate::names::NameSets;
use crate::template::{PROBLEM_MATCHER_POINTER, TASK_TYPE_POINTER, template};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Builds the full schema document for `names`.
///
/// The template itself is never touched; each call works on its own copy.
///
/// # Errors
/// Returns [`SchemaError::Template`] if a splice point is missing from the template.
pub fn assemble(names: &NameSets) -> Result<Value, SchemaError> {
    let mut document = template().clone();

    slot(&mut document, TASK_TYPE_POINTER)?.insert("enum".to_owned(), json!(names.task_types()));

    let matchers = names.problem_matchers();
    slot(&mut document, PROBLEM_MATCHER_POINTER)?.insert(
        "oneOf".to_owned(),
        json!([
            { "type": "string", "enum": matchers },
            { "type": "object" },
            { "type": "array", "items": { "type": "string", "enum": matchers } }
        ]),
    );

    Ok(document)
}

/// Canonical text of a document: compact, keys sorted.
///
/// # Errors
/// Returns [`SchemaError::Serialize`] if the document cannot be encoded.
pub fn render(document: &Value) -> Result<Arc<str>, SchemaError> {
    Ok(serde_json::to_string(document)?.into())
}

fn slot<'a>(document: &'a mut Value, pointer: &'static str) -> Result<&'a mut Map<String, Value>, SchemaError> {
    document.pointer_mut(pointer).and_then(Value::as_object_mut).ok_or_else(|| SchemaError::Template {
        message: "splice point is missing or not an object".into(),
        context: Some(pointer.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(types: &[&str], matchers: &[&str]) -> NameSets {
        let mut names = NameSets::default();
        names.replace_task_types(types);
        names.replace_problem_matchers(matchers);
        names
    }

    #[test]
    fn test_task_type_enum_is_spliced() {
        let document = assemble(&names(&["npm"], &[])).unwrap();
        let types = document.pointer(&format!("{TASK_TYPE_POINTER}/enum")).unwrap();
        assert_eq!(types, &json!(["npm", "process", "shell"]));
    }

    #[test]
    fn test_matcher_alternatives() {
        let document = assemble(&names(&[], &["tsc"])).unwrap();
        let one_of = document.pointer(&format!("{PROBLEM_MATCHER_POINTER}/oneOf")).unwrap();

        assert_eq!(one_of[0], json!({ "type": "string", "enum": ["$tsc"] }));
        assert_eq!(one_of[1], json!({ "type": "object" }));
        assert_eq!(one_of[2], json!({ "type": "array", "items": { "type": "string", "enum": ["$tsc"] } }));
    }

    #[test]
    fn test_template_is_untouched() {
        assemble(&names(&["npm"], &["tsc"])).unwrap();
        assert!(template().pointer(&format!("{TASK_TYPE_POINTER}/enum")).is_none());
    }

    #[test]
    fn test_render_is_stable() {
        let first = render(&assemble(&names(&["b", "a"], &["y", "x"])).unwrap()).unwrap();
        let second = render(&assemble(&names(&["a", "b"], &["x", "y"])).unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains('\n'));
    }

    #[test]
    fn test_untouched_template_parts_survive() {
        let document = assemble(&NameSets::default()).unwrap();
        assert_eq!(document["required"], json!(["version"]));
        assert!(document.pointer("/properties/tasks/items/properties/label").is_some());
    }
}
