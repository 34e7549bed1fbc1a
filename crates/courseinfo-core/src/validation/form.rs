//! Normalization of raw input into persistable field values.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::{
    ValidationError, INVALID_CHOICE, INVALID_INTEGER, INVALID_VALUE, NULL_CHARACTERS, REQUIRED,
};
use crate::catalog::{Catalog, EntityKind, FieldDef, FieldType};
use crate::error::Error;
use crate::model::{Entity, EntityId, FieldValue, Lookup};

/// Normalized, validated field values ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedForm {
    /// Kind the fields belong to.
    pub kind: EntityKind,
    /// Normalized values keyed by field name. Every declared field is present.
    pub fields: BTreeMap<String, FieldValue>,
}

impl NormalizedForm {
    /// Value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Render back into the raw input shape.
    pub fn to_input(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    /// Convert into a typed record.
    pub fn into_entity(self) -> Result<Entity, Error> {
        Entity::from_fields(self.kind, &self.fields)
    }
}

/// Trim text, parse integers, and resolve references for one submission.
///
/// Every field error is collected into a single [`ValidationError`]. Fields
/// not declared for `kind` are ignored. Uniqueness is left to storage.
pub fn normalize_and_validate<L: Lookup + ?Sized>(
    catalog: &Catalog,
    store: &L,
    kind: EntityKind,
    input: &Map<String, Value>,
) -> Result<NormalizedForm, Error> {
    let def = catalog.entity(kind)?;
    let mut errors = ValidationError::new(kind);
    let mut fields = BTreeMap::new();

    for field in &def.fields {
        let raw = input.get(&field.name).unwrap_or(&Value::Null);
        match normalize_field(store, field, raw)? {
            Ok(value) => {
                fields.insert(field.name.clone(), value);
            }
            Err(message) => errors.add(field.name.clone(), message),
        }
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }
    Ok(NormalizedForm { kind, fields })
}

/// Outer error is a store failure, inner error is a field message.
fn normalize_field<L: Lookup + ?Sized>(
    store: &L,
    field: &FieldDef,
    raw: &Value,
) -> Result<Result<FieldValue, String>, Error> {
    let text = match raw {
        Value::Null => String::new(),
        Value::String(s) if s.contains('\0') => return Ok(Err(NULL_CHARACTERS.to_string())),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Ok(Err(INVALID_VALUE.to_string())),
    };

    if text.is_empty() {
        return Ok(match (field.required, field.field_type) {
            (false, FieldType::Text) => Ok(FieldValue::Text(text)),
            _ => Err(REQUIRED.to_string()),
        });
    }

    match field.field_type {
        FieldType::Text => {
            let len = text.chars().count();
            Ok(match field.max_length {
                Some(max) if len > max => Err(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                )),
                _ => Ok(FieldValue::Text(text)),
            })
        }
        FieldType::Integer => Ok(text
            .parse::<i32>()
            .map(|i| FieldValue::Integer(i64::from(i)))
            .map_err(|_| INVALID_INTEGER.to_string())),
        FieldType::Reference(target) => {
            let Ok(id) = text.parse::<EntityId>() else {
                return Ok(Err(INVALID_CHOICE.to_string()));
            };
            Ok(match store.lookup(target, id)? {
                Some(_) => Ok(FieldValue::Reference(id)),
                None => Err(INVALID_CHOICE.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::model::Year;

    struct Known(HashSet<(EntityKind, EntityId)>);

    impl Lookup for Known {
        fn lookup(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>, Error> {
            Ok(self
                .0
                .contains(&(kind, id))
                .then(|| Entity::Year(Year { year: 2024 })))
        }
    }

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn validate(kind: EntityKind, value: Value) -> Result<NormalizedForm, Error> {
        let known = Known(HashSet::from([
            (EntityKind::Year, EntityId(1)),
            (EntityKind::Period, EntityId(2)),
        ]));
        normalize_and_validate(&Catalog::courseinfo(), &known, kind, &input(value))
    }

    fn field_errors(result: Result<NormalizedForm, Error>) -> ValidationError {
        match result {
            Err(Error::Validation(err)) => err,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_trims_names() {
        let form = validate(
            EntityKind::Instructor,
            json!({"first_name": " Kevin ", "last_name": "Trainor"}),
        )
        .unwrap();

        assert_eq!(form.get("first_name"), Some(&FieldValue::Text("Kevin".into())));
        assert_eq!(form.get("last_name"), Some(&FieldValue::Text("Trainor".into())));
        assert_eq!(form.get("disambiguator"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_internal_whitespace_and_case_kept() {
        let form = validate(
            EntityKind::Course,
            json!({"course_number": "  is439 ", "course_name": "Web  Development\t"}),
        )
        .unwrap();
        assert_eq!(form.get("course_number"), Some(&FieldValue::Text("is439".into())));
        assert_eq!(form.get("course_name"), Some(&FieldValue::Text("Web  Development".into())));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = validate(
            EntityKind::Student,
            json!({"first_name": "\tAda ", "last_name": " Lovelace", "disambiguator": " II "}),
        )
        .unwrap();
        let twice = validate(EntityKind::Student, Value::Object(once.to_input())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collects_all_field_errors() {
        let err = field_errors(validate(
            EntityKind::Instructor,
            json!({"first_name": "   ", "unknown": "ignored"}),
        ));
        assert_eq!(err.messages("first_name"), [REQUIRED]);
        assert_eq!(err.messages("last_name"), [REQUIRED]);
        assert!(err.messages("disambiguator").is_empty());
        assert!(err.messages("unknown").is_empty());
    }

    #[test]
    fn test_integer_fields() {
        let form = validate(EntityKind::Year, json!({"year": " 2023 "})).unwrap();
        assert_eq!(form.get("year"), Some(&FieldValue::Integer(2023)));

        let err = field_errors(validate(EntityKind::Year, json!({"year": "twenty"})));
        assert_eq!(err.messages("year"), [INVALID_INTEGER]);

        let err = field_errors(validate(EntityKind::Year, json!({"year": 1.5})));
        assert_eq!(err.messages("year"), [INVALID_INTEGER]);
    }

    #[test]
    fn test_references_must_resolve_to_right_kind() {
        let form = validate(EntityKind::Semester, json!({"year": 1, "period": "2"})).unwrap();
        assert_eq!(form.get("period"), Some(&FieldValue::Reference(EntityId(2))));

        let err = field_errors(validate(EntityKind::Semester, json!({"year": 2, "period": 99})));
        assert_eq!(err.messages("year"), [INVALID_CHOICE]);
        assert_eq!(err.messages("period"), [INVALID_CHOICE]);
    }

    #[test]
    fn test_max_length() {
        let err = field_errors(validate(
            EntityKind::Course,
            json!({"course_number": "X".repeat(21), "course_name": "Long"}),
        ));
        assert_eq!(
            err.messages("course_number"),
            ["Ensure this value has at most 20 characters (it has 21)."]
        );
    }

    #[test]
    fn test_non_scalar_rejected() {
        let err = field_errors(validate(
            EntityKind::Period,
            json!({"period_sequence": 1, "period_name": ["Spring"]}),
        ));
        assert_eq!(err.messages("period_name"), [INVALID_VALUE]);
    }

    #[test]
    fn test_null_characters_rejected() {
        let err = field_errors(validate(
            EntityKind::Instructor,
            json!({"first_name": "a\u{0000}b", "last_name": "c"}),
        ));
        assert_eq!(err.messages("first_name"), [NULL_CHARACTERS]);
        assert!(err.messages("last_name").is_empty());
    }
}
