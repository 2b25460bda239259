//! Field catalog validation of raw declarative documents

use crate::error::{ValidationError, ValidationErrors};
use crate::model::{AttributeValue, Attributes, DeclarativeMetadata, DeclarativeResource};
use crate::value::DynamicValue;
use manifest_catalog::{FieldSpec, FieldType, ResourceKind, ValidationRules};
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Keys computed by the projector; input values are ignored
const BOOKKEEPING_KEYS: [&str; 2] = ["id", "yaml"];

/// Checks raw declarative input against one kind's field catalog
pub struct Validator<'a> {
    kind: &'a ResourceKind,
}

impl<'a> Validator<'a> {
    pub fn new(kind: &'a ResourceKind) -> Self {
        Self { kind }
    }

    /// Validate a raw document and build the typed declarative resource
    ///
    /// Every violation is collected; the first one does not stop the walk.
    pub fn validate(&self, raw: &Value) -> Result<DeclarativeResource, ValidationErrors> {
        let mut errors = Vec::new();

        let Some(mapping) = raw.as_mapping() else {
            return Err(ValidationErrors(vec![ValidationError::new(
                "(root)",
                format!("expected object, got {}", describe(raw)),
            )]));
        };

        let mut resource = DeclarativeResource::default();
        let mut body = serde_yaml::Mapping::new();

        for (key, value) in mapping {
            let Some(name) = key.as_str() else {
                errors.push(ValidationError::new(
                    "(root)",
                    "attribute names must be strings",
                ));
                continue;
            };
            match name {
                "metadata" => {}
                _ if BOOKKEEPING_KEYS.contains(&name) => {}
                "api_version" | "kind" => {
                    if value.is_null() {
                        continue;
                    }
                    match value.as_str() {
                        Some(s) if name == "kind" => resource.kind = Some(s.to_string()),
                        Some(s) => resource.api_version = Some(s.to_string()),
                        None => errors.push(type_mismatch(name, "string", value)),
                    }
                }
                _ => {
                    body.insert(key.clone(), value.clone());
                }
            }
        }

        match mapping.get("metadata") {
            None | Some(Value::Null) => {
                errors.push(ValidationError::new("metadata", "required attribute is missing"));
            }
            Some(metadata) => {
                if let Some(metadata) = self.validate_metadata(metadata, &mut errors) {
                    resource.metadata = metadata;
                }
            }
        }

        resource.body = validate_object(&self.kind.fields, &body, "", &mut errors);

        if errors.is_empty() {
            Ok(resource)
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn validate_metadata(
        &self,
        raw: &Value,
        errors: &mut Vec<ValidationError>,
    ) -> Option<DeclarativeMetadata> {
        let Some(mapping) = raw.as_mapping() else {
            errors.push(type_mismatch("metadata", "object", raw));
            return None;
        };

        let mut mapping = mapping.clone();
        if !self.kind.is_namespaced() {
            if let Some(namespace) = mapping.remove("namespace") {
                if !namespace.is_null() {
                    errors.push(ValidationError::new(
                        "metadata.namespace",
                        format!("{} is cluster-scoped and has no namespace", self.kind.kind),
                    ));
                }
            }
        }

        let attrs = validate_object(&self.kind.metadata_fields(), &mapping, "metadata", errors);
        let string = |name: &str| match attrs.get(name) {
            Some(AttributeValue::String(s)) => Some(s.clone()),
            _ => None,
        };
        let string_map = |name: &str| match attrs.get(name) {
            Some(AttributeValue::StringMap(m)) => Some(m.clone()),
            _ => None,
        };

        Some(DeclarativeMetadata {
            name: string("name")?,
            namespace: string("namespace"),
            labels: string_map("labels"),
            annotations: string_map("annotations"),
        })
    }
}

fn validate_object(
    fields: &[FieldSpec],
    mapping: &serde_yaml::Mapping,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Attributes {
    let mut attrs = Attributes::new();

    for key in mapping.keys() {
        let Some(name) = key.as_str() else {
            errors.push(ValidationError::new(
                display_path(path),
                "attribute names must be strings",
            ));
            continue;
        };
        if !fields.iter().any(|f| f.declarative_name == name) {
            errors.push(ValidationError::new(
                join(path, name),
                "unsupported attribute",
            ));
        }
    }

    for field in fields {
        let field_path = join(path, &field.declarative_name);
        match mapping.get(field.declarative_name.as_str()) {
            None | Some(Value::Null) => {
                if field.required {
                    errors.push(ValidationError::new(field_path, "required attribute is missing"));
                }
            }
            Some(value) => {
                if let Some(value) =
                    validate_value(&field.field_type, &field.rules, value, &field_path, errors)
                {
                    attrs.insert(field.declarative_name.clone(), value);
                }
            }
        }
    }

    attrs
}

fn validate_value(
    field_type: &FieldType,
    rules: &ValidationRules,
    value: &Value,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<AttributeValue> {
    match field_type {
        FieldType::String => {
            let Some(s) = value.as_str() else {
                errors.push(type_mismatch(path, "string", value));
                return None;
            };
            check_string(s, rules, path, errors);
            Some(AttributeValue::String(s.to_string()))
        }
        FieldType::Integer => {
            let Some(i) = value.as_i64() else {
                let message = match value {
                    Value::Number(n) if n.is_u64() => "integer is out of range".to_string(),
                    _ => format!("expected integer, got {}", describe(value)),
                };
                errors.push(ValidationError::new(path, message));
                return None;
            };
            check_number(i as f64, rules, path, errors);
            Some(AttributeValue::Integer(i))
        }
        FieldType::Number => {
            let Some(n) = value.as_f64() else {
                errors.push(type_mismatch(path, "number", value));
                return None;
            };
            check_number(n, rules, path, errors);
            Some(AttributeValue::Number(n))
        }
        FieldType::Boolean => {
            let Some(b) = value.as_bool() else {
                errors.push(type_mismatch(path, "boolean", value));
                return None;
            };
            check_enum(&b.to_string(), rules, path, errors);
            Some(AttributeValue::Bool(b))
        }
        FieldType::StringMap => {
            let Some(mapping) = value.as_mapping() else {
                errors.push(type_mismatch(path, "map of strings", value));
                return None;
            };
            let mut map = BTreeMap::new();
            let mut valid = true;
            for (k, v) in mapping {
                match (k.as_str(), v.as_str()) {
                    (Some(k), Some(v)) => {
                        map.insert(k.to_string(), v.to_string());
                    }
                    (Some(k), None) => {
                        errors.push(type_mismatch(&join(path, k), "string", v));
                        valid = false;
                    }
                    (None, _) => {
                        errors.push(ValidationError::new(path, "map keys must be strings"));
                        valid = false;
                    }
                }
            }
            valid.then_some(AttributeValue::StringMap(map))
        }
        FieldType::Object { fields } => {
            let Some(mapping) = value.as_mapping() else {
                errors.push(type_mismatch(path, "object", value));
                return None;
            };
            Some(AttributeValue::Object(validate_object(
                fields, mapping, path, errors,
            )))
        }
        FieldType::List { items, item_rules } => {
            let Some(sequence) = value.as_sequence() else {
                errors.push(type_mismatch(path, "list", value));
                return None;
            };
            check_items(sequence.len(), rules, path, errors);

            let mut values = Vec::with_capacity(sequence.len());
            for (index, item) in sequence.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                if item.is_null() {
                    errors.push(ValidationError::new(item_path, "list entries must not be null"));
                    continue;
                }
                if let Some(value) = validate_value(items, item_rules, item, &item_path, errors) {
                    values.push(value);
                }
            }
            Some(AttributeValue::List(values))
        }
        FieldType::Dynamic => match DynamicValue::from_yaml(value.clone()) {
            Ok(dynamic) => Some(AttributeValue::Dynamic(dynamic)),
            Err(e) => {
                errors.push(ValidationError::new(path, format!("unsupported value: {e}")));
                None
            }
        },
    }
}

fn check_string(value: &str, rules: &ValidationRules, path: &str, errors: &mut Vec<ValidationError>) {
    let length = value.chars().count();

    if let Some(min_length) = rules.min_length {
        if length < min_length {
            errors.push(ValidationError::new(
                path,
                format!("must be at least {min_length} characters"),
            ));
        }
    }

    if let Some(max_length) = rules.max_length {
        if length > max_length {
            errors.push(ValidationError::new(
                path,
                format!("must be at most {max_length} characters"),
            ));
        }
    }

    check_enum(value, rules, path, errors);

    if let Some(pattern) = &rules.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(value) => {
                errors.push(ValidationError::new(
                    path,
                    format!("must match pattern {pattern}"),
                ));
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping pattern check at {}: {}", path, e),
        }
    }
}

fn check_number(
    value: f64,
    rules: &ValidationRules,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(minimum) = rules.minimum {
        if rules.exclusive_minimum && value <= minimum {
            errors.push(ValidationError::new(path, format!("must be greater than {minimum}")));
        } else if value < minimum {
            errors.push(ValidationError::new(path, format!("must be at least {minimum}")));
        }
    }

    if let Some(maximum) = rules.maximum {
        if rules.exclusive_maximum && value >= maximum {
            errors.push(ValidationError::new(path, format!("must be less than {maximum}")));
        } else if value > maximum {
            errors.push(ValidationError::new(path, format!("must be at most {maximum}")));
        }
    }

    // Members compare by value so `1`, `1.0` and `1e0` are the same number
    if !rules.enum_values.is_empty()
        && !rules
            .enum_values
            .iter()
            .any(|member| member.parse::<f64>().is_ok_and(|m| m == value))
    {
        errors.push(enum_violation(rules, path));
    }
}

fn check_items(len: usize, rules: &ValidationRules, path: &str, errors: &mut Vec<ValidationError>) {
    if let Some(min_items) = rules.min_items {
        if len < min_items {
            errors.push(ValidationError::new(
                path,
                format!("must have at least {min_items} items"),
            ));
        }
    }

    if let Some(max_items) = rules.max_items {
        if len > max_items {
            errors.push(ValidationError::new(
                path,
                format!("must have at most {max_items} items"),
            ));
        }
    }
}

fn check_enum(value: &str, rules: &ValidationRules, path: &str, errors: &mut Vec<ValidationError>) {
    if !rules.enum_values.is_empty() && !rules.enum_values.iter().any(|v| v == value) {
        errors.push(enum_violation(rules, path));
    }
}

fn enum_violation(rules: &ValidationRules, path: &str) -> ValidationError {
    ValidationError::new(
        path,
        format!("must be one of [{}]", rules.enum_values.join(", ")),
    )
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::new(path, format!("expected {expected}, got {}", describe(value)))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}
