//! Object codecs.
//!
//! This module provides [`ObjectCodec`] for decoding JSON objects property by
//! property. A codec built with [`ObjectCodec::required`] fails on missing
//! properties; one built with [`ObjectCodec::partial`] lets them be absent.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

use super::traits::{type_failure, Decoder};

/// A codec for JSON objects.
///
/// Every declared property is decoded in its own context frame, missing
/// ones included, so a missing required field is reported at the field's
/// own path. Properties the codec does not declare are passed through
/// untouched; wrap the codec in [`Codec::exact`](crate::Codec::exact) to
/// strip them.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::object()
///     .field("name", Codec::string().min_len(1))
///     .field("address", Codec::object().field("city", Codec::string()));
///
/// let errors = codec
///     .decode(&json!({"name": "", "address": {}}))
///     .into_result()
///     .unwrap_err();
///
/// let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
/// assert_eq!(paths, vec!["name", "address.city"]);
/// ```
pub struct ObjectCodec {
    fields: IndexMap<String, Box<dyn Decoder>>,
    partial: bool,
}

impl ObjectCodec {
    /// Creates an object codec whose properties must all be present.
    pub fn required() -> Self {
        Self {
            fields: IndexMap::new(),
            partial: false,
        }
    }

    /// Creates an object codec whose properties may be absent.
    pub fn partial() -> Self {
        Self {
            fields: IndexMap::new(),
            partial: true,
        }
    }

    /// Declares a property and its codec.
    pub fn field<D>(mut self, name: impl Into<String>, codec: D) -> Self
    where
        D: Decoder + 'static,
    {
        self.fields.insert(name.into(), Box::new(codec));
        self
    }

    /// Returns true if no properties are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Decoder for ObjectCodec {
    fn tag(&self) -> TypeTag {
        if self.partial {
            TypeTag::Partial
        } else {
            TypeTag::Interface
        }
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        let Some(object) = input.and_then(Value::as_object) else {
            return type_failure(input, context, None);
        };

        let mut errors: Vec<ErrorEntry> = Vec::new();
        let mut decoded = object.clone();

        for (name, codec) in &self.fields {
            let value = object.get(name);
            if value.is_none() && self.partial {
                continue;
            }

            let field_context = context.append(name.clone(), codec.tag(), value);
            match codec.validate(value, &field_context) {
                Validation::Success(v) => {
                    decoded.insert(name.clone(), v);
                }
                Validation::Failure(e) => errors.extend(e),
            }
        }

        if errors.is_empty() {
            Validation::Success(Value::Object(decoded))
        } else {
            Validation::Failure(ErrorEntries::from_vec(errors))
        }
    }

    fn props(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::string::StringCodec;
    use serde_json::json;

    #[test]
    fn test_required_field_missing() {
        let codec = ObjectCodec::required().field("foo", StringCodec::new());
        let errors = codec.decode(&json!({})).into_result().unwrap_err();

        let frames = errors.first().context.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].tag, TypeTag::Interface);
        assert_eq!(frames[1].key, "foo");
        assert_eq!(frames[1].actual(), None);
        assert!(errors.first().value.is_none());
    }

    #[test]
    fn test_partial_allows_missing() {
        let codec = ObjectCodec::partial().field("foo", StringCodec::new());
        assert!(codec.decode(&json!({})).is_success());
        assert!(codec.decode(&json!({"foo": 1})).is_failure());
    }

    #[test]
    fn test_partial_still_checks_null() {
        let codec = ObjectCodec::partial().field("foo", StringCodec::new());
        let errors = codec.decode(&json!({"foo": null})).into_result().unwrap_err();
        assert_eq!(errors.first().value, Some(Value::Null));
    }

    #[test]
    fn test_accumulates_all_fields() {
        let codec = ObjectCodec::required()
            .field("a", StringCodec::new())
            .field("b", StringCodec::new())
            .field("c", StringCodec::new());
        let errors = codec.decode(&json!({"b": "ok"})).into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unknown_properties_pass_through() {
        let codec = ObjectCodec::required().field("a", StringCodec::new());
        let decoded = codec.decode(&json!({"a": "x", "extra": 1})).into_result().unwrap();
        assert_eq!(decoded, json!({"a": "x", "extra": 1}));
    }

    #[test]
    fn test_rejects_non_object() {
        let codec = ObjectCodec::required();
        let errors = codec.decode(&json!([1])).into_result().unwrap_err();
        assert_eq!(errors.first().context.len(), 1);
    }

    #[test]
    fn test_props_in_declaration_order() {
        let codec = ObjectCodec::partial()
            .field("z", StringCodec::new())
            .field("a", StringCodec::new());
        assert_eq!(codec.props(), vec!["z".to_string(), "a".to_string()]);
        assert_eq!(codec.tag(), TypeTag::Partial);
        assert!(!codec.is_empty());
    }
}
