//! JSON decoding configuration and a path-tracking accessor over
//! [`serde_json::Value`].
//!
//! Event payloads are heterogeneous and versioned, so they are not
//! deserialized through derived `Deserialize` impls. Decoders walk the
//! parsed tree with [`Node`], which applies the coercion rules of one
//! explicit [`JsonConfig`] and reports failures as [`FieldError`]s that
//! carry the path of the offending field.

use std::fmt;

use serde_json::{Map, Value};

/// Codec configuration threaded into every payload decode.
///
/// Constructed once (usually as part of the session config) and passed
/// by reference; there is no global serializer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonConfig {
    /// Accept numeric strings where numbers are expected, integral floats
    /// where integers are expected, and `0`/`1` where booleans are.
    pub coerce_strings: bool,
    /// Match `cmd` discriminants case-insensitively.
    pub ignore_cmd_case: bool,
    /// Ignore a `:`-separated suffix on `cmd` (`DANMU_MSG:4:0:2:2:2:0`).
    pub strip_cmd_suffix: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            coerce_strings: true,
            ignore_cmd_case: true,
            strip_cmd_suffix: true,
        }
    }
}

impl JsonConfig {
    /// A configuration with every leniency switched off.
    pub fn strict() -> Self {
        Self {
            coerce_strings: false,
            ignore_cmd_case: false,
            strip_cmd_suffix: false,
        }
    }

    /// Trims the suffix off a raw `cmd` string when configured to.
    pub fn command_name<'c>(&self, cmd: &'c str) -> &'c str {
        if self.strip_cmd_suffix {
            cmd.split(':').next().unwrap_or(cmd)
        } else {
            cmd
        }
    }

    pub(crate) fn root<'a>(&'a self, value: &'a Value) -> Node<'a> {
        Node {
            value,
            config: self,
            path: String::from("$"),
        }
    }
}

/// Failure to extract a field from a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The key or index is absent (or `null`).
    #[error("missing field `{0}`")]
    Missing(String),

    /// The value exists but has the wrong JSON type.
    #[error("field `{field}` is not {expected}")]
    Mismatch {
        field: String,
        expected: &'static str,
    },

    /// The value has the right type but lies outside its enum domain.
    #[error("{kind} value {value} is out of range")]
    OutOfRange { kind: &'static str, value: String },
}

impl FieldError {
    /// Builds an [`OutOfRange`](Self::OutOfRange) error.
    pub(crate) fn out_of_range(kind: &'static str, value: impl fmt::Display) -> Self {
        Self::OutOfRange {
            kind,
            value: value.to_string(),
        }
    }
}

/// The runtime shape of an entity that has two legal encodings.
pub(crate) enum Shape<'a> {
    /// Compact fixed-position array.
    Array(Node<'a>),
    /// Verbose keyed object.
    Object(Node<'a>),
}

/// A position in a parsed JSON tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
    value: &'a Value,
    config: &'a JsonConfig,
    path: String,
}

impl<'a> Node<'a> {
    pub(crate) fn config(&self) -> &'a JsonConfig {
        self.config
    }

    fn child(&self, value: &'a Value, path: String) -> Node<'a> {
        Node {
            value,
            config: self.config,
            path,
        }
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> FieldError {
        FieldError::Mismatch {
            field: self.path.clone(),
            expected,
        }
    }

    fn object(&self) -> Result<&'a Map<String, Value>, FieldError> {
        self.value.as_object().ok_or_else(|| self.mismatch("an object"))
    }

    /// The value under `key`. Missing keys and `null` are both missing.
    pub(crate) fn get(&self, key: &str) -> Result<Node<'a>, FieldError> {
        let path = format!("{}.{key}", self.path);
        match self.object()?.get(key) {
            Some(Value::Null) | None => Err(FieldError::Missing(path)),
            Some(value) => Ok(self.child(value, path)),
        }
    }

    /// Like [`get`](Self::get) but absence is not an error.
    pub(crate) fn opt(&self, key: &str) -> Option<Node<'a>> {
        self.get(key).ok()
    }

    /// The element at `index` of an array.
    pub(crate) fn at(&self, index: usize) -> Result<Node<'a>, FieldError> {
        let path = format!("{}[{index}]", self.path);
        let array = self.value.as_array().ok_or_else(|| self.mismatch("an array"))?;
        match array.get(index) {
            Some(Value::Null) | None => Err(FieldError::Missing(path)),
            Some(value) => Ok(self.child(value, path)),
        }
    }

    /// All elements of an array.
    pub(crate) fn items(&self) -> Result<Vec<Node<'a>>, FieldError> {
        let array = self.value.as_array().ok_or_else(|| self.mismatch("an array"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, v)| self.child(v, format!("{}[{i}]", self.path)))
            .collect())
    }

    /// Detects whether this node is array- or object-encoded.
    pub(crate) fn shape(&self) -> Result<Shape<'a>, FieldError> {
        match self.value {
            Value::Array(_) => Ok(Shape::Array(self.clone())),
            Value::Object(_) => Ok(Shape::Object(self.clone())),
            _ => Err(self.mismatch("an array or object")),
        }
    }

    /// `true` for `[]` and `{}`.
    pub(crate) fn is_empty(&self) -> bool {
        match self.value {
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }

    pub(crate) fn str(&self) -> Result<&'a str, FieldError> {
        self.value.as_str().ok_or_else(|| self.mismatch("a string"))
    }

    /// A string, or with coercion any scalar rendered as one.
    pub(crate) fn string(&self) -> Result<String, FieldError> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) if self.config.coerce_strings => Ok(n.to_string()),
            _ => Err(self.mismatch("a string")),
        }
    }

    pub(crate) fn i64(&self) -> Result<i64, FieldError> {
        match self.value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| self.config.coerce_strings && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| self.mismatch("an integer")),
            Value::String(s) if self.config.coerce_strings => {
                s.trim().parse().map_err(|_| self.mismatch("an integer"))
            }
            _ => Err(self.mismatch("an integer")),
        }
    }

    pub(crate) fn u64(&self) -> Result<u64, FieldError> {
        match self.value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| {
                            self.config.coerce_strings && f.fract() == 0.0 && *f >= 0.0
                        })
                        .map(|f| f as u64)
                })
                .ok_or_else(|| self.mismatch("an unsigned integer")),
            Value::String(s) if self.config.coerce_strings => s
                .trim()
                .parse()
                .map_err(|_| self.mismatch("an unsigned integer")),
            _ => Err(self.mismatch("an unsigned integer")),
        }
    }

    pub(crate) fn u32(&self) -> Result<u32, FieldError> {
        u32::try_from(self.u64()?).map_err(|_| self.mismatch("a 32-bit unsigned integer"))
    }

    /// A boolean. `0`/`1` are always accepted since flags travel as
    /// integers; `"true"`/`"1"` style strings need coercion.
    pub(crate) fn bool(&self) -> Result<bool, FieldError> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(self.mismatch("a boolean flag")),
            },
            Value::String(s) if self.config.coerce_strings => match s.trim() {
                "0" | "false" => Ok(false),
                "1" | "true" => Ok(true),
                _ => Err(self.mismatch("a boolean flag")),
            },
            _ => Err(self.mismatch("a boolean flag")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_reports_path_on_missing() {
        let cfg = JsonConfig::default();
        let value = json!({"data": {"uid": 1}});
        let root = cfg.root(&value);
        let err = root.get("data").unwrap().get("uname").unwrap_err();
        assert_eq!(err, FieldError::Missing("$.data.uname".into()));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let cfg = JsonConfig::default();
        let value = json!({"face": null, "list": [null]});
        let root = cfg.root(&value);
        assert!(root.opt("face").is_none());
        assert!(matches!(
            root.get("list").unwrap().at(0),
            Err(FieldError::Missing(_))
        ));
    }

    #[test]
    fn test_numeric_string_coercion_follows_config() {
        let value = json!({"tid": "1635849093110200002"});

        let lenient = JsonConfig::default();
        let tid = lenient.root(&value).get("tid").unwrap().u64().unwrap();
        assert_eq!(tid, 1_635_849_093_110_200_002);

        let strict = JsonConfig::strict();
        let err = strict.root(&value).get("tid").unwrap().u64().unwrap_err();
        assert!(matches!(err, FieldError::Mismatch { .. }));
    }

    #[test]
    fn test_bool_accepts_flags_when_lenient() {
        let cfg = JsonConfig::default();
        let value = json!([1, 0, true, "1"]);
        let items = cfg.root(&value).items().unwrap();
        let flags: Vec<bool> = items.iter().map(|n| n.bool().unwrap()).collect();
        assert_eq!(flags, vec![true, false, true, true]);

        let strict = JsonConfig::strict();
        assert!(strict.root(&value).at(0).unwrap().bool().unwrap());
        assert!(strict.root(&value).at(3).unwrap().bool().is_err());
    }

    #[test]
    fn test_u32_rejects_wide_values() {
        let cfg = JsonConfig::default();
        let value = json!(5_000_000_000u64);
        assert!(cfg.root(&value).u32().is_err());
        assert_eq!(cfg.root(&value).u64().unwrap(), 5_000_000_000);
    }

    #[test]
    fn test_shape_detection() {
        let cfg = JsonConfig::default();
        let array = json!([1, 2]);
        let object = json!({"a": 1});
        let scalar = json!(3);
        assert!(matches!(cfg.root(&array).shape(), Ok(Shape::Array(_))));
        assert!(matches!(cfg.root(&object).shape(), Ok(Shape::Object(_))));
        assert!(cfg.root(&scalar).shape().is_err());
    }

    #[test]
    fn test_command_name_strips_suffix() {
        let cfg = JsonConfig::default();
        assert_eq!(cfg.command_name("DANMU_MSG:4:0:2:2:2:0"), "DANMU_MSG");
        assert_eq!(cfg.command_name("SEND_GIFT"), "SEND_GIFT");
        assert_eq!(
            JsonConfig::strict().command_name("DANMU_MSG:4:0"),
            "DANMU_MSG:4:0"
        );
    }
}
