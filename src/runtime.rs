//! Support library linked by generated service and message code.
//!
//! Generated services hold a [`Transport`], check call arguments against the
//! signatures of their overload set with [`check_arguments`] and forward the
//! call with the service classmap attached. Generated messages expose aliased
//! properties through [`get_property`] and [`set_property`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by generated code at call time.
pub enum CallError {
    /// No overload accepts the runtime argument types.
    #[error("invalid argument shape: no overload accepts {0}")]
    InvalidArgumentShape(String),
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    /// Failure reported by the transport executing the call.
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Dynamically typed argument or response value.
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Structured value tagged with the type it was built from.
pub struct Object {
    /// Type path, possibly qualified (`api::stock::Quote`).
    pub class: String,
    pub fields: JsonMap<String, JsonValue>,
}

impl Value {
    /// Runtime category used to build call signatures.
    ///
    /// Objects report their class name without any `::` module prefix.
    pub fn category(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(object) => object.class.rsplit("::").next().unwrap_or(&object.class),
        }
    }

    /// Builds an object value from a serializable message, tagged with the
    /// message's type path.
    pub fn message<T: Serialize>(message: &T) -> Result<Self, CallError> {
        let class = std::any::type_name::<T>().to_string();
        match serde_json::to_value(message) {
            Ok(JsonValue::Object(fields)) => Ok(Self::Object(Object { class, fields })),
            Ok(_) => Err(CallError::Encoding(format!(
                "'{class}' does not serialize to an object"
            ))),
            Err(e) => Err(CallError::Encoding(format!(
                "failed to serialize '{class}': {e}"
            ))),
        }
    }

    /// Decodes the value into a generated message or plain Rust type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, CallError> {
        serde_json::from_value(self.into_json())
            .map_err(|e| CallError::Encoding(format!("failed to decode value: {e}")))
    }

    /// Converts to plain JSON, dropping object class tags.
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Boolean(b) => JsonValue::Bool(b),
            Self::Integer(i) => JsonValue::from(i),
            Self::Float(f) => serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s),
            Self::Array(items) => JsonValue::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Object(object) => JsonValue::Object(object.fields),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion of call parameters into [`Value`]s.
///
/// Generated message types implement this through [`Value::message`].
pub trait IntoArgument {
    fn into_argument(self) -> Result<Value, CallError>;
}

macro_rules! into_argument_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgument for $ty {
                fn into_argument(self) -> Result<Value, CallError> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

into_argument_via_from!(i64, i32, f64, bool, String, &str);

impl IntoArgument for Value {
    fn into_argument(self) -> Result<Value, CallError> {
        Ok(self)
    }
}

impl<T: IntoArgument> IntoArgument for Vec<T> {
    fn into_argument(self) -> Result<Value, CallError> {
        self.into_iter()
            .map(IntoArgument::into_argument)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<T: IntoArgument> IntoArgument for Option<T> {
    fn into_argument(self) -> Result<Value, CallError> {
        self.map_or(Ok(Value::Null), IntoArgument::into_argument)
    }
}

impl<T: IntoArgument> IntoArgument for Box<T> {
    fn into_argument(self) -> Result<Value, CallError> {
        (*self).into_argument()
    }
}

/// Signature string of the runtime argument list, e.g. `(integer)(string)`.
pub fn signature_of(args: &[Value]) -> String {
    args.iter()
        .map(|arg| format!("({})", arg.category()))
        .collect()
}

/// Accepts `args` only if their signature exactly equals one of `valid`.
pub fn check_arguments(args: &[Value], valid: &[&str]) -> Result<(), CallError> {
    let actual = signature_of(args);
    if valid.contains(&actual.as_str()) {
        Ok(())
    } else {
        Err(CallError::InvalidArgumentShape(actual))
    }
}

/// Generated type name for a wire-level class name, from a service classmap.
pub fn lookup_class<'a>(classmap: &[(&'a str, &'a str)], wire_name: &str) -> Option<&'a str> {
    classmap
        .iter()
        .find(|(wire, _)| *wire == wire_name)
        .map(|(_, generated)| *generated)
}

fn wire_name<'a>(aliases: &[(&'a str, &'a str)], name: &'a str) -> &'a str {
    aliases
        .iter()
        .find(|(_, field)| *field == name)
        .map_or(name, |(wire, _)| *wire)
}

/// Reads a property of `message` by wire name or field name.
///
/// Returns `None` for unknown or unset properties.
pub fn get_property<T: Serialize>(
    message: &T,
    aliases: &[(&str, &str)],
    name: &str,
) -> Option<JsonValue> {
    let json = serde_json::to_value(message).ok()?;
    json.get(wire_name(aliases, name))
        .filter(|value| !value.is_null())
        .cloned()
}

/// Writes a property of `message` by wire name or field name.
pub fn set_property<T: Serialize + DeserializeOwned>(
    message: &mut T,
    aliases: &[(&str, &str)],
    name: &str,
    value: JsonValue,
) -> Result<(), CallError> {
    let wire = wire_name(aliases, name);
    let mut json = serde_json::to_value(&*message)
        .map_err(|e| CallError::Encoding(format!("failed to serialize message: {e}")))?;
    let object = json
        .as_object_mut()
        .ok_or_else(|| CallError::Encoding("message does not serialize to an object".into()))?;
    if !object.contains_key(wire) {
        return Err(CallError::UnknownProperty(name.to_string()));
    }
    object.insert(wire.to_string(), value);

    *message = serde_json::from_value(json)
        .map_err(|e| CallError::Encoding(format!("invalid value for '{name}': {e}")))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
/// One remote call as handed to a [`Transport`].
pub struct Call<'a> {
    /// Original wire-level operation name.
    pub operation: &'a str,
    pub arguments: Vec<Value>,
    /// Wire class name to generated type name, for routing responses.
    pub classmap: &'a [(&'a str, &'a str)],
}

/// Executes remote calls for generated services.
pub trait Transport {
    fn call(&self, call: Call<'_>) -> Result<Value, CallError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, call: Call<'_>) -> Result<Value, CallError> {
        (**self).call(call)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&self, call: Call<'_>) -> Result<Value, CallError> {
        (**self).call(call)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::{check_arguments, get_property, lookup_class, set_property, signature_of};
    use super::{CallError, IntoArgument, Value};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Quote {
        #[serde(default)]
        symbol: Option<String>,
    }

    #[test]
    fn categories_match_signature_tokens() {
        let args = vec![
            Value::from(7),
            Value::from(1.5),
            Value::from("x"),
            Value::from(vec![1i64, 2]),
            Value::Null,
            Value::from(true),
        ];
        assert_eq!(
            signature_of(&args),
            "(integer)(float)(string)(array)(null)(boolean)"
        );
        assert_eq!(signature_of(&[]), "");
    }

    #[test]
    fn message_objects_report_unqualified_class_names() {
        let value = Value::message(&Quote::default()).unwrap();
        assert_eq!(value.category(), "Quote");
        match value {
            Value::Object(object) => assert!(object.class.contains("::")),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn check_requires_exact_signature_match() {
        let valid = ["(string)", "(integer)(string)"];
        assert!(check_arguments(&[Value::from("a")], &valid).is_ok());
        assert!(check_arguments(&[Value::from(1), Value::from("a")], &valid).is_ok());

        let err = check_arguments(&[Value::from(1), Value::from(2)], &valid).unwrap_err();
        match err {
            CallError::InvalidArgumentShape(actual) => assert_eq!(actual, "(integer)(integer)"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(check_arguments(&[], &valid).is_err());
    }

    #[test]
    fn nested_vectors_convert_recursively() {
        let value = vec![vec![1i64], vec![2, 3]].into_argument().unwrap();
        assert_eq!(value.category(), "array");
        assert_eq!(value.into_json(), json!([[1], [2, 3]]));
    }

    #[test]
    fn decode_round_trips_messages() {
        let quote = Quote {
            symbol: Some("ACME".to_string()),
        };
        let decoded: Quote = Value::message(&quote).unwrap().decode().unwrap();
        assert_eq!(decoded.symbol.as_deref(), Some("ACME"));
    }

    #[test]
    fn classmap_lookup_routes_wire_names() {
        let classmap = [("Quote-Response", "QuoteResponse")];
        assert_eq!(lookup_class(&classmap, "Quote-Response"), Some("QuoteResponse"));
        assert_eq!(lookup_class(&classmap, "Other"), None);
    }

    #[test]
    fn set_property_rejects_unknown_names() {
        let mut quote = Quote::default();
        let err = set_property(&mut quote, &[], "price", json!(1)).unwrap_err();
        assert!(matches!(err, CallError::UnknownProperty(_)));
        set_property(&mut quote, &[], "symbol", json!("X")).unwrap();
        assert_eq!(get_property(&quote, &[], "symbol"), Some(json!("X")));
    }
}
