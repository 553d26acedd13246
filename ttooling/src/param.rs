//! Parameter type tags and best-effort argument coercion.
//!
//! Coercion is total: a value is converted to the declared type when that is
//! possible and returned unchanged otherwise. It never fails.
//!
//! ```rust
//! use serde_json::json;
//! use ttooling::ParamType;
//!
//! assert_eq!(ParamType::Int.coerce(json!("5")), json!(5));
//! assert_eq!(ParamType::Float.coerce(json!(2)), json!(2.0));
//! assert_eq!(ParamType::Int.coerce(json!("five")), json!("five"));
//! assert_eq!("integer".parse::<ParamType>().unwrap(), ParamType::Int);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Int,
    Float,
    Str,
    Bool,
    List,
    Dict,
    Any,
}

impl ParamType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Any => "any",
        }
    }

    pub fn coerce(&self, value: Value) -> Value {
        let converted = match self {
            Self::Int => to_int(&value),
            Self::Float => to_float(&value),
            Self::Str => to_str(&value),
            Self::Bool => to_bool(&value),
            Self::List => decode_embedded(&value, Value::is_array),
            Self::Dict => decode_embedded(&value, Value::is_object),
            Self::Any => None,
        };

        converted.unwrap_or(value)
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ParamType {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "float" | "number" => Ok(Self::Float),
            "str" | "string" => Ok(Self::Str),
            "bool" | "boolean" => Ok(Self::Bool),
            "list" | "array" => Ok(Self::List),
            "dict" | "object" => Ok(Self::Dict),
            "any" | "" => Ok(Self::Any),
            other => Err(ToolError::invalid_arguments(format!(
                "unknown parameter type '{other}'"
            ))),
        }
    }
}

impl Serialize for ParamType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

fn to_int(value: &Value) -> Option<Value> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(value.clone()),
        Value::Number(number) => {
            let float = number.as_f64()?;
            let truncated = float.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64
            {
                Some(Value::from(truncated as i64))
            } else {
                None
            }
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .map(Value::from)
                .or_else(|_| text.parse::<u64>().map(Value::from))
                .ok()
        }
        Value::Bool(flag) => Some(Value::from(i64::from(*flag))),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<Value> {
    let float = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        _ => return None,
    };

    Number::from_f64(float).map(Value::Number)
}

fn to_str(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) | Value::Null => None,
        Value::Number(number) => Some(Value::String(number.to_string())),
        Value::Bool(flag) => Some(Value::String(flag.to_string())),
        Value::Array(_) | Value::Object(_) => Some(Value::String(value.to_string())),
    }
}

fn to_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => None,
        Value::Number(number) => number.as_f64().map(|float| Value::Bool(float != 0.0)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn decode_embedded(value: &Value, accept: fn(&Value) -> bool) -> Option<Value> {
    match value {
        Value::String(text) => serde_json::from_str::<Value>(text)
            .ok()
            .filter(|decoded| accept(decoded)),
        _ => None,
    }
}

/// A declared `{name, type}` parameter descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Any)
    }
}

/// Maps a Rust parameter type to the tag advertised in tool schemas.
pub trait ToolParam {
    fn param_type() -> ParamType;
}

macro_rules! tool_param {
    ($tag:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl ToolParam for $ty {
                fn param_type() -> ParamType {
                    $tag
                }
            }
        )+
    };
}

tool_param!(ParamType::Int => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
tool_param!(ParamType::Float => f32, f64);
tool_param!(ParamType::Str => String, char);
tool_param!(ParamType::Bool => bool);
tool_param!(ParamType::Dict => Map<String, Value>);
tool_param!(ParamType::Any => Value);

impl<T> ToolParam for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::List
    }
}

impl<T> ToolParam for HashMap<String, T> {
    fn param_type() -> ParamType {
        ParamType::Dict
    }
}

impl<T> ToolParam for BTreeMap<String, T> {
    fn param_type() -> ParamType {
        ParamType::Dict
    }
}

impl<T> ToolParam for Option<T>
where
    T: ToolParam,
{
    fn param_type() -> ParamType {
        T::param_type()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn int_coercion_table() {
        assert_eq!(ParamType::Int.coerce(json!(7)), json!(7));
        assert_eq!(ParamType::Int.coerce(json!(" 42 ")), json!(42));
        assert_eq!(ParamType::Int.coerce(json!("-3")), json!(-3));
        assert_eq!(ParamType::Int.coerce(json!(3.9)), json!(3));
        assert_eq!(ParamType::Int.coerce(json!(-3.9)), json!(-3));
        assert_eq!(ParamType::Int.coerce(json!(true)), json!(1));
        assert_eq!(ParamType::Int.coerce(json!("4.5")), json!("4.5"));
        assert_eq!(ParamType::Int.coerce(json!([1])), json!([1]));
        assert_eq!(ParamType::Int.coerce(Value::Null), Value::Null);
    }

    #[test]
    fn float_coercion_table() {
        assert_eq!(ParamType::Float.coerce(json!(2)), json!(2.0));
        assert_eq!(ParamType::Float.coerce(json!("1.5")), json!(1.5));
        assert_eq!(ParamType::Float.coerce(json!(false)), json!(0.0));
        assert_eq!(ParamType::Float.coerce(json!("NaN")), json!("NaN"));
        assert_eq!(ParamType::Float.coerce(json!("warm")), json!("warm"));
    }

    #[test]
    fn str_coercion_table() {
        assert_eq!(ParamType::Str.coerce(json!("Delhi")), json!("Delhi"));
        assert_eq!(ParamType::Str.coerce(json!(32)), json!("32"));
        assert_eq!(ParamType::Str.coerce(json!(true)), json!("true"));
        assert_eq!(ParamType::Str.coerce(json!({"a": 1})), json!("{\"a\":1}"));
        assert_eq!(ParamType::Str.coerce(Value::Null), Value::Null);
    }

    #[test]
    fn bool_coercion_table() {
        assert_eq!(ParamType::Bool.coerce(json!("Yes")), json!(true));
        assert_eq!(ParamType::Bool.coerce(json!("off")), json!(false));
        assert_eq!(ParamType::Bool.coerce(json!(0)), json!(false));
        assert_eq!(ParamType::Bool.coerce(json!(2.5)), json!(true));
        assert_eq!(ParamType::Bool.coerce(json!("maybe")), json!("maybe"));
    }

    #[test]
    fn collection_coercion_decodes_embedded_json() {
        assert_eq!(ParamType::List.coerce(json!("[1, 2]")), json!([1, 2]));
        assert_eq!(ParamType::List.coerce(json!("{\"a\":1}")), json!("{\"a\":1}"));
        assert_eq!(ParamType::Dict.coerce(json!("{\"a\":1}")), json!({"a": 1}));
        assert_eq!(ParamType::Dict.coerce(json!(5)), json!(5));
        assert_eq!(ParamType::Any.coerce(json!("5")), json!("5"));
    }

    #[test]
    fn tags_parse_with_aliases_and_reject_unknown() {
        assert_eq!("STRING".parse::<ParamType>().expect("alias"), ParamType::Str);
        assert_eq!("object".parse::<ParamType>().expect("alias"), ParamType::Dict);
        assert!("matrix".parse::<ParamType>().is_err());
        assert_eq!(ParamType::List.to_string(), "list");
    }

    #[test]
    fn rust_types_map_to_tags() {
        assert_eq!(<i64 as ToolParam>::param_type(), ParamType::Int);
        assert_eq!(<f32 as ToolParam>::param_type(), ParamType::Float);
        assert_eq!(<Option<String> as ToolParam>::param_type(), ParamType::Str);
        assert_eq!(<Vec<u8> as ToolParam>::param_type(), ParamType::List);
        assert_eq!(
            <HashMap<String, i32> as ToolParam>::param_type(),
            ParamType::Dict
        );
        assert_eq!(<Value as ToolParam>::param_type(), ParamType::Any);
    }
}
