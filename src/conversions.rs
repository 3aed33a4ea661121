//! Conversions between JSON values and DynamoDB `AttributeValue`.
//!
//! JSON has no binary or set types, so the mapping is lossy in one
//! direction: on the way out, binary renders as a base64 string and sets as
//! plain arrays; on the way in, arrays always become lists and binary cannot
//! be expressed. Callers that need B/SS/NS/BS construct `AttributeValue`
//! directly.

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Number, Value};

use crate::errors::{Error, Result};
use crate::store::Item;

/// Convert a JSON value to an `AttributeValue`.
///
/// Handles: string, number, bool, null, array, object.
pub fn to_attribute_value(value: &Value) -> Result<AttributeValue> {
    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::String(s) => Ok(AttributeValue::S(s.clone())),
        Value::Number(n) => Ok(AttributeValue::N(n.to_string())),
        Value::Array(items) => {
            let list = items
                .iter()
                .map(to_attribute_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(AttributeValue::L(list))
        }
        Value::Object(map) => {
            let mut out = std::collections::HashMap::new();
            for (k, v) in map {
                out.insert(k.clone(), to_attribute_value(v)?);
            }
            Ok(AttributeValue::M(out))
        }
    }
}

/// Convert a JSON object to an item (attribute-name → value map).
pub fn to_item(value: &Value) -> Result<Item> {
    let Value::Object(map) = value else {
        return Err(Error::Serialization(format!(
            "item must be a JSON object, got {}",
            json_type_name(value)
        )));
    };
    let mut item = Item::new();
    for (k, v) in map {
        item.insert(k.clone(), to_attribute_value(v)?);
    }
    Ok(item)
}

/// Convert an `AttributeValue` back to a JSON value.
pub fn from_attribute_value(value: AttributeValue) -> Result<Value> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s)),
        AttributeValue::N(n) => parse_number(&n),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::B(b) => Ok(Value::String(BASE64.encode(b.as_ref()))),
        AttributeValue::L(list) => {
            let items = list
                .into_iter()
                .map(from_attribute_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(items))
        }
        AttributeValue::M(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k, from_attribute_value(v)?);
            }
            Ok(Value::Object(out))
        }
        AttributeValue::Ss(ss) => Ok(Value::Array(ss.into_iter().map(Value::String).collect())),
        AttributeValue::Ns(ns) => {
            let numbers = ns
                .iter()
                .map(|n| parse_number(n))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(numbers))
        }
        AttributeValue::Bs(bs) => Ok(Value::Array(
            bs.into_iter()
                .map(|b| Value::String(BASE64.encode(b.as_ref())))
                .collect(),
        )),
        other => Err(Error::Serialization(format!(
            "unknown attribute value type: {:?}",
            other
        ))),
    }
}

/// Convert an item to a JSON object.
pub fn from_item(item: Item) -> Result<Value> {
    let mut out = Map::new();
    for (k, v) in item {
        out.insert(k, from_attribute_value(v)?);
    }
    Ok(Value::Object(out))
}

// Integers stay integers; anything with a decimal point or exponent parses
// as a float.
fn parse_number(n: &str) -> Result<Value> {
    if n.contains('.') || n.contains('e') || n.contains('E') {
        let f: f64 = n
            .parse()
            .map_err(|_| Error::Serialization(format!("invalid number: {}", n)))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| Error::Serialization(format!("non-finite number: {}", n)))
    } else {
        let i: i64 = n
            .parse()
            .map_err(|_| Error::Serialization(format!("invalid number: {}", n)))?;
        Ok(Value::Number(i.into()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
