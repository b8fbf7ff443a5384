//! Value coercion into destination kinds
//!
//! Conversions follow standard parse rules and are never silently lossy:
//! a string that does not parse, a float with a fractional part headed for an
//! integer field, an integer too large to be represented exactly as a float,
//! or a non-finite number all fail with a type mismatch. Decimal strings
//! parsed into floats round to the nearest `f64`.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::{describe_kind, FieldKind};
use serde_json::{Number, Value};

/// Coerce a resolved value into `kind`.
///
/// `raw` is `None` (or `Some(null)`) when the source value is absent, in which
/// case the default is converted instead. A default that cannot be converted
/// is a catalog error, not a record error.
pub fn coerce(field: &str, raw: Option<&Value>, kind: FieldKind, default: &Value) -> Result<Value> {
    match raw {
        Some(value) if !value.is_null() => convert(field, value, kind),
        _ => coerce_default(field, kind, default),
    }
}

/// Convert a destination default into its declared kind; `null` stays `null`
pub fn coerce_default(field: &str, kind: FieldKind, default: &Value) -> Result<Value> {
    if default.is_null() {
        return Ok(Value::Null);
    }

    convert(field, default, kind).map_err(|err| Error::Catalog {
        message: format!(
            "default value {} of destination field '{}' cannot be converted to {}: {}",
            default, field, kind, err
        ),
        entity: Some(field.to_string()),
    })
}

/// Convert a present, non-null value into `kind`
pub fn convert(field: &str, value: &Value, kind: FieldKind) -> Result<Value> {
    let converted = match kind {
        FieldKind::String => Some(to_string_value(value)),
        FieldKind::Float => to_float(value),
        FieldKind::Integer => to_integer(value),
        FieldKind::Boolean => to_boolean(value),
        FieldKind::List => value.is_array().then(|| value.clone()),
        FieldKind::Mapping => value.is_object().then(|| value.clone()),
    };

    converted.ok_or_else(|| mismatch(field, kind, value))
}

/// Build the mismatch error for `value` headed to `expected`
pub(crate) fn mismatch(field: &str, expected: FieldKind, value: &Value) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
        found: describe_kind(value),
        value: value.to_string(),
    }
}

fn to_string_value(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Null => Value::String(String::new()),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
    }
}

fn to_float(value: &Value) -> Option<Value> {
    let number = match value {
        Value::Number(n) => exact_f64(n)?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };

    Number::from_f64(number).map(Value::Number)
}

/// The number as an `f64`, or `None` if it is an integer the float rounds
fn exact_f64(n: &Number) -> Option<f64> {
    if let Some(i) = n.as_i64() {
        let f = i as f64;
        return (f as i128 == i128::from(i)).then_some(f);
    }
    if let Some(u) = n.as_u64() {
        let f = u as f64;
        return (f as u128 == u128::from(u)).then_some(f);
    }
    n.as_f64()
}

fn to_integer(value: &Value) -> Option<Value> {
    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < i64::MIN as f64 || f >= i64::MAX as f64 {
                    return None;
                }
                f as i64
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };

    Some(Value::Number(Number::from(number)))
}

fn to_boolean(value: &Value) -> Option<Value> {
    let flag = match value {
        Value::Bool(b) => *b,
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => true,
            "false" | "no" | "0" | "off" => false,
            _ => return None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => true,
            Some(f) if f == 0.0 => false,
            _ => return None,
        },
        _ => return None,
    };

    Some(Value::Bool(flag))
}
