//! Per-field request validation. Every failure is collected so one response can list them all.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const BLANK: &str = "can't be blank";
pub const NOT_A_BOOLEAN: &str = "must be true or false";
pub const NOT_A_NUMBER: &str = "is not a number";
pub const NOT_AN_INTEGER: &str = "must be an integer";
pub const NOT_TEXT: &str = "must be text";
pub const NOT_A_DATE: &str = "is not a valid date";
pub const MUST_EXIST: &str = "must exist";

/// Field name -> messages, ordered by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.0).unwrap_or(Value::Null)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{} {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Reads typed fields out of a request body, recording a message for each failure.
///
/// Missing fields are only an error when `Presence::Required`. A field that is
/// present but null or blank is always an error: updates may omit a field but
/// never clear it.
pub struct FieldReader<'a> {
    params: &'a HashMap<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(params: &'a HashMap<String, Value>) -> Self {
        Self {
            params,
            errors: FieldErrors::default(),
        }
    }

    pub fn string(&mut self, field: &str, presence: Presence) -> Option<String> {
        self.read(field, presence, |v| match v {
            Value::String(s) => Ok(s.clone()),
            _ => Err(NOT_TEXT),
        })
    }

    pub fn boolean(&mut self, field: &str, presence: Presence) -> Option<bool> {
        self.read(field, presence, |v| match v {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(true),
                Some(0) => Ok(false),
                _ => Err(NOT_A_BOOLEAN),
            },
            Value::String(s) => cast_bool(s).ok_or(NOT_A_BOOLEAN),
            _ => Err(NOT_A_BOOLEAN),
        })
    }

    pub fn integer(&mut self, field: &str, presence: Presence) -> Option<i64> {
        self.read(field, presence, |v| match v {
            Value::Number(n) => n.as_i64().ok_or(NOT_AN_INTEGER),
            Value::String(s) => cast_integer(s),
            _ => Err(NOT_A_NUMBER),
        })
    }

    pub fn date(&mut self, field: &str, presence: Presence) -> Option<NaiveDate> {
        self.read(field, presence, |v| match v {
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| NOT_A_DATE),
            _ => Err(NOT_A_DATE),
        })
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn read<T>(
        &mut self,
        field: &str,
        presence: Presence,
        cast: impl FnOnce(&Value) -> Result<T, &'static str>,
    ) -> Option<T> {
        match self.params.get(field) {
            None => {
                if presence == Presence::Required {
                    self.errors.add(field, BLANK);
                }
                None
            }
            Some(v) if is_blank(v) => {
                self.errors.add(field, BLANK);
                None
            }
            Some(v) => match cast(v) {
                Ok(t) => Some(t),
                Err(message) => {
                    self.errors.add(field, message);
                    None
                }
            },
        }
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cast_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "on" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "off" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn cast_integer(s: &str) -> Result<i64, &'static str> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    if s.parse::<f64>().is_ok() {
        Err(NOT_AN_INTEGER)
    } else {
        Err(NOT_A_NUMBER)
    }
}
