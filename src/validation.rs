use sea_orm::prelude::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const REQUIRED: &str = "This field is required.";

/// Message for a reference to a row that does not exist.
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn required_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }

    /// Checks a decimal against a `NUMERIC(max_digits, places)` column.
    ///
    /// Digits are counted as written: `1.50` has two decimal places.
    pub fn decimal(&mut self, field: &str, value: &Decimal, max_digits: u32, places: u32) {
        let scale = value.scale();
        let digits = count_digits(value.mantissa().unsigned_abs());
        // 0.05 has one significant digit but two decimal places.
        let total = digits.max(scale);
        let whole = total - scale;

        if total > max_digits {
            self.add(
                field,
                format!("Ensure that there are no more than {max_digits} digits in total."),
            );
        }
        if scale > places {
            self.add(
                field,
                format!("Ensure that there are no more than {places} decimal places."),
            );
        }
        if whole > max_digits - places {
            self.add(
                field,
                format!(
                    "Ensure that there are no more than {} digits before the decimal point.",
                    max_digits - places
                ),
            );
        }
    }

    // Raw JSON form values. A JSON `null` or a missing key reads as absent, and
    // so does a blank string for anything but text. A value of the wrong shape
    // is recorded against the field and also reads as absent.

    pub fn parse_text(&mut self, field: &str, raw: Option<Value>) -> Option<String> {
        match raw? {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.add(field, "Enter a valid value.");
                None
            }
        }
    }

    pub fn parse_decimal(&mut self, field: &str, raw: Option<Value>) -> Option<Decimal> {
        let text = match raw? {
            Value::Null => return None,
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let parsed = Decimal::from_str(&text).ok();
        if parsed.is_none() {
            self.add(field, "Enter a number.");
        }
        parsed
    }

    pub fn parse_integer(&mut self, field: &str, raw: Option<Value>) -> Option<i32> {
        let parsed = match raw? {
            Value::Null => return None,
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            _ => None,
        };
        if parsed.is_none() {
            self.add(field, "Enter a whole number.");
        }
        parsed
    }

    pub fn parse_bool(&mut self, field: &str, raw: Option<Value>) -> bool {
        match raw {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => matches!(s.trim(), "true" | "on" | "1"),
            Some(_) => {
                self.add(field, "Enter a valid value.");
                false
            }
        }
    }

    /// One of a fixed set of values, read through the type's serde names.
    pub fn parse_choice<T: DeserializeOwned>(&mut self, field: &str, raw: Option<Value>) -> Option<T> {
        let value = match raw? {
            Value::Null => return None,
            Value::String(s) if s.trim().is_empty() => return None,
            value => value,
        };
        match serde_json::from_value(value.clone()) {
            Ok(choice) => Some(choice),
            Err(_) => {
                let shown = match &value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self.add(
                    field,
                    format!("Select a valid choice. {shown} is not one of the available choices."),
                );
                None
            }
        }
    }

    /// Records a required-field error when `value` is absent and the field
    /// has no other error yet.
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() && self.get(field).is_none() {
            self.add(field, REQUIRED);
        }
        value
    }
}

/// Optional text input with blank values treated as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn count_digits(mut n: u128) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
