//! Declarative Field Types
//!
//! Each recognized form field declares one semantic type from this module.
//! The parser in [`super::request`] dispatches on these types rather than
//! hand-rolling a conversion per field, so adding a parameter is a single
//! table entry (see [`super::request::FIELD_TABLE`]).

use crate::errors::{Result, ServerError};

/// The semantic type a form field's textual value is coerced into.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// A positive integer (`>0`), e.g. `width`, `height`.
    PositiveInt,
    /// A positive, finite floating-point value (`>0`), e.g. `near`, `focal_x`.
    PositiveFloat,
    /// Any finite floating-point value, e.g. `center_x`.
    FiniteFloat,
    /// An opaque string, passed through unvalidated (e.g. `scene_sha256`).
    Str,
    /// One of a fixed set of literal strings, e.g. `image_type`.
    Literal(&'static [&'static str]),
}

/// A coerced field value, tagged by the [`FieldType`] that produced it.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Int(u32),
    Float(f64),
    Str(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl FieldType {
    /// Coerces a raw form value according to this field's declared type.
    ///
    /// `field` is only used to build a descriptive [`ServerError::InvalidField`].
    pub fn coerce(self, field: &str, raw: &str) -> Result<FieldValue> {
        match self {
            FieldType::PositiveInt => {
                let v: i64 = raw.trim().parse().map_err(|_| ServerError::InvalidField {
                    field: field.to_string(),
                    reason: format!("'{raw}' is not an integer"),
                })?;
                if v <= 0 {
                    return Err(ServerError::InvalidField {
                        field: field.to_string(),
                        reason: format!("{v} is not a positive integer"),
                    });
                }
                Ok(FieldValue::Int(v as u32))
            }
            FieldType::PositiveFloat => {
                let v = parse_finite_float(field, raw)?;
                if v <= 0.0 {
                    return Err(ServerError::InvalidField {
                        field: field.to_string(),
                        reason: format!("{v} is not strictly positive"),
                    });
                }
                Ok(FieldValue::Float(v))
            }
            FieldType::FiniteFloat => Ok(FieldValue::Float(parse_finite_float(field, raw)?)),
            FieldType::Str => Ok(FieldValue::Str(raw.to_string())),
            FieldType::Literal(choices) => {
                if choices.contains(&raw) {
                    Ok(FieldValue::Str(raw.to_string()))
                } else {
                    Err(ServerError::InvalidField {
                        field: field.to_string(),
                        reason: format!("'{raw}' is not one of {choices:?}"),
                    })
                }
            }
        }
    }
}

fn parse_finite_float(field: &str, raw: &str) -> Result<f64> {
    let v: f64 = raw.trim().parse().map_err(|_| ServerError::InvalidField {
        field: field.to_string(),
        reason: format!("'{raw}' is not a number"),
    })?;
    if !v.is_finite() {
        return Err(ServerError::InvalidField {
            field: field.to_string(),
            reason: format!("'{raw}' is not finite"),
        });
    }
    Ok(v)
}
