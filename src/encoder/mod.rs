/// The value encoder
///
/// Converts [`Expr`] operands into wire values, either eagerly as a
/// [`WireValue`] tree or lazily as calls against a [`WireWriter`]. Both paths
/// follow the same dispatch table, so a lazily written value captured into a
/// tree equals the eagerly encoded one.

mod error;
mod expr;
mod foreign;
pub mod keywords;

pub use error::EncodeError;
pub use expr::Expr;
pub use foreign::{CodecRegistry, ForeignValue};
pub use keywords::{DateUnit, Keyword, MetaDataKeyword, ParseKeywordError, Timezone, WireType};

use std::any::Any;

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EncoderConfig;
use crate::operators::Operator;
use crate::wire::{Binary, BinarySubtype, Decimal128, Document, Uuid, WireValue, WireWriter, WriteError};

/// What to do with a foreign value that has no registered codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Encode the value's `Display` text as a string and log a warning
    #[default]
    Stringify,
    /// Fail with [`EncodeError::Unrepresentable`]
    Reject,
}

/// Encodes expressions into wire values
///
/// The encoder is immutable once built: `with_*` methods return a new
/// encoder. Cloning shares the registered codecs.
///
/// # Example
/// ```
/// use aggexpr::{Encoder, Expr, FallbackPolicy, WireValue};
///
/// let encoder = Encoder::new().with_fallback(FallbackPolicy::Reject);
/// assert_eq!(encoder.encode(&Expr::from(3i8)).unwrap(), WireValue::Int32(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    codecs: CodecRegistry,
    fallback: FallbackPolicy,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an encoder from configuration
    pub fn from_config(config: &EncoderConfig) -> Self {
        debug!("building encoder with fallback policy {:?}", config.fallback);
        Self::new().with_fallback(config.fallback)
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Register a codec for a foreign value type
    pub fn with_codec<T, F>(mut self, codec: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> WireValue + Send + Sync + 'static,
    {
        debug!("registering codec for {}", std::any::type_name::<T>());
        self.codecs.register(codec);
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Encode an expression into a wire value tree
    pub fn encode(&self, expr: &Expr) -> Result<WireValue, EncodeError> {
        Ok(match expr {
            Expr::Null => WireValue::Null,
            Expr::Wire(value) => value.clone(),
            Expr::Int32(value) => WireValue::Int32(*value),
            Expr::Int64(value) => WireValue::Int64(*value),
            Expr::BigInt(value) => WireValue::Decimal128(decimal_from_text(&value.to_string())?),
            Expr::Double(value) => WireValue::Double(*value),
            Expr::Decimal(value) => WireValue::Decimal128(decimal_from_rust(value)?),
            Expr::NumberText(text) => WireValue::Decimal128(decimal_from_text(text)?),
            Expr::String(value) => WireValue::String(value.clone()),
            Expr::Boolean(value) => WireValue::Boolean(*value),
            Expr::DateTime(value) => WireValue::DateTime(*value),
            Expr::Bytes(bytes) => WireValue::Binary(generic_binary(bytes)),
            Expr::Uuid(uuid) => WireValue::Binary(uuid_binary(uuid)),
            Expr::Keyword(keyword) => keyword.to_wire_value(),
            Expr::Array(items) => WireValue::Array(
                items
                    .iter()
                    .map(|item| self.encode(item))
                    .collect::<Result<_, _>>()?,
            ),
            Expr::Map(entries) => {
                let mut document = Document::new();
                for (key, value) in entries {
                    if document.contains_key(key) {
                        return Err(WriteError::duplicate_name(key.as_str()).into());
                    }
                    document.insert(key.as_str(), self.encode(value)?);
                }
                WireValue::Document(document)
            }
            Expr::Json(value) => json_wire_value(value)?,
            Expr::Operator(operator) => self.encode_operator(operator)?,
            Expr::Foreign(value) => self.encode_foreign(value.as_ref())?,
        })
    }

    /// Drive a writer with the calls that produce the expression's wire value
    pub fn encode_into(&self, writer: &mut dyn WireWriter, expr: &Expr) -> Result<(), EncodeError> {
        match expr {
            Expr::Null => writer.write_null()?,
            Expr::Wire(value) => writer.write_value(value)?,
            Expr::Int32(value) => writer.write_int32(*value)?,
            Expr::Int64(value) => writer.write_int64(*value)?,
            Expr::BigInt(value) => writer.write_decimal128(decimal_from_text(&value.to_string())?)?,
            Expr::Double(value) => writer.write_double(*value)?,
            Expr::Decimal(value) => writer.write_decimal128(decimal_from_rust(value)?)?,
            Expr::NumberText(text) => writer.write_decimal128(decimal_from_text(text)?)?,
            Expr::String(value) => writer.write_string(value)?,
            Expr::Boolean(value) => writer.write_boolean(*value)?,
            Expr::DateTime(value) => writer.write_date_time(*value)?,
            Expr::Bytes(bytes) => writer.write_binary(&generic_binary(bytes))?,
            Expr::Uuid(uuid) => writer.write_binary(&uuid_binary(uuid))?,
            Expr::Keyword(keyword) => writer.write_value(&keyword.to_wire_value())?,
            Expr::Array(items) => {
                writer.write_start_array()?;
                for item in items {
                    self.encode_into(writer, item)?;
                }
                writer.write_end_array()?;
            }
            Expr::Map(entries) => {
                writer.write_start_document()?;
                for (key, value) in entries {
                    writer.write_name(key)?;
                    self.encode_into(writer, value)?;
                }
                writer.write_end_document()?;
            }
            Expr::Json(value) => write_json_value(writer, value)?,
            Expr::Operator(operator) => self.write_operator(writer, operator)?,
            Expr::Foreign(value) => {
                let encoded = self.encode_foreign(value.as_ref())?;
                writer.write_value(&encoded)?;
            }
        }
        Ok(())
    }

    /// Encode an operator as its single-field document `{keyword: payload}`
    pub fn encode_operator(&self, operator: &Operator) -> Result<WireValue, EncodeError> {
        Ok(WireValue::Document(operator.to_document_with(self)?))
    }

    /// Write an operator document into a writer
    pub fn write_operator(&self, writer: &mut dyn WireWriter, operator: &Operator) -> Result<(), EncodeError> {
        operator.write_into_with(writer, self)
    }

    fn encode_foreign(&self, value: &dyn ForeignValue) -> Result<WireValue, EncodeError> {
        if let Some(encoded) = self.codecs.encode(value) {
            return Ok(encoded);
        }
        match self.fallback {
            FallbackPolicy::Stringify => {
                warn!(
                    "no codec registered for {}; encoding its text form instead",
                    value.type_name()
                );
                Ok(WireValue::String(value.to_string()))
            }
            FallbackPolicy::Reject => Err(EncodeError::unrepresentable(value.type_name())),
        }
    }
}

fn generic_binary(bytes: &[u8]) -> Binary {
    Binary {
        subtype: BinarySubtype::Generic,
        bytes: bytes.to_vec(),
    }
}

fn uuid_binary(uuid: &Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: uuid.bytes().to_vec(),
    }
}

/// Significant digits a 128-bit decimal holds
const DECIMAL128_DIGITS: usize = 34;

/// Normalized form of decimal number text, or `None` when it is not a number
///
/// Accepts an optional sign, digits with at most one point, an optional
/// exponent, and the special values `NaN`, `Inf` and `Infinity` in any case.
fn normalize_number_text(text: &str) -> Option<String> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };
    let lower = unsigned.to_ascii_lowercase();
    match lower.as_str() {
        "nan" => return Some("NaN".to_string()),
        "inf" | "infinity" => return Some(format!("{}Infinity", sign)),
        _ => {}
    }
    let (mantissa, exponent) = match lower.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (lower.as_str(), None),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.len() + fraction.len() == 0 || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !all_digits(digits) {
            return None;
        }
    }
    Some(format!("{}{}", sign, lower))
}

/// Parse decimal number text into a 128-bit decimal
///
/// Malformed text is an [`EncodeError::InvalidNumber`]; well-formed text that
/// needs more than 34 significant digits or an exponent beyond the decimal's
/// range is an [`EncodeError::NumberOutOfRange`].
fn decimal_from_text(text: &str) -> Result<Decimal128, EncodeError> {
    let normalized = normalize_number_text(text).ok_or_else(|| EncodeError::invalid_number(text))?;
    let mantissa = normalized.split('e').next().unwrap_or_default();
    let significant = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .skip_while(|b| *b == b'0')
        .collect::<Vec<_>>();
    let trailing_zeros = significant.iter().rev().take_while(|b| **b == b'0').count();
    if significant.len() - trailing_zeros > DECIMAL128_DIGITS {
        return Err(EncodeError::number_out_of_range(text));
    }
    normalized
        .parse::<Decimal128>()
        .map_err(|_| EncodeError::number_out_of_range(text))
}

fn decimal_from_rust(value: &Decimal) -> Result<Decimal128, EncodeError> {
    let text = value.to_string();
    text.parse::<Decimal128>()
        .map_err(|_| EncodeError::invalid_number(text))
}

fn json_number(number: &serde_json::Number) -> Result<WireValue, EncodeError> {
    if let Some(value) = number.as_i64() {
        return Ok(match i32::try_from(value) {
            Ok(value) => WireValue::Int32(value),
            Err(_) => WireValue::Int64(value),
        });
    }
    if let Some(value) = number.as_u64() {
        return Ok(WireValue::Decimal128(decimal_from_text(&value.to_string())?));
    }
    Ok(WireValue::Double(number.as_f64().unwrap_or(f64::NAN)))
}

fn json_wire_value(value: &serde_json::Value) -> Result<WireValue, EncodeError> {
    Ok(match value {
        serde_json::Value::Null => WireValue::Null,
        serde_json::Value::Bool(value) => WireValue::Boolean(*value),
        serde_json::Value::Number(number) => json_number(number)?,
        serde_json::Value::String(value) => WireValue::String(value.clone()),
        serde_json::Value::Array(items) => WireValue::Array(
            items
                .iter()
                .map(json_wire_value)
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(entries) => {
            let mut document = Document::new();
            for (key, value) in entries {
                document.insert(key.as_str(), json_wire_value(value)?);
            }
            WireValue::Document(document)
        }
    })
}

fn write_json_value(writer: &mut dyn WireWriter, value: &serde_json::Value) -> Result<(), EncodeError> {
    match value {
        serde_json::Value::Array(items) => {
            writer.write_start_array()?;
            for item in items {
                write_json_value(writer, item)?;
            }
            writer.write_end_array()?;
        }
        serde_json::Value::Object(entries) => {
            writer.write_start_document()?;
            for (key, value) in entries {
                writer.write_name(key)?;
                write_json_value(writer, value)?;
            }
            writer.write_end_document()?;
        }
        scalar => writer.write_value(&json_wire_value(scalar)?)?,
    }
    Ok(())
}
