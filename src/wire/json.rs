use std::collections::HashSet;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Binary, DateTime, Decimal128, WireValue, WireWriter, WriteError};

/// Extended JSON output flavour
///
/// # Example
/// ```
/// use aggexpr::wire::{JsonMode, WireValue};
/// use serde_json::json;
///
/// let value = WireValue::Int32(3);
/// assert_eq!(JsonMode::Canonical.render(&value), json!({"$numberInt": "3"}));
/// assert_eq!(JsonMode::Relaxed.render(&value), json!(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    /// Every number and date is type-wrapped, so the text round-trips losslessly
    Canonical,
    /// Integers, finite doubles and recent dates are written in their natural JSON form
    #[default]
    Relaxed,
}

impl JsonMode {
    /// Render a value as Extended JSON in this mode
    pub fn render(self, value: &WireValue) -> Value {
        match self {
            JsonMode::Canonical => value.clone().into_canonical_extjson(),
            JsonMode::Relaxed => value.clone().into_relaxed_extjson(),
        }
    }

    /// Compact Extended JSON text of a value
    pub fn render_string(self, value: &WireValue) -> String {
        self.render(value).to_string()
    }
}

#[derive(Debug)]
enum JsonFrame {
    Document {
        names: HashSet<String>,
        pending_name: Option<String>,
    },
    Array {
        has_items: bool,
    },
}

/// A writer that streams Extended JSON text into any [`io::Write`]
///
/// The text is identical to [`JsonMode::render_string`] for the same value
/// and mode, but no tree is built along the way.
#[derive(Debug)]
pub struct JsonWriter<W: io::Write> {
    out: W,
    mode: JsonMode,
    stack: Vec<JsonFrame>,
    root_written: bool,
}

impl<W: io::Write> JsonWriter<W> {
    pub fn new(out: W, mode: JsonMode) -> Self {
        Self {
            out,
            mode,
            stack: Vec::new(),
            root_written: false,
        }
    }

    pub fn mode(&self) -> JsonMode {
        self.mode
    }

    /// Hand back the sink once a complete value has been written
    pub fn finish(mut self) -> Result<W, WriteError> {
        if !self.stack.is_empty() {
            return Err(WriteError::Incomplete {
                open: self.stack.len(),
            });
        }
        if !self.root_written {
            return Err(WriteError::Incomplete { open: 0 });
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn begin_value(&mut self) -> Result<(), WriteError> {
        match self.stack.last_mut() {
            None => {
                if self.root_written {
                    return Err(WriteError::RootAlreadyWritten);
                }
                self.root_written = true;
            }
            Some(JsonFrame::Array { has_items }) => {
                if *has_items {
                    self.out.write_all(b",")?;
                }
                *has_items = true;
            }
            Some(JsonFrame::Document { pending_name, .. }) => {
                if pending_name.take().is_none() {
                    return Err(WriteError::NameExpected);
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), WriteError> {
        serde_json::to_writer(&mut self.out, value).map_err(|err| WriteError::Io {
            message: err.to_string(),
        })
    }

    /// Render one scalar the same way the tree renderer does
    fn write_scalar(&mut self, value: WireValue) -> Result<(), WriteError> {
        self.begin_value()?;
        let rendered = self.mode.render(&value);
        self.write_json(&rendered)
    }
}

impl JsonWriter<Vec<u8>> {
    /// Finish and return the buffered text
    pub fn into_string(self) -> Result<String, WriteError> {
        let bytes = self.finish()?;
        String::from_utf8(bytes).map_err(|err| WriteError::Io {
            message: err.to_string(),
        })
    }
}

impl<W: io::Write> WireWriter for JsonWriter<W> {
    fn write_start_document(&mut self) -> Result<(), WriteError> {
        self.begin_value()?;
        self.out.write_all(b"{")?;
        self.stack.push(JsonFrame::Document {
            names: HashSet::new(),
            pending_name: None,
        });
        Ok(())
    }

    fn write_end_document(&mut self) -> Result<(), WriteError> {
        match self.stack.last() {
            Some(JsonFrame::Document {
                pending_name: Some(name),
                ..
            }) => return Err(WriteError::value_expected(name.clone())),
            Some(JsonFrame::Document { .. }) => {}
            Some(JsonFrame::Array { .. }) => {
                return Err(WriteError::unbalanced_end("document", "array"));
            }
            None => return Err(WriteError::unbalanced_end("document", "nothing")),
        }
        self.stack.pop();
        self.out.write_all(b"}")?;
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<(), WriteError> {
        self.begin_value()?;
        self.out.write_all(b"[")?;
        self.stack.push(JsonFrame::Array { has_items: false });
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), WriteError> {
        match self.stack.last() {
            Some(JsonFrame::Array { .. }) => {}
            Some(JsonFrame::Document { .. }) => {
                return Err(WriteError::unbalanced_end("array", "document"));
            }
            None => return Err(WriteError::unbalanced_end("array", "nothing")),
        }
        self.stack.pop();
        self.out.write_all(b"]")?;
        Ok(())
    }

    fn write_name(&mut self, name: &str) -> Result<(), WriteError> {
        let Some(JsonFrame::Document {
            names,
            pending_name,
        }) = self.stack.last_mut()
        else {
            return Err(WriteError::unexpected_name(name));
        };
        if let Some(existing) = pending_name {
            return Err(WriteError::value_expected(existing.clone()));
        }
        if names.contains(name) {
            return Err(WriteError::duplicate_name(name));
        }
        let first = names.is_empty();
        names.insert(name.to_string());
        *pending_name = Some(name.to_string());
        if !first {
            self.out.write_all(b",")?;
        }
        self.write_json(name)?;
        self.out.write_all(b":")?;
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Null)
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Boolean(value))
    }

    fn write_int32(&mut self, value: i32) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Int32(value))
    }

    fn write_int64(&mut self, value: i64) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Int64(value))
    }

    fn write_double(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Double(value))
    }

    fn write_decimal128(&mut self, value: Decimal128) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Decimal128(value))
    }

    fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        self.begin_value()?;
        self.write_json(value)
    }

    fn write_binary(&mut self, value: &Binary) -> Result<(), WriteError> {
        self.write_scalar(WireValue::Binary(value.clone()))
    }

    fn write_date_time(&mut self, value: DateTime) -> Result<(), WriteError> {
        self.write_scalar(WireValue::DateTime(value))
    }

    fn write_other(&mut self, value: &WireValue) -> Result<(), WriteError> {
        self.write_scalar(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{BinarySubtype, Document};
    use bson::{Bson, Timestamp, doc};
    use serde_json::json;

    fn decimal(text: &str) -> Decimal128 {
        text.parse().unwrap()
    }

    fn sample() -> WireValue {
        Bson::Document(doc! {
            "$dateAdd": {
                "startDate": DateTime::from_millis(1_709_280_000_000),
                "unit": "day",
                "amount": 3i64,
                "ratio": 0.25,
                "tags": ["a\"b", null, true],
                "price": decimal("1.50"),
                "blob": Binary { subtype: BinarySubtype::Generic, bytes: vec![1, 2, 3] },
                "old": DateTime::from_millis(-5),
                "ts": Timestamp { time: 7, increment: 1 },
            },
        })
    }

    fn stream(value: &WireValue, mode: JsonMode) -> String {
        let mut writer = JsonWriter::new(Vec::new(), mode);
        writer.write_value(value).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn test_canonical_scalars() {
        let mode = JsonMode::Canonical;
        assert_eq!(mode.render_string(&Bson::Int32(3)), r#"{"$numberInt":"3"}"#);
        assert_eq!(mode.render_string(&Bson::Int64(3)), r#"{"$numberLong":"3"}"#);
        assert_eq!(mode.render_string(&Bson::Double(1.5)), r#"{"$numberDouble":"1.5"}"#);
        assert_eq!(
            mode.render_string(&Bson::Double(f64::NAN)),
            r#"{"$numberDouble":"NaN"}"#
        );
        assert_eq!(
            mode.render_string(&Bson::Decimal128(decimal("1.50"))),
            r#"{"$numberDecimal":"1.50"}"#
        );
        assert_eq!(
            mode.render_string(&Bson::DateTime(DateTime::from_millis(0))),
            r#"{"$date":{"$numberLong":"0"}}"#
        );
    }

    #[test]
    fn test_relaxed_scalars() {
        let mode = JsonMode::Relaxed;
        assert_eq!(mode.render(&Bson::Int32(3)), json!(3));
        assert_eq!(mode.render(&Bson::Int64(3)), json!(3));
        assert_eq!(mode.render(&Bson::Double(1.5)), json!(1.5));
        assert_eq!(
            mode.render(&Bson::Double(f64::NEG_INFINITY)),
            json!({"$numberDouble": "-Infinity"})
        );
        assert_eq!(
            mode.render(&Bson::DateTime(DateTime::from_millis(-1))),
            json!({"$date": {"$numberLong": "-1"}})
        );
        let recent = mode.render(&Bson::DateTime(DateTime::from_millis(0)));
        assert!(recent["$date"].as_str().unwrap().starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_decimal_keeps_full_precision() {
        let value = Bson::Decimal128(decimal("1234567890123456789012345678901234"));
        assert_eq!(
            JsonMode::Relaxed.render(&value),
            json!({"$numberDecimal": "1234567890123456789012345678901234"})
        );
    }

    #[test]
    fn test_binary_rendering() {
        let value = Bson::Binary(Binary {
            subtype: BinarySubtype::Uuid,
            bytes: vec![0xab; 16],
        });
        assert_eq!(
            JsonMode::Relaxed.render(&value),
            json!({"$binary": {"base64": "q6urq6urq6urq6urq6urqw==", "subType": "04"}})
        );
    }

    #[test]
    fn test_document_field_order_in_text() {
        let value = Bson::Document(doc! { "z": 1, "a": 2 });
        assert_eq!(JsonMode::Relaxed.render_string(&value), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_streaming_matches_tree_rendering() {
        let value = sample();
        for mode in [JsonMode::Canonical, JsonMode::Relaxed] {
            assert_eq!(stream(&value, mode), mode.render_string(&value));
        }
    }

    #[test]
    fn test_streaming_empty_containers() {
        let value = Bson::Document(doc! { "$rand": Document::new(), "list": [] });
        assert_eq!(stream(&value, JsonMode::Relaxed), r#"{"$rand":{},"list":[]}"#);
    }

    #[test]
    fn test_json_writer_misuse() {
        let mut writer = JsonWriter::new(Vec::new(), JsonMode::Relaxed);
        writer.write_start_document().unwrap();
        assert_eq!(writer.write_int32(1), Err(WriteError::NameExpected));
        assert_eq!(
            writer.write_end_array(),
            Err(WriteError::unbalanced_end("array", "document"))
        );
        writer.write_name("a").unwrap();
        assert_eq!(writer.write_end_document(), Err(WriteError::value_expected("a")));
        assert!(matches!(
            writer.finish(),
            Err(WriteError::Incomplete { open: 1 })
        ));
    }

    #[test]
    fn test_json_writer_rejects_repeated_name() {
        let mut writer = JsonWriter::new(Vec::new(), JsonMode::Relaxed);
        writer.write_start_document().unwrap();
        writer.write_name("x").unwrap();
        writer.write_int32(1).unwrap();
        assert_eq!(writer.write_name("x"), Err(WriteError::duplicate_name("x")));
        writer.write_name("y").unwrap();
        writer.write_int32(2).unwrap();
        writer.write_end_document().unwrap();
        assert_eq!(writer.into_string().unwrap(), r#"{"x":1,"y":2}"#);
    }

    #[test]
    fn test_canonical_output_matches_schema() {
        let schema = json!({
            "type": "object",
            "required": ["$numberInt"],
            "properties": {
                "$numberInt": {"type": "string", "pattern": "^-?[0-9]+$"}
            },
            "additionalProperties": false
        });
        let validator = jsonschema::validator_for(&schema).unwrap();
        for value in [0, -17, i32::MAX] {
            let rendered = JsonMode::Canonical.render(&Bson::Int32(value));
            assert!(validator.is_valid(&rendered), "invalid: {}", rendered);
        }
    }

    #[test]
    fn test_json_mode_serde() {
        assert_eq!(serde_json::to_value(JsonMode::Canonical).unwrap(), json!("canonical"));
        let mode: JsonMode = serde_json::from_value(json!("relaxed")).unwrap();
        assert_eq!(mode, JsonMode::Relaxed);
        assert_eq!(JsonMode::default(), JsonMode::Relaxed);
    }
}
