use super::{Binary, DateTime, Decimal128, Document, WireValue, WriteError};

/// A sink for wire values written one primitive at a time
///
/// Inside a document every value must be preceded by [`write_name`](WireWriter::write_name),
/// and a name may appear only once per document. Inside an array and at the
/// top level values are written bare.
pub trait WireWriter {
    fn write_start_document(&mut self) -> Result<(), WriteError>;
    fn write_end_document(&mut self) -> Result<(), WriteError>;
    fn write_start_array(&mut self) -> Result<(), WriteError>;
    fn write_end_array(&mut self) -> Result<(), WriteError>;
    fn write_name(&mut self, name: &str) -> Result<(), WriteError>;
    fn write_null(&mut self) -> Result<(), WriteError>;
    fn write_boolean(&mut self, value: bool) -> Result<(), WriteError>;
    fn write_int32(&mut self, value: i32) -> Result<(), WriteError>;
    fn write_int64(&mut self, value: i64) -> Result<(), WriteError>;
    fn write_double(&mut self, value: f64) -> Result<(), WriteError>;
    fn write_decimal128(&mut self, value: Decimal128) -> Result<(), WriteError>;
    fn write_string(&mut self, value: &str) -> Result<(), WriteError>;
    fn write_binary(&mut self, value: &Binary) -> Result<(), WriteError>;
    fn write_date_time(&mut self, value: DateTime) -> Result<(), WriteError>;

    /// Write a value kind with no dedicated call, such as an object id or a timestamp
    fn write_other(&mut self, value: &WireValue) -> Result<(), WriteError>;

    /// Write a pre-built value through the primitive calls above
    fn write_value(&mut self, value: &WireValue) -> Result<(), WriteError> {
        match value {
            WireValue::Null => self.write_null(),
            WireValue::Boolean(value) => self.write_boolean(*value),
            WireValue::Int32(value) => self.write_int32(*value),
            WireValue::Int64(value) => self.write_int64(*value),
            WireValue::Double(value) => self.write_double(*value),
            WireValue::Decimal128(value) => self.write_decimal128(*value),
            WireValue::String(value) => self.write_string(value),
            WireValue::Binary(value) => self.write_binary(value),
            WireValue::DateTime(value) => self.write_date_time(*value),
            WireValue::Array(items) => {
                self.write_start_array()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.write_end_array()
            }
            WireValue::Document(document) => {
                self.write_start_document()?;
                for (name, value) in document {
                    self.write_name(name)?;
                    self.write_value(value)?;
                }
                self.write_end_document()
            }
            other => self.write_other(other),
        }
    }
}

#[derive(Debug)]
enum Frame {
    Document {
        document: Document,
        pending_name: Option<String>,
    },
    Array(Vec<WireValue>),
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::Document { .. } => "document",
            Frame::Array(_) => "array",
        }
    }
}

/// A writer that captures everything written into a [`WireValue`] tree
///
/// # Example
/// ```
/// use aggexpr::wire::{DocumentWriter, WireValue, WireWriter};
///
/// let mut writer = DocumentWriter::new();
/// writer.write_start_document().unwrap();
/// writer.write_name("$abs").unwrap();
/// writer.write_int32(-1).unwrap();
/// writer.write_end_document().unwrap();
///
/// let value = writer.into_value().unwrap();
/// assert_eq!(value.as_document().unwrap().get("$abs"), Some(&WireValue::Int32(-1)));
/// ```
#[derive(Debug, Default)]
pub struct DocumentWriter {
    stack: Vec<Frame>,
    root: Option<WireValue>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the captured value; fails if containers are still open or nothing was written
    pub fn into_value(self) -> Result<WireValue, WriteError> {
        if !self.stack.is_empty() {
            return Err(WriteError::Incomplete {
                open: self.stack.len(),
            });
        }
        self.root.ok_or(WriteError::Incomplete { open: 0 })
    }

    /// Check that a value may start at the current position
    fn check_value_position(&self) -> Result<(), WriteError> {
        match self.stack.last() {
            None if self.root.is_some() => Err(WriteError::RootAlreadyWritten),
            Some(Frame::Document {
                pending_name: None, ..
            }) => Err(WriteError::NameExpected),
            _ => Ok(()),
        }
    }

    fn push_value(&mut self, value: WireValue) -> Result<(), WriteError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(WriteError::RootAlreadyWritten);
                }
                self.root = Some(value);
            }
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Document {
                document,
                pending_name,
            }) => {
                let name = pending_name.take().ok_or(WriteError::NameExpected)?;
                document.insert(name, value);
            }
        }
        Ok(())
    }
}

impl WireWriter for DocumentWriter {
    fn write_start_document(&mut self) -> Result<(), WriteError> {
        self.check_value_position()?;
        self.stack.push(Frame::Document {
            document: Document::new(),
            pending_name: None,
        });
        Ok(())
    }

    fn write_end_document(&mut self) -> Result<(), WriteError> {
        match self.stack.pop() {
            Some(Frame::Document {
                document,
                pending_name: None,
            }) => self.push_value(WireValue::Document(document)),
            Some(Frame::Document {
                pending_name: Some(name),
                ..
            }) => Err(WriteError::value_expected(name)),
            Some(frame) => {
                let open = frame.kind();
                self.stack.push(frame);
                Err(WriteError::unbalanced_end("document", open))
            }
            None => Err(WriteError::unbalanced_end("document", "nothing")),
        }
    }

    fn write_start_array(&mut self) -> Result<(), WriteError> {
        self.check_value_position()?;
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), WriteError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push_value(WireValue::Array(items)),
            Some(frame) => {
                let open = frame.kind();
                self.stack.push(frame);
                Err(WriteError::unbalanced_end("array", open))
            }
            None => Err(WriteError::unbalanced_end("array", "nothing")),
        }
    }

    fn write_name(&mut self, name: &str) -> Result<(), WriteError> {
        match self.stack.last_mut() {
            Some(Frame::Document {
                document,
                pending_name,
            }) => {
                if let Some(existing) = pending_name {
                    return Err(WriteError::value_expected(existing.clone()));
                }
                if document.contains_key(name) {
                    return Err(WriteError::duplicate_name(name));
                }
                *pending_name = Some(name.to_string());
                Ok(())
            }
            _ => Err(WriteError::unexpected_name(name)),
        }
    }

    fn write_null(&mut self) -> Result<(), WriteError> {
        self.push_value(WireValue::Null)
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), WriteError> {
        self.push_value(WireValue::Boolean(value))
    }

    fn write_int32(&mut self, value: i32) -> Result<(), WriteError> {
        self.push_value(WireValue::Int32(value))
    }

    fn write_int64(&mut self, value: i64) -> Result<(), WriteError> {
        self.push_value(WireValue::Int64(value))
    }

    fn write_double(&mut self, value: f64) -> Result<(), WriteError> {
        self.push_value(WireValue::Double(value))
    }

    fn write_decimal128(&mut self, value: Decimal128) -> Result<(), WriteError> {
        self.push_value(WireValue::Decimal128(value))
    }

    fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        self.push_value(WireValue::String(value.to_string()))
    }

    fn write_binary(&mut self, value: &Binary) -> Result<(), WriteError> {
        self.push_value(WireValue::Binary(value.clone()))
    }

    fn write_date_time(&mut self, value: DateTime) -> Result<(), WriteError> {
        self.push_value(WireValue::DateTime(value))
    }

    fn write_other(&mut self, value: &WireValue) -> Result<(), WriteError> {
        self.push_value(value.clone())
    }

    // A captured subtree can be moved in whole
    fn write_value(&mut self, value: &WireValue) -> Result<(), WriteError> {
        self.check_value_position()?;
        self.push_value(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use bson::{Bson, Timestamp, bson, doc};

    #[test]
    fn test_capture_nested_document() {
        let mut writer = DocumentWriter::new();
        writer.write_start_document().unwrap();
        writer.write_name("$filter").unwrap();
        writer.write_start_document().unwrap();
        writer.write_name("input").unwrap();
        writer.write_string("$input").unwrap();
        writer.write_name("limit").unwrap();
        writer.write_start_array().unwrap();
        writer.write_int32(1).unwrap();
        writer.write_null().unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_document().unwrap();
        writer.write_end_document().unwrap();

        let expected = bson!({ "$filter": { "input": "$input", "limit": [1, null] } });
        assert_eq!(writer.into_value().unwrap(), expected);
    }

    #[test]
    fn test_top_level_scalar() {
        let mut writer = DocumentWriter::new();
        writer.write_int64(7).unwrap();
        assert_eq!(writer.into_value().unwrap(), WireValue::Int64(7));
    }

    #[test]
    fn test_value_without_name_in_document() {
        let mut writer = DocumentWriter::new();
        writer.write_start_document().unwrap();
        assert_eq!(writer.write_int32(1), Err(WriteError::NameExpected));
        assert_eq!(writer.write_start_array(), Err(WriteError::NameExpected));
    }

    #[test]
    fn test_name_outside_document() {
        let mut writer = DocumentWriter::new();
        assert_eq!(
            writer.write_name("a"),
            Err(WriteError::unexpected_name("a"))
        );
        writer.write_start_array().unwrap();
        assert_eq!(
            writer.write_name("b"),
            Err(WriteError::unexpected_name("b"))
        );
    }

    #[test]
    fn test_dangling_name() {
        let mut writer = DocumentWriter::new();
        writer.write_start_document().unwrap();
        writer.write_name("as").unwrap();
        assert_eq!(writer.write_name("in"), Err(WriteError::value_expected("as")));
        assert_eq!(writer.write_end_document(), Err(WriteError::value_expected("as")));
    }

    #[test]
    fn test_repeated_name_is_rejected() {
        let mut writer = DocumentWriter::new();
        writer.write_start_document().unwrap();
        writer.write_name("x").unwrap();
        writer.write_int32(1).unwrap();
        assert_eq!(writer.write_name("x"), Err(WriteError::duplicate_name("x")));

        // the same name is fine again in a nested document
        writer.write_name("inner").unwrap();
        writer.write_start_document().unwrap();
        writer.write_name("x").unwrap();
        writer.write_int32(2).unwrap();
        writer.write_end_document().unwrap();
        writer.write_end_document().unwrap();
        assert_eq!(
            writer.into_value().unwrap(),
            bson!({ "x": 1, "inner": { "x": 2 } })
        );
    }

    #[test]
    fn test_unbalanced_end() {
        let mut writer = DocumentWriter::new();
        writer.write_start_array().unwrap();
        assert_eq!(
            writer.write_end_document(),
            Err(WriteError::unbalanced_end("document", "array"))
        );
        writer.write_end_array().unwrap();
        assert_eq!(
            writer.write_end_array(),
            Err(WriteError::unbalanced_end("array", "nothing"))
        );
    }

    #[test]
    fn test_incomplete_and_second_root() {
        let mut writer = DocumentWriter::new();
        writer.write_start_document().unwrap();
        assert_eq!(writer.into_value(), Err(WriteError::Incomplete { open: 1 }));

        assert_eq!(
            DocumentWriter::new().into_value(),
            Err(WriteError::Incomplete { open: 0 })
        );

        let mut writer = DocumentWriter::new();
        writer.write_boolean(true).unwrap();
        assert_eq!(writer.write_null(), Err(WriteError::RootAlreadyWritten));
    }

    #[test]
    fn test_write_value_round_trips_tree() {
        let value = Bson::Document(doc! {
            "a": [1, "x", { "b": 2.5 }],
            "c": DateTime::from_millis(86_400_000),
            "id": ObjectId::parse_str("5d505646cf6d4fe581014ab2").unwrap(),
            "ts": Timestamp { time: 1, increment: 2 },
        });
        let mut writer = DocumentWriter::new();
        writer.write_value(&value).unwrap();
        assert_eq!(writer.into_value().unwrap(), value);
    }

    #[test]
    fn test_default_write_value_reaches_other_kinds() {
        struct Recorder(DocumentWriter);

        impl WireWriter for Recorder {
            fn write_start_document(&mut self) -> Result<(), WriteError> {
                self.0.write_start_document()
            }
            fn write_end_document(&mut self) -> Result<(), WriteError> {
                self.0.write_end_document()
            }
            fn write_start_array(&mut self) -> Result<(), WriteError> {
                self.0.write_start_array()
            }
            fn write_end_array(&mut self) -> Result<(), WriteError> {
                self.0.write_end_array()
            }
            fn write_name(&mut self, name: &str) -> Result<(), WriteError> {
                self.0.write_name(name)
            }
            fn write_null(&mut self) -> Result<(), WriteError> {
                self.0.write_null()
            }
            fn write_boolean(&mut self, value: bool) -> Result<(), WriteError> {
                self.0.write_boolean(value)
            }
            fn write_int32(&mut self, value: i32) -> Result<(), WriteError> {
                self.0.write_int32(value)
            }
            fn write_int64(&mut self, value: i64) -> Result<(), WriteError> {
                self.0.write_int64(value)
            }
            fn write_double(&mut self, value: f64) -> Result<(), WriteError> {
                self.0.write_double(value)
            }
            fn write_decimal128(&mut self, value: Decimal128) -> Result<(), WriteError> {
                self.0.write_decimal128(value)
            }
            fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
                self.0.write_string(value)
            }
            fn write_binary(&mut self, value: &Binary) -> Result<(), WriteError> {
                self.0.write_binary(value)
            }
            fn write_date_time(&mut self, value: DateTime) -> Result<(), WriteError> {
                self.0.write_date_time(value)
            }
            fn write_other(&mut self, value: &WireValue) -> Result<(), WriteError> {
                self.0.write_other(value)
            }
        }

        let value = bson!({ "t": Timestamp { time: 3, increment: 4 }, "n": [1, { "m": 2 }] });
        let mut recorder = Recorder(DocumentWriter::new());
        recorder.write_value(&value).unwrap();
        assert_eq!(recorder.0.into_value().unwrap(), value);
    }
}
