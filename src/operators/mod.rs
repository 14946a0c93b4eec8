/// Operators of the aggregation expression language
///
/// Every constructor in this module returns an [`Operator`]: a keyword such
/// as `$dateAdd` plus a payload [`Shape`]. Nothing is encoded until the
/// operator is materialized, either as a [`WireValue`] tree or by writing it
/// into a [`WireWriter`].
///
/// Example:
/// ```
/// use aggexpr::operators::{filter_with, gt};
/// use aggexpr::JsonMode;
///
/// let op = filter_with("$items", gt("$$item.qty", 10), Some("item".into()), None);
/// assert_eq!(
///     op.to_json_string(JsonMode::Relaxed).unwrap(),
///     r#"{"$filter":{"input":"$items","cond":{"$gt":["$$item.qty",10]},"as":"item"}}"#
/// );
/// ```

mod accumulator;
mod arithmetic;
mod array;
mod boolean;
mod comparison;
mod conditional;
mod conversion;
mod date;
mod misc;
mod set;
mod string;
mod trigonometry;
mod variable;

pub use accumulator::*;
pub use arithmetic::*;
pub use array::*;
pub use boolean::*;
pub use comparison::*;
pub use conditional::*;
pub use conversion::*;
pub use date::*;
pub use misc::*;
pub use set::*;
pub use string::*;
pub use trigonometry::*;
pub use variable::*;

use std::borrow::Cow;

use ::log::trace;

use crate::encoder::{EncodeError, Encoder, Expr};
use crate::wire::{Document, DocumentWriter, JsonMode, JsonWriter, WireValue, WireWriter, WriteError};

/// The structure of an operator payload
#[derive(Debug, Clone)]
pub enum Shape {
    /// A single operand whose encoding is the payload itself
    Operand(Expr),
    /// Elements in order
    Array(Vec<Shape>),
    /// Fields in declared order; absent fields are left out
    Document(Vec<Field>),
}

impl Shape {
    pub fn operand(value: impl Into<Expr>) -> Self {
        Shape::Operand(value.into())
    }

    /// Array of operands in iteration order
    pub fn operands<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Shape::Array(items.into_iter().map(|item| Shape::Operand(item.into())).collect())
    }

    pub fn document(fields: impl IntoIterator<Item = Field>) -> Self {
        Shape::Document(fields.into_iter().collect())
    }

    /// Encode the payload into a wire value tree
    pub fn encode_with(&self, encoder: &Encoder) -> Result<WireValue, EncodeError> {
        match self {
            Shape::Operand(expr) => encoder.encode(expr),
            Shape::Array(items) => Ok(WireValue::Array(
                items
                    .iter()
                    .map(|item| item.encode_with(encoder))
                    .collect::<Result<_, _>>()?,
            )),
            Shape::Document(fields) => {
                let mut document = Document::new();
                for field in fields {
                    if let Some(value) = &field.value {
                        if document.contains_key(field.name.as_ref()) {
                            return Err(WriteError::duplicate_name(field.name.as_ref()).into());
                        }
                        document.insert(field.name.as_ref(), value.encode_with(encoder)?);
                    }
                }
                Ok(WireValue::Document(document))
            }
        }
    }

    /// Write the payload as exactly one value
    pub fn write_with(&self, writer: &mut dyn WireWriter, encoder: &Encoder) -> Result<(), EncodeError> {
        match self {
            Shape::Operand(expr) => encoder.encode_into(writer, expr),
            Shape::Array(items) => {
                writer.write_start_array()?;
                for item in items {
                    item.write_with(writer, encoder)?;
                }
                writer.write_end_array()?;
                Ok(())
            }
            Shape::Document(fields) => {
                writer.write_start_document()?;
                for field in fields {
                    if let Some(value) = &field.value {
                        writer.write_name(&field.name)?;
                        value.write_with(writer, encoder)?;
                    }
                }
                writer.write_end_document()?;
                Ok(())
            }
        }
    }
}

/// A named field of a document payload
///
/// An optional field given `None` is absent and is not written at all. A field
/// given `Some(Expr::Null)` is present and written as null.
#[derive(Debug, Clone)]
pub struct Field {
    name: Cow<'static, str>,
    value: Option<Shape>,
}

impl Field {
    pub fn required(name: impl Into<Cow<'static, str>>, value: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            value: Some(Shape::operand(value)),
        }
    }

    pub fn optional(name: impl Into<Cow<'static, str>>, value: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Shape::Operand),
        }
    }

    /// A required field holding a structured payload
    pub fn nested(name: impl Into<Cow<'static, str>>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            value: Some(shape),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// A named operator with its payload
///
/// Operators are immutable and can be shared and reused as operands of other
/// operators any number of times.
#[derive(Debug, Clone)]
pub struct Operator {
    keyword: Cow<'static, str>,
    payload: Shape,
}

impl Operator {
    pub fn new(keyword: impl Into<Cow<'static, str>>, payload: Shape) -> Self {
        Self {
            keyword: keyword.into(),
            payload,
        }
    }

    /// `{keyword: operand}`
    pub fn scalar(keyword: impl Into<Cow<'static, str>>, operand: impl Into<Expr>) -> Self {
        Self::new(keyword, Shape::operand(operand))
    }

    /// `{keyword: [operands...]}` from a fixed list of operands
    pub fn array(keyword: impl Into<Cow<'static, str>>, operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::new(keyword, Shape::Array(operands.into_iter().map(Shape::Operand).collect()))
    }

    /// `{keyword: [items...]}` from one ordered sequence
    pub fn iterable<I>(keyword: impl Into<Cow<'static, str>>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Self::new(keyword, Shape::operands(items))
    }

    /// `{keyword: {field: value, ...}}` with absent optional fields left out
    pub fn document(keyword: impl Into<Cow<'static, str>>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self::new(keyword, Shape::document(fields))
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn payload(&self) -> &Shape {
        &self.payload
    }

    /// The operator document, encoded with the default encoder
    pub fn to_wire_value(&self) -> Result<WireValue, EncodeError> {
        self.to_wire_value_with(&Encoder::default())
    }

    pub fn to_wire_value_with(&self, encoder: &Encoder) -> Result<WireValue, EncodeError> {
        self.to_document_with(encoder).map(WireValue::Document)
    }

    pub fn to_document(&self) -> Result<Document, EncodeError> {
        self.to_document_with(&Encoder::default())
    }

    pub fn to_document_with(&self, encoder: &Encoder) -> Result<Document, EncodeError> {
        trace!("encoding {}", self.keyword);
        let mut document = Document::new();
        document.insert(self.keyword.as_ref(), self.payload.encode_with(encoder)?);
        Ok(document)
    }

    /// Write the operator document `{keyword: payload}` with the default encoder
    pub fn write_into(&self, writer: &mut dyn WireWriter) -> Result<(), EncodeError> {
        self.write_into_with(writer, &Encoder::default())
    }

    pub fn write_into_with(&self, writer: &mut dyn WireWriter, encoder: &Encoder) -> Result<(), EncodeError> {
        trace!("writing {}", self.keyword);
        writer.write_start_document()?;
        writer.write_name(&self.keyword)?;
        self.payload.write_with(writer, encoder)?;
        writer.write_end_document()?;
        Ok(())
    }

    /// Write only the payload, for callers that have already written the keyword as a field name
    pub fn write_payload_with(&self, writer: &mut dyn WireWriter, encoder: &Encoder) -> Result<(), EncodeError> {
        self.payload.write_with(writer, encoder)
    }

    /// Extended JSON text, streamed without building a tree
    pub fn to_json_string(&self, mode: JsonMode) -> Result<String, EncodeError> {
        self.to_json_string_with(&Encoder::default(), mode)
    }

    pub fn to_json_string_with(&self, encoder: &Encoder, mode: JsonMode) -> Result<String, EncodeError> {
        let mut writer = JsonWriter::new(Vec::new(), mode);
        self.write_into_with(&mut writer, encoder)?;
        Ok(writer.into_string()?)
    }

    /// Materialize lazily into a tree, through the writer calls
    pub fn capture_with(&self, encoder: &Encoder) -> Result<WireValue, EncodeError> {
        let mut writer = DocumentWriter::new();
        self.write_into_with(&mut writer, encoder)?;
        Ok(writer.into_value()?)
    }
}
