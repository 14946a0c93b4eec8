use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use rust_decimal::Decimal;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset, Weekday};

use super::ForeignValue;
use super::keywords::{DateUnit, Keyword, MetaDataKeyword, Timezone, WireType};
use crate::operators::Operator;
use crate::wire::{Binary, DateTime, Decimal128, Document, ObjectId, Uuid, WireValue};

/// Anything that can appear as an operator operand
///
/// Raw values, pre-built wire values and nested operators all convert into
/// `Expr` through `From`, so constructors accept `impl Into<Expr>`:
///
/// ```
/// use aggexpr::{Expr, operators::add};
///
/// let sum = add([Expr::from("$price"), Expr::from(3), Expr::from(0.5)]);
/// assert_eq!(sum.keyword(), "$add");
/// ```
///
/// Cloning is cheap for nested operators, which are shared.
#[derive(Debug, Clone)]
pub enum Expr {
    Null,
    /// A pre-built wire value, passed through unchanged
    Wire(WireValue),
    Int32(i32),
    Int64(i64),
    /// An integer wider than 64 bits; encoded as a decimal
    BigInt(i128),
    Double(f64),
    Decimal(Decimal),
    /// Decimal number text, for values no Rust numeric type holds
    NumberText(String),
    String(String),
    Boolean(bool),
    DateTime(DateTime),
    /// Generic binary data
    Bytes(Vec<u8>),
    /// Encoded as binary subtype 4
    Uuid(Uuid),
    Keyword(Keyword),
    Array(Vec<Expr>),
    /// Key/value pairs in iteration order
    Map(Vec<(String, Expr)>),
    Json(serde_json::Value),
    Operator(Arc<Operator>),
    Foreign(Arc<dyn ForeignValue>),
}

impl Expr {
    /// Binary data operand
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Expr::Bytes(bytes.into())
    }

    /// String operand from a character slice
    pub fn chars(chars: &[char]) -> Self {
        Expr::String(chars.iter().collect())
    }

    /// Decimal operand from its text, e.g. `"1.5E+40"`
    pub fn number_text(text: impl Into<String>) -> Self {
        Expr::NumberText(text.into())
    }

    /// Wrap a value the built-in table does not know
    pub fn foreign<T: ForeignValue>(value: T) -> Self {
        Expr::Foreign(Arc::new(value))
    }

    /// Array operand from anything iterable
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::Array(items.into_iter().map(Into::into).collect())
    }

    /// Document operand from key/value pairs, kept in the given order
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expr>,
    {
        Expr::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expr::Null)
    }
}

/// Build a `Vec<Expr>` from operands of different types
///
/// # Example
/// ```
/// use aggexpr::{exprs, operators::add};
///
/// let op = add(exprs!["$n1", "$n2", 3]);
/// assert_eq!(op.to_json_string(Default::default()).unwrap(), r#"{"$add":["$n1","$n2",3]}"#);
/// ```
#[macro_export]
macro_rules! exprs {
    () => {
        ::std::vec::Vec::<$crate::encoder::Expr>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::encoder::Expr::from($value)),+]
    };
}

macro_rules! impl_from_lossless {
    ($variant:ident: $($source:ty),+) => {
        $(
            impl From<$source> for Expr {
                fn from(value: $source) -> Self {
                    Expr::$variant(value.into())
                }
            }
        )+
    };
}

impl_from_lossless!(Int32: i8, i16, i32, u16);
impl_from_lossless!(Int64: i64, u32);
impl_from_lossless!(Double: f32, f64);
impl_from_lossless!(BigInt: i128);
impl_from_lossless!(Decimal: Decimal);
impl_from_lossless!(String: String, &str, char);
impl_from_lossless!(Boolean: bool);
impl_from_lossless!(DateTime: DateTime);
impl_from_lossless!(Uuid: Uuid);
impl_from_lossless!(Wire: WireValue, Document, Binary, Decimal128, ObjectId);
impl_from_lossless!(Keyword: Keyword, DateUnit, MetaDataKeyword, Timezone, Weekday, WireType, UtcOffset);
impl_from_lossless!(Json: serde_json::Value);
impl_from_lossless!(Operator: Operator, Arc<Operator>);

impl From<&String> for Expr {
    fn from(value: &String) -> Self {
        Expr::String(value.clone())
    }
}

impl From<isize> for Expr {
    fn from(value: isize) -> Self {
        Expr::Int64(value as i64)
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Expr::Int64(value),
            Err(_) => Expr::BigInt(i128::from(value)),
        }
    }
}

impl From<usize> for Expr {
    fn from(value: usize) -> Self {
        Expr::from(value as u64)
    }
}

impl From<u128> for Expr {
    fn from(value: u128) -> Self {
        match i128::try_from(value) {
            Ok(value) => Expr::BigInt(value),
            Err(_) => Expr::NumberText(value.to_string()),
        }
    }
}

impl From<&AtomicI32> for Expr {
    fn from(value: &AtomicI32) -> Self {
        Expr::Int32(value.load(Ordering::SeqCst))
    }
}

impl From<&AtomicI64> for Expr {
    fn from(value: &AtomicI64) -> Self {
        Expr::Int64(value.load(Ordering::SeqCst))
    }
}

/// Floor nanoseconds since the epoch to whole milliseconds
fn floor_millis(nanos: i128) -> DateTime {
    let millis = nanos.div_euclid(1_000_000);
    let millis = i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX });
    DateTime::from_millis(millis)
}

impl From<OffsetDateTime> for Expr {
    fn from(value: OffsetDateTime) -> Self {
        Expr::DateTime(floor_millis(value.unix_timestamp_nanos()))
    }
}

impl From<PrimitiveDateTime> for Expr {
    /// A date-time without offset is taken to be UTC
    fn from(value: PrimitiveDateTime) -> Self {
        Expr::from(value.assume_utc())
    }
}

impl From<SystemTime> for Expr {
    fn from(value: SystemTime) -> Self {
        let nanos = match value.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_nanos() as i128,
            Err(before) => -(before.duration().as_nanos() as i128),
        };
        Expr::DateTime(floor_millis(nanos))
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        value.map_or(Expr::Null, Into::into)
    }
}

impl From<Vec<u8>> for Expr {
    fn from(bytes: Vec<u8>) -> Self {
        Expr::Bytes(bytes)
    }
}

impl From<&[u8]> for Expr {
    fn from(bytes: &[u8]) -> Self {
        Expr::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Expr {
    fn from(bytes: [u8; N]) -> Self {
        Expr::Bytes(bytes.to_vec())
    }
}

impl<T: Into<Expr>> From<Vec<T>> for Expr {
    fn from(items: Vec<T>) -> Self {
        Expr::array(items)
    }
}

impl<T: Into<Expr>, const N: usize> From<[T; N]> for Expr {
    fn from(items: [T; N]) -> Self {
        Expr::array(items)
    }
}

impl<T: Clone + Into<Expr>> From<&[T]> for Expr {
    fn from(items: &[T]) -> Self {
        Expr::array(items.iter().cloned())
    }
}

impl<K: fmt::Display, V: Into<Expr>, S> From<IndexMap<K, V, S>> for Expr {
    fn from(entries: IndexMap<K, V, S>) -> Self {
        Expr::map(entries.into_iter().map(|(key, value)| (key.to_string(), value)))
    }
}

impl<K: fmt::Display, V: Into<Expr>> From<BTreeMap<K, V>> for Expr {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Expr::map(entries.into_iter().map(|(key, value)| (key.to_string(), value)))
    }
}

impl<K: fmt::Display, V: Into<Expr>, S> From<HashMap<K, V, S>> for Expr {
    fn from(entries: HashMap<K, V, S>) -> Self {
        Expr::map(entries.into_iter().map(|(key, value)| (key.to_string(), value)))
    }
}

impl From<Arc<dyn ForeignValue>> for Expr {
    fn from(value: Arc<dyn ForeignValue>) -> Self {
        Expr::Foreign(value)
    }
}
