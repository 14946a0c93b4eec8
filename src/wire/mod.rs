//! The wire value model and its writers
//!
//! Values are `bson` values: everything the crate produces ends up either as
//! a [`WireValue`] tree or as a sequence of calls against a [`WireWriter`].

mod error;
mod json;
mod writer;

pub use bson::oid::ObjectId;
pub use bson::spec::BinarySubtype;
pub use bson::{Binary, DateTime, Decimal128, Document, Uuid};

pub use error::WriteError;
pub use json::{JsonMode, JsonWriter};
pub use writer::{DocumentWriter, WireWriter};

/// A value in the wire model accepted by the database engine
///
/// Documents keep their fields in insertion order and arrays keep their
/// elements in the order they were added.
pub type WireValue = bson::Bson;
