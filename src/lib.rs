/// aggexpr - Aggregation expression operators for document databases
///
/// This library builds aggregation and query operators such as `$add`,
/// `$filter` or `$switch` from typed Rust values and encodes them into a
/// document wire model, either eagerly as a value tree or streamed into a
/// writer.
///
/// Example:
/// ```
/// use aggexpr::operators::{cond, gte, multiply};
/// use aggexpr::JsonMode;
///
/// let discount = cond(gte("$qty", 250), multiply(["$price", "$discount"]), "$price");
/// assert_eq!(
///     discount.to_json_string(JsonMode::Relaxed).unwrap(),
///     r#"{"$cond":[{"$gte":["$qty",250]},{"$multiply":["$price","$discount"]},"$price"]}"#
/// );
/// ```

pub mod config;
pub mod encoder;
pub mod operators;
pub mod wire;

// Re-export commonly used types
pub use config::{ConfigError, EncoderConfig};
pub use encoder::{
    keywords::system_variables, DateUnit, EncodeError, Encoder, Expr, FallbackPolicy, Keyword,
    MetaDataKeyword, Timezone, WireType,
};
pub use operators::{DateParts, Field, Operator, Shape, SortOrder, SwitchBuilder};
pub use wire::{
    Binary, BinarySubtype, DateTime, Decimal128, Document, DocumentWriter, JsonMode, JsonWriter,
    ObjectId, Uuid, WireValue, WireWriter, WriteError,
};
