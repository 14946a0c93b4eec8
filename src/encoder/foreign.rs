use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::wire::WireValue;

/// A caller-defined value the built-in encoding table does not know
///
/// Any `Debug + Display + Send + Sync + 'static` type qualifies. Such a value
/// is encoded by a codec registered for its type, or else by the encoder's
/// fallback policy.
pub trait ForeignValue: Any + fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Rust type name, used in logs and errors
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug + fmt::Display + Send + Sync> ForeignValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

type ErasedCodec = Arc<dyn Fn(&dyn Any) -> Option<WireValue> + Send + Sync>;

/// Codecs for foreign value types, keyed by exact runtime type
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<TypeId, ErasedCodec>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.len())
            .field("encode", &"<function>")
            .finish()
    }
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the codec for `T`, replacing any earlier one
    pub fn register<T, F>(&mut self, codec: F)
    where
        T: Any,
        F: Fn(&T) -> WireValue + Send + Sync + 'static,
    {
        let erased: ErasedCodec =
            Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&codec));
        self.codecs.insert(TypeId::of::<T>(), erased);
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Encode with the codec registered for the value's concrete type, if any
    pub fn encode(&self, value: &dyn ForeignValue) -> Option<WireValue> {
        let any = value.as_any();
        let codec = self.codecs.get(&any.type_id())?;
        codec(any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[derive(Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.x, self.y)
        }
    }

    #[test]
    fn test_registered_codec_is_used() {
        let mut registry = CodecRegistry::new();
        registry.register(|point: &Point| {
            WireValue::Document(doc! { "x": point.x, "y": point.y })
        });
        assert!(registry.contains::<Point>());
        assert_eq!(registry.len(), 1);

        let point = Point { x: 1, y: 2 };
        assert_eq!(
            registry.encode(&point),
            Some(WireValue::Document(doc! { "x": 1, "y": 2 }))
        );
    }

    #[test]
    fn test_unregistered_type_has_no_encoding() {
        let registry = CodecRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.encode(&Point { x: 0, y: 0 }), None);
    }

    #[test]
    fn test_type_name_through_trait_object() {
        let value: Arc<dyn ForeignValue> = Arc::new(Point { x: 3, y: 4 });
        assert!(value.as_ref().type_name().ends_with("Point"));
        assert_eq!(value.to_string(), "(3, 4)");
    }

    #[test]
    fn test_debug_hides_functions() {
        let mut registry = CodecRegistry::new();
        registry.register(|value: &Point| WireValue::Int32(value.x));
        assert_eq!(
            format!("{:?}", registry),
            r#"CodecRegistry { codecs: 1, encode: "<function>" }"#
        );
    }
}
