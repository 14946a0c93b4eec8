use super::{Field, Operator, Shape};
use crate::encoder::Expr;

/// $literal - A value taken as is, without evaluation
pub fn literal(value: impl Into<Expr>) -> Operator {
    Operator::scalar("$literal", value)
}

/// $getField - Value of a field of the current document
pub fn get_field(field: impl Into<Expr>) -> Operator {
    Operator::scalar("$getField", field)
}

/// $getField in document form, optionally reading from another object
///
/// Example:
/// ```json
/// {"$getField": {"field": "price.usd", "input": "$$CURRENT"}}
/// ```
pub fn get_field_with(field: impl Into<Expr>, input: Option<Expr>) -> Operator {
    Operator::document(
        "$getField",
        [Field::required("field", field), Field::optional("input", input)],
    )
}

/// $rand - Random float between 0 and 1
pub fn rand() -> Operator {
    Operator::new("$rand", Shape::Document(Vec::new()))
}

/// $sampleRate - Match a random selection of documents at the given rate
pub fn sample_rate(rate: impl Into<Expr>) -> Operator {
    Operator::scalar("$sampleRate", rate)
}

/// $mergeObjects - Merge the documents of a group into one
pub fn merge_objects(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$mergeObjects", expression)
}

/// $mergeObjects - Merge several documents, later fields winning
pub fn merge_objects_of<I>(documents: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$mergeObjects", documents)
}

/// $setField - Add, update or remove a field of a document
///
/// Example:
/// ```json
/// {"$setField": {"field": "price.usd", "input": "$$ROOT", "value": "$price"}}
/// ```
pub fn set_field(field: impl Into<Expr>, input: impl Into<Expr>, value: impl Into<Expr>) -> Operator {
    Operator::document(
        "$setField",
        [
            Field::required("field", field),
            Field::required("input", input),
            Field::required("value", value),
        ],
    )
}

/// $binarySize - Size in bytes of a string or binary value
pub fn binary_size(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$binarySize", expression)
}

/// $bsonSize - Encoded size in bytes of a document
pub fn bson_size(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$bsonSize", expression)
}

/// $meta - Metadata of a document, such as its text search score
pub fn meta(keyword: impl Into<Expr>) -> Operator {
    Operator::scalar("$meta", keyword)
}

/// $tsIncrement
pub fn ts_increment(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$tsIncrement", expression)
}

/// $tsSecond
pub fn ts_second(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$tsSecond", expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::keywords::{system_variables, MetaDataKeyword};
    use crate::operators::test_support::{assert_renders, payload_keys};

    #[test]
    fn test_literal_keeps_dollar_strings() {
        assert_renders(&literal("$1"), r#"{"$literal":"$1"}"#);
    }

    #[test]
    fn test_literal_bytes_are_binary() {
        assert_renders(
            &literal(&[0u8, 255][..]),
            r#"{"$literal":{"$binary":{"base64":"AP8=","subType":"00"}}}"#,
        );
    }

    #[test]
    fn test_get_field_forms() {
        assert_renders(&get_field("price.usd"), r#"{"$getField":"price.usd"}"#);
        assert_renders(
            &get_field_with("price.usd", Some(system_variables::CURRENT.into())),
            r#"{"$getField":{"field":"price.usd","input":"$$CURRENT"}}"#,
        );
        assert_eq!(payload_keys(&get_field_with("qty", None)), vec!["field"]);
    }

    #[test]
    fn test_rand_is_empty_document() {
        assert_renders(&rand(), r#"{"$rand":{}}"#);
    }

    #[test]
    fn test_merge_objects_forms() {
        assert_renders(&merge_objects("$quantity"), r#"{"$mergeObjects":"$quantity"}"#);
        assert_renders(
            &merge_objects_of([system_variables::ROOT, "$details"]),
            r#"{"$mergeObjects":["$$ROOT","$details"]}"#,
        );
    }

    #[test]
    fn test_set_field_removal() {
        assert_renders(
            &set_field("price.usd", system_variables::ROOT, system_variables::REMOVE),
            r#"{"$setField":{"field":"price.usd","input":"$$ROOT","value":"$$REMOVE"}}"#,
        );
    }

    #[test]
    fn test_scalar_misc_operators() {
        assert_renders(&sample_rate(0.33), r#"{"$sampleRate":0.33}"#);
        assert_renders(&binary_size("$data"), r#"{"$binarySize":"$data"}"#);
        assert_renders(&bson_size(system_variables::ROOT), r#"{"$bsonSize":"$$ROOT"}"#);
        assert_renders(&meta(MetaDataKeyword::TextScore), r#"{"$meta":"textScore"}"#);
        assert_renders(&ts_increment("$ts"), r#"{"$tsIncrement":"$ts"}"#);
        assert_renders(&ts_second("$ts"), r#"{"$tsSecond":"$ts"}"#);
    }
}
