use super::{Field, Operator};
use crate::encoder::Expr;

/// $convert - Convert a value to the given type
pub fn convert(input: impl Into<Expr>, to: impl Into<Expr>) -> Operator {
    convert_with(input, to, None, None)
}

/// $convert with fallbacks for conversion errors and null input
///
/// Example:
/// ```json
/// {"$convert": {"input": "$price", "to": "decimal", "onError": "Error", "onNull": 0}}
/// ```
pub fn convert_with(
    input: impl Into<Expr>,
    to: impl Into<Expr>,
    on_error: Option<Expr>,
    on_null: Option<Expr>,
) -> Operator {
    Operator::document(
        "$convert",
        [
            Field::required("input", input),
            Field::required("to", to),
            Field::optional("onError", on_error),
            Field::optional("onNull", on_null),
        ],
    )
}

/// $isNumber
pub fn is_number(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$isNumber", expression)
}

/// $toBool
pub fn to_bool(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toBool", expression)
}

/// $toDecimal
pub fn to_decimal(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toDecimal", expression)
}

/// $toDouble
pub fn to_double(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toDouble", expression)
}

/// $toInt
pub fn to_int(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toInt", expression)
}

/// $toLong
pub fn to_long(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toLong", expression)
}

/// $toObjectId
pub fn to_object_id(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toObjectId", expression)
}

/// $type - Wire type name of the value
pub fn type_of(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$type", expression)
}
