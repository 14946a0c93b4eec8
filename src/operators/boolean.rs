use super::Operator;
use crate::encoder::Expr;

/// $and - True when every expression is true
///
/// Example:
/// ```json
/// {"$and": [{"$gt": ["$qty", 100]}, {"$lt": ["$qty", 250]}]}
/// ```
pub fn and<I>(expressions: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$and", expressions)
}

/// $or - True when any expression is true
pub fn or<I>(expressions: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$or", expressions)
}

/// $not - Boolean negation; the operand is always wrapped in an array
pub fn not(expression: impl Into<Expr>) -> Operator {
    Operator::array("$not", [expression.into()])
}

/// $expr - Use an aggregation expression inside a query predicate
pub fn expr(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$expr", expression)
}
