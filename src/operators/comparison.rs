use std::borrow::Cow;

use super::Operator;
use crate::encoder::Expr;

/// A two-operand comparison under any keyword
///
/// Example:
/// ```json
/// {"$gte": ["$qty", 250]}
/// ```
pub fn comparison(
    keyword: impl Into<Cow<'static, str>>,
    left: impl Into<Expr>,
    right: impl Into<Expr>,
) -> Operator {
    Operator::array(keyword, [left.into(), right.into()])
}

/// $cmp - `-1`, `0` or `1` depending on how the values compare
pub fn cmp(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$cmp", left, right)
}

/// $eq
pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$eq", left, right)
}

/// $gt
pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$gt", left, right)
}

/// $gte
pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$gte", left, right)
}

/// $lt
pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$lt", left, right)
}

/// $lte
pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$lte", left, right)
}

/// $ne
pub fn ne(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    comparison("$ne", left, right)
}
