use super::Operator;
use crate::encoder::Expr;

/// $abs - Absolute value of a number
pub fn abs(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$abs", expression)
}

/// $add - Sum of numbers, or a date plus milliseconds
///
/// Example:
/// ```json
/// {"$add": ["$price", "$fee", 3]}
/// ```
pub fn add<I>(expressions: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$add", expressions)
}

/// $ceil - Smallest integer greater than or equal to the number
pub fn ceil(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$ceil", expression)
}

/// $divide
pub fn divide(dividend: impl Into<Expr>, divisor: impl Into<Expr>) -> Operator {
    Operator::array("$divide", [dividend.into(), divisor.into()])
}

/// $exp - Raises Euler's number to the given exponent
pub fn exp(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$exp", expression)
}

/// $floor - Largest integer less than or equal to the number
pub fn floor(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$floor", expression)
}

/// $ln - Natural logarithm
pub fn ln(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$ln", expression)
}

/// $log - Logarithm of a number in the given base
pub fn log(number: impl Into<Expr>, base: impl Into<Expr>) -> Operator {
    Operator::array("$log", [number.into(), base.into()])
}

/// $log10
pub fn log10(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$log10", expression)
}

/// $mod - Remainder of the first number divided by the second
pub fn mod_(dividend: impl Into<Expr>, divisor: impl Into<Expr>) -> Operator {
    Operator::array("$mod", [dividend.into(), divisor.into()])
}

/// $multiply
pub fn multiply<I>(expressions: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$multiply", expressions)
}

/// $round - Round to a whole number; the place is written as `0`
///
/// Example:
/// ```json
/// {"$round": ["$value", 0]}
/// ```
pub fn round(number: impl Into<Expr>) -> Operator {
    round_with(number, 0)
}

/// $round - Round to the given decimal place
pub fn round_with(number: impl Into<Expr>, place: impl Into<Expr>) -> Operator {
    Operator::array("$round", [number.into(), place.into()])
}

/// $sqrt
pub fn sqrt(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$sqrt", expression)
}

/// $subtract - Difference of numbers, dates, or a date and milliseconds
pub fn subtract(minuend: impl Into<Expr>, subtrahend: impl Into<Expr>) -> Operator {
    Operator::array("$subtract", [minuend.into(), subtrahend.into()])
}

/// $trunc - Truncate to a whole number; the place is written as `0`
pub fn trunc(number: impl Into<Expr>) -> Operator {
    trunc_with(number, 0)
}

/// $trunc - Truncate to the given decimal place
pub fn trunc_with(number: impl Into<Expr>, place: impl Into<Expr>) -> Operator {
    Operator::array("$trunc", [number.into(), place.into()])
}
