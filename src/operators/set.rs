use super::{Operator, Shape};
use crate::encoder::Expr;

/// $allElementsTrue - Whether no element of the array is false
///
/// The single operand is an array expression, so it is wrapped in an array.
pub fn all_elements_true(expression: impl Into<Expr>) -> Operator {
    Operator::array("$allElementsTrue", [expression.into()])
}

/// $allElementsTrue over a literal sequence of elements
///
/// Example:
/// ```json
/// {"$allElementsTrue": [["$e1", "$e2"]]}
/// ```
pub fn all_elements_true_of<I>(elements: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::new("$allElementsTrue", nested_once(elements))
}

/// $anyElementTrue - Whether any element of the array is true
pub fn any_element_true(expression: impl Into<Expr>) -> Operator {
    Operator::array("$anyElementTrue", [expression.into()])
}

/// $anyElementTrue over a literal sequence of elements
pub fn any_element_true_of<I>(elements: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::new("$anyElementTrue", nested_once(elements))
}

fn nested_once<I>(elements: I) -> Shape
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Shape::Array(vec![Shape::operands(elements)])
}

/// $setDifference - Elements of the first set missing from the second
pub fn set_difference(first: impl Into<Expr>, second: impl Into<Expr>) -> Operator {
    Operator::array("$setDifference", [first.into(), second.into()])
}

/// $setEquals - Whether the sets hold the same distinct elements
pub fn set_equals(first: impl Into<Expr>, second: impl Into<Expr>) -> Operator {
    Operator::array("$setEquals", [first.into(), second.into()])
}

/// $setIntersection
pub fn set_intersection<I>(arrays: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$setIntersection", arrays)
}

/// $setIsSubset - Whether every element of the first set is in the second
pub fn set_is_subset(first: impl Into<Expr>, second: impl Into<Expr>) -> Operator {
    Operator::array("$setIsSubset", [first.into(), second.into()])
}

/// $setUnion
pub fn set_union<I>(arrays: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$setUnion", arrays)
}
