use super::{Field, Operator, Shape};
use crate::encoder::Expr;

/// $arrayElemAt - Element at an index of an array expression
pub fn array_elem_at(array: impl Into<Expr>, index: impl Into<Expr>) -> Operator {
    Operator::array("$arrayElemAt", [array.into(), index.into()])
}

/// $arrayElemAt - Element at an index of a literal sequence of elements
///
/// Example:
/// ```json
/// {"$arrayElemAt": [["$a", "$b", "$c"], -1]}
/// ```
pub fn array_elem_at_of<I>(items: I, index: impl Into<Expr>) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::new(
        "$arrayElemAt",
        Shape::Array(vec![Shape::operands(items), Shape::operand(index)]),
    )
}

/// $arrayToObject - Convert an array expression of pairs into a document
pub fn array_to_object(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$arrayToObject", expression)
}

fn pairs<I, K, V>(entries: I) -> Shape
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Expr>,
    V: Into<Expr>,
{
    Shape::Array(
        entries
            .into_iter()
            .map(|(key, value)| Shape::Array(vec![Shape::operand(key), Shape::operand(value)]))
            .collect(),
    )
}

/// $arrayToObject - Build a document from key/value entries, evaluated as expressions
///
/// Example:
/// ```json
/// {"$arrayToObject": [[["item", "abc123"], ["qty", "$qty"]]]}
/// ```
pub fn array_to_object_of<I, K, V>(entries: I) -> Operator
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Expr>,
    V: Into<Expr>,
{
    Operator::new("$arrayToObject", Shape::Array(vec![pairs(entries)]))
}

/// $arrayToObject - Build a document from key/value entries wrapped in `$literal`
///
/// The entries are not re-evaluated by the engine.
///
/// Example:
/// ```json
/// {"$arrayToObject": {"$literal": [["item", "abc123"], ["qty", 25]]}}
/// ```
pub fn array_to_object_literal<I, K, V>(entries: I) -> Operator
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Expr>,
    V: Into<Expr>,
{
    Operator::new(
        "$arrayToObject",
        Shape::document([Field::nested("$literal", pairs(entries))]),
    )
}

/// $concatArrays
pub fn concat_arrays<I>(arrays: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$concatArrays", arrays)
}

/// $filter - Elements of an array that match a condition
///
/// Example:
/// ```json
/// {"$filter": {"input": "$items", "cond": {"$gte": ["$$this.price", 100]}}}
/// ```
pub fn filter(input: impl Into<Expr>, cond: impl Into<Expr>) -> Operator {
    filter_with(input, cond, None, None)
}

/// $filter with the optional `as` variable name and `limit`
pub fn filter_with(
    input: impl Into<Expr>,
    cond: impl Into<Expr>,
    as_: Option<Expr>,
    limit: Option<Expr>,
) -> Operator {
    Operator::document(
        "$filter",
        [
            Field::required("input", input),
            Field::required("cond", cond),
            Field::optional("as", as_),
            Field::optional("limit", limit),
        ],
    )
}

/// $first - First element of an array
pub fn first(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$first", expression)
}

fn n_elements(keyword: &'static str, n: impl Into<Expr>, input: impl Into<Expr>) -> Operator {
    Operator::document(keyword, [Field::required("n", n), Field::required("input", input)])
}

/// $firstN - First `n` elements of an array
pub fn first_n(n: impl Into<Expr>, input: impl Into<Expr>) -> Operator {
    n_elements("$firstN", n, input)
}

/// $in - Whether a value is in an array
pub fn in_(expression: impl Into<Expr>, array: impl Into<Expr>) -> Operator {
    Operator::array("$in", [expression.into(), array.into()])
}

/// $indexOfArray - Index of the first occurrence of a value
pub fn index_of_array(array: impl Into<Expr>, search: impl Into<Expr>) -> Operator {
    index_of_array_with(array, search, None, None)
}

/// Positional operands of the `$indexOf*` family
///
/// `end` is only meaningful after `start`, so when `end` is given alone a
/// `start` of `0` is written in front of it.
pub(crate) fn index_of_operands(
    target: Expr,
    search: Expr,
    start: Option<Expr>,
    end: Option<Expr>,
) -> Vec<Expr> {
    let mut operands = vec![target, search];
    match (start, end) {
        (Some(start), Some(end)) => operands.extend([start, end]),
        (Some(start), None) => operands.push(start),
        (None, Some(end)) => operands.extend([Expr::Int32(0), end]),
        (None, None) => {}
    }
    operands
}

/// $indexOfArray with optional `start` and `end` positions
///
/// Example:
/// ```json
/// {"$indexOfArray": ["$array", "$search", 0, "$end"]}
/// ```
pub fn index_of_array_with(
    array: impl Into<Expr>,
    search: impl Into<Expr>,
    start: Option<Expr>,
    end: Option<Expr>,
) -> Operator {
    Operator::array(
        "$indexOfArray",
        index_of_operands(array.into(), search.into(), start, end),
    )
}

/// $isArray
pub fn is_array(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$isArray", expression)
}

/// $last - Last element of an array
pub fn last(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$last", expression)
}

/// $lastN
pub fn last_n(n: impl Into<Expr>, input: impl Into<Expr>) -> Operator {
    n_elements("$lastN", n, input)
}

/// $map - Apply an expression to each element of an array
pub fn map(input: impl Into<Expr>, in_: impl Into<Expr>) -> Operator {
    map_with(input, None, in_)
}

/// $map with an optional `as` variable name
///
/// Example:
/// ```json
/// {"$map": {"input": "$quizzes", "as": "grade", "in": {"$add": ["$$grade", 2]}}}
/// ```
pub fn map_with(input: impl Into<Expr>, as_: Option<Expr>, in_: impl Into<Expr>) -> Operator {
    Operator::document(
        "$map",
        [
            Field::required("input", input),
            Field::optional("as", as_),
            Field::required("in", in_),
        ],
    )
}

/// $maxN
pub fn max_n(n: impl Into<Expr>, input: impl Into<Expr>) -> Operator {
    n_elements("$maxN", n, input)
}

/// $minN
pub fn min_n(n: impl Into<Expr>, input: impl Into<Expr>) -> Operator {
    n_elements("$minN", n, input)
}

/// $objectToArray
pub fn object_to_array(object: impl Into<Expr>) -> Operator {
    Operator::scalar("$objectToArray", object)
}

/// $range - Integers from `start` up to, not including, `end`
pub fn range(start: impl Into<Expr>, end: impl Into<Expr>) -> Operator {
    range_with(start, end, None)
}

/// $range with an optional step; an absent step is not written
pub fn range_with(start: impl Into<Expr>, end: impl Into<Expr>, step: Option<Expr>) -> Operator {
    let mut operands = vec![start.into(), end.into()];
    operands.extend(step);
    Operator::array("$range", operands)
}

/// $reduce - Fold an array into a single value
///
/// Example:
/// ```json
/// {"$reduce": {"input": ["a", "b"], "initialValue": "", "in": {"$concat": ["$$value", "$$this"]}}}
/// ```
pub fn reduce(
    input: impl Into<Expr>,
    initial_value: impl Into<Expr>,
    in_: impl Into<Expr>,
) -> Operator {
    Operator::document(
        "$reduce",
        [
            Field::required("input", input),
            Field::required("initialValue", initial_value),
            Field::required("in", in_),
        ],
    )
}

/// $reverseArray
pub fn reverse_array(array: impl Into<Expr>) -> Operator {
    Operator::scalar("$reverseArray", array)
}

/// $size - Number of elements in an array
pub fn size(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$size", expression)
}

/// $slice - First `n` elements, or last `n` when `n` is negative
pub fn slice(array: impl Into<Expr>, n: impl Into<Expr>) -> Operator {
    slice_with(array, None, n)
}

/// $slice from an optional position; an absent position is not written
pub fn slice_with(array: impl Into<Expr>, position: Option<Expr>, n: impl Into<Expr>) -> Operator {
    let mut operands = vec![array.into()];
    operands.extend(position);
    operands.push(n.into());
    Operator::array("$slice", operands)
}

/// Direction of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn value(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// An ordered sort specification such as `{"age": -1, "name": 1}`
///
/// Key order is significant to the engine and is preserved.
pub fn sort_by<I, K>(keys: I) -> Expr
where
    I: IntoIterator<Item = (K, SortOrder)>,
    K: Into<String>,
{
    Expr::map(keys.into_iter().map(|(key, order)| (key, order.value())))
}

/// $sortArray
///
/// Example:
/// ```json
/// {"$sortArray": {"input": "$team", "sortBy": {"age": -1, "name": 1}}}
/// ```
pub fn sort_array(input: impl Into<Expr>, sort_by: impl Into<Expr>) -> Operator {
    Operator::document(
        "$sortArray",
        [Field::required("input", input), Field::required("sortBy", sort_by)],
    )
}

/// $zip - Transpose an array of input arrays
pub fn zip<I>(inputs: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    zip_with(inputs, false, None)
}

/// $zip with `useLongestLength` and `defaults`
///
/// `useLongestLength` is written only when `true`, and `defaults` only
/// together with it; `defaults` given without `useLongestLength` is dropped.
pub fn zip_with<I>(inputs: I, use_longest_length: bool, defaults: Option<Expr>) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let mut fields = vec![Field::nested("inputs", Shape::operands(inputs))];
    if use_longest_length {
        fields.push(Field::required("useLongestLength", true));
        fields.push(Field::optional("defaults", defaults));
    }
    Operator::document("$zip", fields)
}
