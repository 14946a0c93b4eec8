use super::array::index_of_operands;
use super::{Field, Operator};
use crate::encoder::Expr;

/// $concat - Concatenate strings
///
/// Example:
/// ```json
/// {"$concat": ["$item", " - ", "$description"]}
/// ```
pub fn concat<I>(expressions: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::iterable("$concat", expressions)
}

/// $indexOfBytes - UTF-8 byte index of the first occurrence of a substring
pub fn index_of_bytes(string: impl Into<Expr>, substring: impl Into<Expr>) -> Operator {
    index_of_bytes_with(string, substring, None, None)
}

/// $indexOfBytes with optional `start` and `end`; `start` becomes `0` when only `end` is given
pub fn index_of_bytes_with(
    string: impl Into<Expr>,
    substring: impl Into<Expr>,
    start: Option<Expr>,
    end: Option<Expr>,
) -> Operator {
    Operator::array(
        "$indexOfBytes",
        index_of_operands(string.into(), substring.into(), start, end),
    )
}

/// $indexOfCP - Code point index of the first occurrence of a substring
pub fn index_of_cp(string: impl Into<Expr>, substring: impl Into<Expr>) -> Operator {
    index_of_cp_with(string, substring, None, None)
}

pub fn index_of_cp_with(
    string: impl Into<Expr>,
    substring: impl Into<Expr>,
    start: Option<Expr>,
    end: Option<Expr>,
) -> Operator {
    Operator::array(
        "$indexOfCP",
        index_of_operands(string.into(), substring.into(), start, end),
    )
}

fn trimming(keyword: &'static str, input: Expr, chars: Option<Expr>) -> Operator {
    Operator::document(
        keyword,
        [Field::required("input", input), Field::optional("chars", chars)],
    )
}

/// $ltrim - Remove leading whitespace
pub fn ltrim(input: impl Into<Expr>) -> Operator {
    ltrim_with(input, None)
}

/// $ltrim - Remove the given leading characters, or whitespace when absent
pub fn ltrim_with(input: impl Into<Expr>, chars: Option<Expr>) -> Operator {
    trimming("$ltrim", input.into(), chars)
}

/// $rtrim - Remove trailing whitespace
pub fn rtrim(input: impl Into<Expr>) -> Operator {
    rtrim_with(input, None)
}

pub fn rtrim_with(input: impl Into<Expr>, chars: Option<Expr>) -> Operator {
    trimming("$rtrim", input.into(), chars)
}

/// $trim - Remove leading and trailing whitespace
///
/// Example:
/// ```json
/// {"$trim": {"input": "$description"}}
/// ```
pub fn trim(input: impl Into<Expr>) -> Operator {
    trim_with(input, None)
}

pub fn trim_with(input: impl Into<Expr>, chars: Option<Expr>) -> Operator {
    trimming("$trim", input.into(), chars)
}

fn regex(keyword: &'static str, input: Expr, pattern: Expr, options: Option<Expr>) -> Operator {
    Operator::document(
        keyword,
        [
            Field::required("input", input),
            Field::required("regex", pattern),
            Field::optional("options", options),
        ],
    )
}

/// $regexFind - First match of a regular expression
///
/// Example:
/// ```json
/// {"$regexFind": {"input": "$category", "regex": "cafe", "options": "i"}}
/// ```
pub fn regex_find(input: impl Into<Expr>, pattern: impl Into<Expr>, options: Option<Expr>) -> Operator {
    regex("$regexFind", input.into(), pattern.into(), options)
}

/// $regexFindAll - Every match of a regular expression
pub fn regex_find_all(input: impl Into<Expr>, pattern: impl Into<Expr>, options: Option<Expr>) -> Operator {
    regex("$regexFindAll", input.into(), pattern.into(), options)
}

/// $regexMatch - Whether a regular expression matches
pub fn regex_match(input: impl Into<Expr>, pattern: impl Into<Expr>, options: Option<Expr>) -> Operator {
    regex("$regexMatch", input.into(), pattern.into(), options)
}

fn replacing(keyword: &'static str, input: Expr, find: Expr, replacement: Expr) -> Operator {
    Operator::document(
        keyword,
        [
            Field::required("input", input),
            Field::required("find", find),
            Field::required("replacement", replacement),
        ],
    )
}

/// $replaceOne - Replace the first occurrence of a string
pub fn replace_one(
    input: impl Into<Expr>,
    find: impl Into<Expr>,
    replacement: impl Into<Expr>,
) -> Operator {
    replacing("$replaceOne", input.into(), find.into(), replacement.into())
}

/// $replaceAll - Replace every occurrence of a string
pub fn replace_all(
    input: impl Into<Expr>,
    find: impl Into<Expr>,
    replacement: impl Into<Expr>,
) -> Operator {
    replacing("$replaceAll", input.into(), find.into(), replacement.into())
}

/// $split - Split a string on a delimiter
pub fn split(string: impl Into<Expr>, delimiter: impl Into<Expr>) -> Operator {
    Operator::array("$split", [string.into(), delimiter.into()])
}

/// $strLenBytes
pub fn str_len_bytes(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$strLenBytes", expression)
}

/// $strLenCP
pub fn str_len_cp(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$strLenCP", expression)
}

/// $strcasecmp - Case-insensitive comparison
pub fn strcasecmp(left: impl Into<Expr>, right: impl Into<Expr>) -> Operator {
    Operator::array("$strcasecmp", [left.into(), right.into()])
}

/// $substr
pub fn substr(string: impl Into<Expr>, start: impl Into<Expr>, length: impl Into<Expr>) -> Operator {
    Operator::array("$substr", [string.into(), start.into(), length.into()])
}

/// $substrBytes - Substring by UTF-8 byte index and count
pub fn substr_bytes(
    string: impl Into<Expr>,
    byte_index: impl Into<Expr>,
    byte_count: impl Into<Expr>,
) -> Operator {
    Operator::array("$substrBytes", [string.into(), byte_index.into(), byte_count.into()])
}

/// $substrCP - Substring by code point index and count
pub fn substr_cp(
    string: impl Into<Expr>,
    code_point_index: impl Into<Expr>,
    code_point_count: impl Into<Expr>,
) -> Operator {
    Operator::array(
        "$substrCP",
        [string.into(), code_point_index.into(), code_point_count.into()],
    )
}

/// $toLower
pub fn to_lower(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toLower", expression)
}

/// $toString
pub fn to_string(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toString", expression)
}

/// $toUpper
pub fn to_upper(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toUpper", expression)
}
