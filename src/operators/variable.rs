use super::{Field, Operator};
use crate::encoder::Expr;

/// $let - Bind variables for use in an expression
///
/// `vars` is a prepared document of variable names to expressions.
pub fn let_(vars: impl Into<Expr>, in_: impl Into<Expr>) -> Operator {
    Operator::document(
        "$let",
        [Field::required("vars", vars), Field::required("in", in_)],
    )
}

/// $let from name/expression pairs, written in the given order
///
/// Example:
/// ```json
/// {"$let": {"vars": {"total": {"$add": ["$price", "$tax"]}}, "in": {"$multiply": ["$$total", 2]}}}
/// ```
pub fn let_vars<I, K, V>(vars: I, in_: impl Into<Expr>) -> Operator
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expr>,
{
    let_(Expr::map(vars), in_)
}
