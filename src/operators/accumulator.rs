use super::Operator;
use crate::encoder::Expr;

macro_rules! accumulators {
    ($($(#[$meta:meta])* $name:ident, $name_of:ident => $keyword:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(expression: impl Into<Expr>) -> Operator {
                Operator::scalar($keyword, expression)
            }

            #[doc = concat!("`", $keyword, "` over several expressions")]
            pub fn $name_of<I>(expressions: I) -> Operator
            where
                I: IntoIterator,
                I::Item: Into<Expr>,
            {
                Operator::iterable($keyword, expressions)
            }
        )+
    };
}

accumulators! {
    /// $avg - Average of numeric values, ignoring non-numbers
    ///
    /// Example:
    /// ```json
    /// {"$avg": "$scores"}
    /// ```
    avg, avg_of => "$avg",
    /// $max
    max, max_of => "$max",
    /// $min
    min, min_of => "$min",
    /// $stdDevPop - Population standard deviation
    std_dev_pop, std_dev_pop_of => "$stdDevPop",
    /// $stdDevSamp - Sample standard deviation
    std_dev_samp, std_dev_samp_of => "$stdDevSamp",
    /// $sum
    sum, sum_of => "$sum",
}

/// $push - Collect values into an array within a group
pub fn push(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$push", expression)
}
