use super::Operator;
use crate::encoder::Expr;

macro_rules! unary_operators {
    ($($(#[$meta:meta])* $name:ident => $keyword:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(expression: impl Into<Expr>) -> Operator {
                Operator::scalar($keyword, expression)
            }
        )+
    };
}

unary_operators! {
    /// $sin - Sine of a value in radians
    sin => "$sin",
    /// $cos - Cosine of a value in radians
    cos => "$cos",
    /// $tan - Tangent of a value in radians
    tan => "$tan",
    /// $asin - Inverse sine, in radians
    asin => "$asin",
    /// $acos - Inverse cosine, in radians
    acos => "$acos",
    /// $atan - Inverse tangent, in radians
    atan => "$atan",
    /// $asinh
    asinh => "$asinh",
    /// $acosh
    acosh => "$acosh",
    /// $atanh
    atanh => "$atanh",
    /// $sinh
    sinh => "$sinh",
    /// $cosh
    cosh => "$cosh",
    /// $tanh
    tanh => "$tanh",
    /// $degreesToRadians
    degrees_to_radians => "$degreesToRadians",
    /// $radiansToDegrees
    radians_to_degrees => "$radiansToDegrees",
}

/// $atan2 - Inverse tangent of `y / x`, in radians
pub fn atan2(y: impl Into<Expr>, x: impl Into<Expr>) -> Operator {
    Operator::array("$atan2", [y.into(), x.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::test_support::assert_renders;

    #[test]
    fn test_unary_keywords() {
        let cases: [(fn(Expr) -> Operator, &str); 14] = [
            (|e| sin(e), "$sin"),
            (|e| cos(e), "$cos"),
            (|e| tan(e), "$tan"),
            (|e| asin(e), "$asin"),
            (|e| acos(e), "$acos"),
            (|e| atan(e), "$atan"),
            (|e| asinh(e), "$asinh"),
            (|e| acosh(e), "$acosh"),
            (|e| atanh(e), "$atanh"),
            (|e| sinh(e), "$sinh"),
            (|e| cosh(e), "$cosh"),
            (|e| tanh(e), "$tanh"),
            (|e| degrees_to_radians(e), "$degreesToRadians"),
            (|e| radians_to_degrees(e), "$radiansToDegrees"),
        ];
        for (constructor, keyword) in cases {
            let op = constructor(Expr::from("$angle"));
            assert_eq!(op.keyword(), keyword);
            assert_renders(&op, &format!(r#"{{"{}":"$angle"}}"#, keyword));
        }
    }

    #[test]
    fn test_atan2() {
        assert_renders(&atan2("$side_b", "$side_a"), r#"{"$atan2":["$side_b","$side_a"]}"#);
    }

    #[test]
    fn test_nested_conversion() {
        assert_renders(
            &sin(degrees_to_radians("$angle_a")),
            r#"{"$sin":{"$degreesToRadians":"$angle_a"}}"#,
        );
    }
}
