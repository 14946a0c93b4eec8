use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{Field, Operator, Shape};
use crate::encoder::Expr;

/// $cond - Conditional branching in array form
///
/// Example:
/// ```json
/// {"$cond": [{"$gte": ["$qty", 250]}, 30, 20]}
/// ```
pub fn cond(if_: impl Into<Expr>, then: impl Into<Expr>, else_: impl Into<Expr>) -> Operator {
    Operator::array("$cond", [if_.into(), then.into(), else_.into()])
}

/// Builder state: waiting for the `then` expression
#[derive(Debug)]
pub struct NeedsThen;

/// Builder state: waiting for the `else` expression
#[derive(Debug)]
pub struct NeedsElse;

/// Step-by-step `$cond` builder
///
/// Each step is a different type, so `then` can only be given once and
/// only before `otherwise`.
#[derive(Debug)]
pub struct CondBuilder<S> {
    parts: Vec<Expr>,
    state: PhantomData<S>,
}

/// Start a `$cond` from its condition
pub fn cond_if(if_: impl Into<Expr>) -> CondBuilder<NeedsThen> {
    CondBuilder {
        parts: vec![if_.into()],
        state: PhantomData,
    }
}

impl CondBuilder<NeedsThen> {
    pub fn then(mut self, then: impl Into<Expr>) -> CondBuilder<NeedsElse> {
        self.parts.push(then.into());
        CondBuilder {
            parts: self.parts,
            state: PhantomData,
        }
    }
}

impl CondBuilder<NeedsElse> {
    pub fn otherwise(mut self, else_: impl Into<Expr>) -> Operator {
        self.parts.push(else_.into());
        Operator::array("$cond", self.parts)
    }
}

/// $ifNull - First non-null input, or the replacement
///
/// Example:
/// ```json
/// {"$ifNull": ["$description", "$title", "Unspecified"]}
/// ```
pub fn if_null<I>(inputs: I, replacement: impl Into<Expr>) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let mut operands: Vec<Expr> = inputs.into_iter().map(Into::into).collect();
    operands.push(replacement.into());
    Operator::array("$ifNull", operands)
}

/// Accumulates `$ifNull` inputs in order
///
/// The builder is consumed and handed back by each call. It is owned by
/// one caller at a time; sharing one between threads needs external locking.
#[derive(Debug, Clone, Default)]
pub struct IfNullBuilder {
    inputs: Vec<Expr>,
}

pub fn if_null_builder() -> IfNullBuilder {
    IfNullBuilder::default()
}

impl IfNullBuilder {
    pub fn input(mut self, input: impl Into<Expr>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Finish with the replacement, written after every input
    pub fn replacement(self, replacement: impl Into<Expr>) -> Operator {
        if_null(self.inputs, replacement)
    }
}

/// A `{case, then}` branch document
pub fn branch(case: impl Into<Expr>, then: impl Into<Expr>) -> Expr {
    Expr::Map(vec![
        ("case".to_string(), case.into()),
        ("then".to_string(), then.into()),
    ])
}

/// $switch from a prepared sequence of branches
///
/// Example:
/// ```json
/// {"$switch": {"branches": [{"case": {"$eq": [0, 5]}, "then": "equals"}], "default": "none"}}
/// ```
pub fn switch_n<I>(branches: I, default: Option<Expr>) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Operator::document(
        "$switch",
        [
            Field::nested("branches", Shape::operands(branches)),
            Field::optional("default", default),
        ],
    )
}

struct BranchNode {
    case: Expr,
    then: Expr,
    previous: Option<Arc<BranchNode>>,
}

impl Drop for BranchNode {
    /// Unlink the chain one node at a time so long switches drop without recursion
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(node) = previous {
            match Arc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

/// Immutable `$switch` builder
///
/// Appending a branch returns a new builder that shares the existing branches,
/// so any intermediate builder can be reused as a starting point for several
/// switches, including from different threads.
#[derive(Clone, Default)]
pub struct SwitchBuilder {
    last: Option<Arc<BranchNode>>,
    len: usize,
}

impl fmt::Debug for SwitchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBuilder")
            .field("branches", &self.len)
            .finish()
    }
}

/// Start an empty `$switch`
pub fn switch() -> SwitchBuilder {
    SwitchBuilder::default()
}

/// Start a `$switch` with its first case
pub fn switch_case(case: impl Into<Expr>) -> BranchBuilder {
    switch().on_case(case)
}

impl SwitchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a branch; the branch is added once `then` is given
    pub fn on_case(&self, case: impl Into<Expr>) -> BranchBuilder {
        BranchBuilder {
            base: self.clone(),
            case: case.into(),
        }
    }

    pub fn branch_count(&self) -> usize {
        self.len
    }

    fn branches(&self) -> Vec<Expr> {
        let mut branches = Vec::with_capacity(self.len);
        let mut node = self.last.as_deref();
        while let Some(current) = node {
            branches.push(branch(current.case.clone(), current.then.clone()));
            node = current.previous.as_deref();
        }
        branches.reverse();
        branches
    }

    /// Finish without a default
    pub fn build(&self) -> Operator {
        switch_n(self.branches(), None)
    }

    pub fn build_with_default(&self, default: impl Into<Expr>) -> Operator {
        switch_n(self.branches(), Some(default.into()))
    }
}

/// A `$switch` branch waiting for its `then` expression
#[derive(Debug, Clone)]
pub struct BranchBuilder {
    base: SwitchBuilder,
    case: Expr,
}

impl BranchBuilder {
    pub fn then(self, then: impl Into<Expr>) -> SwitchBuilder {
        let node = BranchNode {
            case: self.case,
            then: then.into(),
            previous: self.base.last,
        };
        SwitchBuilder {
            last: Some(Arc::new(node)),
            len: self.base.len + 1,
        }
    }
}

/// Mutable `$switch` accumulator for building branches in a loop
#[derive(Debug, Clone, Default)]
pub struct SwitchBranches {
    branches: Vec<Expr>,
}

pub fn switch_branches() -> SwitchBranches {
    SwitchBranches::default()
}

impl SwitchBranches {
    pub fn branch(mut self, case: impl Into<Expr>, then: impl Into<Expr>) -> Self {
        self.branches.push(branch(case, then));
        self
    }

    pub fn branches_count(&self) -> usize {
        self.branches.len()
    }

    pub fn build(self) -> Operator {
        switch_n(self.branches, None)
    }

    pub fn build_with_default(self, default: impl Into<Expr>) -> Operator {
        switch_n(self.branches, Some(default.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::test_support::{assert_renders, payload_keys};
    use crate::operators::{eq, gte};
    use crate::wire::JsonMode;

    #[test]
    fn test_cond_forms_match() {
        let expected = r#"{"$cond":[{"$gte":["$qty",250]},30,20]}"#;
        assert_renders(&cond(gte("$qty", 250), 30, 20), expected);
        assert_renders(&cond_if(gte("$qty", 250)).then(30).otherwise(20), expected);
    }

    #[test]
    fn test_if_null() {
        assert_renders(
            &if_null(["$description", "$title"], "Unspecified"),
            r#"{"$ifNull":["$description","$title","Unspecified"]}"#,
        );
    }

    #[test]
    fn test_if_null_builder() {
        let builder = if_null_builder().input("$a").input("$b");
        assert_eq!(builder.input_count(), 2);
        assert_renders(&builder.replacement(0), r#"{"$ifNull":["$a","$b",0]}"#);
    }

    #[test]
    fn test_if_null_builder_without_inputs() {
        assert_renders(&if_null_builder().replacement("x"), r#"{"$ifNull":["x"]}"#);
    }

    #[test]
    fn test_switch_single_branch_without_default() {
        let op = switch().on_case("$c1").then("$t1").build();
        assert_renders(&op, r#"{"$switch":{"branches":[{"case":"$c1","then":"$t1"}]}}"#);
        assert_eq!(payload_keys(&op), vec!["branches"]);
    }

    #[test]
    fn test_switch_builder_associativity() {
        let built = switch()
            .on_case("$a")
            .then("$b")
            .on_case("$c")
            .then("$d")
            .build_with_default("$e");
        let manual = switch_n([branch("$a", "$b"), branch("$c", "$d")], Some("$e".into()));
        assert_eq!(built.to_wire_value().unwrap(), manual.to_wire_value().unwrap());
        assert_renders(
            &built,
            r#"{"$switch":{"branches":[{"case":"$a","then":"$b"},{"case":"$c","then":"$d"}],"default":"$e"}}"#,
        );
    }

    #[test]
    fn test_switch_builder_branch_points_are_independent() {
        let base = switch_case(eq("$x", 1)).then("one");
        let left = base.on_case(eq("$x", 2)).then("two");
        let right = base.on_case(eq("$x", 3)).then("three");

        assert_eq!(base.branch_count(), 1);
        assert_eq!(left.branch_count(), 2);
        assert_eq!(right.branch_count(), 2);
        assert_renders(
            &base.build(),
            r#"{"$switch":{"branches":[{"case":{"$eq":["$x",1]},"then":"one"}]}}"#,
        );
        assert_renders(
            &right.build(),
            r#"{"$switch":{"branches":[{"case":{"$eq":["$x",1]},"then":"one"},{"case":{"$eq":["$x",3]},"then":"three"}]}}"#,
        );
    }

    #[test]
    fn test_switch_builder_across_threads() {
        let base = switch().on_case("$a").then(1);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let base = base.clone();
                std::thread::spawn(move || {
                    base.on_case("$b")
                        .then(i)
                        .build()
                        .to_json_string(JsonMode::Relaxed)
                        .unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!(
                    r#"{{"$switch":{{"branches":[{{"case":"$a","then":1}},{{"case":"$b","then":{}}}]}}}}"#,
                    i
                )
            );
        }
    }

    #[test]
    fn test_empty_switch() {
        assert_renders(&switch().build(), r#"{"$switch":{"branches":[]}}"#);
        assert_renders(
            &SwitchBuilder::new().build_with_default(Expr::Null),
            r#"{"$switch":{"branches":[],"default":null}}"#,
        );
    }

    #[test]
    fn test_switch_branches_accumulator() {
        let mut branches = switch_branches();
        for (case, then) in [("$a", 1), ("$b", 2)] {
            branches = branches.branch(case, then);
        }
        assert_eq!(branches.branches_count(), 2);
        assert_renders(
            &branches.build_with_default(0),
            r#"{"$switch":{"branches":[{"case":"$a","then":1},{"case":"$b","then":2}],"default":0}}"#,
        );
    }

    #[test]
    fn test_switch_n_with_operator_branches() {
        let op = switch_n([branch(eq(0, 5), "equals")], Some("none".into()));
        assert_renders(
            &op,
            r#"{"$switch":{"branches":[{"case":{"$eq":[0,5]},"then":"equals"}],"default":"none"}}"#,
        );
    }

    #[test]
    fn test_long_switch_builder_drops() {
        let mut builder = switch();
        for i in 0..200_000 {
            builder = builder.on_case(i).then(i);
        }
        assert_eq!(builder.branch_count(), 200_000);
        assert_eq!(format!("{:?}", builder), "SwitchBuilder { branches: 200000 }");
        drop(builder);
    }

    #[test]
    fn test_dropping_extension_keeps_shared_branches() {
        let base = switch_case(eq("$x", 1)).then("one");
        let extended = base.on_case(eq("$x", 2)).then("two");
        drop(extended);
        assert_renders(
            &base.build(),
            r#"{"$switch":{"branches":[{"case":{"$eq":["$x",1]},"then":"one"}]}}"#,
        );
    }
}
