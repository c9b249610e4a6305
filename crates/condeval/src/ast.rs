//! The abstract syntax tree and the evaluator that walks it (§3, §4.4).
//!
//! Nodes live in a flat arena (`Vec<NodeData>`) addressed by [`NodeId`],
//! following the design note in §9: the parser's container stack holds
//! arena indices rather than mutable references back into partially built
//! parents, which would otherwise require aliased mutable borrows. The
//! arena and the tree it encodes are built once by the parser and are
//! immutable afterwards; only [`AstRoot::evaluate`] and its children walk it.

use std::cmp::Ordering;
use std::rc::Rc;

use condeval_lex::{BuiltinFunction, TraceWriter};

use crate::coerce;
use crate::context::EvaluationContext;
use crate::error::ConvertError;
use crate::extensions::ExtensionFunction;
use crate::value::{Value, ValueKind};

/// Index of a node within an [`AstRoot`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

pub(crate) enum NodePayload {
    /// Carries a literal value (§3: `Leaf(value)`).
    Leaf(Value),
    /// Exactly two children once parsing completes: target, then index.
    Indexer,
    Function(FunctionKind),
}

pub(crate) enum FunctionKind {
    Builtin(BuiltinFunction),
    Extension(ExtensionBinding),
}

pub(crate) struct ExtensionBinding {
    pub name: String,
    pub body: Rc<dyn ExtensionFunction>,
}

pub(crate) struct NodeData {
    payload: NodePayload,
    children: Vec<NodeId>,
}

/// A parsed condition expression.
///
/// Once returned from [`crate::parse`] this tree is immutable; evaluating it
/// (possibly many times, against different [`EvaluationContext`]s) never
/// mutates the arena. An empty expression parses to a null root and always
/// evaluates to [`Value::Null`].
pub struct AstRoot {
    pub(crate) arena: Vec<NodeData>,
    pub(crate) root: Option<NodeId>,
}

impl AstRoot {
    pub(crate) fn push(&mut self, payload: NodePayload) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(NodeData {
            payload,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        &mut self.arena[id.0].children
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        &self.arena[id.0].children
    }

    /// Evaluates the tree against `context`, producing its typed [`Value`].
    pub fn evaluate(&self, context: &EvaluationContext) -> Result<Value, ConvertError> {
        match self.root {
            Some(id) => self.eval_node(id, context, 0),
            None => Ok(Value::Null),
        }
    }

    /// Evaluates and coerces the result to `Boolean`. Total: `to_boolean`
    /// never fails, so only evaluation itself can raise [`ConvertError`].
    pub fn evaluate_boolean(&self, context: &EvaluationContext) -> Result<bool, ConvertError> {
        let value = self.evaluate(context)?;
        Ok(coerce::to_boolean(&value, context.trace, 0))
    }

    /// Evaluates and coerces the result to `Number`.
    pub fn evaluate_number(
        &self,
        context: &EvaluationContext,
    ) -> Result<rust_decimal::Decimal, ConvertError> {
        let value = self.evaluate(context)?;
        coerce::to_number(&value, context.trace, 0)
    }

    /// Evaluates and coerces the result to `String`.
    pub fn evaluate_string(&self, context: &EvaluationContext) -> Result<String, ConvertError> {
        let value = self.evaluate(context)?;
        coerce::to_string_value(&value, context.trace, 0)
    }

    /// Evaluates and coerces the result to `Version`.
    pub fn evaluate_version(
        &self,
        context: &EvaluationContext,
    ) -> Result<condeval_lex::Version, ConvertError> {
        let value = self.evaluate(context)?;
        coerce::to_version(&value, context.trace, 0)
    }

    fn eval_node(&self, id: NodeId, context: &EvaluationContext, depth: usize) -> Result<Value, ConvertError> {
        match &self.arena[id.0].payload {
            NodePayload::Leaf(value) => Ok(value.clone()),
            NodePayload::Indexer => self.eval_indexer(id, context, depth),
            NodePayload::Function(FunctionKind::Builtin(builtin)) => {
                self.eval_builtin(*builtin, id, context, depth)
            }
            NodePayload::Function(FunctionKind::Extension(binding)) => {
                let mut args = Vec::with_capacity(self.children(id).len());
                for child in self.children(id) {
                    args.push(self.eval_node(*child, context, depth + 1)?);
                }
                tracing::trace!(extension = binding.name.as_str(), "evaluating extension");
                binding.body.evaluate(&args, context, depth + 1)
            }
        }
    }

    fn eval_child(&self, id: NodeId, context: &EvaluationContext, depth: usize) -> Result<Value, ConvertError> {
        self.eval_node(id, context, depth)
    }

    /// Indexing on `Array`/`Object` per §4.4; any other target kind, or a
    /// failed best-effort index coercion, yields `Null` rather than an error.
    fn eval_indexer(&self, id: NodeId, context: &EvaluationContext, depth: usize) -> Result<Value, ConvertError> {
        let children = self.children(id);
        let target = self.eval_child(children[0], context, depth + 1)?;
        let index = self.eval_child(children[1], context, depth + 1)?;

        match &target {
            Value::Array(node) => match coerce::to_index(&index) {
                Some(i) if i >= 0 => Ok(node
                    .get_index(i as usize)
                    .map(Value::from)
                    .unwrap_or(Value::Null)),
                _ => Ok(Value::Null),
            },
            Value::Object(node) => match coerce::to_string_value(&index, context.trace, depth + 1) {
                Ok(key) => Ok(node.get_property(&key).map(Value::from).unwrap_or(Value::Null)),
                Err(_) => Ok(Value::Null),
            },
            _ => Ok(Value::Null),
        }
    }

    fn eval_builtin(
        &self,
        builtin: BuiltinFunction,
        id: NodeId,
        context: &EvaluationContext,
        depth: usize,
    ) -> Result<Value, ConvertError> {
        let children = self.children(id);
        match builtin {
            BuiltinFunction::And => self.eval_and_or(children, context, depth, true),
            BuiltinFunction::Or => self.eval_and_or(children, context, depth, false),
            BuiltinFunction::Not => {
                let value = self.eval_child(children[0], context, depth + 1)?;
                let b = coerce::to_boolean(&value, context.trace, depth + 1);
                Ok(Value::Boolean(!b))
            }
            BuiltinFunction::Xor => {
                let a = self.eval_child(children[0], context, depth + 1)?;
                let b = self.eval_child(children[1], context, depth + 1)?;
                let a = coerce::to_boolean(&a, context.trace, depth + 1);
                let b = coerce::to_boolean(&b, context.trace, depth + 1);
                Ok(Value::Boolean(a != b))
            }
            BuiltinFunction::Eq => {
                let equal = self.eval_eq(children[0], children[1], context, depth)?;
                Ok(Value::Boolean(equal))
            }
            BuiltinFunction::Ne => {
                let equal = self.eval_eq(children[0], children[1], context, depth)?;
                Ok(Value::Boolean(!equal))
            }
            BuiltinFunction::Lt | BuiltinFunction::Le | BuiltinFunction::Gt | BuiltinFunction::Ge => {
                let left = self.eval_child(children[0], context, depth + 1)?;
                let right = self.eval_child(children[1], context, depth + 1)?;
                let ordering = coerce::compare_values(&left, &right, context.trace, depth + 1)?;
                let result = match builtin {
                    BuiltinFunction::Lt => ordering == Ordering::Less,
                    BuiltinFunction::Le => ordering != Ordering::Greater,
                    BuiltinFunction::Gt => ordering == Ordering::Greater,
                    BuiltinFunction::Ge => ordering != Ordering::Less,
                    _ => unreachable!(),
                };
                Ok(Value::Boolean(result))
            }
            BuiltinFunction::In => {
                let found = self.eval_in(children, context, depth)?;
                Ok(Value::Boolean(found))
            }
            BuiltinFunction::NotIn => {
                let found = self.eval_in(children, context, depth)?;
                Ok(Value::Boolean(!found))
            }
            BuiltinFunction::Contains | BuiltinFunction::StartsWith | BuiltinFunction::EndsWith => {
                let left = self.eval_child(children[0], context, depth + 1)?;
                let right = self.eval_child(children[1], context, depth + 1)?;
                let left = coerce::to_string_value(&left, context.trace, depth + 1)?;
                let right = coerce::to_string_value(&right, context.trace, depth + 1)?;
                let left = left.to_ascii_lowercase();
                let right = right.to_ascii_lowercase();
                let result = match builtin {
                    BuiltinFunction::Contains => left.contains(&right),
                    BuiltinFunction::StartsWith => left.starts_with(&right),
                    BuiltinFunction::EndsWith => left.ends_with(&right),
                    _ => unreachable!(),
                };
                Ok(Value::Boolean(result))
            }
        }
    }

    /// Shared body for `and`/`or`: short-circuits on the first child whose
    /// boolean coercion matches `stop_on`, never evaluating later children.
    fn eval_and_or(
        &self,
        children: &[NodeId],
        context: &EvaluationContext,
        depth: usize,
        stop_on: bool,
    ) -> Result<Value, ConvertError> {
        for child in children {
            let value = self.eval_child(*child, context, depth + 1)?;
            let b = coerce::to_boolean(&value, context.trace, depth + 1);
            if b == stop_on {
                return Ok(Value::Boolean(stop_on));
            }
        }
        Ok(Value::Boolean(!stop_on))
    }

    fn eval_eq(
        &self,
        left_id: NodeId,
        right_id: NodeId,
        context: &EvaluationContext,
        depth: usize,
    ) -> Result<bool, ConvertError> {
        let left = self.eval_child(left_id, context, depth + 1)?;
        let right = self.eval_child(right_id, context, depth + 1)?;
        Ok(coerce::values_equal(&left, &right, context.trace, depth + 1))
    }

    /// `in(x, c1, ..., cn)`: true iff `x` equals any `ci`, per the spec-correct
    /// reading that loops over every candidate rather than only index 1 (§9
    /// flags this ambiguity in the lineage this language grew from).
    fn eval_in(&self, children: &[NodeId], context: &EvaluationContext, depth: usize) -> Result<bool, ConvertError> {
        let needle = self.eval_child(children[0], context, depth + 1)?;
        for candidate_id in &children[1..] {
            let candidate = self.eval_child(*candidate_id, context, depth + 1)?;
            if coerce::values_equal(&needle, &candidate, context.trace, depth + 1) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateNode;
    use condeval_lex::NullTraceWriter;
    use std::str::FromStr;

    fn ctx() -> EvaluationContext<'static> {
        EvaluationContext::new(&NullTraceWriter, Rc::new(StateNode::Null))
    }

    fn leaf(value: Value) -> AstRoot {
        let mut ast = AstRoot {
            arena: Vec::new(),
            root: None,
        };
        let id = ast.push(NodePayload::Leaf(value));
        ast.root = Some(id);
        ast
    }

    // LEAF TESTS

    #[test]
    fn leaf_evaluates_to_its_literal() {
        let ast = leaf(Value::Boolean(true));
        assert_eq!(ast.evaluate(&ctx()).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn empty_expression_evaluates_to_null() {
        let ast = AstRoot {
            arena: Vec::new(),
            root: None,
        };
        assert_eq!(ast.evaluate(&ctx()).unwrap(), Value::Null);
    }

    // BUILTIN FUNCTION TESTS

    fn function(builtin: BuiltinFunction, children: Vec<Value>) -> AstRoot {
        let mut ast = AstRoot {
            arena: Vec::new(),
            root: None,
        };
        let fn_id = ast.push(NodePayload::Function(FunctionKind::Builtin(builtin)));
        for child in children {
            let child_id = ast.push(NodePayload::Leaf(child));
            ast.children_mut(fn_id).push(child_id);
        }
        ast.root = Some(fn_id);
        ast
    }

    #[test]
    fn and_short_circuits_without_evaluating_unreachable_conversion() {
        let ast = function(
            BuiltinFunction::And,
            vec![Value::Boolean(false), Value::String("not a number".to_string())],
        );
        assert_eq!(ast.evaluate_boolean(&ctx()).unwrap(), false);
    }

    #[test]
    fn or_short_circuits_on_first_truthy() {
        let ast = function(BuiltinFunction::Or, vec![Value::Boolean(true), Value::Number(Default::default())]);
        assert_eq!(ast.evaluate_boolean(&ctx()).unwrap(), true);
    }

    #[test]
    fn eq_true_then_number_versus_boolean() {
        let ast = function(BuiltinFunction::Eq, vec![Value::Number(rust_decimal::Decimal::ONE), Value::Boolean(true)]);
        assert_eq!(ast.evaluate_boolean(&ctx()).unwrap(), true);
    }

    #[test]
    fn notin_checks_every_candidate_not_just_index_one() {
        let ast = function(
            BuiltinFunction::NotIn,
            vec![
                Value::String("c".to_string()),
                Value::String("a".to_string()),
                Value::String("b".to_string()),
                Value::String("c".to_string()),
            ],
        );
        assert_eq!(ast.evaluate_boolean(&ctx()).unwrap(), false);
    }

    #[test]
    fn gt_version_left_against_unconvertible_fails() {
        let ast = function(
            BuiltinFunction::Gt,
            vec![
                Value::Number(rust_decimal::Decimal::from_str("1.2").unwrap()),
                Value::Version(condeval_lex::Version::new(1, 2, Some(0), Some(0))),
            ],
        );
        let err = ast.evaluate(&ctx()).unwrap_err();
        assert_eq!(err.from_kind, ValueKind::Version);
        assert_eq!(err.to_kind, ValueKind::Number);
    }

    // INDEXER TESTS

    #[test]
    fn indexer_on_array_out_of_range_is_null() {
        let mut ast = AstRoot {
            arena: Vec::new(),
            root: None,
        };
        let array = Rc::new(StateNode::Array(vec![Rc::new(StateNode::String("a0".to_string()))]));
        let target = ast.push(NodePayload::Leaf(Value::Array(array)));
        let index = ast.push(NodePayload::Leaf(Value::Number(rust_decimal::Decimal::from(5))));
        let indexer = ast.push(NodePayload::Indexer);
        ast.children_mut(indexer).push(target);
        ast.children_mut(indexer).push(index);
        ast.root = Some(indexer);
        assert_eq!(ast.evaluate(&ctx()).unwrap(), Value::Null);
    }
}
