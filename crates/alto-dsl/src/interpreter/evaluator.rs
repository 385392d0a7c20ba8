//! Tree-walking evaluation of format ASTs.
//!
//! Every function takes the scope by mutable reference because calls may
//! define variables. The AST itself is never modified.

use std::sync::Arc;

use tracing::debug;

use crate::interpreter::error::{EvalError, EvalResult, Interrupt, compute_suggestions};
use crate::interpreter::scope::Scope;
use crate::parser::ast::{Call, Field, Group, Node};

/// Evaluate root nodes and concatenate the results.
///
/// Unlike a [`Field`], an empty variable at the root does not blank the
/// output; the parser never produces root variables anyway.
pub fn eval_nodes(nodes: &[Node], scope: &mut Scope) -> EvalResult {
    let mut output = String::new();
    for node in nodes {
        output.push_str(&eval_node(node, scope)?);
    }
    Ok(output)
}

/// Evaluate a single node.
pub fn eval_node(node: &Node, scope: &mut Scope) -> EvalResult {
    match node {
        Node::Literal(text) => Ok(text.clone()),
        Node::Variable(name) => Ok(scope.get(name).to_string()),
        Node::Field(field) => eval_field(field, scope),
        Node::Group(group) => eval_group(group, scope),
        Node::Call(call) => eval_call(call, scope),
    }
}

/// Evaluate a field.
///
/// A variable that evaluates empty blanks the whole field: text gathered so
/// far is dropped and the remaining nodes are not evaluated.
pub fn eval_field(field: &Field, scope: &mut Scope) -> EvalResult {
    let mut output = String::new();
    for node in &field.nodes {
        let text = eval_node(node, scope)?;
        if text.is_empty() && matches!(node, Node::Variable(_)) {
            return Ok(String::new());
        }
        output.push_str(&text);
    }
    Ok(output)
}

/// Evaluate a group, returning the first non-empty field.
///
/// A field that fails with an [`EvalError`] is skipped in favor of the next
/// one. Control signals always propagate.
pub fn eval_group(group: &Group, scope: &mut Scope) -> EvalResult {
    for (index, field) in group.fields.iter().enumerate() {
        match eval_field(field, scope) {
            Ok(text) if !text.is_empty() => return Ok(text),
            Ok(_) => {}
            Err(Interrupt::Error(error)) => {
                debug!(field = index, %error, "group field failed, falling back");
            }
            Err(control @ Interrupt::Control(_)) => return Err(control),
        }
    }
    Ok(String::new())
}

/// Resolve and invoke a function call.
pub fn eval_call(call: &Call, scope: &mut Scope) -> EvalResult {
    // The registry is shared, so holding it does not borrow the scope.
    let functions = Arc::clone(scope.functions());
    let Some(function) = functions.get(&call.name) else {
        return Err(EvalError::UnknownFunction {
            name: call.name.clone(),
            suggestions: compute_suggestions(&call.name, &functions.names()),
        }
        .into());
    };

    let arity = function.arity();
    if !arity.accepts(call.args.len()) {
        return Err(EvalError::Arity {
            function: call.name.clone(),
            expected: arity,
            got: call.args.len(),
        }
        .into());
    }

    function.call(&call.args, scope)
}

impl Field {
    /// Evaluate this field against `scope`.
    ///
    /// Functions use this to evaluate the arguments they need.
    pub fn eval(&self, scope: &mut Scope) -> EvalResult {
        eval_field(self, scope)
    }
}
