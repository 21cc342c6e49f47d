//! Predicate and value evaluator: resolves operands against an Assignment
//! and the host graph, then applies the closed comparison table from the
//! component design. No NaN handling, no temporal coercion, no list/map
//! ordering — those are out of scope here.

use pgql_api::HostGraph;

use crate::ast::{Condition, Literal, Op, Operand};
use crate::matcher::Assignment;
use crate::value::Value;

pub fn resolve_operand<H: HostGraph>(operand: &Operand, assignment: &Assignment, host: &H) -> Value {
    match operand {
        Operand::Literal(lit) => match lit {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Int(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::Bool(b) => Value::Bool(*b),
        },
        Operand::Var(name) => resolve_identity(name, assignment),
        Operand::Attribute { variable, key } => resolve_attribute(variable, key, assignment, host),
    }
}

/// A bare variable resolves to "its identity" (§4.4). Node identity is the
/// host node id; an edge's identity is its per-pair discriminator — the
/// grammar never puts an edge variable in a position that's compared
/// against anything but another edge's identity or an absent value, so a
/// plain integer encoding is sufficient here.
///
/// Shared by the evaluator and the projector so both sides of a bare
/// `Var`/`ReturnExpr::Var` reference resolve identically.
pub(crate) fn resolve_identity(name: &str, assignment: &Assignment) -> Value {
    if let Some(&node) = assignment.nodes.get(name) {
        Value::Int(node as i64)
    } else if let Some(&edge) = assignment.edges.get(name) {
        Value::Int(edge.key as i64)
    } else {
        Value::Absent
    }
}

/// An attribute access resolves against whichever of node- or
/// edge-bindings holds `variable`. Shared by the evaluator and the
/// projector for the same reason as [`resolve_identity`].
pub(crate) fn resolve_attribute<H: HostGraph>(
    variable: &str,
    key: &str,
    assignment: &Assignment,
    host: &H,
) -> Value {
    if let Some(&node) = assignment.nodes.get(variable) {
        Value::from(host.node_attribute(node, key))
    } else if let Some(&edge) = assignment.edges.get(variable) {
        Value::from(host.edge_attribute(edge, key))
    } else {
        Value::Absent
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Absent, _) | (_, Value::Absent) => false,
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            as_f64(lhs) == as_f64(rhs)
        }
        _ => false,
    }
}

/// `compare(op, lhs, rhs)` — the closed comparison table from the
/// component design. An absent operand always yields `false`, for every
/// operator.
pub fn compare(op: Op, lhs: &Value, rhs: &Value) -> bool {
    if matches!(lhs, Value::Absent) || matches!(rhs, Value::Absent) {
        return false;
    }
    match op {
        Op::Eq => values_equal(lhs, rhs),
        Op::Ne => !values_equal(lhs, rhs),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => match (as_f64(lhs), as_f64(rhs)) {
            (Some(l), Some(r)) => match op {
                Op::Lt => l < r,
                Op::Le => l <= r,
                Op::Gt => l > r,
                Op::Ge => l >= r,
                _ => unreachable!(),
            },
            _ => false,
        },
    }
}

/// An empty Where is vacuously true; conjunction short-circuits.
pub fn eval_where<H: HostGraph>(
    conditions: &[Condition],
    assignment: &Assignment,
    host: &H,
) -> bool {
    conditions.iter().all(|condition| {
        let lhs = resolve_operand(&condition.lhs, assignment, host);
        let rhs = resolve_operand(&condition.rhs, assignment, host);
        compare(condition.op, &lhs, &rhs)
    })
}
