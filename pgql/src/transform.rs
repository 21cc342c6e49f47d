//! Transformer: walks the Query Tree produced by the parser and builds the
//! canonical `query::Query` — collecting Match Clauses, flattening the
//! Where conjunction, capturing Return Expressions verbatim, and checking
//! that every variable referenced outside a Match Clause was declared
//! inside one.

use std::collections::HashSet;

use crate::ast;
use crate::error::{Result, SemanticError};
use crate::query::Query;

pub fn transform(tree: ast::Query) -> Result<Query> {
    let mut declared = HashSet::new();
    let mut declared_order = Vec::new();
    for clause in &tree.matches {
        for node in &clause.nodes {
            if declared.insert(node.variable.clone()) {
                declared_order.push(node.variable.clone());
            }
        }
        for edge in &clause.edges {
            if let Some(name) = &edge.variable {
                if declared.insert(name.clone()) {
                    declared_order.push(name.clone());
                }
            }
        }
    }

    let where_conditions = tree
        .where_clause
        .map(|w| w.conditions)
        .unwrap_or_default();
    for condition in &where_conditions {
        check_operand_declared(&condition.lhs, &declared)?;
        check_operand_declared(&condition.rhs, &declared)?;
    }

    for item in &tree.return_clause.items {
        let variable = match &item.expr {
            ast::ReturnExpr::Var(v) => v,
            ast::ReturnExpr::Attribute { variable, .. } => variable,
        };
        if !declared.contains(variable) {
            return Err(SemanticError {
                message: format!(
                    "RETURN references undeclared variable '{variable}'"
                ),
            }
            .into());
        }
    }

    Ok(Query {
        matches: tree.matches,
        where_conditions,
        return_items: tree.return_clause.items,
        declared_variables: declared_order,
    })
}

fn check_operand_declared(operand: &ast::Operand, declared: &HashSet<String>) -> Result<()> {
    let variable = match operand {
        ast::Operand::Var(v) => Some(v),
        ast::Operand::Attribute { variable, .. } => Some(variable),
        ast::Operand::Literal(_) => None,
    };
    if let Some(variable) = variable
        && !declared.contains(variable)
    {
        return Err(SemanticError {
            message: format!("WHERE references undeclared variable '{variable}'"),
        }
        .into());
    }
    Ok(())
}
