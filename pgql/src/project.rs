//! Projector: for each surviving Assignment, evaluates each Return
//! Expression in declared order and appends the value to its column.
//! Absent values are retained, never filtered. Two Return Expressions
//! with identical text share one column — each assignment contributes
//! exactly one entry to that column, however many Return Expressions
//! share the text.

use std::collections::HashMap;

use pgql_api::HostGraph;

use crate::ast::ReturnExpr;
use crate::error::Result;
use crate::eval::{resolve_attribute, resolve_identity};
use crate::matcher::Assignment;
use crate::query::Query;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct ResultColumns {
    /// Column keys in first-declaration order, already deduplicated.
    pub order: Vec<String>,
    columns: HashMap<String, Vec<Value>>,
}

impl ResultColumns {
    pub fn column(&self, key: &str) -> Option<&[Value]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order
            .first()
            .and_then(|key| self.columns.get(key))
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn project<H: HostGraph>(
    query: &Query,
    assignments: impl Iterator<Item = Result<Assignment>>,
    host: &H,
) -> Result<ResultColumns> {
    // Merge Return Expressions sharing the same text down to one
    // representative each, so the per-assignment loop below contributes
    // exactly one entry per merged column, not one per original occurrence.
    let mut order = Vec::new();
    let mut merged_items = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for item in &query.return_items {
        if seen.insert(item.text.clone()) {
            order.push(item.text.clone());
            merged_items.push(item);
        }
    }

    let mut columns: HashMap<String, Vec<Value>> = order.iter().map(|k| (k.clone(), Vec::new())).collect();

    for assignment in assignments {
        let assignment = assignment?;
        for item in &merged_items {
            let value = resolve_return_expr(&item.expr, &assignment, host);
            columns.get_mut(&item.text).unwrap().push(value);
        }
    }

    Ok(ResultColumns { order, columns })
}

fn resolve_return_expr<H: HostGraph>(
    expr: &ReturnExpr,
    assignment: &Assignment,
    host: &H,
) -> Value {
    match expr {
        ReturnExpr::Var(name) => resolve_identity(name, assignment),
        ReturnExpr::Attribute { variable, key } => resolve_attribute(variable, key, assignment, host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser, transform};
    use crate::matcher::MatchIter;
    use pgql_graph::InMemoryGraph;

    #[test]
    fn duplicate_return_text_merges_into_one_column() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        let tree = parser::parse("MATCH (A)-[]->(B) RETURN A, A").unwrap();
        let query = transform::transform(tree).unwrap();
        let matches = MatchIter::new(&query, &g);
        let result = project(&query, matches, &g).unwrap();
        assert_eq!(result.order, vec!["A".to_string()]);
        assert_eq!(result.column("A").unwrap().len(), 1);
    }

    #[test]
    fn absent_values_are_retained_in_columns() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        let tree = parser::parse("MATCH (A)-[]->(B) RETURN A.missing").unwrap();
        let query = transform::transform(tree).unwrap();
        let matches = MatchIter::new(&query, &g);
        let result = project(&query, matches, &g).unwrap();
        assert_eq!(result.column("A.missing").unwrap(), &[Value::Absent]);
    }

    #[test]
    fn len_and_is_empty_reflect_row_count() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let tree = parser::parse("MATCH (A)-[]->(B) RETURN A").unwrap();
        let query = transform::transform(tree).unwrap();
        let matches = MatchIter::new(&query, &g);
        let result = project(&query, matches, &g).unwrap();
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());

        let empty = InMemoryGraph::new();
        let matches = MatchIter::new(&query, &empty);
        let result = project(&query, matches, &empty).unwrap();
        assert_eq!(result.len(), 0);
        assert!(result.is_empty());
    }
}
