//! The canonical Query value the Transformer builds: Match Clauses, a flat
//! Where conjunction, and Return Expressions, plus the declared variable
//! names in first-declaration order. Built once per `run`; consumed by the
//! Matcher and Projector; discarded at the end of the run.

use crate::ast::{Condition, MatchClause, ReturnItem};

#[derive(Debug, Clone)]
pub struct Query {
    pub matches: Vec<MatchClause>,
    pub where_conditions: Vec<Condition>,
    pub return_items: Vec<ReturnItem>,
    pub declared_variables: Vec<String>,
}
