//! A restricted property-graph pattern query language: a small
//! Cypher-shaped dialect of `MATCH` / `WHERE` / `RETURN` over a
//! caller-supplied directed, attributed multigraph.
//!
//! ```rust,ignore
//! use pgql::QueryExt;
//!
//! fn run_example(host: &impl pgql_api::HostGraph) {
//!     let columns = host.query("MATCH (A)-[]->(B) RETURN A").unwrap();
//!     let _ = columns.column("A");
//! }
//! ```
//!
//! The pipeline is parse → transform → match → project, each stage
//! living in its own module: [`parser`]/[`lexer`]/[`ast`] produce the
//! Query Tree, [`transform`] builds the canonical [`query::Query`],
//! [`matcher`] enumerates satisfying Assignments, and [`project`] turns
//! them into [`ResultColumns`].

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod project;
pub mod query;
pub mod transform;
pub mod value;

pub use error::{Error, Result};
pub use matcher::Assignment;
pub use project::ResultColumns;
pub use value::Value;

use pgql_api::HostGraph;

/// Parse-only entry point: text → Query Tree. Mainly useful for test
/// harnesses that want to inspect the AST directly.
pub fn parse(text: &str) -> Result<ast::Query> {
    parser::parse(text)
}

/// A parsed and transformed query, ready to run against any `HostGraph`.
/// Building one does not touch a host graph at all; only `run` does.
pub struct PreparedQuery {
    query: query::Query,
}

/// Parse + transform a query text, without running it yet.
pub fn prepare(text: &str) -> Result<PreparedQuery> {
    let tree = parser::parse(text)?;
    let query = transform::transform(tree)?;
    Ok(PreparedQuery { query })
}

impl PreparedQuery {
    /// Matches and projects against `host`, borrowing it for the
    /// duration of the run. Never clones the host graph.
    pub fn run<H: HostGraph>(&self, host: &H) -> Result<ResultColumns> {
        let matches = matcher::MatchIter::new(&self.query, host);
        project::project(&self.query, matches, host)
    }
}

/// The convenience one-shot driver: parse, transform, match, and project
/// in a single call.
pub fn run<H: HostGraph>(host: &H, text: &str) -> Result<ResultColumns> {
    prepare(text)?.run(host)
}

/// Extension trait giving any `HostGraph` a `.query(text)` method.
pub trait QueryExt {
    fn query(&self, text: &str) -> Result<ResultColumns>;
}

impl<H: HostGraph> QueryExt for H {
    fn query(&self, text: &str) -> Result<ResultColumns> {
        run(self, text)
    }
}
