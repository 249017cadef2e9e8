//! Pipeline node contracts.
//!
//! The evaluator's callers: a filter node that evaluates a compiled
//! predicate per record, and the batch query source node whose
//! configuration seeds scope values before evaluation. The rest of the
//! dataflow graph lives elsewhere; only the shapes that touch the evaluator
//! are defined here.

pub mod filter;
pub mod query;

pub use filter::FilterNode;
pub use query::{Fill, QueryNode};
