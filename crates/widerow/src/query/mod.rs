//! Query building, compilation, and execution
//!
//! Split by concern the same way a statement flows: `clause` holds the
//! accumulated state, `builder` is the fluent surface that grows it,
//! `compile` renders it into parameterized text, `execute` and `page`
//! run terminals against a store client.

pub mod builder;
pub mod clause;
pub mod compile;
pub mod execute;
pub mod page;

pub use builder::QueryBuilder;
pub use clause::{BoolOp, ClauseSet, Comparator, OrderTerm, Predicate};
pub use compile::{Statement, StatementCompiler, WriteOptions};
pub use page::{Page, PageCursor};
