//! Clause state
//!
//! Plain accumulation types shared by the builder and the compiler. A
//! `ClauseSet` is independent of any entity; the compiler pairs it with a
//! table schema when a statement is rendered.

use std::fmt;

use crate::query::page::PageCursor;
use crate::schema::SortOrder;
use crate::value::StoreValue;

/// Comparison operators the store accepts in predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Eq => write!(f, "="),
            Comparator::Gt => write!(f, ">"),
            Comparator::Gte => write!(f, ">="),
            Comparator::Lt => write!(f, "<"),
            Comparator::Lte => write!(f, "<="),
            Comparator::In => write!(f, "IN"),
        }
    }
}

/// Connective joining a predicate to the one before it. The connective of
/// the first predicate is never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

/// One predicate term, kept in the order it was added
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub boolean: BoolOp,
    pub column: String,
    pub cmp: Comparator,
    /// Exactly one value for scalar comparators, one or more for `In`
    pub values: Vec<StoreValue>,
}

/// The single ordering term a query may carry
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    pub column: String,
    pub order: SortOrder,
}

/// Accumulated clause state.
///
/// Nothing is validated at accumulation time; the compiler checks shape
/// against the schema when a terminal runs, so an invalid combination
/// never reaches the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseSet {
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) ordering: Option<OrderTerm>,
    pub(crate) limit: Option<u32>,
    pub(crate) cursor: Option<PageCursor>,
}

impl ClauseSet {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn ordering(&self) -> Option<&OrderTerm> {
        self.ordering.as_ref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn cursor(&self) -> Option<PageCursor> {
        self.cursor
    }

    /// Whether any predicate after the first joins with `OR`. The first
    /// predicate's connective is never rendered and does not count.
    pub fn or_joined(&self) -> bool {
        self.predicates.iter().skip(1).any(|p| p.boolean == BoolOp::Or)
    }
}
