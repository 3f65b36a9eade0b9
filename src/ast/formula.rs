use crate::ast::{Comparison, Connective, Term};

/// The smallest unit that yields a value for boolean folding.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A comparison or mutation (`c=200`, `code:=500`)
    Comparison(Comparison),

    /// A bare term, judged by its truthiness (`FUZZ|unique()`)
    Term(Term),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClauseBody {
    Statement(Statement),

    /// Parenthesised sub-formula, folded on its own first
    Group(Box<Formula>),
}

/// A statement or group, optionally negated with `not`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub negated: bool,
    pub body: ClauseBody,
}

/// A flat chain of clauses joined by `and`/`or`.
///
/// Folded strictly left to right: `a or b and c` is `(a or b) and c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub first: Clause,
    pub rest: Vec<(Connective, Clause)>,
}

impl Formula {
    /// Clauses in source order.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, clause)| clause))
    }
}
