//! # Result Filter Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the result filter
//! language: one-line expressions evaluated against every result a fuzzing
//! run produces, either to decide whether the result is shown or to rewrite
//! one of its fields.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Operands, operator calls, terms and comparisons
//! - **[operators]** - Comparison/mutation operators and connectives
//! - **[formula]** - Clauses and the flat `and`/`or` chains that fold them
//!
//! ## Quick Start
//!
//! ```text
//! c=200 and l>10
//! ```
//!
//! Shows results with status 200 and more than ten lines.
//!
//! ## Core Concepts
//!
//! ### References
//!
//! - **Fields** `c`, `lines`, `headers.response.Server` - attributes of the result
//! - **Placeholders** `FUZZ`, `FUZ2Z`, `FUZZ[url]` - payload values that built the request
//! - **Baseline** `BBB` - the same attribute on the baseline result
//! - **Error** `XXX` - the code given to requests that failed
//!
//! ### Operators
//!
//! A term takes at most one operator call:
//!
//! ```text
//! FUZZ|unique()
//! FUZZ[url|upper()]
//! FUZ2Z|gregex('id=(\d+)')
//! ```
//!
//! ### Folding
//!
//! `and` and `or` share one precedence level and fold left to right, so
//! `a or b and c` means `(a or b) and c`. Parentheses group; `not` negates
//! the single clause after it.
//!
//! ## Examples
//!
//! ### Hide the baseline response
//!
//! ```text
//! c!=BBB or l!=BBB
//! ```
//!
//! ### Deduplicate payloads
//!
//! ```text
//! FUZZ|unique()
//! c=200 and FUZZ[url]|unique()
//! ```
//!
//! ### Rewrite a field
//!
//! ```text
//! code:=500
//! url=+'?debug=1'
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod formula;

pub use tokens::Token;
pub use expressions::{Comparison, Operand, OperatorCall, RightHand, Term};
pub use operators::{CompOp, Connective};
pub use formula::{Clause, ClauseBody, Formula, Statement};
