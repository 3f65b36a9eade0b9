use crate::{ast::Token, path::Combiner};

/// Comparison and mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    // Comparison
    /// Loose equality on string forms (`=` / `==`)
    Equal,
    /// Value inequality (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Matching
    /// Regex search (`=~`)
    Matches,
    /// Case-insensitive containment (`~`)
    Contains,
    /// Negated containment (`!~`)
    NotContains,

    // Mutation
    /// Overwrite the referenced field (`:=`)
    Assign,
    /// Existing value + new value (`=+`)
    AppendAssign,
    /// New value + existing value (`=-`)
    PrependAssign,
}

impl CompOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Eq | Token::EqEq => Some(CompOp::Equal),
            Token::NotEq => Some(CompOp::NotEqual),
            Token::Lt => Some(CompOp::LessThan),
            Token::Gt => Some(CompOp::GreaterThan),
            Token::LtEq => Some(CompOp::LessEqual),
            Token::GtEq => Some(CompOp::GreaterEqual),
            Token::RegexMatch => Some(CompOp::Matches),
            Token::Contains => Some(CompOp::Contains),
            Token::NotContains => Some(CompOp::NotContains),
            Token::ColonEqual => Some(CompOp::Assign),
            Token::EqPlus => Some(CompOp::AppendAssign),
            Token::EqMinus => Some(CompOp::PrependAssign),
            _ => None,
        }
    }

    /// The combiner a mutation hands to the record; `None` for `:=`.
    pub fn combiner(self) -> Option<Combiner> {
        match self {
            CompOp::AppendAssign => Some(Combiner::Append),
            CompOp::PrependAssign => Some(Combiner::Prepend),
            _ => None,
        }
    }
}

/// Logical connective between clauses. Both share one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}
