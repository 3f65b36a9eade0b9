use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Unsigned integer literal
    ///
    /// # Examples
    /// ```text
    /// 200
    /// 0
    /// ```
    Integer(i64),

    /// String literal enclosed in single quotes
    ///
    /// # Examples
    /// ```text
    /// 'admin'
    /// 'it\'s'
    /// ```
    String(String),

    // Identifiers and References
    /// Field path made of letters, digits, `.`, `_` and `-`
    ///
    /// # Examples
    /// ```text
    /// c
    /// headers.response.Server
    /// history.0.code
    /// ```
    Word(String),

    /// Placeholder reference, carrying its 1-based payload index
    ///
    /// # Examples
    /// ```text
    /// FUZZ      // Placeholder(1)
    /// FUZ2Z     // Placeholder(2)
    /// ```
    Placeholder(usize),

    /// Baseline marker (`BBB`)
    Baseline,

    /// Error marker (`XXX`)
    ErrorMarker,

    // Logical
    /// Negation keyword (`not`)
    Not,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    // Comparison
    /// Loose equality (`=`)
    Eq,

    /// Loose equality (`==`)
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Regex match (`=~`)
    RegexMatch,

    /// Case-insensitive containment (`~`)
    Contains,

    /// Negated containment (`!~`)
    NotContains,

    // Mutation
    /// Overwrite (`:=`)
    ColonEqual,

    /// Append (`=+`)
    EqPlus,

    /// Prepend (`=-`)
    EqMinus,

    // Delimiters
    /// Operator call prefix
    ///
    /// # Examples
    /// ```text
    /// FUZZ|unique()
    /// r|replace('a','b')
    /// ```
    Pipe,

    /// Left parenthesis for grouping or operator arguments
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket for placeholder field projection
    LBracket,

    /// Right bracket
    RBracket,

    /// Comma separating operator arguments
    Comma,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::String(s) => write!(f, "string '{}'", s),
            Token::Word(w) => write!(f, "field '{}'", w),
            Token::Placeholder(1) => write!(f, "FUZZ"),
            Token::Placeholder(n) => write!(f, "FUZ{}Z", n),
            Token::Baseline => write!(f, "BBB"),
            Token::ErrorMarker => write!(f, "XXX"),
            Token::Not => write!(f, "'not'"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Eq => write!(f, "'='"),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::RegexMatch => write!(f, "'=~'"),
            Token::Contains => write!(f, "'~'"),
            Token::NotContains => write!(f, "'!~'"),
            Token::ColonEqual => write!(f, "':='"),
            Token::EqPlus => write!(f, "'=+'"),
            Token::EqMinus => write!(f, "'=-'"),
            Token::Pipe => write!(f, "'|'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
