use crate::{ast::CompOp, path::FieldPath, value::Value};

/// Something that resolves to a value before any operator is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    // Literals
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 200
    /// ```
    Integer(i64),

    /// Literal string
    ///
    /// # Example
    /// ```text
    /// 'admin'
    /// ```
    String(String),

    // References
    /// Attribute of the current record
    ///
    /// # Examples
    /// ```text
    /// c
    /// headers.response.Server
    /// ```
    Field(FieldPath),

    /// Generated payload value, optionally projected into
    ///
    /// # Examples
    /// ```text
    /// FUZZ              // index 1, no field
    /// FUZ2Z             // index 2
    /// FUZZ[url]         // field `url` of a structured payload
    /// ```
    Placeholder {
        index: usize,
        field: Option<FieldPath>,
    },
}

/// A value transformation applied after resolution.
///
/// # Examples
/// ```text
/// |unique()
/// |replace('http', 'https')
/// |decode('base64')
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCall {
    /// Operator name as written (`u`, `unique`, `gre`, ...)
    pub name: String,

    /// First argument, if any
    pub arg1: Option<Value>,

    /// Second argument, if any
    pub arg2: Option<Value>,

    /// Character offset of the name in the source, identifying this call site
    pub location: usize,
}

/// An operand with at most one operator call.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub operand: Operand,
    pub operator: Option<OperatorCall>,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum RightHand {
    /// Baseline marker (`BBB`)
    ///
    /// Resolves to the baseline attribute matching the left-hand field.
    Baseline,

    /// Error marker (`XXX`)
    ErrorMarker,

    /// Any ordinary term, literals included
    Term(Term),
}

/// A binary comparison or mutation.
///
/// # Examples
/// ```text
/// c=200
/// FUZZ[url]~'admin'
/// code:=500
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Term,
    pub op: CompOp,
    pub right: RightHand,
}
