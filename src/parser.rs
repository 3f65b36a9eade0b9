use std::mem;

use thiserror::Error;

use crate::{
    ast::{
        Clause, ClauseBody, CompOp, Comparison, Connective, Formula, Operand, OperatorCall,
        RightHand, Statement, Term, Token,
    },
    lexer::{LexError, Lexer, Position},
    path::FieldPath,
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        position: Position,
    },

    #[error("Invalid field path '{path}' at {position}")]
    InvalidPath { path: String, position: Position },

    #[error("Only one operator call is allowed per value (second one at {position})")]
    MultipleOperators { position: Position },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_position();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_position();
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_token.clone(),
            position: self.current_position,
        }
    }

    fn field_path(raw: &str, position: Position) -> Result<FieldPath, ParseError> {
        FieldPath::parse(raw).map_err(|_| ParseError::InvalidPath {
            path: raw.to_string(),
            position,
        })
    }

    /// Parse a complete filter: a formula followed by end of input.
    pub fn parse(&mut self) -> Result<Formula, ParseError> {
        let formula = self.parse_formula()?;
        self.expect(Token::Eof)?;
        Ok(formula)
    }

    /// clause (("and" | "or") clause)*
    fn parse_formula(&mut self) -> Result<Formula, ParseError> {
        let first = self.parse_clause()?;
        let mut rest = Vec::new();

        loop {
            let connective = match self.current_token {
                Token::And => Connective::And,
                Token::Or => Connective::Or,
                _ => break,
            };
            self.advance()?;
            rest.push((connective, self.parse_clause()?));
        }

        Ok(Formula { first, rest })
    }

    /// ["not"] (statement | "(" formula ")")
    fn parse_clause(&mut self) -> Result<Clause, ParseError> {
        let negated = self.check(&Token::Not);
        if negated {
            self.advance()?;
        }

        let body = if self.check(&Token::LParen) {
            self.advance()?;
            let formula = self.parse_formula()?;
            self.expect(Token::RParen)?;
            ClauseBody::Group(Box::new(formula))
        } else {
            ClauseBody::Statement(self.parse_statement()?)
        };

        Ok(Clause { negated, body })
    }

    /// term [comp-op (BBB | XXX | term)]
    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let left = self.parse_term()?;

        let Some(op) = CompOp::from_token(&self.current_token) else {
            return Ok(Statement::Term(left));
        };
        self.advance()?;

        let right = match self.current_token {
            Token::Baseline => {
                self.advance()?;
                RightHand::Baseline
            }
            Token::ErrorMarker => {
                self.advance()?;
                RightHand::ErrorMarker
            }
            _ => RightHand::Term(self.parse_term()?),
        };

        Ok(Statement::Comparison(Comparison { left, op, right }))
    }

    /// (literal | placeholder | field) [op-call]
    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let position = self.current_position;
        let mut inner_operator = None;

        let operand = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(n) => {
                self.advance()?;
                Operand::Integer(n)
            }
            Token::String(s) => {
                self.advance()?;
                Operand::String(s)
            }
            Token::Word(name) => {
                self.advance()?;
                Operand::Field(Self::field_path(&name, position)?)
            }
            Token::Placeholder(index) => {
                self.advance()?;
                let mut field = None;

                // FUZZ[field], FUZZ[field|op()] or FUZZ[|op()]
                if self.check(&Token::LBracket) {
                    self.advance()?;
                    if let Token::Word(name) = &self.current_token {
                        let name = name.clone();
                        let field_position = self.current_position;
                        self.advance()?;
                        field = Some(Self::field_path(&name, field_position)?);
                    }
                    if self.check(&Token::Pipe) {
                        inner_operator = Some(self.parse_operator_call()?);
                    }
                    if field.is_none() && inner_operator.is_none() {
                        return Err(self.unexpected("a field path or operator call"));
                    }
                    self.expect(Token::RBracket)?;
                }

                Operand::Placeholder { index, field }
            }
            token => {
                self.current_token = token;
                return Err(self.unexpected("a literal, field or placeholder"));
            }
        };

        let operator = if self.check(&Token::Pipe) {
            if inner_operator.is_some() {
                return Err(ParseError::MultipleOperators {
                    position: self.current_position,
                });
            }
            Some(self.parse_operator_call()?)
        } else {
            inner_operator
        };

        if operator.is_some() && self.check(&Token::Pipe) {
            return Err(ParseError::MultipleOperators {
                position: self.current_position,
            });
        }

        Ok(Term { operand, operator })
    }

    /// "|" name "(" [literal] ["," literal] ")"
    fn parse_operator_call(&mut self) -> Result<OperatorCall, ParseError> {
        self.expect(Token::Pipe)?;

        let location = self.current_position.offset;
        let name = match &self.current_token {
            Token::Word(name) => name.clone(),
            _ => return Err(self.unexpected("an operator name")),
        };
        self.advance()?;

        self.expect(Token::LParen)?;
        let arg1 = self.parse_argument()?;
        let arg2 = if self.check(&Token::Comma) {
            self.advance()?;
            match self.parse_argument()? {
                Some(arg) => Some(arg),
                None => return Err(self.unexpected("an integer or quoted string")),
            }
        } else {
            None
        };
        self.expect(Token::RParen)?;

        Ok(OperatorCall {
            name,
            arg1,
            arg2,
            location,
        })
    }

    fn parse_argument(&mut self) -> Result<Option<Value>, ParseError> {
        let arg = match &self.current_token {
            Token::Integer(n) => Value::Integer(*n),
            Token::String(s) => Value::String(s.clone()),
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(arg))
    }
}

/// Lex and parse `source` in one step.
pub fn parse_filter(source: &str) -> Result<Formula, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}
