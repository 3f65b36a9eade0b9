use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Character offset into the filter source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("Unterminated string starting at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("Invalid integer '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Invalid placeholder '{text}' at {position}: use FUZZ or FUZ2Z..FUZ9Z")]
    InvalidPlaceholder { text: String, position: Position },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' || ch == '-'
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Where the most recently returned token starts.
    pub fn token_position(&self) -> Position {
        Position {
            offset: self.token_start,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Single-quoted string. `\'` and `\\` are escapes; any other backslash
    /// is kept as written so regex classes like `\d` survive.
    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.token_position();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(other) => {
                            result.push('\\');
                            result.push(other);
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn classify_word(&self, word: String) -> Result<Token, LexError> {
        let position = self.token_position();

        if word.chars().all(|c| c.is_ascii_digit()) {
            return word
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| LexError::InvalidNumber { text: word, position });
        }

        if let Some(digits) = word.strip_prefix("FUZ").and_then(|w| w.strip_suffix('Z'))
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            let index = match digits {
                "" => Some(1),
                d if d.len() == 1 => d.parse::<usize>().ok().filter(|n| (2..=9).contains(n)),
                _ => None,
            };
            return index
                .map(Token::Placeholder)
                .ok_or(LexError::InvalidPlaceholder { text: word, position });
        }

        Ok(match word.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "BBB" => Token::Baseline,
            "XXX" => Token::ErrorMarker,
            _ => Token::Word(word),
        })
    }

    /// Consume one or two characters and produce `token`.
    fn emit(&mut self, width: usize, token: Token) -> Result<Token, LexError> {
        self.position += width;
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('|') => self.emit(1, Token::Pipe),
            Some('(') => self.emit(1, Token::LParen),
            Some(')') => self.emit(1, Token::RParen),
            Some('[') => self.emit(1, Token::LBracket),
            Some(']') => self.emit(1, Token::RBracket),
            Some(',') => self.emit(1, Token::Comma),
            Some('~') => self.emit(1, Token::Contains),
            Some('=') => match self.peek_char(1) {
                Some('=') => self.emit(2, Token::EqEq),
                Some('~') => self.emit(2, Token::RegexMatch),
                Some('+') => self.emit(2, Token::EqPlus),
                Some('-') => self.emit(2, Token::EqMinus),
                _ => self.emit(1, Token::Eq),
            },
            Some('!') => match self.peek_char(1) {
                Some('=') => self.emit(2, Token::NotEq),
                Some('~') => self.emit(2, Token::NotContains),
                _ => Err(LexError::UnexpectedChar {
                    ch: '!',
                    position: self.token_position(),
                }),
            },
            Some(':') => match self.peek_char(1) {
                Some('=') => self.emit(2, Token::ColonEqual),
                _ => Err(LexError::UnexpectedChar {
                    ch: ':',
                    position: self.token_position(),
                }),
            },
            Some('<') => match self.peek_char(1) {
                Some('=') => self.emit(2, Token::LtEq),
                _ => self.emit(1, Token::Lt),
            },
            Some('>') => match self.peek_char(1) {
                Some('=') => self.emit(2, Token::GtEq),
                _ => self.emit(1, Token::Gt),
            },
            Some('\'') => self.read_string().map(Token::String),
            Some(ch) if is_word_char(ch) => {
                let word = self.read_word();
                self.classify_word(word)
            }
            Some(ch) => Err(LexError::UnexpectedChar {
                ch,
                position: self.token_position(),
            }),
        }
    }

    /// Lex the whole input, `Eof` excluded.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not BBB XXX");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Baseline);
    assert_eq!(lexer.next_token().unwrap(), Token::ErrorMarker);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_operator_call() {
    let mut lexer = Lexer::new("FUZ2Z|gregex('id=(\\d+)')");
    assert_eq!(lexer.next_token().unwrap(), Token::Placeholder(2));
    assert_eq!(lexer.next_token().unwrap(), Token::Pipe);
    assert_eq!(lexer.next_token().unwrap(), Token::Word("gregex".to_string()));
    assert_eq!(lexer.token_position(), Position { offset: 6 });
    assert_eq!(lexer.next_token().unwrap(), Token::LParen);
    assert_eq!(lexer.next_token().unwrap(), Token::String("id=(\\d+)".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::RParen);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
