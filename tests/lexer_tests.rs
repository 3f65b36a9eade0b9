// tests/lexer_tests.rs

use resfilter_lang::ast::Token;
use resfilter_lang::lexer::{LexError, Lexer, Position};

fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("|", Token::Pipe),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        (",", Token::Comma),
        ("~", Token::Contains),
        ("=", Token::Eq),
        ("<", Token::Lt),
        (">", Token::Gt),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("=~", Token::RegexMatch),
        ("!~", Token::NotContains),
        (":=", Token::ColonEqual),
        ("=+", Token::EqPlus),
        ("=-", Token::EqMinus),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_operators_between_words() {
    assert_eq!(
        lex("c!=200"),
        vec![Token::Word("c".to_string()), Token::NotEq, Token::Integer(200)]
    );
    assert_eq!(
        lex("url=+'x'"),
        vec![
            Token::Word("url".to_string()),
            Token::EqPlus,
            Token::String("x".to_string())
        ]
    );
}

// ============================================================================
// Words, Numbers and Placeholders
// ============================================================================

#[test]
fn test_dotted_word_is_one_token() {
    assert_eq!(
        lex("headers.response.Content-Type"),
        vec![Token::Word("headers.response.Content-Type".to_string())]
    );
}

#[test]
fn test_integer() {
    assert_eq!(lex("404"), vec![Token::Integer(404)]);
}

#[test]
fn test_integer_overflow() {
    let result = Lexer::new("99999999999999999999").tokenize();
    assert!(matches!(result, Err(LexError::InvalidNumber { .. })));
}

#[test]
fn test_placeholders() {
    assert_eq!(lex("FUZZ"), vec![Token::Placeholder(1)]);
    assert_eq!(lex("FUZ2Z"), vec![Token::Placeholder(2)]);
    assert_eq!(lex("FUZ9Z"), vec![Token::Placeholder(9)]);
}

#[test]
fn test_invalid_placeholders() {
    for input in ["FUZ1Z", "FUZ0Z", "FUZ10Z"] {
        let result = Lexer::new(input).tokenize();
        assert!(
            matches!(result, Err(LexError::InvalidPlaceholder { .. })),
            "Expected invalid placeholder for {}",
            input
        );
    }
}

#[test]
fn test_placeholder_lookalikes_are_words() {
    assert_eq!(lex("FUZZY"), vec![Token::Word("FUZZY".to_string())]);
    assert_eq!(lex("fuzz"), vec![Token::Word("fuzz".to_string())]);
}

#[test]
fn test_reserved_words() {
    assert_eq!(
        lex("not c=BBB or c=XXX and l"),
        vec![
            Token::Not,
            Token::Word("c".to_string()),
            Token::Eq,
            Token::Baseline,
            Token::Or,
            Token::Word("c".to_string()),
            Token::Eq,
            Token::ErrorMarker,
            Token::And,
            Token::Word("l".to_string()),
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_escapes() {
    assert_eq!(lex(r"'it\'s'"), vec![Token::String("it's".to_string())]);
    assert_eq!(lex(r"'a\\b'"), vec![Token::String(r"a\b".to_string())]);
}

#[test]
fn test_regex_backslashes_survive() {
    assert_eq!(lex(r"'\d+\s'"), vec![Token::String(r"\d+\s".to_string())]);
}

#[test]
fn test_string_keeps_spaces_and_operators() {
    assert_eq!(
        lex("'a and b = c'"),
        vec![Token::String("a and b = c".to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    let result = Lexer::new("FUZZ~'abc").tokenize();
    assert_eq!(
        result,
        Err(LexError::UnterminatedString {
            position: Position { offset: 5 }
        })
    );
}

// ============================================================================
// Errors and Positions
// ============================================================================

#[test]
fn test_unexpected_char() {
    let result = Lexer::new("c=200 & l=3").tokenize();
    assert_eq!(
        result,
        Err(LexError::UnexpectedChar {
            ch: '&',
            position: Position { offset: 6 }
        })
    );
}

#[test]
fn test_lone_bang_and_colon() {
    assert!(matches!(
        Lexer::new("!").tokenize(),
        Err(LexError::UnexpectedChar { ch: '!', .. })
    ));
    assert!(matches!(
        Lexer::new(":").tokenize(),
        Err(LexError::UnexpectedChar { ch: ':', .. })
    ));
}

#[test]
fn test_token_positions() {
    let mut lexer = Lexer::new("c=200 and  FUZZ|u()");
    let mut positions = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            break;
        }
        positions.push(lexer.token_position().offset);
    }
    assert_eq!(positions, vec![0, 1, 2, 6, 11, 15, 16, 17, 18]);
}

#[test]
fn test_whitespace_only() {
    assert!(lex("  \t\n ").is_empty());
}
