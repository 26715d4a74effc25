//! Tokenizer: source string -> finite token sequence.
//!
//! Produces the full token list in one pass, terminated by an explicit
//! [`TokenKind::End`] token. Every token remembers the byte offset of its
//! first source character so parse errors can point back into the input.
//! Whitespace and newlines are skipped. Function keywords are matched
//! case-insensitively by longest prefix, so `ARCSIN` lexes as a function
//! while `e` or `abc` lex as variables.

use crate::symbolic::errors::ParseError;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Longest variable name the tree supports, as in the original
/// eight-byte fixed buffer (seven letters plus the terminator).
pub const MAX_VAR_NAME_LEN: usize = 7;

/// The fixed set of unary analytic functions recognized in source text.
///
/// Declaration order is longest-name-first: keyword matching walks the
/// variants in this order and takes the first prefix hit, which is what
/// makes `arcsin(` win over `sin(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MathFunction {
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Cot,
    Ln,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Decimal literal: digits with an optional fractional part. No
    /// exponent suffix, so the letter `e` stays available as a name.
    Number(f64),
    /// 1..=7 letter run, case-sensitive, captured verbatim.
    Variable(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    OpenBracket,
    CloseBracket,
    Function(MathFunction),
    /// Explicit end-of-expression marker, always the last token.
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(val) => write!(f, "number '{}'", val),
            TokenKind::Variable(name) => write!(f, "variable '{}'", name),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::OpenBracket => write!(f, "'('"),
            TokenKind::CloseBracket => write!(f, "')'"),
            TokenKind::Function(func) => write!(f, "function '{}'", func),
            TokenKind::End => write!(f, "end of expression"),
        }
    }
}

/// A single token plus the byte offset of its first source character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Case-insensitive longest-prefix keyword match at the given position.
fn keyword_at(rest: &str) -> Option<MathFunction> {
    for func in MathFunction::iter() {
        let name = func.to_string();
        if rest.len() >= name.len()
            && rest.as_bytes()[..name.len()].eq_ignore_ascii_case(name.as_bytes())
        {
            return Some(func);
        }
    }
    None
}

/// Converts the whole source string into tokens.
///
/// The returned sequence is ordered, finite and ends with a single
/// [`TokenKind::End`] token whose offset is the input length. A character
/// that starts no token is a [`ParseError::Lex`] at that offset; the
/// tokenizer never silently consumes zero characters.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::OpenBracket),
            ')' => Some(TokenKind::CloseBracket),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, offset: i });
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
            }
            let literal = &input[start..i];
            let value = literal.parse::<f64>().map_err(|_| ParseError::Lex {
                offset: start,
                found: literal.to_string(),
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                offset: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() {
            if let Some(func) = keyword_at(&input[i..]) {
                tokens.push(Token {
                    kind: TokenKind::Function(func),
                    offset: i,
                });
                i += func.to_string().len();
                continue;
            }
            let start = i;
            while i < bytes.len() && (bytes[i] as char).is_ascii_alphabetic() {
                i += 1;
            }
            let name = &input[start..i];
            if name.len() > MAX_VAR_NAME_LEN {
                return Err(ParseError::Lex {
                    offset: start,
                    found: name.to_string(),
                });
            }
            tokens.push(Token {
                kind: TokenKind::Variable(name.to_string()),
                offset: start,
            });
            continue;
        }

        // anything else (including non-ASCII input) starts no token
        let found = input[i..].chars().next().unwrap().to_string();
        return Err(ParseError::Lex { offset: i, found });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        offset: input.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_expression() {
        let tokens = tokenize("x + 2.5").unwrap();
        let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Variable("x".to_string()),
                TokenKind::Plus,
                TokenKind::Number(2.5),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_offsets_recorded() {
        let tokens = tokenize("x + 25").unwrap();
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 2);
        assert_eq!(tokens[2].offset, 4);
        assert_eq!(tokens[3].offset, 6); // End sits past the input
    }

    #[test]
    fn test_function_keywords_case_insensitive() {
        let tokens = tokenize("SIN(x)").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function(MathFunction::Sin));
        let tokens = tokenize("Arcsin(x)").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function(MathFunction::Arcsin));
    }

    #[test]
    fn test_longest_prefix_wins() {
        // arcsin must not lex as "arc" + "sin" nor stop at "sin"
        let tokens = tokenize("arctan(x)").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function(MathFunction::Arctan));
        // a keyword prefix inside a letter run still matches first
        let tokens = tokenize("sinx").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function(MathFunction::Sin));
        assert_eq!(tokens[1].kind, TokenKind::Variable("x".to_string()));
    }

    #[test]
    fn test_e_is_a_variable() {
        let tokens = tokenize("e").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Variable("e".to_string()));
    }

    #[test]
    fn test_whitespace_and_newlines_skipped() {
        let tokens = tokenize(" x\n *\t y ").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].kind, TokenKind::Variable("y".to_string()));
    }

    #[test]
    fn test_unrecognized_character_is_lex_error() {
        let err = tokenize("x + #").unwrap_err();
        assert_eq!(
            err,
            ParseError::Lex {
                offset: 4,
                found: "#".to_string()
            }
        );
    }

    #[test]
    fn test_variable_name_too_long() {
        assert!(tokenize("abcdefg").is_ok());
        let err = tokenize("abcdefgh").unwrap_err();
        assert!(matches!(err, ParseError::Lex { offset: 0, .. }));
    }

    #[test]
    fn test_end_token_always_present() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::End);
    }
}
