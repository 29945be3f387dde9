//! Left-to-right lexer producing position-tagged tokens.

use super::EvalError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::End => write!(f, "end of input"),
        }
    }
}

/// A lexical unit and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Lexes the whole input. Every character lands in exactly one token or the
/// input is rejected. The returned stream always ends with [`TokenKind::End`].
pub(super) fn lex(raw: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < raw.len() {
        let rest = &raw[position..];
        let ch = rest.chars().next().unwrap_or('\0');

        if ch.is_ascii_whitespace() {
            position += ch.len_utf8();
            continue;
        }

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            c if c.is_ascii_digit() || c == '.' => {
                let len = rest
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.')
                    .count();
                let text = &rest[..len];

                let n = text.parse::<f64>().map_err(|_| EvalError::Syntax {
                    position,
                    message: format!("invalid number '{text}'"),
                })?;

                tokens.push(Token {
                    kind: TokenKind::Number(n),
                    position,
                });
                position += len;
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let len = rest
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                    .count();

                tokens.push(Token {
                    kind: TokenKind::Ident(rest[..len].to_string()),
                    position,
                });
                position += len;
                continue;
            }
            c => {
                // unreachable after the character gate, but the lexer stands alone
                return Err(EvalError::InvalidCharacter { ch: c, position });
            }
        };

        tokens.push(Token { kind, position });
        position += ch.len_utf8();
    }

    tokens.push(Token {
        kind: TokenKind::End,
        position: raw.len(),
    });

    Ok(tokens)
}
