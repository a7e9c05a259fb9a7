// Copyright (c) 2021 Fabian Schuiki

//! Lexical analysis of spec expression fragments.
//!
//! The specification parser hands this module small pieces of text with all
//! whitespace already collapsed away, so the tokenizer must not rely on
//! separators. It nevertheless skips whitespace, which keeps the entry points
//! usable on raw text as well.

use crate::errors::*;
use std::iter::Peekable;
use std::str::Chars;

/// A token of the expression grammar.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    /// An identifier such as `R` or a user-defined alias name.
    Ident(String),
    /// An unsigned integer literal.
    Lit(i64),
    OpenBrack,
    CloseBrack,
    OpenParen,
    CloseParen,
    Comma,
    Eq,
    Lt,
    Plus,
    Star,
    Not,
    And,
    Or,
    Xor,
}

/// Tokenize an expression fragment.
pub fn tokenize(input: &str) -> DiagResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '[' => tokens.push(eat(&mut chars, Token::OpenBrack)),
            ']' => tokens.push(eat(&mut chars, Token::CloseBrack)),
            '(' => tokens.push(eat(&mut chars, Token::OpenParen)),
            ')' => tokens.push(eat(&mut chars, Token::CloseParen)),
            ',' => tokens.push(eat(&mut chars, Token::Comma)),
            '=' => tokens.push(eat(&mut chars, Token::Eq)),
            '<' => tokens.push(eat(&mut chars, Token::Lt)),
            '+' => tokens.push(eat(&mut chars, Token::Plus)),
            '*' => tokens.push(eat(&mut chars, Token::Star)),
            '~' => tokens.push(eat(&mut chars, Token::Not)),
            '&' => tokens.push(eat(&mut chars, Token::And)),
            '|' => tokens.push(eat(&mut chars, Token::Or)),
            '^' => tokens.push(eat(&mut chars, Token::Xor)),
            '0'..='9' => {
                let lit = eat_while(&mut chars, |c| c.is_ascii_digit());
                let value = lit.parse().map_err(|_| {
                    DiagBuilder::error(
                        DiagKind::MalformedExpression,
                        format!("Integer literal `{}` is out of range", lit),
                    )
                })?;
                tokens.push(Token::Lit(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let name = eat_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push(match name.as_str() {
                    "not" => Token::Not,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "xor" => Token::Xor,
                    _ => Token::Ident(name),
                });
            }
            c => {
                return Err(DiagBuilder::error(
                    DiagKind::MalformedExpression,
                    format!("Unexpected character `{}` in expression `{}`", c, input),
                ))
            }
        }
    }
    Ok(tokens)
}

fn eat(chars: &mut Peekable<Chars>, token: Token) -> Token {
    chars.next();
    token
}

fn eat_while<P: Fn(char) -> bool>(chars: &mut Peekable<Chars>, pred: P) -> String {
    let mut s = String::new();
    while let Some(&c) = chars.peek() {
        if !pred(c) {
            break;
        }
        s.push(c);
        chars.next();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::Token::*;
    use super::*;

    fn check(input: &str, expected: &[Token]) {
        let actual = tokenize(input).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn idents_and_literals() {
        check(
            "flag R 42 _x0",
            &[
                Ident("flag".into()),
                Ident("R".into()),
                Lit(42),
                Ident("_x0".into()),
            ],
        );
    }

    #[test]
    fn indexed_reference() {
        check(
            "R[0]=I[13]",
            &[
                Ident("R".into()),
                OpenBrack,
                Lit(0),
                CloseBrack,
                Eq,
                Ident("I".into()),
                OpenBrack,
                Lit(13),
                CloseBrack,
            ],
        );
    }

    #[test]
    fn operators() {
        check(
            "~&|^+*=<",
            &[Not, And, Or, Xor, Plus, Star, Eq, Lt],
        );
    }

    #[test]
    fn word_operators() {
        check(
            "not x and y or z xor w",
            &[
                Not,
                Ident("x".into()),
                And,
                Ident("y".into()),
                Or,
                Ident("z".into()),
                Xor,
                Ident("w".into()),
            ],
        );
    }

    #[test]
    fn word_operator_prefix_is_an_ident() {
        check("nota", &[Ident("nota".into())]);
    }

    #[test]
    fn collapsed_whitespace_is_not_required() {
        check(
            "(2*R[1],)",
            &[
                OpenParen,
                Lit(2),
                Star,
                Ident("R".into()),
                OpenBrack,
                Lit(1),
                CloseBrack,
                Comma,
                CloseParen,
            ],
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("R[0] ? 1").unwrap_err();
        assert_eq!(err.get_kind(), DiagKind::MalformedExpression);
    }
}
