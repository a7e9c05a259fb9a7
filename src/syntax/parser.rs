// Copyright (c) 2021 Fabian Schuiki

//! Recursive-descent parsing of spec expressions.
//!
//! The grammar has a fixed precedence table, tightest first:
//!
//! 1. unary `~`
//! 2. binary `*`
//! 3. n-ary `+`
//! 4. relational `=` and `<` (binary, non-associative)
//! 5. the connectives `&`, `|`, `^` (lowest, left-associative)
//!
//! Runs of the same n-ary operator collapse into a single node whose operand
//! order is the literal source order. Lowering later folds these operands
//! pairwise left-to-right, so the shape produced here is part of the
//! observable output.

use crate::aliases::{AliasTable, Binding};
use crate::errors::*;
use crate::syntax::ast::{Expr, Reference};
use crate::syntax::lexer::{tokenize, Token};

/// Parse a full expression fragment, resolving identifiers through the given
/// alias table.
pub fn parse_expr(input: &str, aliases: &AliasTable) -> DiagResult<Expr> {
    let mut p = Parser::new(input, aliases)?;
    let expr = p.parse_connective()?;
    p.finish()?;
    Ok(expr)
}

/// Parse a fragment that must denote a single register or input reference,
/// e.g. the target of an update.
pub fn parse_ref(input: &str, aliases: &AliasTable) -> DiagResult<Reference> {
    match parse_expr(input, aliases)? {
        Expr::Ref(r) => Ok(r),
        other => Err(DiagBuilder::error(
            DiagKind::MalformedExpression,
            format!("Expected a register or input reference, found `{}`", other),
        )),
    }
}

/// Parse a bracketed list of integers, e.g. `[8,16,8]`, as used by the word
/// size declarations.
pub fn parse_int_list(input: &str) -> DiagResult<Vec<usize>> {
    let aliases = AliasTable::new();
    let mut p = Parser::new(input, &aliases)?;
    p.require(Token::OpenBrack, "`[`")?;
    let mut values = Vec::new();
    if p.try_eat(&Token::CloseBrack) {
        p.finish()?;
        return Ok(values);
    }
    loop {
        match p.bump() {
            Some(Token::Lit(v)) => values.push(v as usize),
            _ => return Err(p.malformed("Expected an integer in size list")),
        }
        if !p.try_eat(&Token::Comma) {
            break;
        }
    }
    p.require(Token::CloseBrack, "`]`")?;
    p.finish()?;
    Ok(values)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    aliases: &'a AliasTable,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, aliases: &'a AliasTable) -> DiagResult<Parser<'a>> {
        Ok(Parser {
            input,
            tokens: tokenize(input)?,
            pos: 0,
            aliases,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn try_eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn require(&mut self, token: Token, desc: &str) -> DiagResult<()> {
        if self.try_eat(&token) {
            Ok(())
        } else {
            Err(self.malformed(format!("Expected {}", desc)))
        }
    }

    /// Fail if any input is left over.
    fn finish(&mut self) -> DiagResult<()> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(self.malformed("Unexpected trailing input"))
        }
    }

    fn malformed<S: Into<String>>(&self, message: S) -> DiagBuilder {
        DiagBuilder::error(DiagKind::MalformedExpression, message)
            .add_note(format!("in expression `{}`", self.input))
    }

    /// Parse the lowest precedence level, the connectives `&`, `|`, `^`.
    fn parse_connective(&mut self) -> DiagResult<Expr> {
        let mut expr = self.parse_relational()?;
        while let Some(op) = match self.peek() {
            Some(Token::And) | Some(Token::Or) | Some(Token::Xor) => self.peek().cloned(),
            _ => None,
        } {
            let mut operands = vec![expr];
            while self.try_eat(&op) {
                operands.push(self.parse_relational()?);
            }
            expr = match op {
                Token::And => Expr::And(operands),
                Token::Or => Expr::Or(operands),
                Token::Xor => Expr::Xor(operands),
                _ => unreachable!(),
            };
        }
        Ok(expr)
    }

    fn parse_relational(&mut self) -> DiagResult<Expr> {
        let lhs = self.parse_sum()?;
        match self.peek() {
            Some(Token::Eq) => {
                self.bump();
                let rhs = self.parse_sum()?;
                Ok(Expr::Eq(Box::new(lhs), Box::new(rhs)))
            }
            Some(Token::Lt) => {
                self.bump();
                let rhs = self.parse_sum()?;
                Ok(Expr::Lt(Box::new(lhs), Box::new(rhs)))
            }
            _ => Ok(lhs),
        }
    }

    fn parse_sum(&mut self) -> DiagResult<Expr> {
        let mut operands = vec![self.parse_term()?];
        while self.try_eat(&Token::Plus) {
            operands.push(self.parse_term()?);
        }
        if operands.len() == 1 {
            Ok(operands.pop().unwrap())
        } else {
            Ok(Expr::Add(operands))
        }
    }

    fn parse_term(&mut self) -> DiagResult<Expr> {
        let mut expr = self.parse_unary()?;
        while self.try_eat(&Token::Star) {
            let rhs = self.parse_unary()?;
            expr = Expr::Mul(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> DiagResult<Expr> {
        if self.try_eat(&Token::Not) {
            Ok(Expr::Not(Box::new(self.parse_unary()?)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> DiagResult<Expr> {
        match self.bump() {
            Some(Token::Lit(v)) => Ok(Expr::IntLit(v)),
            Some(Token::OpenParen) => {
                let expr = self.parse_connective()?;
                self.require(Token::CloseParen, "`)`")?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => self.parse_ident(name),
            Some(_) => Err(self.malformed("Unexpected token")),
            None => Err(self.malformed("Unexpected end of expression")),
        }
    }

    /// Resolve an identifier through the alias table. Base families must be
    /// indexed; substituted expressions must not be.
    fn parse_ident(&mut self, name: String) -> DiagResult<Expr> {
        match self.aliases.resolve(&name) {
            Some(&Binding::Base(kind)) => {
                self.require(Token::OpenBrack, &format!("an index after `{}`", name))?;
                let index = match self.bump() {
                    Some(Token::Lit(v)) => v as usize,
                    _ => return Err(self.malformed("Expected an integer index")),
                };
                self.require(Token::CloseBrack, "`]`")?;
                Ok(Expr::Ref(Reference { kind, index }))
            }
            Some(Binding::Expr(expr)) => {
                if self.peek() == Some(&Token::OpenBrack) {
                    return Err(self.malformed(format!("Alias `{}` is not indexable", name)));
                }
                Ok(expr.clone())
            }
            None => Err(self.malformed(format!("Unknown identifier `{}`", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::RefKind;

    fn reg(index: usize) -> Expr {
        Expr::Ref(Reference {
            kind: RefKind::Register,
            index,
        })
    }

    fn inp(index: usize) -> Expr {
        Expr::Ref(Reference {
            kind: RefKind::Input,
            index,
        })
    }

    fn check(input: &str, expected: Expr) {
        let aliases = AliasTable::new();
        assert_eq!(parse_expr(input, &aliases).unwrap(), expected);
    }

    fn check_err(input: &str, kind: DiagKind) {
        let aliases = AliasTable::new();
        assert_eq!(parse_expr(input, &aliases).unwrap_err().get_kind(), kind);
    }

    #[test]
    fn atoms() {
        check("42", Expr::IntLit(42));
        check("R[3]", reg(3));
        check("I[0]", inp(0));
    }

    #[test]
    fn comparison() {
        check("R[0]=I[0]", Expr::Eq(Box::new(reg(0)), Box::new(inp(0))));
        check("R[1]<7", Expr::Lt(Box::new(reg(1)), Box::new(Expr::IntLit(7))));
    }

    #[test]
    fn sums_flatten() {
        check(
            "R[0]+1+I[0]",
            Expr::Add(vec![reg(0), Expr::IntLit(1), inp(0)]),
        );
    }

    #[test]
    fn product_binds_tighter_than_sum() {
        check(
            "1+2*R[0]",
            Expr::Add(vec![
                Expr::IntLit(1),
                Expr::Mul(Box::new(Expr::IntLit(2)), Box::new(reg(0))),
            ]),
        );
    }

    #[test]
    fn products_stay_binary() {
        check(
            "2*3*R[0]",
            Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::IntLit(2)),
                    Box::new(Expr::IntLit(3)),
                )),
                Box::new(reg(0)),
            ),
        );
    }

    #[test]
    fn connectives_are_lowest() {
        check(
            "R[0]=I[0]&R[1]<I[1]",
            Expr::And(vec![
                Expr::Eq(Box::new(reg(0)), Box::new(inp(0))),
                Expr::Lt(Box::new(reg(1)), Box::new(inp(1))),
            ]),
        );
    }

    #[test]
    fn connective_runs_flatten() {
        check(
            "R[0]&R[1]&R[2]",
            Expr::And(vec![reg(0), reg(1), reg(2)]),
        );
    }

    #[test]
    fn mixed_connectives_fold_left() {
        check(
            "R[0]&R[1]|R[2]",
            Expr::Or(vec![Expr::And(vec![reg(0), reg(1)]), reg(2)]),
        );
    }

    #[test]
    fn negation_binds_tightest() {
        check(
            "~R[0]&R[1]",
            Expr::And(vec![Expr::Not(Box::new(reg(0))), reg(1)]),
        );
    }

    #[test]
    fn parentheses_group() {
        check(
            "2*(R[0]+1)",
            Expr::Mul(
                Box::new(Expr::IntLit(2)),
                Box::new(Expr::Add(vec![reg(0), Expr::IntLit(1)])),
            ),
        );
    }

    #[test]
    fn alias_substitution() {
        let mut aliases = AliasTable::new();
        aliases
            .define("counter", crate::aliases::Binding::Expr(reg(2)))
            .unwrap();
        assert_eq!(
            parse_expr("counter+1", &aliases).unwrap(),
            Expr::Add(vec![reg(2), Expr::IntLit(1)])
        );
    }

    #[test]
    fn aliased_base_family() {
        let mut aliases = AliasTable::new();
        aliases
            .define("M", crate::aliases::Binding::Base(RefKind::Register))
            .unwrap();
        assert_eq!(parse_expr("M[4]", &aliases).unwrap(), reg(4));
    }

    #[test]
    fn update_targets() {
        let aliases = AliasTable::new();
        assert_eq!(
            parse_ref("R[5]", &aliases).unwrap(),
            Reference {
                kind: RefKind::Register,
                index: 5
            }
        );
        assert_eq!(
            parse_ref("R[0]+1", &aliases).unwrap_err().get_kind(),
            DiagKind::MalformedExpression
        );
    }

    #[test]
    fn int_lists() {
        assert_eq!(parse_int_list("[8]").unwrap(), vec![8]);
        assert_eq!(parse_int_list("[8,16,8]").unwrap(), vec![8, 16, 8]);
        assert_eq!(parse_int_list("[]").unwrap(), Vec::<usize>::new());
        assert_eq!(
            parse_int_list("[8,]").unwrap_err().get_kind(),
            DiagKind::MalformedExpression
        );
    }

    #[test]
    fn unknown_identifier() {
        check_err("bogus+1", DiagKind::MalformedExpression);
    }

    #[test]
    fn unindexed_base() {
        check_err("R+1", DiagKind::MalformedExpression);
    }

    #[test]
    fn trailing_input() {
        check_err("R[0]=I[0]=R[1]", DiagKind::MalformedExpression);
        check_err("1 2", DiagKind::MalformedExpression);
    }
}
