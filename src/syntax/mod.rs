// Copyright (c) 2021 Fabian Schuiki

//! Syntax of the spec expression language: tokens, AST, and the
//! recursive-descent parser.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use self::ast::Expr;
