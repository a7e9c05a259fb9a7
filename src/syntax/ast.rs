// Copyright (c) 2021 Fabian Schuiki

//! Abstract syntax tree of the spec expression language.
//!
//! Expressions are a closed tagged union. Keeping the set of shapes explicit
//! lets the lowering engine match exhaustively, so an unhandled shape is a
//! compile error in the compiler itself rather than a runtime surprise.

use std::fmt;

/// Whether a reference denotes a register or an input slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RefKind {
    Register,
    Input,
}

impl RefKind {
    /// The name of the indexable base family this kind belongs to.
    pub fn base_name(self) -> &'static str {
        match self {
            RefKind::Register => "R",
            RefKind::Input => "I",
        }
    }
}

/// A resolved register or input slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Reference {
    pub kind: RefKind,
    pub index: usize,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.kind.base_name(), self.index)
    }
}

/// An expression tree.
///
/// `And`, `Or`, `Xor`, and `Add` are n-ary with at least two operands; the
/// parser collapses runs of the same operator into one node, preserving the
/// literal left-to-right source order of the operands. `Mul` is structurally
/// binary with its operands in source order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    IntLit(i64),
    Ref(Reference),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Vec<Expr>),
    Add(Vec<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Check whether this is a leaf of the tree, i.e. a literal or reference.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Expr::IntLit(..) | Expr::Ref(..))
    }

    /// Check whether this expression is boolean-typed at the root. A bare
    /// reference counts as boolean, since a one bit signal may gate a rule.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Expr::Not(..)
                | Expr::And(..)
                | Expr::Or(..)
                | Expr::Xor(..)
                | Expr::Eq(..)
                | Expr::Lt(..)
                | Expr::Ref(..)
        )
    }

    /// Check whether this expression is arithmetic-typed at the root.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Expr::Add(..) | Expr::Mul(..) | Expr::IntLit(..) | Expr::Ref(..)
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_nary(f: &mut fmt::Formatter, op: &str, args: &[Expr]) -> fmt::Result {
            write!(f, "(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")
        }
        match self {
            Expr::IntLit(v) => write!(f, "{}", v),
            Expr::Ref(r) => write!(f, "{}", r),
            Expr::Not(arg) => write!(f, "~{}", arg),
            Expr::And(args) => write_nary(f, "&", args),
            Expr::Or(args) => write_nary(f, "|", args),
            Expr::Xor(args) => write_nary(f, "^", args),
            Expr::Add(args) => write_nary(f, "+", args),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Eq(lhs, rhs) => write!(f, "({} = {})", lhs, rhs),
            Expr::Lt(lhs, rhs) => write!(f, "({} < {})", lhs, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_text() {
        let r = Reference {
            kind: RefKind::Register,
            index: 0,
        };
        let i = Reference {
            kind: RefKind::Input,
            index: 12,
        };
        assert_eq!(format!("{}", r), "R[0]");
        assert_eq!(format!("{}", i), "I[12]");
        assert_eq!(format!("{}", Expr::IntLit(42)), "42");
    }

    #[test]
    fn compound_text() {
        let e = Expr::Eq(
            Box::new(Expr::Ref(Reference {
                kind: RefKind::Register,
                index: 1,
            })),
            Box::new(Expr::IntLit(3)),
        );
        assert_eq!(format!("{}", e), "(R[1] = 3)");
    }
}
