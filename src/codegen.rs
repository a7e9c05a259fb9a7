// Copyright (c) 2021 Fabian Schuiki

//! This module implements netlist lowering and IR emission.
//!
//! Lowering walks an expression tree in postorder and emits one primitive
//! module instantiation per non-atomic node, wiring the pieces together with
//! fresh `driver<N>` signals. N-ary operators are folded pairwise
//! left-to-right, one instantiation per pair. The driver counter is owned by
//! the session and allocated depth-first, operand-then-self, left-to-right;
//! the resulting names are part of the output format, not an implementation
//! detail.

use crate::errors::*;
use crate::spec::{Program, INP_WORD_SZ, REG_WORD_SZ};
use crate::syntax::Expr;
use itertools::Itertools;
use log::debug;

/// A netlist lowering session.
///
/// Owns the fresh signal counter for one compilation. Driver names are
/// strictly increasing across everything lowered through the same session and
/// are never reused. Separate compilations use separate sessions and start
/// over at `driver0`.
#[derive(Debug, Default)]
pub struct Lowerer {
    next_driver: usize,
}

impl Lowerer {
    /// Create a new session with the driver counter at zero.
    pub fn new() -> Lowerer {
        Lowerer { next_driver: 0 }
    }

    /// Lower one expression tree. Returns the emitted module instantiation
    /// lines and the name of the signal carrying the final value.
    pub fn lower(&mut self, expr: &Expr) -> DiagResult<(Vec<String>, String)> {
        debug!("Lowering `{}`", expr);
        let mut lines = Vec::new();
        let signal = self.lower_expr(expr, false, &mut lines)?;
        Ok((lines, signal))
    }

    fn fresh(&mut self) -> String {
        let name = format!("driver{}", self.next_driver);
        self.next_driver += 1;
        name
    }

    fn lower_expr(
        &mut self,
        expr: &Expr,
        has_parent: bool,
        lines: &mut Vec<String>,
    ) -> DiagResult<String> {
        match expr {
            // Atoms feed their canonical text straight into the parent's
            // instantiation. At the root there is no parent, so the text
            // itself becomes the sole line of the netlist.
            Expr::IntLit(..) | Expr::Ref(..) => {
                let text = expr.to_string();
                if !has_parent {
                    lines.push(text.clone());
                }
                Ok(text)
            }
            Expr::Not(arg) => {
                let arg = self.lower_expr(arg, true, lines)?;
                let out = self.fresh();
                lines.push(format!("Inverter {} -> {}", arg, out));
                Ok(out)
            }
            Expr::And(args) => self.lower_chain("AndGate", args, lines),
            Expr::Or(args) => self.lower_chain("OrGate", args, lines),
            Expr::Xor(args) => self.lower_chain("XorGate", args, lines),
            Expr::Add(args) => self.lower_chain("Adder", args, lines),
            Expr::Mul(lhs, rhs) => {
                let value = match **lhs {
                    Expr::IntLit(value) => value,
                    _ => {
                        return Err(DiagBuilder::error(
                            DiagKind::UnsupportedExpression,
                            format!("Unsupported expression `{}`", expr),
                        )
                        .add_note(
                            "multiplication must have an integer constant as its first operand",
                        ))
                    }
                };
                let operand = self.lower_expr(rhs, true, lines)?;
                let out = self.fresh();
                lines.push(format!("Multiplier {} {} -> {}", value, operand, out));
                Ok(out)
            }
            Expr::Eq(lhs, rhs) => self.lower_compare("EqChecker", lhs, rhs, lines),
            Expr::Lt(lhs, rhs) => self.lower_compare("LtChecker", lhs, rhs, lines),
        }
    }

    /// Lower an n-ary operator by folding its operands pairwise
    /// left-to-right. All operands are lowered before the first fold step
    /// allocates a driver.
    fn lower_chain(
        &mut self,
        module: &str,
        args: &[Expr],
        lines: &mut Vec<String>,
    ) -> DiagResult<String> {
        let mut signals = Vec::with_capacity(args.len());
        for arg in args {
            signals.push(self.lower_expr(arg, true, lines)?);
        }
        if signals.len() < 2 {
            return Err(DiagBuilder::error(
                DiagKind::UnsupportedExpression,
                format!("`{}` with unexpected arity {}", module, signals.len()),
            ));
        }
        let mut acc = signals[0].clone();
        for signal in &signals[1..] {
            let out = self.fresh();
            lines.push(format!("{} {} {} -> {}", module, acc, signal, out));
            acc = out;
        }
        Ok(acc)
    }

    fn lower_compare(
        &mut self,
        module: &str,
        lhs: &Expr,
        rhs: &Expr,
        lines: &mut Vec<String>,
    ) -> DiagResult<String> {
        let lhs = self.lower_expr(lhs, true, lines)?;
        let rhs = self.lower_expr(rhs, true, lines)?;
        let out = self.fresh();
        lines.push(format!("{} {} {} -> {}", module, lhs, rhs, out));
        Ok(out)
    }
}

/// Serialize a compiled program into the textual IR.
///
/// The order is fixed: the two word size header lines, a `guards <G>` line
/// followed by one `$`-terminated block per guard, then an `actions <A>` line
/// followed by, per action, an `updates <K>` line and per update the register
/// target line and the `$`-terminated block of its value expression. One
/// lowering session spans the whole emission, so driver numbering is strictly
/// increasing over the entire file.
pub fn emit(program: &Program) -> DiagResult<String> {
    let mut lowerer = Lowerer::new();
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        REG_WORD_SZ,
        program.register_word_sizes.iter().join(" ")
    ));
    out.push_str(&format!(
        "{} {}\n",
        INP_WORD_SZ,
        program.input_word_sizes.iter().join(" ")
    ));
    out.push_str(&format!("guards {}\n", program.guards.len()));
    for guard in &program.guards {
        let (lines, _) = lowerer.lower(guard)?;
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("$\n");
    }
    out.push_str(&format!("actions {}\n", program.actions.len()));
    for action in &program.actions {
        out.push_str(&format!("updates {}\n", action.len()));
        for (index, value) in action.updates() {
            out.push_str(&format!("R[{}]\n", index));
            let (lines, _) = lowerer.lower(value)?;
            for line in lines {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str("$\n");
        }
    }
    Ok(out)
}
