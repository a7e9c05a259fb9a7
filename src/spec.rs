// Copyright (c) 2021 Fabian Schuiki

//! The specification parser.
//!
//! A spec is line oriented: declarations up to a `do` line, guarded update
//! rules up to an `end` line. Comment lines start with `#`, and whitespace
//! carries no meaning anywhere, so every line is collapsed before further
//! processing.

use crate::aliases::{AliasTable, Binding};
use crate::errors::*;
use crate::syntax::{parser, Expr};
use log::debug;

pub const REG_WORD_SZ: &str = "registerWordSizes";
pub const INP_WORD_SZ: &str = "inputWordSizes";

/// The updates performed when one guard holds. Register indices are unique
/// within an action; insertion order is preserved because it determines the
/// emission order.
#[derive(Debug, Default)]
pub struct Action {
    updates: Vec<(usize, Expr)>,
}

impl Action {
    /// Set the new value of a register. A repeated index replaces the earlier
    /// value in place, keeping its original position.
    pub fn set(&mut self, index: usize, value: Expr) {
        match self.updates.iter_mut().find(|(i, _)| *i == index) {
            Some(slot) => slot.1 = value,
            None => self.updates.push((index, value)),
        }
    }

    pub fn updates(&self) -> &[(usize, Expr)] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// A fully parsed spec. Constructed empty, populated by [`parse`], then read
/// only during lowering and emission. `guards[i]` pairs with `actions[i]`.
#[derive(Debug)]
pub struct Program {
    pub register_word_sizes: Vec<usize>,
    pub input_word_sizes: Vec<usize>,
    pub aliases: AliasTable,
    pub guards: Vec<Expr>,
    pub actions: Vec<Action>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            register_word_sizes: Vec::new(),
            input_word_sizes: Vec::new(),
            aliases: AliasTable::new(),
            guards: Vec::new(),
            actions: Vec::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Program {
        Program::new()
    }
}

/// Parse a spec text into a program.
pub fn parse(text: &str) -> DiagResult<Program> {
    let lines: Vec<&str> = text.lines().collect();

    // Locate the `do` and `end` markers. The scan covers the whole file and
    // keeps overwriting, so the last matching line wins for both markers.
    // Note that any non-comment line whose raw text starts with `do` or `end`
    // is a candidate.
    let mut do_line = None;
    let mut end_line = None;
    for (idx, line) in lines.iter().enumerate() {
        if line.starts_with('#') {
            continue;
        }
        if line.starts_with("do") {
            do_line = Some(idx);
        }
        if line.starts_with("end") {
            end_line = Some(idx);
        }
    }
    let do_line = do_line.ok_or_else(|| {
        DiagBuilder::error(DiagKind::SpecFormat, "Spec has no `do` line")
    })?;
    let end_line = end_line.ok_or_else(|| {
        DiagBuilder::error(DiagKind::SpecFormat, "Spec has no `end` line")
    })?;

    let mut program = Program::new();
    for raw in &lines[..do_line] {
        let line = collapse(raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parse_declaration(&mut program, &line)?;
    }
    if end_line > do_line {
        for raw in &lines[do_line + 1..end_line] {
            let line = collapse(raw);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parse_rule(&mut program, &line)?;
        }
    }
    Ok(program)
}

/// Remove all whitespace from a line.
fn collapse(line: &str) -> String {
    line.split_whitespace().collect()
}

/// Parse one declaration line: a word size vector or an alias definition.
fn parse_declaration(program: &mut Program, line: &str) -> DiagResult<()> {
    debug!("Processing declaration `{}`", line);
    let parts: Vec<&str> = line.split('=').collect();
    if parts.len() != 2 {
        return Err(DiagBuilder::error(
            DiagKind::SpecFormat,
            format!("Malformed declaration line `{}`", line),
        )
        .add_note("expected `name = value`"));
    }
    if line.starts_with(REG_WORD_SZ) {
        program.register_word_sizes = parser::parse_int_list(parts[1])?;
    } else if line.starts_with(INP_WORD_SZ) {
        program.input_word_sizes = parser::parse_int_list(parts[1])?;
    } else {
        define_alias(program, parts[0], parts[1])?;
    }
    Ok(())
}

/// Bind an alias. A right hand side naming a base family keeps the family
/// indexable under the new name; anything else is parsed as an expression and
/// stored fully substituted.
fn define_alias(program: &mut Program, name: &str, value: &str) -> DiagResult<()> {
    let binding = match program.aliases.resolve(value) {
        Some(&Binding::Base(kind)) => Binding::Base(kind),
        _ => Binding::Expr(parser::parse_expr(value, &program.aliases)?),
    };
    program.aliases.define(name, binding)?;
    debug!("Alias `{}` = `{}`", name, value);
    Ok(())
}

/// Parse one rule line: `guard -> (reg <- expr, ...)`.
fn parse_rule(program: &mut Program, line: &str) -> DiagResult<()> {
    debug!("Processing rule `{}`", line);
    let parts: Vec<&str> = line.split("->").collect();
    if parts.len() != 2 {
        return Err(DiagBuilder::error(
            DiagKind::SpecFormat,
            format!("Malformed rule line `{}`", line),
        )
        .add_note("expected `guard -> (reg <- expr, ...)`"));
    }

    let guard = parser::parse_expr(parts[0], &program.aliases)?;
    if !guard.is_boolean() {
        return Err(DiagBuilder::error(
            DiagKind::MalformedExpression,
            format!("Guard `{}` is not a boolean expression", guard),
        ));
    }

    let inner = parts[1]
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            DiagBuilder::error(
                DiagKind::SpecFormat,
                format!("Malformed action `{}`", parts[1]),
            )
            .add_note("expected a parenthesized update list")
        })?;
    let mut action = Action::default();
    for update in inner.split(',') {
        let uparts: Vec<&str> = update.split("<-").collect();
        if uparts.len() != 2 {
            return Err(DiagBuilder::error(
                DiagKind::SpecFormat,
                format!("Malformed update `{}`", update),
            )
            .add_note("expected `reg <- expr`"));
        }
        let target = parser::parse_ref(uparts[0], &program.aliases)?;
        let value = parser::parse_expr(uparts[1], &program.aliases)?;
        if !value.is_arithmetic() {
            return Err(DiagBuilder::error(
                DiagKind::MalformedExpression,
                format!("Update value `{}` is not an arithmetic expression", value),
            ));
        }
        action.set(target.index, value);
    }

    program.guards.push(guard);
    program.actions.push(action);
    Ok(())
}
