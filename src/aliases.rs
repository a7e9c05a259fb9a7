// Copyright (c) 2021 Fabian Schuiki

//! The alias table of a spec.
//!
//! Aliases bind a name either to one of the indexable base families (`R` and
//! `I`) or to a previously parsed expression. Definitions store the fully
//! substituted expression, so resolution performs at most one substitution
//! step and never chains through a second alias.

use crate::errors::*;
use crate::syntax::ast::RefKind;
use crate::syntax::Expr;
use std::collections::HashMap;

/// What a name in the alias table stands for.
#[derive(Clone, Debug)]
pub enum Binding {
    /// An indexable base family. `Name[i]` forms a reference.
    Base(RefKind),
    /// An expression to substitute for the bare name.
    Expr(Expr),
}

/// Maps spec-level names to their meaning.
#[derive(Debug)]
pub struct AliasTable {
    bindings: HashMap<String, Binding>,
}

impl AliasTable {
    /// Create a new table, seeded with the built-in `R` and `I` families.
    pub fn new() -> AliasTable {
        let mut bindings = HashMap::new();
        bindings.insert("R".to_string(), Binding::Base(RefKind::Register));
        bindings.insert("I".to_string(), Binding::Base(RefKind::Input));
        AliasTable { bindings }
    }

    /// Bind a name. Fails if the name is already bound, including the
    /// built-in `R` and `I`.
    pub fn define<S: Into<String>>(&mut self, name: S, binding: Binding) -> DiagResult<()> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(DiagBuilder::error(
                DiagKind::DuplicateAlias,
                format!("Alias `{}` already defined", name),
            ));
        }
        self.bindings.insert(name, binding);
        Ok(())
    }

    /// Look up a name.
    pub fn resolve(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }
}

impl Default for AliasTable {
    fn default() -> AliasTable {
        AliasTable::new()
    }
}
