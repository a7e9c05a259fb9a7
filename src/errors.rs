// Copyright (c) 2021 Fabian Schuiki

//! Utilities to implement diagnostics and error reporting facilities.

use std::fmt;

/// The taxonomy of errors the compiler can produce. Every diagnostic carries
/// exactly one of these, which allows callers and tests to react to the
/// category without string matching.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiagKind {
    /// The overall spec text is malformed: missing `do`/`end` markers, a
    /// declaration or rule line that does not split into its parts.
    SpecFormat,
    /// An alias name was defined twice.
    DuplicateAlias,
    /// An expression fragment does not parse under the grammar.
    MalformedExpression,
    /// A parsed expression uses a shape the lowering engine cannot compile.
    UnsupportedExpression,
}

impl DiagKind {
    pub fn to_str(self) -> &'static str {
        match self {
            DiagKind::SpecFormat => "spec format error",
            DiagKind::DuplicateAlias => "duplicate alias",
            DiagKind::MalformedExpression => "malformed expression",
            DiagKind::UnsupportedExpression => "unsupported expression",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn to_str(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Used to emit structured error messages.
#[must_use]
#[derive(Clone, Debug)]
pub struct DiagBuilder {
    severity: Severity,
    kind: DiagKind,
    message: String,
    notes: Vec<String>,
}

/// A diagnostic result type. Either carries the result `T` in the Ok variant,
/// or an assembled diagnostic in the Err variant.
pub type DiagResult<T> = Result<T, DiagBuilder>;

impl DiagBuilder {
    pub fn new<S: Into<String>>(severity: Severity, kind: DiagKind, message: S) -> DiagBuilder {
        DiagBuilder {
            severity,
            kind,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn error<S: Into<String>>(kind: DiagKind, message: S) -> DiagBuilder {
        DiagBuilder::new(Severity::Error, kind, message)
    }

    pub fn fatal<S: Into<String>>(kind: DiagKind, message: S) -> DiagBuilder {
        DiagBuilder::new(Severity::Fatal, kind, message)
    }

    pub fn add_note<S: Into<String>>(mut self, message: S) -> DiagBuilder {
        self.notes.push(message.into());
        self
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_kind(&self) -> DiagKind {
        self.kind
    }

    pub fn get_message(&self) -> &str {
        &self.message
    }

    pub fn get_notes(&self) -> &[String] {
        &self.notes
    }
}

impl fmt::Display for DiagBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let colorcode = match self.severity {
            Severity::Fatal | Severity::Error => "\x1B[31;1m",
            Severity::Warning => "\x1B[33;1m",
            Severity::Note => "\x1B[36;1m",
        };
        writeln!(
            f,
            "{}{}:\x1B[m\x1B[1m {}\x1B[m",
            colorcode, self.severity, self.message
        )?;
        for note in &self.notes {
            writeln!(f, "   = \x1B[1mnote:\x1B[m {}", note)?;
        }
        Ok(())
    }
}
