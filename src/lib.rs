// Copyright (c) 2021 Fabian Schuiki

//! A compiler for guarded register-transfer specifications.
//!
//! The input is a small line-oriented language declaring register and input
//! word sizes, named aliases, and a list of guarded register-update rules.
//! The output is a structural netlist IR: a flat list of primitive module
//! instantiations (gates, adders, multipliers, comparators) wired together by
//! uniquely named `driver<N>` signals.
//!
//! Compilation is a single synchronous pass: the spec text is parsed into a
//! [`Program`](spec::Program), every guard and update expression is lowered
//! into module instantiation lines, and the fragments are concatenated into
//! the output text. The first error aborts the compilation; there is no
//! partial output.

pub mod aliases;
pub mod codegen;
pub mod errors;
pub mod spec;
pub mod syntax;

pub use crate::errors::{DiagBuilder, DiagKind, DiagResult, Severity};

/// Compile a spec text into its netlist IR text.
pub fn compile(input: &str) -> DiagResult<String> {
    let program = spec::parse(input)?;
    codegen::emit(&program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let ir = compile(
            "registerWordSizes = [8]\n\
             inputWordSizes=[8]\n\
             do\n\
             R[0]=I[0] -> (R[0]<-R[0]+1)\n\
             end\n",
        )
        .unwrap();
        assert_eq!(
            ir,
            "registerWordSizes 8\n\
             inputWordSizes 8\n\
             guards 1\n\
             EqChecker R[0] I[0] -> driver0\n\
             $\n\
             actions 1\n\
             updates 1\n\
             R[0]\n\
             Adder R[0] 1 -> driver1\n\
             $\n"
        );
    }

    #[test]
    fn compilation_is_deterministic() {
        let input = "registerWordSizes = [8, 8]\n\
                     inputWordSizes = [8]\n\
                     x = R[0]\n\
                     do\n\
                     x = I[0] & R[1] < 3 -> (R[0] <- 2 * x, R[1] <- R[1] + x + 1)\n\
                     ~(x = I[0]) -> (R[1] <- 0)\n\
                     end\n";
        let first = compile(input).unwrap();
        let second = compile(input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn guard_blocks_match_declared_count() {
        let ir = compile(
            "registerWordSizes = [8]\n\
             inputWordSizes = [8]\n\
             do\n\
             R[0] = I[0] -> (R[0] <- 0)\n\
             R[0] < I[0] -> (R[0] <- 1)\n\
             end\n",
        )
        .unwrap();
        let guard_section = &ir[ir.find("guards").unwrap()..ir.find("actions").unwrap()];
        assert!(guard_section.starts_with("guards 2\n"));
        assert_eq!(guard_section.matches("$\n").count(), 2);
    }

    #[test]
    fn atomic_guard_emits_one_line() {
        let ir = compile(
            "registerWordSizes = [8]\n\
             inputWordSizes = [8]\n\
             do\n\
             R[0] -> (R[0] <- 0)\n\
             end\n",
        )
        .unwrap();
        assert!(ir.contains("guards 1\nR[0]\n$\n"));
        // The update value `0` is atomic as well, so the file allocates no
        // drivers at all.
        assert!(!ir.contains("driver"));
    }

    #[test]
    fn duplicate_alias_yields_no_ir() {
        let err = compile(
            "x = R[0]\n\
             x = R[1]\n\
             do\n\
             R[0] = I[0] -> (R[0] <- 1)\n\
             end\n",
        )
        .unwrap_err();
        assert_eq!(err.get_kind(), DiagKind::DuplicateAlias);
    }

    #[test]
    fn unsupported_multiplication() {
        let err = compile(
            "registerWordSizes = [8, 8]\n\
             inputWordSizes = [8]\n\
             do\n\
             R[0] = I[0] -> (R[0] <- R[0] * R[1])\n\
             end\n",
        )
        .unwrap_err();
        assert_eq!(err.get_kind(), DiagKind::UnsupportedExpression);
    }
}
