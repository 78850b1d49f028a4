//! Solves systems of linear equations such as `2x + 3y = 7, x - y = 1`.
//!
//! The pipeline is: [`parse`] text into [`Equation`]s, build a [`LinearSystem`],
//! reduce it with [`lin_alg::gauss_jordan`], compare ranks from [`lin_alg::rank`]
//! and classify the system as a [`Solution`].

mod error;
mod fmt;
pub mod lin_alg;
mod matrix;
pub mod parse;
pub mod solve;

pub use error::{Error, Malformed, Result};
pub use fmt::{Num, Rows};
pub use matrix::LinearSystem;
pub use solve::{analyze, solve, Assignment, Report, Solution};

/// The operator preceding a term, before its sign is folded into the coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

impl Op {
    pub fn sign(self) -> f64 {
        match self {
            Op::Add => 1.0,
            Op::Sub => -1.0,
        }
    }
}

/// One additive contribution to the left-hand side of an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coef: f64,
    pub var: String,
    pub op: Op,
}

impl Term {
    pub fn new(op: Op, coef: f64, var: impl Into<String>) -> Term {
        Term {
            coef,
            var: var.into(),
            op,
        }
    }

    /// Returns the coefficient with the operator's sign applied.
    pub fn signed_coef(&self) -> f64 {
        self.op.sign() * self.coef
    }
}

/// A linear equation: the sum of `terms` equals `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub terms: Vec<Term>,
    pub rhs: f64,
}

impl Equation {
    pub fn new(terms: Vec<Term>, rhs: f64) -> Equation {
        Equation { terms, rhs }
    }

    /// Evaluates the left-hand side under an assignment.
    ///
    /// Variables missing from the assignment count as zero.
    pub fn evaluate(&self, values: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|term| term.signed_coef() * values.get(&term.var).copied().unwrap_or(0.0))
            .sum()
    }

    /// Returns `lhs - rhs` under an assignment.
    pub fn residual(&self, values: &Assignment) -> f64 {
        self.evaluate(values) - self.rhs
    }

    pub fn is_satisfied_by(&self, values: &Assignment, tolerance: f64) -> bool {
        self.residual(values).abs() <= tolerance
    }
}
