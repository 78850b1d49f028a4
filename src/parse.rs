//! Parsing equations like `2x + 3y = 7`.
//!
//! Coefficients default to 1, an optional `*` may separate a coefficient from its
//! variable, and whitespace is insignificant. A system is a list of equations
//! separated by `,`, `;` or newlines.

use crate::{Equation, Error, Op, Result, Term};
use chumsky::prelude::*;

/// Parses a single equation.
pub fn parse_equation(s: &str) -> Result<Equation> {
    equation()
        .then_ignore(end())
        .parse(s.trim())
        .map_err(to_error)
}

/// Parses a system of equations.
pub fn parse_system(s: &str) -> Result<Vec<Equation>> {
    // Equations absorb surrounding whitespace, so newlines are turned into separators first.
    let s = s.trim().replace('\n', ";");
    system().parse(s.as_str()).map_err(to_error)
}

fn to_error(errs: Vec<Simple<char>>) -> Error {
    let msgs: Vec<_> = errs.iter().map(ToString::to_string).collect();
    Error::Parse(msgs.join("; "))
}

fn number() -> impl Parser<char, f64, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_digit() || *c == '.')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|s, span| {
            s.parse::<f64>()
                .map_err(|e| Simple::custom(span, format!("invalid number `{s}`: {e}")))
        })
}

fn sign() -> impl Parser<char, Op, Error = Simple<char>> + Clone {
    just('+').to(Op::Add).or(just('-').to(Op::Sub)).padded()
}

fn equation() -> impl Parser<char, Equation, Error = Simple<char>> + Clone {
    let monomial = number()
        .padded()
        .then_ignore(just('*').padded().or_not())
        .or_not()
        .then(text::ident().padded())
        .map(|(coef, var): (Option<f64>, String)| (coef.unwrap_or(1.0), var));

    let first = sign()
        .or_not()
        .then(monomial.clone())
        .map(|(op, (coef, var))| Term::new(op.unwrap_or(Op::Add), coef, var));

    let rest = sign()
        .then(monomial)
        .map(|(op, (coef, var))| Term::new(op, coef, var));

    let lhs = first.chain::<Term, _, _>(rest.repeated());

    let rhs = sign()
        .or_not()
        .then(number().padded())
        .map(|(op, n)| op.map_or(1.0, Op::sign) * n);

    lhs.then_ignore(just('=').padded())
        .then(rhs)
        .map(|(terms, rhs)| Equation::new(terms, rhs))
}

fn system() -> impl Parser<char, Vec<Equation>, Error = Simple<char>> {
    let separator = one_of(",;").padded().repeated().at_least(1);

    equation()
        .separated_by(separator)
        .allow_trailing()
        .at_least(1)
        .then_ignore(end())
}
