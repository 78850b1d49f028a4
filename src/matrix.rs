use crate::{error::Malformed, Equation, Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A system of linear equations in matrix form `A x = B`.
///
/// Column `j` of `coefs` belongs to `vars[j]`, and `vars` is sorted,
/// so the layout is the same every time a system is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub vars: Vec<String>,
    pub coefs: Vec<Vec<f64>>,
    pub consts: Vec<f64>,
}

impl LinearSystem {
    /// Builds the coefficient matrix and the constant vector of a system.
    ///
    /// Terms sharing a variable within one equation are summed.
    pub fn build(eqs: &[Equation]) -> Result<LinearSystem> {
        if eqs.is_empty() {
            return Err(Error::EmptySystem);
        }
        for (index, eq) in eqs.iter().enumerate() {
            validate(eq).map_err(|reason| Error::MalformedEquation { index, reason })?;
        }

        let cols: BTreeMap<&str, usize> = eqs
            .iter()
            .flat_map(|eq| eq.terms.iter().map(|term| term.var.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(i, var)| (var, i))
            .collect();

        let coefs = eqs
            .iter()
            .map(|eq| {
                let mut row = vec![0.0; cols.len()];
                for term in &eq.terms {
                    row[cols[term.var.as_str()]] += term.signed_coef();
                }
                row
            })
            .collect();

        let vars: Vec<String> = cols.into_keys().map(String::from).collect();

        let consts = eqs.iter().map(|eq| eq.rhs).collect();

        debug!(equations = eqs.len(), variables = vars.len(), "built system");
        Ok(LinearSystem {
            vars,
            coefs,
            consts,
        })
    }

    /// Returns a fresh augmented matrix `[A|B]`.
    pub fn augmented(&self) -> Vec<Vec<f64>> {
        self.coefs
            .iter()
            .zip(&self.consts)
            .map(|(row, &b)| row.iter().copied().chain([b]).collect())
            .collect()
    }
}

fn validate(eq: &Equation) -> std::result::Result<(), Malformed> {
    if eq.terms.is_empty() {
        return Err(Malformed::NoTerms);
    }
    if !eq.rhs.is_finite() {
        return Err(Malformed::NonFiniteRhs(eq.rhs));
    }
    if let Some(term) = eq.terms.iter().find(|term| !term.coef.is_finite()) {
        return Err(Malformed::NonFiniteCoef(term.var.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Op, Term};

    fn eq(terms: &[(Op, f64, &str)], rhs: f64) -> Equation {
        Equation::new(
            terms
                .iter()
                .map(|&(op, coef, var)| Term::new(op, coef, var))
                .collect(),
            rhs,
        )
    }

    #[test]
    fn sorts_variables_and_zero_fills() {
        let sys = LinearSystem::build(&[
            eq(&[(Op::Add, 2.0, "y"), (Op::Add, 1.0, "x")], 3.0),
            eq(&[(Op::Sub, 4.0, "z")], 1.0),
        ])
        .unwrap();
        assert_eq!(sys.vars, ["x", "y", "z"]);
        assert_eq!(sys.coefs, vec![vec![1.0, 2.0, 0.0], vec![0.0, 0.0, -4.0]]);
        assert_eq!(sys.consts, vec![3.0, 1.0]);
        assert_eq!(
            sys.augmented(),
            vec![vec![1.0, 2.0, 0.0, 3.0], vec![0.0, 0.0, -4.0, 1.0]]
        );
    }

    #[test]
    fn maps_similar_names_to_their_own_columns() {
        let sys = LinearSystem::build(&[eq(
            &[
                (Op::Add, 1.0, "x1"),
                (Op::Add, 2.0, "x"),
                (Op::Add, 3.0, "X"),
                (Op::Sub, 4.0, "x_"),
            ],
            0.0,
        )])
        .unwrap();
        assert_eq!(sys.vars, ["X", "x", "x1", "x_"]);
        assert_eq!(sys.coefs, vec![vec![3.0, 2.0, 1.0, -4.0]]);
    }

    #[test]
    fn sums_repeated_variables() {
        let sys = LinearSystem::build(&[eq(
            &[(Op::Add, 2.0, "x"), (Op::Sub, 0.5, "x"), (Op::Add, 1.0, "x")],
            5.0,
        )])
        .unwrap();
        assert_eq!(sys.coefs, vec![vec![2.5]]);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(LinearSystem::build(&[]), Err(Error::EmptySystem));
        assert_eq!(
            LinearSystem::build(&[eq(&[(Op::Add, 1.0, "x")], 1.0), eq(&[], 2.0)]),
            Err(Error::MalformedEquation {
                index: 1,
                reason: Malformed::NoTerms
            })
        );
        assert!(matches!(
            LinearSystem::build(&[eq(&[(Op::Add, 1.0, "x")], f64::NAN)]),
            Err(Error::MalformedEquation {
                index: 0,
                reason: Malformed::NonFiniteRhs(_)
            })
        ));
        assert_eq!(
            LinearSystem::build(&[eq(&[(Op::Add, f64::INFINITY, "x")], 1.0)]),
            Err(Error::MalformedEquation {
                index: 0,
                reason: Malformed::NonFiniteCoef("x".into())
            })
        );
    }
}
