use crate::{
    lin_alg::{gauss_jordan, pivot_col, pivot_count, rank},
    Equation, LinearSystem, Result,
};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Values assigned to variables, ordered by name.
pub type Assignment = BTreeMap<String, f64>;

/// The outcome of solving a system.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// The system is inconsistent.
    None,
    Unique(Assignment),
    /// The system is underdetermined. `examples` holds a few particular solutions
    /// obtained by fixing the free variables.
    Infinite {
        basic: Vec<String>,
        free: Vec<String>,
        examples: Vec<Assignment>,
    },
}

impl Solution {
    /// Returns every concrete assignment carried by the solution.
    pub fn examples(&self) -> &[Assignment] {
        match self {
            Solution::None => &[],
            Solution::Unique(sol) => std::slice::from_ref(sol),
            Solution::Infinite { examples, .. } => examples,
        }
    }

    /// Checks that every assignment satisfies every equation within `tolerance`.
    pub fn verify(&self, eqs: &[Equation], tolerance: f64) -> bool {
        self.examples()
            .iter()
            .all(|sol| eqs.iter().all(|eq| eq.is_satisfied_by(sol, tolerance)))
    }
}

/// Intermediate results of solving a system, kept for display.
#[derive(Debug, Clone)]
pub struct Report {
    pub system: LinearSystem,
    /// The augmented matrix in reduced row echelon form.
    pub reduced: Vec<Vec<f64>>,
    pub coef_rank: usize,
    pub aug_rank: usize,
    pub solution: Solution,
}

/// Solves a system of linear equations.
pub fn solve(eqs: &[Equation]) -> Result<Solution> {
    analyze(eqs).map(|report| report.solution)
}

/// Solves a system of linear equations, keeping the intermediate results.
pub fn analyze(eqs: &[Equation]) -> Result<Report> {
    let system = LinearSystem::build(eqs)?;

    let aug = system.augmented();
    let coef_rank = rank(&system.coefs);
    let aug_rank = rank(&aug);

    let mut reduced = aug;
    gauss_jordan(&mut reduced);

    debug!(coef_rank, aug_rank, "computed ranks");
    let solution = classify(&reduced, coef_rank, aug_rank, &system.vars);

    Ok(Report {
        system,
        reduced,
        coef_rank,
        aug_rank,
        solution,
    })
}

/// Classifies a reduced augmented matrix by comparing the rank of the coefficient
/// matrix with that of the augmented matrix and with the number of variables.
///
/// Near the tolerance the ranks may count a pivot the reduced matrix does not have.
/// The pivots of the reduced matrix decide then, as the solutions are read from it.
pub fn classify(
    reduced: &[Vec<f64>],
    coef_rank: usize,
    aug_rank: usize,
    vars: &[String],
) -> Solution {
    let var_n = vars.len();
    let reduced_ranks = (pivot_count(reduced, var_n), pivot_count(reduced, var_n + 1));
    let (coef_rank, aug_rank) = if reduced_ranks != (coef_rank, aug_rank) {
        warn!(
            coef_rank,
            aug_rank,
            reduced_coef_rank = reduced_ranks.0,
            reduced_aug_rank = reduced_ranks.1,
            "ranks disagree with the reduced matrix"
        );
        reduced_ranks
    } else {
        (coef_rank, aug_rank)
    };

    if coef_rank != aug_rank {
        debug!("inconsistent system");
        Solution::None
    } else if coef_rank == var_n {
        debug!("unique solution");
        Solution::Unique(solve_unique(reduced, vars))
    } else {
        debug!(nullity = var_n - coef_rank, "infinitely many solutions");
        solve_multiple(reduced, vars)
    }
}

/// Reads the solution off the constant column, one pivot per row.
fn solve_unique(reduced: &[Vec<f64>], vars: &[String]) -> Assignment {
    let var_n = vars.len();
    reduced
        .iter()
        .filter_map(|row| {
            let pivot_i = pivot_col(&row[..var_n])?;
            Some((vars[pivot_i].clone(), row[var_n] / row[pivot_i]))
        })
        .collect()
}

fn solve_multiple(reduced: &[Vec<f64>], vars: &[String]) -> Solution {
    let var_n = vars.len();

    let mut pivot_cols = Vec::new();
    for row in reduced {
        if let Some(i) = pivot_col(&row[..var_n]) {
            if !pivot_cols.contains(&i) {
                pivot_cols.push(i);
            }
        }
    }
    let free_cols: Vec<usize> = (0..var_n).filter(|i| !pivot_cols.contains(i)).collect();

    let basic: Vec<String> = pivot_cols.iter().map(|&i| vars[i].clone()).collect();
    let free: Vec<String> = free_cols.iter().map(|&i| vars[i].clone()).collect();
    debug!(?basic, ?free, "partitioned variables");

    let examples: Vec<Assignment> = free_samples(free_cols.len())
        .into_iter()
        .map(|values| {
            trace!(?values, "substituting free values");
            let sol = back_substitute(reduced, var_n, &free_cols, &values);
            vars.iter().cloned().zip(sol).collect::<Assignment>()
        })
        .collect();

    Solution::Infinite {
        basic,
        free,
        examples,
    }
}

/// Returns the values tried for the free variables, one vector per example.
///
/// A single free variable takes 0, 1, -1, 2 and -2. Several free variables take
/// all zeros, all ones, all minus ones, and then each is set to 1 in turn with
/// the others at 0.
pub fn free_samples(free_n: usize) -> Vec<Vec<f64>> {
    match free_n {
        0 => vec![vec![]],
        1 => [0.0, 1.0, -1.0, 2.0, -2.0].iter().map(|&n| vec![n]).collect(),
        _ => {
            let mut samples = vec![vec![0.0; free_n], vec![1.0; free_n], vec![-1.0; free_n]];
            samples.extend((0..free_n).map(|i| {
                let mut unit = vec![0.0; free_n];
                unit[i] = 1.0;
                unit
            }));
            samples
        }
    }
}

/// Computes the basic variables from the free ones, walking the rows bottom-up.
///
/// Columns left undetermined are set to 0.
fn back_substitute(
    reduced: &[Vec<f64>],
    var_n: usize,
    free_cols: &[usize],
    free_values: &[f64],
) -> Vec<f64> {
    let mut sol: Vec<Option<f64>> = vec![None; var_n];
    for (&i, &n) in free_cols.iter().zip(free_values) {
        sol[i] = Some(n);
    }

    for row in reduced.iter().rev() {
        let pivot_i = match pivot_col(&row[..var_n]) {
            Some(i) => i,
            None => continue,
        };
        if sol[pivot_i].is_some() {
            continue;
        }

        let known: f64 = row[pivot_i + 1..var_n]
            .iter()
            .zip(&sol[pivot_i + 1..])
            .filter_map(|(&a, n)| n.map(|n| a * n))
            .sum();
        sol[pivot_i] = Some((row[var_n] - known) / row[pivot_i]);
    }

    sol.into_iter().map(|n| n.unwrap_or(0.0)).collect()
}
