use crate::{Assignment, Equation, Op, Solution, Term};
use gcd::Gcd;
use owo_colors::OwoColorize;
use std::fmt::{Display, Formatter, Result, Write};

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.op) {
                (0, Op::Add) => {}
                (0, Op::Sub) => f.write_char('-')?,
                (_, Op::Add) => f.write_str(" + ")?,
                (_, Op::Sub) => f.write_str(" - ")?,
            }
            Display::fmt(term, f)?;
        }
        write!(f, " = {:#}", Num(self.rhs))
    }
}

/// Formats a term without its operator.
///
/// The coefficient of 1 is dropped unless the "#" flag is specified.
/// Other coefficients are written like [`Num`], without colors.
impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.coef != 1.0 || f.alternate() {
            write!(f, "{:#}", Num(self.coef))?;
        }
        f.write_str(&self.var)
    }
}

/// A number formatted as an integer or a reduced fraction where it is one,
/// to within rounding error.
///
/// Positive numbers are printed in green and negative ones in yellow,
/// unless the "#" flag is specified.
pub struct Num(pub f64);

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_num(self.0, f, !f.alternate())
    }
}

fn fmt_num(n: f64, f: &mut Formatter<'_>, colored: bool) -> Result {
    let s = match to_fraction(n) {
        Some((num, 1)) => num.to_string(),
        Some((num, den)) => format!("{num}/{den}"),
        None => n.to_string(),
    };
    if !colored {
        f.write_str(&s)
    } else if n >= 0.0 {
        write!(f, "{}", s.green().bold())
    } else {
        write!(f, "{}", s.yellow().bold())
    }
}

/// Returns `n` as a reduced fraction if its denominator divides the LCM of 1 to 16.
fn to_fraction(n: f64) -> Option<(i64, u64)> {
    const DEN: u64 = 720_720;
    const EPS: f64 = 1e-9;

    if !n.is_finite() || n.abs() > 1e12 {
        return None;
    }
    let scaled = n * DEN as f64;
    let num = scaled.round();
    if (scaled - num).abs() > EPS * DEN as f64 {
        return None;
    }

    let num = num as i64;
    let gcd = num.unsigned_abs().gcd(DEN);
    Some((num / gcd as i64, DEN / gcd))
}

fn fmt_assignment(sol: &Assignment, f: &mut Formatter<'_>, colored: bool) -> Result {
    for (i, (var, &n)) in sol.iter().enumerate() {
        if i != 0 {
            f.write_str(", ")?;
        }
        write!(f, "{var} = ")?;
        fmt_num(n, f, colored)?;
    }
    Ok(())
}

fn fmt_names(names: &[String], f: &mut Formatter<'_>) -> Result {
    if names.is_empty() {
        f.write_str("(none)")
    } else {
        f.write_str(&names.join(", "))
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let colored = !f.alternate();
        match self {
            Solution::None => f.write_str("no solution"),
            Solution::Unique(sol) => {
                f.write_str("unique solution: ")?;
                fmt_assignment(sol, f, colored)
            }
            Solution::Infinite {
                basic,
                free,
                examples,
            } => {
                f.write_str("infinitely many solutions\n  basic variables: ")?;
                fmt_names(basic, f)?;
                f.write_str("\n  free variables: ")?;
                fmt_names(free, f)?;
                for (i, sol) in examples.iter().enumerate() {
                    write!(f, "\n  example {}: ", i + 1)?;
                    fmt_assignment(sol, f, colored)?;
                }
                Ok(())
            }
        }
    }
}

/// An augmented matrix laid out in aligned columns under the variable names.
pub struct Rows<'a> {
    pub vars: &'a [String],
    pub rows: &'a [Vec<f64>],
}

impl Display for Rows<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = self.vars.iter().cloned().chain(["=".to_string()]);
        let cells: Vec<Vec<String>> = std::iter::once(header.collect::<Vec<_>>())
            .chain(self.rows.iter().map(|row| {
                row.iter()
                    .map(|&n| format!("{:#}", Num(n)))
                    .collect::<Vec<_>>()
            }))
            .collect();

        let col_n = cells.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..col_n)
            .map(|j| {
                cells
                    .iter()
                    .filter_map(|row| row.get(j))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for (i, row) in cells.iter().enumerate() {
            if i != 0 {
                f.write_char('\n')?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j + 1 == row.len() {
                    f.write_str(" |")?;
                }
                write!(f, " {:>w$}", cell, w = widths[j])?;
            }
        }
        Ok(())
    }
}
