use anyhow::Result;
use clap::Parser;
use linsolve::{parse, solve, Equation, Num, Rows, Solution};
use owo_colors::OwoColorize;
use std::{env, io, process};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Residuals below this count as satisfied when checking solutions.
const CHECK_TOLERANCE: f64 = 1e-9;

/// Solves systems of linear equations.
#[derive(Parser)]
#[command(name = "linsolve", version)]
struct Cli {
    /// Equations such as "2x + 3y = 7", separated by `,` or `;` or given as
    /// separate arguments. Starts an interactive session when omitted.
    equations: Vec<String>,

    /// Print the built matrix, the reduced matrix and the ranks.
    #[arg(short, long)]
    steps: bool,

    /// Disable colored output (also disabled by setting NO_COLOR).
    #[arg(long)]
    no_color: bool,
}

struct Opts {
    steps: bool,
    color: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let opts = Opts {
        steps: cli.steps,
        color: !cli.no_color && env::var_os("NO_COLOR").is_none(),
    };

    if !cli.equations.is_empty() {
        let eqs = parse::parse_system(&cli.equations.join(";"))?;
        return try_solve(&eqs, &opts);
    }

    ctrlc::set_handler(|| {
        println!("\nBye!");
        process::exit(0);
    })?;

    let mut buf = String::new();
    loop {
        println!("Nya! Feed me some equations:");
        if io::stdin().read_line(&mut buf)? == 0 {
            break;
        }

        if !buf.trim().is_empty() {
            let res = parse::parse_system(&buf)
                .map_err(anyhow::Error::from)
                .and_then(|eqs| try_solve(&eqs, &opts));
            if let Err(e) = res {
                println!("Error: {e}");
            }
        }

        buf.clear();
    }
    Ok(())
}

fn try_solve(eqs: &[Equation], opts: &Opts) -> Result<()> {
    let eqs_str: Vec<_> = eqs.iter().map(ToString::to_string).collect();
    println!("\nInput interpretation: {}", eqs_str.join(", "));

    let report = solve::analyze(eqs)?;

    if opts.steps {
        let vars = &report.system.vars;

        println!("\n----- BUILDING MATRIX -----");
        let aug = report.system.augmented();
        println!("{}", Rows { vars, rows: &aug });

        println!("\n----- REDUCING MATRIX -----");
        println!(
            "{}",
            Rows {
                vars,
                rows: &report.reduced
            }
        );

        println!(
            "\nrank(A) = {}, rank([A|B]) = {}",
            report.coef_rank, report.aug_rank
        );
        println!("\n----- RESULT -----");
    }

    let sol = &report.solution;
    if opts.color {
        println!("\n{sol}");
    } else {
        println!("\n{sol:#}");
    }

    if !matches!(sol, Solution::None) {
        print_checks(eqs, sol, opts);
    }
    println!();
    Ok(())
}

/// Substitutes every solution into every equation and prints the residuals.
fn print_checks(eqs: &[Equation], sol: &Solution, opts: &Opts) {
    println!("\n----- CHECKING -----");
    for (i, values) in sol.examples().iter().enumerate() {
        for eq in eqs {
            let lhs = eq.evaluate(values);
            let ok = eq.is_satisfied_by(values, CHECK_TOLERANCE);
            let mark = match (ok, opts.color) {
                (true, true) => "✓".green().to_string(),
                (false, true) => "✗".red().to_string(),
                (true, false) => "✓".to_string(),
                (false, false) => "✗".to_string(),
            };
            println!(
                "#{}: {} gives {:#} (expected {:#}) {}",
                i + 1,
                eq,
                Num(lhs),
                Num(eq.rhs),
                mark
            );
        }
    }
}
