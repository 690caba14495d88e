//! `softcalc`: a small CLI front end over [`softfp::calc`], exercising
//! the soft-float core through a recursive-descent expression
//! evaluator. Grounded on the reference `main.c`'s `-r`/`-t` flag
//! surface, rebuilt with `clap`'s derive API and `tracing` for
//! CLI-boundary diagnostics (never on the arithmetic hot path).

use clap::Parser;
use softfp::context::{Context, RoundingMode, Tininess};

/// Evaluate an arithmetic expression through the deterministic
/// soft-float core.
#[derive(Parser, Debug)]
#[command(name = "softcalc", author, version, about)]
struct Cli {
    /// Rounding mode: 0 = nearest-even, 1 = toward zero, 2 = toward
    /// negative, 3 = toward positive.
    #[arg(short = 'r', long = "round", default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    round: u8,

    /// Tininess-detection mode: 0 = before rounding, 1 = after rounding.
    #[arg(short = 't', long = "tininess", default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    tininess: u8,

    /// Report the exception flags and rounding count the evaluation
    /// left in the context's trace.
    #[arg(long)]
    verbose: bool,

    /// The expression to evaluate, e.g. `"1 + 2 * sqrt(4)"`.
    expression: String,
}

fn rounding_mode(code: u8) -> RoundingMode {
    match code {
        0 => RoundingMode::NearestEven,
        1 => RoundingMode::TowardZero,
        2 => RoundingMode::TowardNegative,
        3 => RoundingMode::TowardPositive,
        _ => unreachable!("clap enforces the 0..=3 range"),
    }
}

fn tininess_mode(code: u8) -> Tininess {
    match code {
        0 => Tininess::BeforeRounding,
        1 => Tininess::AfterRounding,
        _ => unreachable!("clap enforces the 0..=1 range"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = Context::new(rounding_mode(cli.round), tininess_mode(cli.tininess));

    match softfp::calc::eval(&mut ctx, &cli.expression) {
        Ok(result) => {
            let display = f64::from(f32::from_bits(result.value.bits));
            println!("{}\n\t= {:.*}", cli.expression, f64::DIGITS as usize - 1, display);

            if cli.verbose {
                tracing::info!(roundings = ctx.roundings(), "evaluation trace");
                for exc in ctx.exceptions() {
                    tracing::info!(?exc, "exception flags raised");
                }
                for op in ctx.operations() {
                    tracing::info!(?op, "operation");
                }
            }
        }
        Err(err) => {
            tracing::error!(%err, "failed to parse expression");
            eprintln!("softcalc: {err}");
            std::process::exit(2);
        }
    }
}
