//! `primeweb` command-line front end.

use clap::Parser;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use u_primeweb::arith::FactorLimits;
use u_primeweb::cp::PropagatingSolver;
use u_primeweb::web::{PrimeWeb, WebConfig, WebOutcome};

#[derive(Parser, Debug)]
#[command(name = "primeweb")]
#[command(version)]
#[command(about = "Bounded prime-web feasibility search for odd perfect number structure")]
struct Args {
    /// Largest prime in the universe
    #[arg(short = 'n', long, default_value_t = 150)]
    prime_limit: u64,

    /// Fixed-point scale for logarithms
    #[arg(long, default_value_t = 100_000_000)]
    scale: u64,

    /// Largest exponent considered
    #[arg(short = 'k', long, default_value_t = 6)]
    max_exponent: u32,

    /// Exponents to try, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "1,2,4,6")]
    exponents: Vec<u32>,

    /// Allowed distance from ln 2 in scaled units
    #[arg(short, long, default_value_t = 1000)]
    tolerance: i64,

    /// Minimum number of distinct primes
    #[arg(short = 'm', long, default_value_t = 5)]
    min_active: usize,

    /// Solver time budget in seconds
    #[arg(long, default_value_t = 30.0)]
    time_limit: f64,

    /// Worker count forwarded to the solver
    #[arg(short = 'w', long, default_value_t = 8)]
    workers: usize,

    /// Build the candidate table on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Values of σ(p^k) above this are rejected
    #[arg(long, default_value_t = 1_000_000_000_000_000)]
    size_ceiling: u64,

    /// Trial division stops at this divisor
    #[arg(long, default_value_t = 200_000)]
    divisor_cutoff: u64,

    /// Per-phase progress (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print the verdict line
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn web_config(&self) -> WebConfig {
        WebConfig::default()
            .with_prime_limit(self.prime_limit)
            .with_scale(self.scale)
            .with_max_exponent(self.max_exponent)
            .with_exponents(self.exponents.clone())
            .with_tolerance(self.tolerance)
            .with_min_active_primes(self.min_active)
            .with_time_limit_secs(self.time_limit)
            .with_num_workers(self.workers)
            .with_parallel(self.parallel)
            .with_factor_limits(
                FactorLimits::default()
                    .with_size_ceiling(self.size_ceiling)
                    .with_divisor_cutoff(self.divisor_cutoff),
            )
    }

    fn log_level(&self) -> Option<Level> {
        if self.quiet {
            return None;
        }
        match self.verbose {
            0 => None,
            1 => Some(Level::INFO),
            2 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(level) = args.log_level() {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to set tracing subscriber: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let web = match PrimeWeb::new(args.web_config()) {
        Ok(web) => web,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let report = web.run(&PropagatingSolver::new());

    if args.quiet {
        let verdict = match &report.outcome {
            WebOutcome::Found(_) => "FOUND",
            WebOutcome::Infeasible { .. } => "INFEASIBLE",
            WebOutcome::Inconclusive { .. } => "INCONCLUSIVE",
        };
        println!("{}", verdict);
    } else {
        let config = web.config();
        println!(
            "prime web: primes <= {}, exponents {:?}, tolerance {}, min active {}",
            config.prime_limit,
            config.effective_exponents(),
            config.tolerance,
            config.min_active_primes
        );
        println!(
            "{} primes, {} candidates, {} web constraints, {} solver nodes",
            report.primes, report.candidates, report.web_constraints, report.solver_nodes
        );
        println!(
            "build {:.3}s, encode {:.3}s, solve {:.3}s",
            report.build_time.as_secs_f64(),
            report.encode_time.as_secs_f64(),
            report.solve_time.as_secs_f64()
        );
        println!();
        println!("{}", report.outcome);
    }

    match report.outcome {
        WebOutcome::Inconclusive { .. } => ExitCode::from(3),
        _ => ExitCode::SUCCESS,
    }
}
