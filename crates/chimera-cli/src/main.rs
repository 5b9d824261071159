mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chimera_core::curve::{CURVE2_COORD_BITS, CURVE3_COORD_BITS};
use chimera_core::shelf::shelf_of;
use chimera_core::{
    Grid2, MemoArray, Wheel, WheelMemo, from_curve, from_curve3, to_curve, to_curve3,
};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "chimera", about = "Memoizing infinite arrays, wheels and Z-order curves")]
struct Cli {
    /// TOML config file (defaults to $CHIMERA_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count primes up to a limit with a wheel-memoized primality test
    Primes {
        #[arg(long)]
        limit: Option<usize>,

        /// Wheel modulus: 2, 6, 30 or 210
        #[arg(long)]
        wheel: Option<Wheel>,

        /// Print every prime, not just the count
        #[arg(long)]
        list: bool,
    },

    /// Fibonacci number from a memoized recurrence
    Fib { n: usize },

    /// Monotone lattice paths across a WIDTH x HEIGHT grid
    Paths { width: usize, height: usize },

    /// Wheel index transforms
    Wheel {
        #[command(subcommand)]
        direction: WheelCommand,
    },

    /// Z-order curve transforms
    Curve {
        #[command(subcommand)]
        op: CurveCommand,
    },

    /// Reproducible random values generated in index order
    Fixture {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Subcommand)]
enum WheelCommand {
    /// Wheel index → integer coprime to the modulus
    From {
        #[arg(long)]
        modulus: Wheel,

        #[arg(required = true)]
        values: Vec<usize>,
    },
    /// Integer → wheel index (rounded up for non-members)
    To {
        #[arg(long)]
        modulus: Wheel,

        #[arg(required = true)]
        values: Vec<usize>,
    },
}

#[derive(Subcommand)]
enum CurveCommand {
    /// Coordinates → curve key (2D, or 3D when z is given)
    Encode {
        x: usize,
        y: usize,
        z: Option<usize>,
    },
    /// Curve key → coordinates
    Decode {
        key: usize,

        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
        dims: u8,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Primes { limit, wheel, list } => cmd_primes(&cli, &config, *limit, *wheel, *list),
        Commands::Fib { n } => cmd_fib(&cli, *n),
        Commands::Paths { width, height } => cmd_paths(&cli, *width, *height),
        Commands::Wheel { direction } => cmd_wheel(&cli, direction),
        Commands::Curve { op } => cmd_curve(&cli, op),
        Commands::Fixture { seed, count } => cmd_fixture(&cli, &config, *seed, *count),
    }
}

/// Highest shelf a command may realize (2^27 slots).
const MAX_SHELF: usize = 28;

/// Fail before indexing `key` would allocate a shelf past [`MAX_SHELF`].
fn check_shelf(what: &str, key: usize) -> Result<()> {
    let shelf = shelf_of(key);
    if shelf > MAX_SHELF {
        bail!(
            "{what} needs memo shelf {shelf}, above the limit of {MAX_SHELF} (keys below {})",
            1usize << MAX_SHELF
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Memoized computations
// ---------------------------------------------------------------------------

fn is_prime(n: usize) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

#[derive(Serialize)]
struct PrimesReport {
    wheel: Wheel,
    limit: usize,
    count: usize,
    realized_shelves: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    primes: Option<Vec<usize>>,
}

fn cmd_primes(
    cli: &Cli,
    config: &Config,
    limit: Option<usize>,
    wheel: Option<Wheel>,
    list: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(config.primes.limit);
    let wheel = wheel.unwrap_or(config.wheel);
    if limit >= wheel.max_index() {
        bail!("limit {limit} is too large for wheel {wheel}");
    }
    check_shelf(&format!("primes up to {limit}"), wheel.to_wheel(limit))?;
    tracing::debug!(%wheel, limit, "counting primes");

    let memo = WheelMemo::new(wheel, is_prime);

    // Primes dividing the modulus never appear on the wheel.
    let mut primes: Vec<usize> = (2..=wheel.modulus().min(limit))
        .filter(|&p| is_prime(p) && !wheel.contains(p))
        .collect();
    primes.extend(
        (0..)
            .map(|i| wheel.from_wheel(i))
            .take_while(|&n| n <= limit)
            .filter(|&n| memo.get(n) == Some(&true)),
    );
    primes.sort_unstable();

    let realized_shelves = memo.array().realized_shelves();
    tracing::debug!(realized_shelves, "prime scan finished");

    let report = PrimesReport {
        wheel,
        limit,
        count: primes.len(),
        realized_shelves,
        primes: list.then_some(primes),
    };

    if cli.json {
        return print_json(&report);
    }
    if let Some(primes) = &report.primes {
        for p in primes {
            println!("{p}");
        }
    }
    println!("primes <= {}: {} (wheel {})", report.limit, report.count, report.wheel);
    if cli.verbose {
        eprintln!("--- realized shelves: {} ---", report.realized_shelves);
    }
    Ok(())
}

#[derive(Serialize)]
struct ValueReport {
    input: String,
    value: String,
}

fn cmd_fib(cli: &Cli, n: usize) -> Result<()> {
    check_shelf(&format!("fib({n})"), n)?;
    // Overflowing entries stay `None` so realizing a whole shelf never panics.
    let fib = MemoArray::<Option<u128>>::tabulate_fix(|i, fib| match i {
        0 => Some(0),
        1 => Some(1),
        _ => fib.get(i - 1).zip(*fib.get(i - 2)).and_then(|(a, b)| a.checked_add(b)),
    });
    let Some(value) = *fib.index(n) else {
        bail!("fib({n}) does not fit in 128 bits");
    };
    tracing::debug!(n, realized_shelves = fib.realized_shelves(), "fibonacci");

    let report = ValueReport {
        input: n.to_string(),
        value: value.to_string(),
    };
    if cli.json {
        return print_json(&report);
    }
    println!("{}", report.value);
    Ok(())
}

fn cmd_paths(cli: &Cli, width: usize, height: usize) -> Result<()> {
    let max = (1usize << CURVE2_COORD_BITS) - 1;
    if width > max || height > max {
        bail!("grid dimensions must be at most {max}");
    }
    check_shelf(&format!("paths({width}, {height})"), to_curve(width, height))?;
    let paths = Grid2::<Option<u128>>::fix(|x, y, paths| {
        if x == 0 || y == 0 {
            Some(1)
        } else {
            paths
                .get(x - 1, y)
                .zip(*paths.get(x, y - 1))
                .and_then(|(a, b)| a.checked_add(b))
        }
    });
    let Some(value) = *paths.get(width, height) else {
        bail!("paths({width}, {height}) does not fit in 128 bits");
    };
    tracing::debug!(
        width,
        height,
        realized_shelves = paths.array().realized_shelves(),
        "lattice paths"
    );

    let report = ValueReport {
        input: format!("{width}x{height}"),
        value: value.to_string(),
    };
    if cli.json {
        return print_json(&report);
    }
    println!("{}", report.value);
    Ok(())
}

// ---------------------------------------------------------------------------
// Transform calculators
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Mapping {
    input: usize,
    output: usize,
    on_wheel: bool,
}

fn cmd_wheel(cli: &Cli, direction: &WheelCommand) -> Result<()> {
    let mappings = match direction {
        WheelCommand::From { modulus, values } => values
            .iter()
            .map(|&i| {
                if i >= modulus.max_index() {
                    bail!("index {i} is out of range for wheel {modulus}");
                }
                Ok(Mapping {
                    input: i,
                    output: modulus.from_wheel(i),
                    on_wheel: true,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        WheelCommand::To { modulus, values } => values
            .iter()
            .map(|&n| Mapping {
                input: n,
                output: modulus.to_wheel(n),
                on_wheel: modulus.contains(n),
            })
            .collect(),
    };

    if cli.json {
        return print_json(&mappings);
    }
    for m in &mappings {
        if m.on_wheel {
            println!("{} -> {}", m.input, m.output);
        } else {
            println!("{} -> {} (not on wheel, rounded up)", m.input, m.output);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CurvePoint {
    key: usize,
    coords: Vec<usize>,
}

fn cmd_curve(cli: &Cli, op: &CurveCommand) -> Result<()> {
    let point = match *op {
        CurveCommand::Encode { x, y, z: None } => {
            let max = (1usize << CURVE2_COORD_BITS) - 1;
            if x > max || y > max {
                bail!("2D coordinates must be at most {max}");
            }
            CurvePoint {
                key: to_curve(x, y),
                coords: vec![x, y],
            }
        }
        CurveCommand::Encode { x, y, z: Some(z) } => {
            let max = (1usize << CURVE3_COORD_BITS) - 1;
            if x > max || y > max || z > max {
                bail!("3D coordinates must be at most {max}");
            }
            CurvePoint {
                key: to_curve3(x, y, z),
                coords: vec![x, y, z],
            }
        }
        CurveCommand::Decode { key, dims: 2 } => {
            let (x, y) = from_curve(key);
            CurvePoint {
                key,
                coords: vec![x, y],
            }
        }
        CurveCommand::Decode { key, .. } => {
            let (x, y, z) = from_curve3(key);
            CurvePoint {
                key,
                coords: vec![x, y, z],
            }
        }
    };

    if cli.json {
        return print_json(&point);
    }
    match op {
        CurveCommand::Encode { .. } => println!("{}", point.key),
        CurveCommand::Decode { .. } => {
            let coords: Vec<String> = point.coords.iter().map(ToString::to_string).collect();
            println!("{}", coords.join(" "));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct FixtureReport {
    seed: u64,
    values: Vec<u32>,
}

fn cmd_fixture(cli: &Cli, config: &Config, seed: Option<u64>, count: Option<usize>) -> Result<()> {
    let seed = seed.unwrap_or(config.fixture.seed);
    let count = count.unwrap_or(config.fixture.count);
    check_shelf(&format!("{count} fixture values"), count.saturating_sub(1))?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let draws = MemoArray::tabulate_effectful(move |_| rng.random::<u32>());
    let report = FixtureReport {
        seed,
        values: draws.prefix(count),
    };
    tracing::debug!(seed, count, realized_shelves = draws.realized_shelves(), "fixture");

    if cli.json {
        return print_json(&report);
    }
    for v in &report.values {
        println!("{v}");
    }
    Ok(())
}
