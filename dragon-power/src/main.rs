use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use dragon_power::{best_partition, max_power, Partition, Power, MAX_FLOCK};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// (heads, expected power)
const KNOWN_FLOCKS: [(u32, u64); 10] = [
    (1, 1),
    (3, 3),
    (4, 4),
    (6, 9),
    (7, 12),
    (8, 18),
    (9, 27),
    (10, 36),
    (12, 81),
    (13, 108),
];

#[derive(Parser)]
#[command(name = "dragon-power")]
#[command(version, about = "Maximum power of a dragon flock with at most 7 heads per dragon")]
struct Cli {
    /// Number of heads in the flock. Without it an interactive session starts
    #[arg(allow_negative_numbers = true)]
    heads: Option<String>,

    /// Only print the self-test table
    #[arg(long, conflicts_with = "heads")]
    table: bool,

    /// Skip the self-test table before the interactive session
    #[arg(long)]
    no_table: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum InputError {
    #[error("enter a valid number")]
    NotANumber,
    #[error("N must be a natural number in the range (0, {max}), got {0}", max = MAX_FLOCK + 1)]
    OutOfRange(i64),
}

fn parse_number(raw: &str) -> Result<i64, InputError> {
    raw.trim().parse().map_err(|_| InputError::NotANumber)
}

fn check_range(value: i64) -> Result<u32, InputError> {
    u32::try_from(value)
        .ok()
        .filter(|n| (1..=MAX_FLOCK).contains(n))
        .ok_or(InputError::OutOfRange(value))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints one row per flock, returns whether all of them passed.
fn print_table(out: &mut impl Write, flocks: &[(u32, u64)]) -> anyhow::Result<bool> {
    writeln!(out, "Self-test:")?;
    writeln!(out, "{}", "-".repeat(40))?;

    let mut all_passed = true;
    for &(n, expected) in flocks {
        let expected = Power::from(expected);
        let got = max_power(n)?;
        let status = if got == expected { "✓" } else { "✗" };
        all_passed &= got == expected;
        writeln!(out, "N={n:2}: got={got:3}, expected={expected:3} {status}")?;
    }
    Ok(all_passed)
}

fn table_only(out: &mut impl Write, flocks: &[(u32, u64)]) -> anyhow::Result<()> {
    if !print_table(out, flocks)? {
        bail!("self-test table has failing rows");
    }
    Ok(())
}

fn report(out: &mut impl Write, n: u32) -> anyhow::Result<Partition> {
    let power = max_power(n)?;
    let partition = best_partition(n)?;
    writeln!(out, "Max power of a flock with {n} heads: {power}")?;
    writeln!(out, "Optimal breakdown: {partition}")?;
    Ok(partition)
}

fn one_shot(out: &mut impl Write, raw: &str) -> anyhow::Result<()> {
    let n = check_range(parse_number(raw)?)?;
    let partition = report(out, n)?;
    writeln!(out, "Check: {partition} = {}", partition.power())?;
    Ok(())
}

fn interactive(input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Maximum dragon flock power")?;
    writeln!(out, "{}", "=".repeat(55))?;

    let mut lines = input.lines();
    loop {
        write!(
            out,
            "Number of heads in the flock (0 < N < {}) or 0 to exit: ",
            MAX_FLOCK + 1
        )?;
        out.flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            writeln!(out, "Done.")?;
            return Ok(());
        };
        let line = line.context("failed to read from stdin")?;

        let value = match parse_number(&line) {
            Ok(0) => {
                writeln!(out, "Done.")?;
                return Ok(());
            }
            Ok(value) => value,
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                continue;
            }
        };
        match check_range(value) {
            Ok(n) => {
                report(out, n)?;
            }
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        writeln!(out)?;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut out = io::stdout().lock();

    if cli.table {
        return table_only(&mut out, &KNOWN_FLOCKS);
    }

    if let Some(raw) = cli.heads {
        debug!(%raw, "one-shot mode");
        return one_shot(&mut out, &raw);
    }

    if !cli.no_table {
        print_table(&mut out, &KNOWN_FLOCKS)?;
        writeln!(out)?;
    }
    debug!("interactive mode");
    interactive(io::stdin().lock(), &mut out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_number("42"), Ok(42));
        assert_eq!(parse_number("  7 \n"), Ok(7));
        assert_eq!(parse_number("-3"), Ok(-3));
        assert_eq!(parse_number("seven"), Err(InputError::NotANumber));
        assert_eq!(parse_number(""), Err(InputError::NotANumber));
        assert_eq!(parse_number("4.5"), Err(InputError::NotANumber));
    }

    #[test]
    fn range_is_exclusive() {
        assert_eq!(check_range(1), Ok(1));
        assert_eq!(check_range(99), Ok(99));
        assert_eq!(check_range(0), Err(InputError::OutOfRange(0)));
        assert_eq!(check_range(100), Err(InputError::OutOfRange(100)));
        assert_eq!(check_range(-5), Err(InputError::OutOfRange(-5)));
        assert_eq!(check_range(i64::MAX), Err(InputError::OutOfRange(i64::MAX)));
    }

    fn run_session(input: &[u8]) -> String {
        let mut out = Vec::new();
        interactive(input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn known_flocks_pass() {
        let mut out = Vec::new();
        assert!(print_table(&mut out, &KNOWN_FLOCKS).unwrap());
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches('✓').count(), KNOWN_FLOCKS.len());
        assert!(out.contains("N=13: got=108, expected=108 ✓"), "{out}");
    }

    #[test]
    fn failing_row_fails_table_only() {
        let flocks = [(4, 4), (7, 13)];
        let mut out = Vec::new();
        assert!(!print_table(&mut out, &flocks).unwrap());

        let mut out = Vec::new();
        assert!(table_only(&mut out, &flocks).is_err());
        assert!(String::from_utf8(out).unwrap().contains("N= 7: got= 12, expected= 13 ✗"));

        assert!(table_only(&mut Vec::new(), &KNOWN_FLOCKS).is_ok());
    }

    #[test]
    fn session_reprompts_until_zero() {
        let out = run_session(b"5\nabc\n150\n-2\n0\n7\n");
        assert!(out.contains("Max power of a flock with 5 heads: 6"), "{out}");
        assert!(out.contains("Optimal breakdown: 2 × 3"), "{out}");
        assert!(out.contains("Error: enter a valid number"), "{out}");
        assert!(out.contains("range (0, 100), got 150"), "{out}");
        assert!(out.contains("range (0, 100), got -2"), "{out}");
        assert_eq!(out.matches("or 0 to exit: ").count(), 5, "{out}");
        assert!(out.ends_with("Done.\n"), "{out}");
        // nothing after the 0 is read
        assert!(!out.contains("with 7 heads"), "{out}");
    }

    #[test]
    fn session_ends_on_eof() {
        let out = run_session(b"");
        assert_eq!(out.matches("or 0 to exit: ").count(), 1, "{out}");
        assert!(out.ends_with(": \nDone.\n"), "{out}");

        let out = run_session(b"22\n");
        assert!(out.contains("Optimal breakdown: 3 × 3 × 3 × 3 × 3 × 3 × 2 × 2"), "{out}");
        assert!(out.ends_with("Done.\n"), "{out}");
    }

    #[test]
    fn one_shot_prints_check_line() {
        let mut out = Vec::new();
        one_shot(&mut out, "10").unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Max power of a flock with 10 heads: 36"), "{out}");
        assert!(out.ends_with("Check: 2 × 2 × 3 × 3 = 36\n"), "{out}");

        assert!(one_shot(&mut Vec::new(), "0").is_err());
        assert!(one_shot(&mut Vec::new(), "ten").is_err());
    }

    #[test]
    fn negative_heads_reach_range_check() {
        let cli = Cli::try_parse_from(["dragon-power", "-3"]).unwrap();
        assert_eq!(cli.heads.as_deref(), Some("-3"));

        let err = one_shot(&mut Vec::new(), "-3").unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::OutOfRange(-3))
        );
    }

    #[test]
    fn range_error_message() {
        assert_eq!(
            InputError::OutOfRange(100).to_string(),
            "N must be a natural number in the range (0, 100), got 100"
        );
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
