//! Mauka PDS - command line driver.
//!
//! Initializes logging, loads configuration and runs one of the demo,
//! estimation or configuration subcommands against the library.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hashbrown::HashSet;
use serde::Serialize;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use mauka_pds_lib::config::{ConfigLoader, LogConfig, PdsConfig, ENV_PREFIX};
use mauka_pds_lib::data_structures::hash::DefaultHash;
use mauka_pds_lib::data_structures::{
    BloomFilter, BloomFilterCalculator, Cardinality, CountingBloomFilter, CountingQuotientFilter,
    CuckooFilter, FlajoletMartinCounter, HashFactory, LinearCounter, Membership, SlotTable,
};
use mauka_pds_lib::error::{ErrorContext, ErrorReporter, PdsError, PdsResult, TracingErrorReporter};

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(name = "Mauka PDS", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through every structure with sample data
    Demo,

    /// Estimate distinct lines of a file or standard input
    Estimate {
        /// Input file; standard input when omitted
        #[clap(short, long, value_parser)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Statistics printed by `estimate`.
#[derive(Debug, Serialize)]
struct EstimateReport {
    lines: usize,
    exact_distinct: usize,
    linear_estimate: f64,
    flajolet_martin_estimate: f64,
    bloom_fill_ratio: f64,
    bloom_false_positive_rate: f64,
    cuckoo_load_factor: f64,
    cuckoo_rejected: usize,
}

type Factory = HashFactory<DefaultHash>;

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;

    let (json, pretty) = if log.json {
        let layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_file(log.source_location)
            .with_line_number(log.source_location);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_file(log.source_location)
            .with_line_number(log.source_location);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(ErrorLayer::default())
        .try_init()
        .context("failed to set global tracing subscriber")
}

fn demo(config: &PdsConfig) -> PdsResult<()> {
    let mut factory: Factory = config.hashing.factory();

    info!("Bloom filter over URLs");
    let mut urls = BloomFilter::<str>::from_config(&config.bloom, &mut factory)?;
    for url in ["https://facebook.com", "https://github.com", "https://rust-lang.org"] {
        urls.insert(url);
    }
    for url in ["https://facebook.com", "https://example.org"] {
        println!("bloom contains {url}: {}", urls.contains(url));
    }
    println!(
        "bloom: {} hashes over {} bits, fill {:.6}, approx fpr {:.2e}",
        urls.hash_count(),
        urls.bit_count(),
        urls.fill_ratio(),
        urls.approximate_false_positive_rate()
    );
    let params = BloomFilterCalculator::optimal_params(1_000_000, 0.01)?;
    println!(
        "calculator: n=1000000 p=0.01 -> k={} m={} (fpp {:.4})",
        params.hash_count,
        params.bit_count,
        BloomFilterCalculator::false_positive_probability(
            1_000_000,
            params.hash_count,
            params.bit_count
        )?
    );

    info!("Counting Bloom filter over custom records");
    #[derive(Hash)]
    struct Person {
        name: &'static str,
        age: u8,
    }
    let alice = Person { name: "Alice", age: 30 };
    let bob = Person { name: "Bob", age: 41 };
    let mut people = CountingBloomFilter::<Person>::from_config(&config.bloom, &mut factory)?;
    people.insert(&alice);
    people.insert(&alice);
    people.insert(&bob);
    people.erase(&alice)?;
    println!("after one erase, contains alice: {}", people.contains(&alice));
    people.erase(&alice)?;
    println!("after two erases, contains alice: {}", people.contains(&alice));
    match people.erase(&alice) {
        Err(e) => println!("third erase refused: {e}"),
        Ok(_) => println!("third erase unexpectedly succeeded"),
    }

    info!("Cuckoo filter");
    let mut cuckoo = CuckooFilter::<u64>::from_config(&config.cuckoo, &mut factory)?;
    let inserted = (0..2_000u64).filter(|key| cuckoo.insert(key)).count();
    cuckoo.erase(&7)?;
    println!(
        "cuckoo: inserted {inserted}, len {}, load {:.3}, contains 7: {}, contains 8: {}",
        cuckoo.len(),
        cuckoo.load_factor(),
        cuckoo.contains(&7),
        cuckoo.contains(&8)
    );

    info!("Counting quotient filter");
    let mut words = CountingQuotientFilter::<str>::from_config(&config.quotient, &mut factory)?;
    for word in "the quick brown fox jumps over the lazy dog the end".split_whitespace() {
        words.insert(word);
    }
    let (quotient, remainder) = words.split("the");
    println!(
        "quotient filter: {} entries, \"the\" counted {} times",
        words.len(),
        words.table().count(quotient, remainder)
    );

    info!("Slot table layout");
    let mut table = SlotTable::<()>::new(8, 12)?;
    for (quotient, remainder) in [(0, 10), (0, 11), (1, 3), (0, 12), (6, 1), (7, 2)] {
        table.insert(quotient, remainder);
    }
    println!("run(0) = {:?}", table.run(0));
    println!("{table}");

    Ok(())
}

fn read_lines(input: Option<&Path>) -> PdsResult<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(PdsError::Io)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(PdsError::Io)
}

fn estimate(config: &PdsConfig, lines: &[String]) -> PdsResult<EstimateReport> {
    let mut factory: Factory = config.hashing.factory();
    let mut linear = LinearCounter::<str>::from_config(&config.cardinality, &mut factory)?;
    let mut fm = FlajoletMartinCounter::<str>::from_config(&config.cardinality, &mut factory)?;
    let mut bloom = BloomFilter::<str>::from_config(&config.bloom, &mut factory)?;
    let mut cuckoo = CuckooFilter::<str>::from_config(&config.cuckoo, &mut factory)?;

    let mut exact = HashSet::new();
    let mut rejected = 0;
    for line in lines {
        linear.insert(line);
        fm.insert(line);
        bloom.insert(line);
        if !cuckoo.contains(line) && !cuckoo.insert(line) {
            rejected += 1;
        }
        exact.insert(line.as_str());
    }

    Ok(EstimateReport {
        lines: lines.len(),
        exact_distinct: exact.len(),
        linear_estimate: linear.count(),
        flajolet_martin_estimate: fm.count(),
        bloom_fill_ratio: bloom.fill_ratio(),
        bloom_false_positive_rate: bloom.approximate_false_positive_rate(),
        cuckoo_load_factor: cuckoo.load_factor(),
        cuckoo_rejected: rejected,
    })
}

fn render_report(report: &EstimateReport, json: bool) -> PdsResult<String> {
    if json {
        return serde_json::to_string_pretty(report).map_err(PdsError::Serialization);
    }
    Ok([
        format!("lines:                {}", report.lines),
        format!("exact distinct:       {}", report.exact_distinct),
        format!("linear counting:      {:.1}", report.linear_estimate),
        format!("flajolet-martin:      {:.1}", report.flajolet_martin_estimate),
        format!("bloom fill ratio:     {:.4}", report.bloom_fill_ratio),
        format!("bloom fpr (approx):   {:.2e}", report.bloom_false_positive_rate),
        format!("cuckoo load factor:   {:.4}", report.cuckoo_load_factor),
        format!("cuckoo rejected:      {}", report.cuckoo_rejected),
    ]
    .join("\n"))
}

fn gen_config(output: &Path) -> PdsResult<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(PdsError::Io)?;
    }
    let toml = PdsConfig::default().to_toml()?;
    fs::write(output, toml).map_err(PdsError::Io)?;
    info!("Default configuration written to {:?}", output);
    Ok(())
}

/// Run a subcommand, naming the component for error reports.
fn run(command: Command, config: &PdsConfig) -> (&'static str, PdsResult<()>) {
    match command {
        Command::Demo => ("demo", demo(config)),
        Command::Estimate { input, json } => {
            let result = read_lines(input.as_deref())
                .and_then(|lines| estimate(config, &lines))
                .and_then(|report| render_report(&report, json))
                .map(|rendered| println!("{rendered}"));
            ("estimate", result)
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            ("validate", Ok(()))
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            ("gen-config", gen_config(&output))
        }
    }
}

/// Main entry point for the application.
fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();
    let reporter = TracingErrorReporter;

    let config_loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);
    let loaded = config_loader.load();

    // Logging comes up before reporting a bad config, using defaults if needed.
    let log = loaded.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    init_logging(&log)?;

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            reporter.report(
                ErrorContext::new(PdsError::Config(e), "config")
                    .with_details(format!("while loading {:?}", args.config))
                    .with_span_trace(),
            );
            process::exit(1);
        }
    };

    let (component, result) = run(args.command.unwrap_or(Command::Demo), &config);
    if let Err(error) = result {
        reporter.report(ErrorContext::new(error, component).with_span_trace());
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_report() -> EstimateReport {
        EstimateReport {
            lines: 3,
            exact_distinct: 2,
            linear_estimate: 2.0,
            flajolet_martin_estimate: 2.1,
            bloom_fill_ratio: 0.01,
            bloom_false_positive_rate: 1e-9,
            cuckoo_load_factor: 0.002,
            cuckoo_rejected: 0,
        }
    }

    #[test]
    fn test_missing_input_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = read_lines(Some(dir.path().join("absent.txt").as_path()));
        assert!(matches!(result, Err(PdsError::Io(_))));
    }

    #[test]
    fn test_read_lines_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "maui\noahu\nmaui\n").unwrap();

        let lines = read_lines(Some(path.as_path())).unwrap();
        assert_eq!(lines, vec!["maui", "oahu", "maui"]);

        let report = estimate(&PdsConfig::default(), &lines).unwrap();
        assert_eq!(report.exact_distinct, 2);
    }

    #[test]
    fn test_report_renders_as_json_or_text() {
        let report = sample_report();

        let json: serde_json::Value = serde_json::from_str(&render_report(&report, true).unwrap()).unwrap();
        assert_eq!(json["exact_distinct"], 2);
        assert_eq!(json["cuckoo_rejected"], 0);

        let text = render_report(&report, false).unwrap();
        assert!(text.starts_with("lines:                3"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_gen_config_writes_loadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("pds.toml");
        gen_config(&path).unwrap();

        let loaded = ConfigLoader::new(Some(path.as_path()), ENV_PREFIX).load().unwrap();
        assert_eq!(loaded, PdsConfig::default());
    }

    #[test]
    fn test_gen_config_under_a_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = gen_config(&blocker.join("pds.toml"));
        assert!(matches!(result, Err(PdsError::Io(_))));
    }
}
