//! vol-screener CLI
//!
//! Screen a metrics snapshot from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Screen a snapshot with default thresholds
//! vol-screener screen --input snapshot.json
//!
//! # Output as JSON, with the beta filter enabled
//! vol-screener screen --input snapshot.json --max-abs-beta 1.5 --format json
//!
//! # Generate a random snapshot for testing
//! vol-screener generate --symbols 200 --output snapshot.json
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::process;
use vol_screener::core::config::{MissingFieldPolicy, ScreenConfig};
use vol_screener::core::record::MetricSnapshot;
use vol_screener::screening::engine::ScreeningEngine;
use vol_screener::simulation::snapshot_generator::{generate_random_snapshot, SnapshotConfig};

fn print_usage() {
    eprintln!(
        r#"vol-screener — volatility and liquidity screen for options-selling candidates

USAGE:
    vol-screener <COMMAND> [OPTIONS]

COMMANDS:
    screen      Screen and rank a metrics snapshot
    generate    Generate a random metrics snapshot (for testing)
    help        Show this message

OPTIONS (screen):
    --input <FILE>          Path to JSON snapshot file (records, or metrics + quotes)
    --config <FILE>         Path to JSON screen config (defaults apply to missing keys)
    --format <FORMAT>       Output format: text (default) or json
    --as-of <DATE>          Snapshot date for records that carry none (YYYY-MM-DD)
    --max-abs-beta <N>      Enable the beta filter with this bound
    --window-days <N>       Earnings avoidance window in days (default: 25)
    --skip-missing          Skip records with missing fields instead of failing

OPTIONS (generate):
    --symbols <N>           Number of symbols (default: 100)
    --date <DATE>           Snapshot date (default: 2024-01-02)
    --seed <N>              Seed for reproducible output
    --output <FILE>         Write to file instead of stdout

Set RUST_LOG=debug for stage counts.

EXAMPLES:
    vol-screener screen --input snapshot.json
    vol-screener screen --input snapshot.json --config screen.json --format json
    vol-screener screen --input snapshot.json --as-of 2024-03-01 --skip-missing
    vol-screener generate --symbols 500 --seed 42 --output snapshot.json"#
    );
}

fn parse_date(flag: &str, value: Option<&String>) -> NaiveDate {
    value
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| {
            eprintln!("{} requires a date in YYYY-MM-DD format", flag);
            process::exit(1);
        })
}

fn load_snapshot(path: &str, as_of: Option<NaiveDate>) -> MetricSnapshot {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    MetricSnapshot::from_feed_json(&content, as_of).unwrap_or_else(|e| {
        eprintln!("Error loading snapshot: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "snapshot_date": "2024-03-01",
  "records": [
    {{ "symbol": "XYZ", "last_price": "12", "iv_rank": "0.60", "iv_percentile": "0.80",
      "liquidity_rating": "4", "beta": "1.1", "earnings_date": "2024-03-11" }}
  ],
  "metrics": [ {{ "symbol": "MU", "iv_rank": "0.71", "liquidity_rating": "4" }} ],
  "quotes": [ {{ "symbol": "MU", "last_price": "92.15" }} ]
}}"#);
        process::exit(1);
    })
}

fn load_config(path: &str) -> ScreenConfig {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config '{}': {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing config JSON: {}", e);
        process::exit(1);
    })
}

fn cmd_screen(args: &[String]) {
    let mut input_path = None;
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut as_of = None;
    let mut max_abs_beta: Option<Decimal> = None;
    let mut window_days: Option<i64> = None;
    let mut skip_missing = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--as-of" => {
                i += 1;
                as_of = Some(parse_date("--as-of", args.get(i)));
            }
            "--max-abs-beta" => {
                i += 1;
                max_abs_beta = Some(
                    args.get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| {
                            eprintln!("--max-abs-beta requires a number");
                            process::exit(1);
                        }),
                );
            }
            "--window-days" => {
                i += 1;
                window_days = Some(
                    args.get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| {
                            eprintln!("--window-days requires a whole number");
                            process::exit(1);
                        }),
                );
            }
            "--skip-missing" => skip_missing = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let mut config = config_path
        .map(|p| load_config(&p))
        .unwrap_or_default();
    if let Some(bound) = max_abs_beta {
        config = config.with_max_abs_beta(bound);
    }
    if let Some(days) = window_days {
        config = config.with_earnings_window_days(days);
    }
    if skip_missing {
        config = config.with_missing_field_policy(MissingFieldPolicy::SkipRecord);
    }

    let engine = ScreeningEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    log::debug!("screen config: {:?}", engine.config());

    let snapshot = load_snapshot(&path, as_of);
    log::info!(
        "loaded {} records ({} symbols) from {}",
        snapshot.len(),
        snapshot.symbols().len(),
        path
    );

    let report = engine.screen(snapshot.records()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if format == "json" {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error serializing report: {}", e);
            process::exit(1);
        });
        println!("{}", json);
    } else {
        println!("{}", report);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = SnapshotConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--symbols" => {
                i += 1;
                config.symbol_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--symbols requires a number");
                        process::exit(1);
                    });
            }
            "--date" => {
                i += 1;
                config.snapshot_date = parse_date("--date", args.get(i));
            }
            "--seed" => {
                i += 1;
                config.seed = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a number");
                    process::exit(1);
                }));
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let snapshot = generate_random_snapshot(&config);
    let json = snapshot.to_feed_json(config.snapshot_date).unwrap_or_else(|e| {
        eprintln!("Error serializing snapshot: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} records for {} symbols → {}",
            snapshot.len(),
            config.symbol_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "screen" => cmd_screen(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
