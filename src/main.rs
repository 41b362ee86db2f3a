//! arbitrage-engine CLI
//!
//! Detect profitable currency-arbitrage cycles from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Live scan against the quote service
//! arbitrage-engine scan --api-key KEY
//!
//! # Offline detection over a JSON rate file
//! arbitrage-engine detect --input rates.json
//!
//! # Output as JSON
//! arbitrage-engine detect --input rates.json --format json
//!
//! # Generate a synthetic market for testing
//! arbitrage-engine generate --count 12 --noise 0.01
//! ```

use arbitrage_engine::core::currency::CurrencyCode;
use arbitrage_engine::core::rates::RateMatrix;
use arbitrage_engine::provider::{ExchangeRateApi, StaticRates};
use arbitrage_engine::scan::orchestrator::{Orchestrator, ScanConfig};
use arbitrage_engine::scan::report::ScanReport;
use arbitrage_engine::simulation::synthetic_market::{generate_market, MarketConfig};
use std::fs;
use std::process;
use std::sync::Arc;

fn print_usage() {
    eprintln!(
        r#"arbitrage-engine - currency arbitrage cycle detection

USAGE:
    arbitrage-engine <COMMAND> [OPTIONS]

COMMANDS:
    scan        Fetch live rates and search for profitable cycles
    detect      Search a rate matrix loaded from a JSON file
    generate    Generate a synthetic rate matrix (for testing)
    help        Show this message

OPTIONS (scan):
    --api-key <KEY>     Quote-service API key (or EXCHANGE_RATE_API_KEY env)

OPTIONS (scan, detect):
    --currencies <LIST> Comma-separated currency universe (default: 30 majors)
    --chunks <N>        Detection chunks to sample (default: 8)
    --chunk-size <N>    Currencies per chunk (default: 16)
    --min-length <N>    Shortest reported cycle, in vertices (default: 3)
    --max-length <N>    Longest reported cycle, in vertices (default: 5)
    --threshold <X>     Minimum gain, exclusive (default: 0.25)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (detect):
    --input <FILE>      Path to JSON rates file

OPTIONS (generate):
    --count <N>         Number of synthetic currencies (default: 10)
    --currencies <LIST> Use these codes instead of synthetic ones
    --noise <X>         Relative rate perturbation (default: 0.002)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    arbitrage-engine scan --api-key KEY --threshold 0.1
    arbitrage-engine detect --input rates.json --format json
    arbitrage-engine generate --count 12 --noise 0.01 --output rates.json"#
    );
}

/// JSON schema for rate files.
#[derive(serde::Serialize, serde::Deserialize)]
struct RateEntry {
    base: String,
    quote: String,
    rate: f64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct RatesFile {
    rates: Vec<RateEntry>,
}

fn load_rates(path: &str) -> RateMatrix {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: RatesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "rates": [
    {{ "base": "USD", "quote": "EUR", "rate": 0.92 }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut matrix = RateMatrix::new();
    for entry in file.rates {
        matrix.set(
            CurrencyCode::new(entry.base),
            CurrencyCode::new(entry.quote),
            entry.rate,
        );
    }
    matrix
}

fn parse_currencies(list: &str) -> Vec<CurrencyCode> {
    list.split(',')
        .map(|s| CurrencyCode::new(s.trim()))
        .filter(|c| !c.as_str().is_empty())
        .collect()
}

fn print_report(report: &ScanReport, format: &str) {
    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.json_entries()).unwrap()
        );
    } else {
        print!("{}", report);
    }
}

/// Options shared by the scan and detect commands.
struct DetectionArgs {
    config: ScanConfig,
    format: String,
}

/// Consume one `--flag value` pair shared by scan and detect.
/// Returns false if the flag is not a shared detection option.
fn apply_detection_flag(
    out: &mut DetectionArgs,
    flag: &str,
    value: Option<&String>,
) -> bool {
    let required = |name: &str| -> String {
        value.cloned().unwrap_or_else(|| {
            eprintln!("{} requires a value", name);
            process::exit(1);
        })
    };
    let numeric = |name: &str| -> usize {
        required(name).parse().unwrap_or_else(|_| {
            eprintln!("{} requires a number", name);
            process::exit(1);
        })
    };

    match flag {
        "--currencies" => out.config.currencies = parse_currencies(&required("--currencies")),
        "--chunks" => out.config.chunk_count = numeric("--chunks"),
        "--chunk-size" => out.config.chunk_size = numeric("--chunk-size"),
        "--min-length" => out.config.min_cycle_len = numeric("--min-length"),
        "--max-length" => out.config.max_cycle_len = numeric("--max-length"),
        "--threshold" => {
            out.config.gain_threshold = required("--threshold").parse().unwrap_or_else(|_| {
                eprintln!("--threshold requires a number");
                process::exit(1);
            })
        }
        "--format" => out.format = required("--format"),
        _ => return false,
    }
    true
}

async fn cmd_scan(args: &[String]) {
    let mut detection = DetectionArgs {
        config: ScanConfig::default(),
        format: "text".to_string(),
    };
    let mut api_key = std::env::var("EXCHANGE_RATE_API_KEY").ok();

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--api-key" => {
                api_key = Some(value.cloned().unwrap_or_else(|| {
                    eprintln!("--api-key requires a value");
                    process::exit(1);
                }));
                i += 1;
            }
            flag => {
                if !apply_detection_flag(&mut detection, flag, value) {
                    eprintln!("Unknown option: {}", flag);
                    process::exit(1);
                }
                i += 1;
            }
        }
        i += 1;
    }

    let api_key = api_key.unwrap_or_else(|| {
        eprintln!("Error: --api-key <KEY> (or EXCHANGE_RATE_API_KEY) is required");
        process::exit(1);
    });

    let provider = Arc::new(ExchangeRateApi::new(api_key));
    let report = Orchestrator::new(detection.config).run(provider).await;
    print_report(&report, &detection.format);
}

async fn cmd_detect(args: &[String]) {
    let mut detection = DetectionArgs {
        config: ScanConfig::default(),
        format: "text".to_string(),
    };
    let mut input_path = None;

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--input" => {
                input_path = Some(value.cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
                i += 1;
            }
            flag => {
                if !apply_detection_flag(&mut detection, flag, value) {
                    eprintln!("Unknown option: {}", flag);
                    process::exit(1);
                }
                i += 1;
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let matrix = load_rates(&path);

    // The file fixes the universe unless one was given explicitly.
    if detection.config.currencies == ScanConfig::default_universe() {
        let mut seen: Vec<CurrencyCode> = Vec::new();
        for (base, quote, _) in matrix.entries() {
            if !seen.contains(base) {
                seen.push(base.clone());
            }
            if !seen.contains(quote) {
                seen.push(quote.clone());
            }
        }
        seen.sort();
        detection.config.currencies = seen;
    }

    let provider = Arc::new(StaticRates::new(matrix));
    let report = Orchestrator::new(detection.config).run(provider).await;
    print_report(&report, &detection.format);
}

fn cmd_generate(args: &[String]) {
    let mut count = 10usize;
    let mut currencies: Option<Vec<CurrencyCode>> = None;
    let mut noise = 0.002f64;
    let mut output_path: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                i += 1;
                count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--count requires a number");
                    process::exit(1);
                });
            }
            "--currencies" => {
                i += 1;
                currencies = Some(parse_currencies(args.get(i).map(String::as_str).unwrap_or_else(
                    || {
                        eprintln!("--currencies requires a comma-separated list");
                        process::exit(1);
                    },
                )));
            }
            "--noise" => {
                i += 1;
                noise = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--noise requires a number");
                    process::exit(1);
                });
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

    let config = MarketConfig {
        currencies: currencies.unwrap_or_else(|| MarketConfig::synthetic_codes(count)),
        noise,
    };
    let matrix = generate_market(&config);

    let output = RatesFile {
        rates: matrix
            .entries()
            .map(|(base, quote, rate)| RateEntry {
                base: base.to_string(),
                quote: quote.to_string(),
                rate,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} rates across {} currencies → {}",
            output.rates.len(),
            config.currencies.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "scan" => cmd_scan(rest).await,
        "detect" => cmd_detect(rest).await,
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
