//! SurtClass CLI - classify attribute columns

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use surtclass_algorithms::classification::{
    classify_all, custom_classify, fit, Classification, ClassificationMethod, RuleTable, Scheme,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "surtclass")]
#[command(author, version, about = "Classify numeric attribute columns", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a classification scheme and print its break-points
    Fit {
        /// Input file of numbers ("-" for stdin)
        input: PathBuf,
        /// Number of classes
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Fitting method
        #[arg(short, long, value_enum, default_value = "natural-breaks")]
        method: MethodArg,
        /// Print the scheme as JSON
        #[arg(long)]
        json: bool,
    },
    /// Label every value with a fitted or explicit scheme
    Classify {
        /// Input file of numbers ("-" for stdin)
        input: PathBuf,
        /// Explicit break-points as "a,b,c" (overrides -k/--method)
        #[arg(long)]
        breaks: Option<String>,
        /// Number of classes when fitting
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Fitting method
        #[arg(short, long, value_enum, default_value = "natural-breaks")]
        method: MethodArg,
        /// Class labels as "Low,Medium,High", lowest class first
        #[arg(long)]
        labels: Option<String>,
        /// Output file (one label per line, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Label every value with an ordered threshold rule table
    Rules {
        /// Input file of numbers ("-" for stdin)
        input: PathBuf,
        /// Rule "threshold=label": values below threshold get label. Order matters.
        #[arg(short, long = "rule", required = true)]
        rules: Vec<String>,
        /// Label for values matching no rule
        #[arg(short, long)]
        default: Option<String>,
        /// Output file (one label per line, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    EqualInterval,
    Quantiles,
    NaturalBreaks,
}

impl From<MethodArg> for ClassificationMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::EqualInterval => ClassificationMethod::EqualInterval,
            MethodArg::Quantiles => ClassificationMethod::Quantiles,
            MethodArg::NaturalBreaks => ClassificationMethod::NaturalBreaks,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Parse numbers separated by newlines, commas or whitespace.
fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .enumerate()
        .map(|(i, tok)| {
            tok.parse::<f64>()
                .with_context(|| format!("Value {} is not a number: '{}'", i + 1, tok))
        })
        .collect()
}

/// Read a whole file, or stdin for "-".
fn read_text(path: &Path) -> surtclass_core::Result<String> {
    let mut text = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)?;
    }
    Ok(text)
}

fn read_values(path: &Path) -> Result<Vec<f64>> {
    let pb = spinner("Reading values...");
    let text = read_text(path).with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    let values = parse_values(&text)?;
    info!("Input: {} values", values.len());
    Ok(values)
}

fn parse_breaks(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|b| b.trim().parse::<f64>().with_context(|| format!("Invalid break-point: {}", b)))
        .collect()
}

fn parse_labels(s: &str) -> Vec<String> {
    s.split(',').map(|l| l.trim().to_string()).collect()
}

fn parse_rule(s: &str) -> Result<(f64, String)> {
    let Some((threshold, label)) = s.split_once('=') else {
        anyhow::bail!("Rule must be 'threshold=label', got: {}", s);
    };
    let threshold: f64 = threshold
        .trim()
        .parse()
        .with_context(|| format!("Invalid rule threshold: {}", threshold))?;
    Ok((threshold, label.trim().to_string()))
}

/// Explicit break-points if given, otherwise a scheme fitted to `values`.
fn build_scheme(
    values: &[f64],
    breaks: Option<&str>,
    k: usize,
    method: ClassificationMethod,
    labels: Option<&str>,
) -> Result<Scheme> {
    let scheme = match breaks {
        Some(b) => Scheme::from_breaks(parse_breaks(b)?).context("Invalid break-points")?,
        None => fit(values, k, method).context("Failed to fit scheme")?,
    };
    match labels {
        Some(l) => scheme.with_labels(parse_labels(l)).context("Invalid labels"),
        None => Ok(scheme),
    }
}

fn label_values(values: &[f64], scheme: &Scheme) -> surtclass_core::Result<Vec<String>> {
    let classification = classify_all(values, scheme)?;
    Ok(classification.labels().into_iter().map(str::to_string).collect())
}

fn build_rule_table(rules: &[String], default: Option<&str>) -> Result<RuleTable> {
    let mut table = RuleTable::new();
    for rule in rules {
        let (threshold, label) = parse_rule(rule)?;
        table = table.rule(threshold, label);
    }
    if let Some(d) = default {
        table = table.with_default(d);
    }
    debug!(
        "Rule table: {} rules, default {:?}",
        table.rules().len(),
        table.default_label()
    );
    Ok(table)
}

/// All-or-nothing: the first unclassifiable value fails the whole run.
fn apply_rules(values: &[f64], table: &RuleTable) -> surtclass_core::Result<Vec<String>> {
    values
        .iter()
        .map(|&v| custom_classify(v, table).map(str::to_string))
        .collect()
}

fn write_labels<'a>(labels: impl IntoIterator<Item = &'a str>, output: Option<&Path>) -> Result<()> {
    let mut text = String::new();
    for label in labels {
        text.push_str(label);
        text.push('\n');
    }
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Labels saved to: {}", path.display());
        }
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write stdout")?,
    }
    Ok(())
}

fn print_summary(classification: &Classification) {
    let scheme = classification.scheme();
    println!("Method: {}", scheme.method().name());
    println!("Classes: {}", scheme.num_classes());
    for (i, count) in classification.counts().iter().enumerate() {
        let (lo, hi) = scheme.class_bounds(i).unwrap_or((f64::NAN, f64::NAN));
        println!("  {:>12}  [{:.4}, {:.4})  n={}", scheme.labels()[i], lo, hi, count);
    }
    println!("  GVF: {:.4}", classification.gvf());
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Fit {
            input,
            k,
            method,
            json,
        } => {
            let values = read_values(&input)?;
            let start = Instant::now();
            let scheme = fit(&values, k, method.into()).context("Failed to fit scheme")?;
            let classification =
                classify_all(&values, &scheme).context("Failed to classify values")?;
            debug!("Fitted in {:.2?}", start.elapsed());

            if json {
                let out = serde_json::to_string_pretty(&scheme)
                    .context("Failed to serialize scheme")?;
                println!("{}", out);
            } else {
                print_summary(&classification);
            }
        }
        Commands::Classify {
            input,
            breaks,
            k,
            method,
            labels,
            output,
        } => {
            let values = read_values(&input)?;
            let start = Instant::now();
            let scheme = build_scheme(
                &values,
                breaks.as_deref(),
                k,
                method.into(),
                labels.as_deref(),
            )?;
            let labels = label_values(&values, &scheme).context("Failed to classify values")?;
            debug!("Classified in {:.2?}", start.elapsed());
            debug!("Breaks: {:?}", scheme.breaks());

            write_labels(labels.iter().map(String::as_str), output.as_deref())?;
        }
        Commands::Rules {
            input,
            rules,
            default,
            output,
        } => {
            let table = build_rule_table(&rules, default.as_deref())?;
            let values = read_values(&input)?;
            let labels = apply_rules(&values, &table).context("Failed to apply rule table")?;
            write_labels(labels.iter().map(String::as_str), output.as_deref())?;
        }
    }

    Ok(())
}
