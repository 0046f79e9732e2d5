//! Subcommands of the `bmp` binary.

use anyhow::{Context, bail};
use bmp_calculator::numeric::precision_round;
use bmp_core::{AggregateTotals, BmpEngine, EngineError, MetricSet, PracticeRecord, PracticeSummary, ReductionResult};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

/// BMP pollutant load-reduction calculator
#[derive(Parser, Debug)]
#[command(name = "bmp")]
#[command(about = "Estimate pollutant load reductions for best management practices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch one practice record (`-` reads stdin)
    Reduce {
        record: PathBuf,
        /// Report the calculator's metrics instead of its reduction
        #[arg(long)]
        metrics: bool,
    },

    /// Roll an annotated period history up into installed-to-date totals
    Aggregate {
        periods: PathBuf,
        #[arg(short, long, default_value = "pollutants")]
        metric_set: String,
        /// Report percent of planned instead of installed quantities
        #[arg(short, long)]
        percentage: bool,
    },

    /// Evaluate and roll up every period of one practice
    Summarize {
        practice_code: String,
        periods: PathBuf,
        #[arg(short, long, default_value = "pollutants")]
        metric_set: String,
    },

    /// List the registered practice codes
    Codes,

    /// Show the input defaults of one practice
    Defaults { practice_code: String },
}

/// What a subcommand produced, before rendering.
#[derive(Debug)]
pub enum Output {
    Reduction(ReductionResult),
    Totals(AggregateTotals),
    Summary(Box<PracticeSummary>),
    Codes(Vec<&'static str>),
    Record(PracticeRecord),
}

pub fn run(engine: &BmpEngine, command: Command) -> anyhow::Result<Output> {
    match command {
        Command::Reduce { record, metrics } => {
            let body = read_input(&record)?;
            let result = if metrics {
                let record =
                    PracticeRecord::from_json(&body).map_err(|_| EngineError::empty_request())?;
                engine.dispatch_metrics(&record)?
            } else {
                engine.dispatch_json(&body)?
            };
            Ok(Output::Reduction(result))
        }
        Command::Aggregate { periods, metric_set, percentage } => {
            let set = metric_set_named(&metric_set)?;
            let periods = read_periods(&periods)?;
            Ok(Output::Totals(engine.aggregate(&periods, &set, percentage)))
        }
        Command::Summarize { practice_code, periods, metric_set } => {
            let set = metric_set_named(&metric_set)?;
            let periods = read_periods(&periods)?;
            let summary = engine.summarize(&practice_code, &periods, &set)?;
            Ok(Output::Summary(Box::new(summary)))
        }
        Command::Codes => Ok(Output::Codes(engine.codes())),
        Command::Defaults { practice_code } => Ok(Output::Record(engine.defaults_for(&practice_code)?)),
    }
}

/// Pretty JSON, rounding reported quantities when a precision is configured.
pub fn render(output: Output, precision: Option<u32>) -> anyhow::Result<String> {
    let round = |x: f64| precision.map_or(x, |p| precision_round(x, p));
    let value = match output {
        Output::Reduction(result) => serde_json::to_value(result.map_numbers(round))?,
        Output::Totals(totals) => serde_json::to_value(totals.map_values(round))?,
        Output::Summary(summary) => {
            let summary = *summary;
            serde_json::to_value(PracticeSummary {
                quantity_installed: summary.quantity_installed.map_values(round),
                percentage_installed: summary.percentage_installed.map_values(round),
                ..summary
            })?
        }
        Output::Codes(codes) => serde_json::to_value(codes)?,
        Output::Record(record) => serde_json::to_value(record)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn metric_set_named(name: &str) -> anyhow::Result<MetricSet> {
    match MetricSet::by_name(name) {
        Some(set) => Ok(set),
        None => bail!("unknown metric set '{}', expected one of {}", name, MetricSet::NAMES.join(", ")),
    }
}

fn read_periods(path: &Path) -> anyhow::Result<Vec<PracticeRecord>> {
    let body = read_input(path)?;
    serde_json::from_str(&body)
        .with_context(|| format!("{} is not a JSON array of period records", path.display()))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body).context("failed to read stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bmp-cli-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_aggregate_flags() {
        let cli = Cli::try_parse_from(["bmp", "aggregate", "p.json", "--metric-set", "stormwater", "--percentage"])
            .unwrap();
        match cli.command {
            Command::Aggregate { metric_set, percentage, .. } => {
                assert_eq!(metric_set, "stormwater");
                assert!(percentage);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn reduce_rounds_to_configured_precision() {
        let path = write_temp("reduce.json", r#"{"practice_code": "algal_flow_way.monitored", "biomass": 1000, "percent_n": 5}"#);
        let engine = BmpEngine::without_load_rates();
        let output = run(&engine, Command::Reduce { record: path.clone(), metrics: false }).unwrap();
        let rendered: Value = serde_json::from_str(&render(output, Some(2)).unwrap()).unwrap();
        assert_eq!(rendered["tn_lbs_reduced"], serde_json::json!(22727.27));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn reduce_without_practice_code_fails() {
        let path = write_temp("empty.json", "{}");
        let engine = BmpEngine::without_load_rates();
        let err = run(&engine, Command::Reduce { record: path.clone(), metrics: false }).unwrap_err();
        assert_eq!(err.to_string(), "Empty or invalid request body.");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_record_is_an_invalid_request() {
        let path = write_temp("malformed.json", "{not json");
        let engine = BmpEngine::without_load_rates();
        for metrics in [false, true] {
            let err = run(&engine, Command::Reduce { record: path.clone(), metrics }).unwrap_err();
            assert_eq!(err.downcast_ref::<EngineError>(), Some(&EngineError::empty_request()));
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_metric_set_is_an_error() {
        let engine = BmpEngine::without_load_rates();
        let command = Command::Aggregate { periods: PathBuf::from("-"), metric_set: "nope".into(), percentage: false };
        assert!(run(&engine, command).is_err());
    }

    #[test]
    fn codes_render_as_array() {
        let engine = BmpEngine::without_load_rates();
        let rendered: Value = serde_json::from_str(&render(Output::Codes(engine.codes()), None).unwrap()).unwrap();
        assert_eq!(rendered.as_array().map(Vec::len), Some(18));
    }
}
