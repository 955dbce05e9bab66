//! Revenue Pulse Core - Synthetic Revenue Series and Outlier Tagging
//!
//! The main entry point for rp-core, handling:
//! - Seeded synthesis of monthly revenue series per (region, plan)
//! - Isolation-forest outlier tagging of full or filtered row sets
//! - KPI summaries over persisted datasets
//! - Config and dataset checks

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use rp_common::{Error, Feature, MonthKey, OutputFormat, Row, DEFAULT_DATASET_PATH, SCHEMA_VERSION};
use rp_config::{
    list_presets, load_config, validate_contamination, Config, ConfigSnapshot, LoadOptions,
    LoadedConfig, PresetName, TaggerConfig,
};
use rp_core::dataset::{
    load_dataset, manifest_path, validate_series, verify_manifest, write_dataset,
    DatasetManifest, ManifestInputs, SeriesExpectation,
};
use rp_core::exit_codes::ExitCode;
use rp_core::filter::RowFilter;
use rp_core::log_event;
use rp_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use rp_core::summary::Summary;
use rp_core::synth::Synthesizer;
use rp_core::tagger::{OutlierTagger, TagReport};
use std::path::{Path, PathBuf};

/// Revenue Pulse Core - Synthetic subscription revenue with outlier tagging
#[derive(Parser)]
#[command(name = "rp-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, env = "RP_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a dataset, tag it, and write it with its manifest
    Generate(GenerateArgs),

    /// Re-score a (filtered) dataset and report flagged rows
    Tag(TagArgs),

    /// KPI summary over a (filtered) dataset
    Summary(SummaryArgs),

    /// Validate configuration and, optionally, a dataset
    Check(CheckArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Config source selection shared by commands that read settings.
#[derive(Args, Debug, Default)]
struct ConfigSelect {
    /// Config file (overrides RP_CONFIG, RP_CONFIG_DIR, and the XDG location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in preset (baseline, volatile, compact); wins over any file
    #[arg(long)]
    preset: Option<PresetName>,
}

impl ConfigSelect {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            preset: self.preset,
        }
    }
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these regions (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only these plans (repeatable)
    #[arg(long = "plan")]
    plans: Vec<String>,

    /// Keep only these content launch labels (repeatable; "none" for no launch)
    #[arg(long = "content-launch")]
    content_launches: Vec<String>,

    /// Minimum marketing spend (USD mn, inclusive)
    #[arg(long)]
    min_marketing: Option<f64>,

    /// Maximum marketing spend (USD mn, inclusive)
    #[arg(long)]
    max_marketing: Option<f64>,
}

impl FilterArgs {
    fn to_filter(&self) -> RowFilter {
        let mut filter = RowFilter::new()
            .with_regions(self.regions.iter().cloned())
            .with_plans(self.plans.iter().cloned())
            .with_content_launches(self.content_launches.iter().cloned());
        if self.min_marketing.is_some() || self.max_marketing.is_some() {
            filter = filter.with_marketing_range(
                self.min_marketing.unwrap_or(f64::NEG_INFINITY),
                self.max_marketing.unwrap_or(f64::INFINITY),
            );
        }
        filter
    }
}

/// Tagger overrides shared by `tag` and `summary`.
#[derive(Args, Debug, Default)]
struct TaggerOverrides {
    /// Feature to score on (repeatable); defaults to the config's feature list
    #[arg(long = "feature", value_enum)]
    features: Vec<Feature>,

    /// Target share of rows to flag, in (0, 0.5]
    #[arg(long, value_parser = parse_contamination)]
    contamination: Option<f64>,
}

impl TaggerOverrides {
    fn apply(&self, mut tagger: TaggerConfig) -> TaggerConfig {
        if !self.features.is_empty() {
            tagger = tagger.with_features(self.features.clone());
        }
        if let Some(c) = self.contamination {
            tagger = tagger.with_contamination(c);
        }
        tagger
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    source: ConfigSelect,

    /// Override the run seed
    #[arg(long)]
    seed: Option<u64>,

    /// First month (YYYY-MM)
    #[arg(long)]
    start: Option<MonthKey>,

    /// Last month, inclusive (YYYY-MM)
    #[arg(long)]
    end: Option<MonthKey>,

    /// Dataset output path
    #[arg(long, short = 'o', default_value = DEFAULT_DATASET_PATH)]
    out: PathBuf,

    /// Write rows without anomaly flags
    #[arg(long)]
    no_tag: bool,

    /// Target share of rows to flag, in (0, 0.5]
    #[arg(long, value_parser = parse_contamination)]
    contamination: Option<f64>,
}

#[derive(Args, Debug)]
struct TagArgs {
    /// Dataset to read
    #[arg(long, short = 'i', default_value = DEFAULT_DATASET_PATH)]
    input: PathBuf,

    #[command(flatten)]
    source: ConfigSelect,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    tagger: TaggerOverrides,

    /// Write the tagged subset (with manifest) to this path
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Exit with code 1 when any row is flagged
    #[arg(long)]
    fail_on_anomaly: bool,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Dataset to read
    #[arg(long, short = 'i', default_value = DEFAULT_DATASET_PATH)]
    input: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Re-score even when no filter is set (filtered rows are always re-scored)
    #[arg(long, conflicts_with = "stored_flags")]
    retag: bool,

    /// Count the flags stored in the dataset instead of re-scoring the subset
    #[arg(long)]
    stored_flags: bool,

    #[command(flatten)]
    source: ConfigSelect,

    #[command(flatten)]
    tagger: TaggerOverrides,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    source: ConfigSelect,

    /// Dataset to validate (series structure and manifest checksum)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration and its provenance
    Show(ConfigSelect),

    /// List built-in presets
    Presets,

    /// Print the JSON schema for config files
    Schema,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    shell: Shell,
}

fn parse_contamination(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    validate_contamination(value).map_err(|e| e.to_string())?;
    Ok(value)
}

// ============================================================================
// Entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version arrive here too; they are not failures.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(log_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "rp-core starting");

    let exit_code = match &cli.command {
        Commands::Generate(args) => run_generate(&cli.global, &ctx, args),
        Commands::Tag(args) => run_tag(&cli.global, &ctx, args),
        Commands::Summary(args) => run_summary(&cli.global, &ctx, args),
        Commands::Check(args) => run_check(&cli.global, &ctx, args),
        Commands::Config(args) => run_config(&cli.global, &ctx, args),
        Commands::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "rp-core",
                &mut std::io::stdout(),
            );
            ExitCode::Clean
        }
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "rp-core finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn run_generate(global: &GlobalOpts, ctx: &LogContext, args: &GenerateArgs) -> ExitCode {
    let loaded = match load_settings(ctx, &args.source.options()) {
        Ok(l) => l,
        Err(e) => return output_error(global, ctx, &e),
    };

    let mut config = loaded.config.clone();
    if let Some(seed) = args.seed {
        config.simulation = config.simulation.with_seed(seed);
    }
    let start = args.start.unwrap_or(config.simulation.start);
    let end = args.end.unwrap_or(config.simulation.end);
    config.simulation = config.simulation.with_range(start, end);
    if let Some(c) = args.contamination {
        config.tagger = config.tagger.with_contamination(c);
    }

    match generate(ctx, &config, &args.out, !args.no_tag) {
        Ok(manifest) => {
            let payload = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": manifest.generated_at.to_rfc3339(),
                "command": "generate",
                "dataset": args.out.display().to_string(),
                "manifest": manifest_path(&args.out).display().to_string(),
                "config": {
                    "source": loaded.source.to_string(),
                    "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                    "hash": manifest.config_hash,
                },
                "seed": config.simulation.seed,
                "period": {
                    "start": config.simulation.start.to_string(),
                    "end": config.simulation.end.to_string(),
                },
                "rows": manifest.row_count,
                "groups": manifest.group_count,
                "tagged": manifest.tagged,
                "anomaly_count": manifest.anomaly_count,
            });

            match global.format {
                OutputFormat::Json => print_json(&payload),
                OutputFormat::Summary => println!(
                    "[{}] generate: {} rows, {} groups, {} anomalies -> {}",
                    ctx.run_id,
                    manifest.row_count,
                    manifest.group_count,
                    manifest.anomaly_count,
                    args.out.display()
                ),
                OutputFormat::Md => {
                    println!("# Dataset Generated");
                    println!();
                    println!("| Field | Value |");
                    println!("|-------|-------|");
                    println!("| Path | `{}` |", args.out.display());
                    println!("| Seed | {} |", config.simulation.seed);
                    println!(
                        "| Period | {} .. {} |",
                        config.simulation.start, config.simulation.end
                    );
                    println!("| Rows | {} |", manifest.row_count);
                    println!("| Groups | {} |", manifest.group_count);
                    println!("| Tagged | {} |", manifest.tagged);
                    println!("| Anomalies | {} |", manifest.anomaly_count);
                }
            }
            ExitCode::Clean
        }
        Err(e) => output_error(global, ctx, &e),
    }
}

fn generate(
    ctx: &LogContext,
    config: &Config,
    out: &Path,
    tag: bool,
) -> rp_common::Result<DatasetManifest> {
    let synth = Synthesizer::new(config.simulation.clone())?;
    let sim = synth.config();
    log_event!(
        ctx,
        INFO,
        event_names::SYNTH_STARTED,
        Stage::Synthesize,
        format!("synthesizing {} .. {}", sim.start, sim.end),
        seed = sim.seed,
        expected_rows = sim.expected_rows() as u64
    );

    let mut rows = synth.generate();
    log_event!(
        ctx,
        INFO,
        event_names::SYNTH_FINISHED,
        Stage::Synthesize,
        "synthesis complete",
        rows = rows.len() as u64
    );

    if tag {
        let tagger = OutlierTagger::new(config.tagger.clone())?;
        rows = tagger.tag(rows)?;
        let flagged = rows.iter().filter(|r| r.is_anomaly()).count();
        log_event!(
            ctx,
            INFO,
            event_names::TAG_FINISHED,
            Stage::Tag,
            "tagging complete",
            scored = rows.len() as u64,
            flagged = flagged as u64
        );
    }

    let inputs = ManifestInputs {
        seed: Some(sim.seed),
        config_hash: Some(config.content_hash()),
    };
    let manifest = write_dataset(out, &rows, &inputs).map_err(Error::from)?;
    log_event!(
        ctx,
        INFO,
        event_names::DATASET_WRITTEN,
        Stage::Persist,
        format!("wrote {}", out.display()),
        rows = manifest.row_count as u64
    );
    log_event!(
        ctx,
        DEBUG,
        event_names::MANIFEST_WRITTEN,
        Stage::Persist,
        format!("wrote {}", manifest_path(out).display()),
        csv_sha256 = manifest.csv_sha256.as_str()
    );
    Ok(manifest)
}

fn run_tag(global: &GlobalOpts, ctx: &LogContext, args: &TagArgs) -> ExitCode {
    let loaded = match load_settings(ctx, &args.source.options()) {
        Ok(l) => l,
        Err(e) => return output_error(global, ctx, &e),
    };
    let rows = match load_rows(ctx, &args.input) {
        Ok(r) => r,
        Err(e) => return output_error(global, ctx, &e),
    };
    let loaded_count = rows.len();
    let filter = args.filter.to_filter();
    let subset = filter.apply(rows);

    let tagger_config = args.tagger.apply(loaded.config.tagger.clone());
    let (subset, report) = match score_rows(ctx, &tagger_config, subset) {
        Ok(r) => r,
        Err(e) => return output_error(global, ctx, &e),
    };

    if let Some(out) = &args.out {
        let inputs = ManifestInputs {
            seed: None,
            config_hash: Some(loaded.hash.clone()),
        };
        if let Err(e) = write_dataset(out, &subset, &inputs) {
            return output_error(global, ctx, &Error::from(e));
        }
        log_event!(
            ctx,
            INFO,
            event_names::DATASET_WRITTEN,
            Stage::Persist,
            format!("wrote {}", out.display()),
            rows = subset.len() as u64
        );
    }

    let flagged_rows: Vec<serde_json::Value> = subset
        .iter()
        .zip(&report.scores)
        .filter(|(row, _)| row.is_anomaly())
        .map(|(row, score)| {
            serde_json::json!({
                "date": row.date.to_string(),
                "region": row.region,
                "plan": row.plan,
                "revenue_usd_mn": row.revenue_usd_mn,
                "score": score,
            })
        })
        .collect();

    let payload = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": ctx.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": "tag",
        "input": args.input.display().to_string(),
        "filter": (!filter.is_unrestricted()).then_some(&filter),
        "features": tagger_config.features,
        "contamination": tagger_config.contamination,
        "rows_loaded": loaded_count,
        "rows_scored": report.scored(),
        "flagged": report.flagged(),
        "threshold": report.threshold,
        "anomalies": flagged_rows,
        "out": args.out.as_ref().map(|p| p.display().to_string()),
    });

    match global.format {
        OutputFormat::Json => print_json(&payload),
        OutputFormat::Summary => println!(
            "[{}] tag: {}/{} rows flagged (contamination {})",
            ctx.run_id,
            report.flagged(),
            report.scored(),
            tagger_config.contamination
        ),
        OutputFormat::Md => {
            println!("# Outlier Tagging");
            println!();
            println!(
                "Scored **{}** of {} rows; flagged **{}** at contamination {}.",
                report.scored(),
                loaded_count,
                report.flagged(),
                tagger_config.contamination
            );
            if !flagged_rows.is_empty() {
                println!();
                println!("| Date | Region | Plan | Revenue (USD mn) | Score |");
                println!("|------|--------|------|------------------|-------|");
                for (row, score) in subset.iter().zip(&report.scores) {
                    if row.is_anomaly() {
                        println!(
                            "| {} | {} | {} | {:.2} | {:.4} |",
                            row.date, row.region, row.plan, row.revenue_usd_mn, score
                        );
                    }
                }
            }
        }
    }

    if args.fail_on_anomaly && report.flagged() > 0 {
        ExitCode::AnomaliesFound
    } else {
        ExitCode::Clean
    }
}

fn run_summary(global: &GlobalOpts, ctx: &LogContext, args: &SummaryArgs) -> ExitCode {
    let rows = match load_rows(ctx, &args.input) {
        Ok(r) => r,
        Err(e) => return output_error(global, ctx, &e),
    };
    let filter = args.filter.to_filter();
    let mut subset = filter.apply(rows);

    // Stored flags were decided against the whole dataset; a subset is
    // scored against itself.
    let retag = !args.stored_flags && (args.retag || !filter.is_unrestricted());
    if retag {
        let loaded = match load_settings(ctx, &args.source.options()) {
            Ok(l) => l,
            Err(e) => return output_error(global, ctx, &e),
        };
        let tagger_config = args.tagger.apply(loaded.config.tagger.clone());
        subset = match score_rows(ctx, &tagger_config, subset) {
            Ok((rows, _)) => rows,
            Err(e) => return output_error(global, ctx, &e),
        };
    }

    let summary = Summary::from_rows(&subset);
    log_event!(
        ctx,
        INFO,
        event_names::SUMMARY_COMPUTED,
        Stage::Summarize,
        "summary computed",
        rows = summary.row_count as u64,
        anomalies = summary.anomaly_count as u64
    );

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": ctx.run_id,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "command": "summary",
            "input": args.input.display().to_string(),
            "filter": (!filter.is_unrestricted()).then_some(&filter),
            "retagged": retag,
            "summary": summary,
        })),
        OutputFormat::Summary => println!("[{}] {}", ctx.run_id, summary.one_line()),
        OutputFormat::Md => {
            println!("# Revenue Summary");
            println!();
            println!("| KPI | Value |");
            println!("|-----|-------|");
            println!("| Total Revenue (Bn USD) | ${:.2}B |", summary.total_revenue_bn);
            println!("| Total Subscribers (Mn) | {:.2}M |", summary.total_subscribers_mn);
            match summary.avg_growth_pct {
                Some(g) => println!("| Avg Monthly Growth | {:.2}% |", g),
                None => println!("| Avg Monthly Growth | n/a |"),
            }
            println!("| Anomalies Detected | {} |", summary.anomaly_count);
            println!("| Rows | {} |", summary.row_count);
            if !summary.regions.is_empty() {
                println!();
                println!("## By Region");
                println!();
                println!("| Region | Rows | Revenue (Bn USD) | Subscribers (Mn) | Anomalies |");
                println!("|--------|------|------------------|------------------|-----------|");
                for r in &summary.regions {
                    println!(
                        "| {} | {} | {:.2} | {:.2} | {} |",
                        r.region, r.rows, r.revenue_bn, r.subscribers_mn, r.anomaly_count
                    );
                }
            }
        }
    }
    ExitCode::Clean
}

fn run_check(global: &GlobalOpts, ctx: &LogContext, args: &CheckArgs) -> ExitCode {
    let mut results: Vec<serde_json::Value> = Vec::new();
    let mut exit_code = ExitCode::Clean;

    let loaded = match load_config(&args.source.options()) {
        Ok(loaded) => {
            results.push(serde_json::json!({
                "check": "config",
                "status": "ok",
                "source": loaded.source.to_string(),
                "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "hash": loaded.hash,
            }));
            Some(loaded)
        }
        Err(e) => {
            let err = Error::from(e);
            exit_code = ExitCode::for_error(&err);
            results.push(serde_json::json!({
                "check": "config",
                "status": "error",
                "error": rp_common::StructuredError::from(&err),
            }));
            None
        }
    };

    if let Some(path) = &args.dataset {
        match load_dataset(path) {
            Ok(rows) => {
                // Span and group expectations only hold for a full dataset
                // generated from this config; tagged subsets carry no seed.
                let manifest = DatasetManifest::load(&manifest_path(path)).ok();
                let expectation = match (&loaded, &manifest) {
                    (Some(l), Some(m))
                        if m.seed.is_some()
                            && m.config_hash.as_deref() == Some(l.hash.as_str()) =>
                    {
                        SeriesExpectation::from_simulation(&l.config.simulation)
                    }
                    (Some(l), _) => SeriesExpectation {
                        range: None,
                        groups: None,
                        ..SeriesExpectation::from_simulation(&l.config.simulation)
                    },
                    (None, _) => SeriesExpectation::default(),
                };
                let report = validate_series(&rows, &expectation);
                if !report.is_valid() {
                    exit_code = worst(exit_code, ExitCode::DatasetInvalid);
                }
                results.push(serde_json::json!({
                    "check": "series",
                    "status": if report.is_valid() { "ok" } else { "error" },
                    "rows": report.rows,
                    "groups": report.groups,
                    "issues": report.issues,
                }));

                match verify_manifest(path) {
                    Ok(m) => results.push(serde_json::json!({
                        "check": "manifest",
                        "status": "ok",
                        "csv_sha256": m.csv_sha256,
                        "row_count_matches": m.row_count == rows.len(),
                    })),
                    Err(e) => {
                        let err = Error::from(e);
                        exit_code = worst(exit_code, ExitCode::for_error(&err));
                        results.push(serde_json::json!({
                            "check": "manifest",
                            "status": "error",
                            "error": rp_common::StructuredError::from(&err),
                        }));
                    }
                }
            }
            Err(e) => {
                let err = Error::from(e);
                exit_code = worst(exit_code, ExitCode::for_error(&err));
                results.push(serde_json::json!({
                    "check": "dataset",
                    "status": "error",
                    "error": rp_common::StructuredError::from(&err),
                }));
            }
        }
    }

    let all_ok = exit_code.is_success();
    log_event!(
        ctx,
        INFO,
        event_names::CHECK_RESULT,
        Stage::Check,
        if all_ok { "all checks passed" } else { "checks failed" },
        checks = results.len() as u64
    );

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": ctx.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": "check",
        "status": if all_ok { "ok" } else { "error" },
        "checks": results,
    });

    match global.format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Summary => println!(
            "[{}] check: {} ({} checks)",
            ctx.run_id,
            if all_ok { "ok" } else { "FAILED" },
            results.len()
        ),
        OutputFormat::Md => {
            println!("# Check Results");
            println!();
            for r in &results {
                let status = r["status"].as_str().unwrap_or("unknown");
                let mark = if status == "ok" { "✓" } else { "✗" };
                println!("- {} **{}**: {}", mark, r["check"].as_str().unwrap_or("?"), status);
            }
        }
    }
    exit_code
}

/// Keep the first failure; later failures do not overwrite it.
fn worst(current: ExitCode, next: ExitCode) -> ExitCode {
    if current.is_success() {
        next
    } else {
        current
    }
}

fn run_config(global: &GlobalOpts, ctx: &LogContext, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show(select) => match load_settings(ctx, &select.options()) {
            Ok(loaded) => {
                let snapshot = ConfigSnapshot::new(&loaded);
                match global.format {
                    OutputFormat::Json => print_json(&serde_json::json!({
                        "schema_version": SCHEMA_VERSION,
                        "snapshot": snapshot,
                        "config": loaded.config,
                    })),
                    OutputFormat::Summary => println!(
                        "config {} from {} (seed {}, {}..{})",
                        snapshot.short_id(),
                        snapshot.source,
                        snapshot.summary.seed,
                        snapshot.summary.start,
                        snapshot.summary.end
                    ),
                    OutputFormat::Md => {
                        println!("# Configuration");
                        println!();
                        println!("- Source: {}", snapshot.source);
                        if let Some(p) = &snapshot.path {
                            println!("- Path: `{}`", p);
                        }
                        println!("- Hash: `{}`", snapshot.config_hash);
                        println!("- Seed: {}", snapshot.summary.seed);
                        println!(
                            "- Period: {} .. {}",
                            snapshot.summary.start, snapshot.summary.end
                        );
                        println!("- Regions: {}", snapshot.summary.regions.join(", "));
                        println!("- Plans: {}", snapshot.summary.plans.join(", "));
                        println!("- Shocks: {}", snapshot.summary.shocks_enabled);
                        println!("- Contamination: {}", snapshot.summary.contamination);
                    }
                }
                ExitCode::Clean
            }
            Err(e) => output_error(global, ctx, &e),
        },
        ConfigCommands::Presets => {
            let presets = list_presets();
            match global.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "presets": presets,
                })),
                OutputFormat::Summary => {
                    for p in &presets {
                        println!("{}: {}", p.name, p.description);
                    }
                }
                OutputFormat::Md => {
                    println!("# Presets");
                    println!();
                    println!("| Name | Rows | Shocks | Description |");
                    println!("|------|------|--------|-------------|");
                    for p in &presets {
                        println!(
                            "| {} | {} | {} | {} |",
                            p.name, p.expected_rows, p.shocks_enabled, p.description
                        );
                    }
                }
            }
            ExitCode::Clean
        }
        ConfigCommands::Schema => {
            print_json(&serde_json::json!(Config::json_schema()));
            ExitCode::Clean
        }
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "config_schema_version": rp_config::CONFIG_SCHEMA_VERSION,
        "rp_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => print_json(&version_info),
        _ => {
            println!("rp-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_settings(ctx: &LogContext, options: &LoadOptions) -> rp_common::Result<LoadedConfig> {
    match load_config(options) {
        Ok(loaded) => {
            let source = loaded.source.to_string();
            if loaded.path.is_some() || options.preset.is_some() {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "configuration loaded",
                    source = source.as_str(),
                    hash = loaded.hash.as_str()
                );
            } else {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "using built-in baseline",
                    source = source.as_str()
                );
            }
            Ok(loaded)
        }
        Err(e) => {
            log_event!(
                ctx,
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Init,
                e.to_string()
            );
            Err(e.into())
        }
    }
}

fn load_rows(ctx: &LogContext, path: &Path) -> rp_common::Result<Vec<Row>> {
    match load_dataset(path) {
        Ok(rows) => {
            log_event!(
                ctx,
                INFO,
                event_names::DATASET_LOADED,
                Stage::Load,
                format!("loaded {}", path.display()),
                rows = rows.len() as u64
            );
            Ok(rows)
        }
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::DATASET_MISSING,
                Stage::Load,
                e.to_string()
            );
            Err(e.into())
        }
    }
}

fn score_rows(
    ctx: &LogContext,
    config: &TaggerConfig,
    rows: Vec<Row>,
) -> rp_common::Result<(Vec<Row>, TagReport)> {
    let tagger = OutlierTagger::new(config.clone())?;
    log_event!(
        ctx,
        INFO,
        event_names::TAG_STARTED,
        Stage::Tag,
        "scoring rows",
        rows = rows.len() as u64
    );
    let report = tagger.evaluate(&rows)?;
    let rows: Vec<Row> = rows
        .into_iter()
        .zip(&report.flags)
        .map(|(mut row, &flag)| {
            row.anomaly_flag = Some(flag);
            row
        })
        .collect();
    log_event!(
        ctx,
        INFO,
        event_names::TAG_FINISHED,
        Stage::Tag,
        "tagging complete",
        scored = report.scored() as u64,
        flagged = report.flagged() as u64
    );
    Ok((rows, report))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    if exit_code.is_internal_error() {
        log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Init,
            error.to_string(),
            code = error.code() as u64
        );
    }

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "exit_code": exit_code.as_i32(),
                "error": rp_common::StructuredError::from(error),
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_default()
            );
        }
        OutputFormat::Summary => eprintln!("[{}] error: {}", ctx.run_id, error),
        OutputFormat::Md => eprintln!("{}", error.to_human()),
    }
    exit_code
}
