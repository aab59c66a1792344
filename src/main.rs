//! Assessor - use-case readiness assessment
//!
//! A CLI tool that scores candidate AI/automation use cases against a
//! weighted dimension catalog, stores the results in SQLite, and produces
//! narrative insights and exports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid input, missing records, storage or configuration errors

mod assessment;
mod catalog;
mod cli;
mod config;
mod error;
mod insights;
mod models;
mod report;
mod scoring;
mod store;

use anyhow::{Context, Result};
use assessment::{AssessmentDraft, Assessor};
use catalog::DimensionCatalog;
use cli::{Args, Command, ExportFormat};
use config::{Config, ProviderKind, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use insights::{InsightService, OllamaConfig, OllamaInsights};
use models::{NewUseCase, UseCaseKey, UseCaseStatus, MAX_SCORE, MIN_SCORE};
use report::{AssessmentReport, DashboardStats};
use scoring::{challenges, strengths, ReadinessBand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use store::{AssessmentStore, SqliteStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    init_logging(&args)?;

    debug!("Assessor v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .assessor.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to choose the database, catalog, and insight provider.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            debug!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Dispatch the selected subcommand.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if let Command::Catalog = args.command {
        let catalog = DimensionCatalog::load_or_builtin(&config.general.catalog)?;
        print_catalog(&catalog, config.general.verbose);
        return Ok(());
    }

    let store = SqliteStore::open(&config.general.database).with_context(|| {
        format!(
            "Failed to open database {}",
            config.general.database.display()
        )
    })?;

    match args.command {
        Command::Create {
            id,
            name,
            description,
            business_unit,
            process_owner,
        } => {
            let new_use_case = NewUseCase {
                use_case_id: id,
                name,
                description,
                business_unit,
                process_owner,
            };
            let id = new_use_case.use_case_id.clone();
            let key = store.create_use_case(new_use_case)?;
            println!("✅ Created use case {} (key {})", id, key);
        }
        Command::List => list_use_cases(&store)?,
        Command::Show { key } => show_use_case(&store, key, config.report.top_n)?,
        Command::Assess {
            key,
            scores,
            score,
            revise,
        } => {
            let catalog = DimensionCatalog::load_or_builtin(&config.general.catalog)?;
            let insight_service = build_insight_service(&config);
            run_assessment(
                &catalog,
                &store,
                &insight_service,
                &config,
                key,
                scores.as_deref(),
                &score,
                revise,
            )
            .await?;
        }
        Command::Delete { key } => {
            store.delete_use_case(key)?;
            println!("🗑️  Deleted use case {}", key);
        }
        Command::Export {
            key,
            format,
            output,
        } => export_assessment(&store, key, format, output, config.report.top_n)?,
        Command::Stats => print_stats(&store)?,
        Command::Catalog | Command::InitConfig => {}
    }

    Ok(())
}

/// Build the insight service from configuration, falling back to rules
/// when the remote client cannot be created.
fn build_insight_service(config: &Config) -> InsightService {
    match config.insights.provider {
        ProviderKind::Rules => InsightService::rules_only(),
        ProviderKind::Ollama => {
            let ollama_config = OllamaConfig {
                ollama_url: config.insights.ollama_url.clone(),
                model_name: config.insights.model.clone(),
                temperature: config.insights.temperature,
                timeout_seconds: config.insights.timeout_seconds,
                api_key: config.insights.api_key.clone(),
            };

            match OllamaInsights::new(ollama_config) {
                Ok(remote) => InsightService::with_remote(
                    Box::new(remote),
                    Duration::from_secs(config.insights.timeout_seconds),
                ),
                Err(e) => {
                    warn!("Remote insights unavailable, using rule-based insights: {}", e);
                    InsightService::rules_only()
                }
            }
        }
    }
}

fn print_catalog(catalog: &DimensionCatalog, verbose: bool) {
    println!("📋 Dimension catalog ({} dimensions)", catalog.len());

    for category in catalog.categories() {
        println!("\n📂 {}", category);
        for dimension in catalog.dimensions_in(category) {
            println!(
                "   - {} (weight {})",
                dimension.name, dimension.default_weight
            );
            if verbose {
                if !dimension.description.is_empty() {
                    println!("     {}", dimension.description);
                }
                for score in MIN_SCORE..=MAX_SCORE {
                    if let Some(text) = dimension.describe(score) {
                        println!("       {}: {}", score, text);
                    }
                }
            }
        }
    }
}

fn list_use_cases(store: &dyn AssessmentStore) -> Result<()> {
    let use_cases = store.list_use_cases()?;

    if use_cases.is_empty() {
        println!("   No use cases yet. Create one with `assessor create`.");
        return Ok(());
    }

    println!("📋 {} use case(s):\n", use_cases.len());
    for uc in use_cases {
        let score = match uc.status {
            UseCaseStatus::Completed => store
                .get_summary(uc.key)?
                .map(|s| {
                    let band = ReadinessBand::from_score(s.normalized_score);
                    format!("{} {}/100", band.emoji(), s.normalized_score)
                })
                .unwrap_or_default(),
            UseCaseStatus::Draft => String::new(),
        };
        println!(
            "   [{}] {} - {} ({}) {}",
            uc.key, uc.use_case_id, uc.name, uc.status, score
        );
    }
    Ok(())
}

fn show_use_case(store: &dyn AssessmentStore, key: UseCaseKey, top_n: usize) -> Result<()> {
    let use_case = store
        .get_use_case(key)?
        .ok_or_else(|| error::AssessmentError::NotFound(format!("use case {}", key)))?;

    println!("📄 {} - {}", use_case.use_case_id, use_case.name);
    if let Some(ref description) = use_case.description {
        println!("   {}", description);
    }
    println!("   Business unit: {}", use_case.business_unit);
    println!("   Process owner: {}", use_case.process_owner);
    println!("   Status: {}", use_case.status);

    let Some(summary) = store.get_summary(key)? else {
        println!("\n   Not assessed yet. Run `assessor assess {}`.", key);
        return Ok(());
    };
    let scores = store.get_scores(key)?;
    let band = ReadinessBand::from_score(summary.normalized_score);

    println!(
        "\n📊 Overall: {}/100 {} {} - {}",
        summary.normalized_score,
        band.emoji(),
        band.label(),
        band.interpretation()
    );
    for (category, score) in &summary.category_scores {
        println!("   {}: {}/100", category, score.normalized);
    }

    println!("\n💪 Strengths:");
    for s in strengths(&scores, top_n) {
        println!("   - {} ({}/5)", s.dimension, s.score);
    }
    println!("\n⚠️  Challenges:");
    for s in challenges(&scores, top_n) {
        println!("   - {} ({}/5)", s.dimension, s.score);
    }

    if !summary.ai_insights.is_empty() {
        println!("\n💡 {}", summary.ai_insights);
    }
    for (i, rec) in summary.recommendations.iter().enumerate() {
        println!("   {}. {}", i + 1, rec);
    }
    Ok(())
}

/// Collect raw scores into a draft and submit it.
#[allow(clippy::too_many_arguments)]
async fn run_assessment(
    catalog: &DimensionCatalog,
    store: &dyn AssessmentStore,
    insight_service: &InsightService,
    config: &Config,
    key: UseCaseKey,
    scores_file: Option<&Path>,
    pairs: &[(String, u8)],
    revise: bool,
) -> Result<()> {
    let mut draft = if revise {
        AssessmentDraft::from_stored(key, &store.get_scores(key)?)
    } else {
        AssessmentDraft::new(key)
    };

    if let Some(path) = scores_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scores file: {}", path.display()))?;
        let raw: HashMap<String, u8> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scores file: {}", path.display()))?;
        for (dimension, score) in raw {
            draft.set_score(catalog, &dimension, score)?;
        }
    }
    for (dimension, score) in pairs {
        if let Some(previous) = draft.score(dimension) {
            debug!("Overriding {}: {} -> {}", dimension, previous, score);
        }
        draft.set_score(catalog, dimension, *score)?;
    }

    let (scored, total) = draft.progress(catalog);
    info!("Scored {}/{} dimensions", scored, total);
    if !draft.is_complete(catalog) {
        println!("⚠️  {} of {} dimensions still need a score.", total - scored, total);
    }

    println!("🔬 Assessing use case {}...", key);
    if insight_service.has_remote() {
        println!(
            "   Insights: {} via {} (timeout {}s)",
            config.insights.model, config.insights.ollama_url, config.insights.timeout_seconds
        );
    } else {
        println!("   Insights: rule-based");
    }

    let spinner = ProgressBar::new_spinner();
    let template = "{spinner:.green} {msg} [{elapsed}]";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        spinner.set_style(style);
    }
    spinner.set_message("Generating insights...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let assessor = Assessor::new(catalog, store, insight_service, config.report.top_n);
    let result = assessor.submit(&draft).await;
    spinner.finish_and_clear();
    let summary = result?;

    let band = ReadinessBand::from_score(summary.normalized_score);
    println!("\n📊 Assessment Summary:");
    println!(
        "   Overall: {}/100 {} {} - {}",
        summary.normalized_score,
        band.emoji(),
        band.label(),
        band.interpretation()
    );
    println!("   Total weighted score: {}", summary.total_score);
    for (category, score) in &summary.category_scores {
        println!("   - {}: {}/100", category, score.normalized);
    }
    println!("\n✅ Assessment saved.");
    Ok(())
}

fn export_assessment(
    store: &dyn AssessmentStore,
    key: UseCaseKey,
    format: ExportFormat,
    output: Option<PathBuf>,
    top_n: usize,
) -> Result<()> {
    let report = AssessmentReport::load(store, key)?;

    let content = match format {
        ExportFormat::Csv => report::generate_csv(&report.scores)?,
        ExportFormat::Json => report::generate_json(&report)?,
        ExportFormat::Markdown => report::generate_markdown_report(&report, top_n),
    };

    let path = output.unwrap_or_else(|| {
        report::default_export_path(&report.use_case.use_case_id, format.extension())
    });
    report::write_export(&content, &path)?;

    println!("✅ Exported to: {}", path.display());
    Ok(())
}

fn print_stats(store: &dyn AssessmentStore) -> Result<()> {
    let stats = DashboardStats::collect(store)?;

    println!("📊 Portfolio Summary:");
    println!("   Total use cases: {}", stats.total_use_cases);
    println!("   Completed assessments: {}", stats.completed_assessments);
    match stats.average_score {
        Some(avg) => println!("   Average score: {:.1}/100", avg),
        None => println!("   Average score: N/A"),
    }
    Ok(())
}
