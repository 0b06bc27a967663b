use clap::Parser;
use topsis_rank::core::ConfigProvider;
use topsis_rank::utils::error::ErrorSeverity;
use topsis_rank::utils::{logger, validation::Validate};
use topsis_rank::{EtlEngine, ImpactVector, LocalStorage, TomlConfig, TopsisPipeline, WeightVector};

#[derive(Parser)]
#[command(name = "toml-topsis")]
#[command(about = "Run TOPSIS jobs described in TOML files")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "topsis-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the job's output directory
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - show the parsed job without scoring
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting TOML-based TOPSIS runner");
    tracing::info!("📁 Loading job from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load job file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(output_path) = &args.output_path {
        config.load.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Job validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Job loaded and validated successfully");
    display_job_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No scoring will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::default();
    let pipeline = TopsisPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            println!("✅ Ranked {} alternatives", outcome.scored.len());
            if let Some((best, best_outcome)) = outcome.scored.best() {
                println!("🏆 Best: {} ({:.4})", best.id, best_outcome.closeness);
            }
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ TOPSIS job failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_job_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Job Summary:");
    println!(
        "  Job: {} v{}",
        config.job.name,
        config.job.version.as_deref().unwrap_or("-")
    );
    println!("  Source: {}", config.input_location());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let weights = WeightVector::parse(config.weights())?;
    let impacts = ImpactVector::parse(config.impacts())?;

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Source:");
    println!("  Location: {}", config.input_location());
    match config.has_header() {
        Some(true) => println!("  Header: yes"),
        Some(false) => println!("  Header: no"),
        None => println!("  Header: detect from first row"),
    }

    println!();
    println!("⚖ Criteria ({}):", weights.len());
    for (k, (weight, impact)) in weights
        .as_slice()
        .iter()
        .zip(impacts.as_slice())
        .enumerate()
    {
        println!("  #{}: weight {} impact {}", k + 1, weight, impact);
    }
    if weights.len() != impacts.len() {
        println!(
            "  ⚠ {} weights but {} impacts; the run will fail unless both match the table",
            weights.len(),
            impacts.len()
        );
    }

    println!();
    println!("💾 Output:");
    println!("  Path: {}", config.output_path());
    println!("  Name: {}", config.output_name());
    if let Some(bundle) = config.bundle_name() {
        println!("  Bundle: {} (ZIP)", bundle);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
