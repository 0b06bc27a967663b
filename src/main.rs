use clap::Parser;
use topsis_rank::utils::error::{ErrorSeverity, TopsisError};
use topsis_rank::utils::{logger, validation::Validate};
use topsis_rank::{CliConfig, EtlEngine, LocalStorage, ScoredTable, TopsisPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init(config.verbose, config.json_logs);

    tracing::info!("Starting topsis CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e, "Configuration validation failed");
    }

    let preview = config.preview;
    let storage = LocalStorage::default();
    let pipeline = TopsisPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            if preview {
                print_preview(&outcome.scored);
            }
            println!("✅ Ranked {} alternatives", outcome.scored.len());
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => exit_with(&e, "TOPSIS run failed"),
    }

    Ok(())
}

fn exit_with(e: &TopsisError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
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

fn print_preview(scored: &ScoredTable) {
    let table = scored.table();
    println!(
        "{:>4}  {:<24} {:>12}",
        "Rank",
        table.id_column_name(),
        "Topsis Score"
    );
    for (row, outcome) in scored.ranked() {
        println!("{:>4}  {:<24} {:>12.6}", outcome.rank, row.id, outcome.closeness);
    }
    println!();
}
