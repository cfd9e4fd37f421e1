use buylist::utils::{logger, validation::Validate};
use buylist::{CartSource, CliConfig, EtlEngine, LocalStorage, ShoppingListPipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting buylist CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let spec = config.source_spec()?;
    tracing::info!("🛒 Cart source: {}", spec.describe());

    let source = CartSource::from_spec(&spec)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ShoppingListPipeline::new(storage, source, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Shopping list ready: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Shopping list failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
