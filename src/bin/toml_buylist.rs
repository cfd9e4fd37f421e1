use buylist::core::ConfigProvider;
use buylist::utils::{logger, validation::Validate};
use buylist::{
    CartSource, EtlEngine, LocalStorage, PageLayout, ShoppingListPipeline, SourceSpec, TomlConfig,
};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-buylist")]
#[command(about = "Shopping list builder driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "buylist.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based buylist job");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let spec = config.source_spec()?;
    let layout = config.page_layout()?;
    display_config_summary(&config, &spec, &layout, args.dry_run);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let source = CartSource::from_spec(&spec)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ShoppingListPipeline::new(storage, source, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Shopping list ready: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Job failed: {} (Category: {:?}, Severity: {:?})",
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

fn display_config_summary(config: &TomlConfig, spec: &SourceSpec, layout: &PageLayout, dry_run: bool) {
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|format| format.extension())
        .collect();

    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", spec.describe());
    println!("  Unit conflicts: {:?}", config.unit_policy());
    println!("  Title: {}", config.title());
    println!(
        "  Page: {}x{} pt, {} lines per page, max {} chars per line",
        layout.page_width,
        layout.page_height,
        layout.lines_per_page(),
        layout.max_line_chars
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", formats.join(", "));
    if let Some(archive) = config.archive_filename() {
        println!("  Archive: {} (ZIP)", archive);
    }

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
