use anyhow::Context;
use clap::Parser;
use mses_split::domain::ports::ConfigProvider;
use mses_split::utils::error::ErrorSeverity;
use mses_split::utils::{logger, validation::Validate};
use mses_split::{parse_table, LocalStorage, Mode, MsesEngine, MsesPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-mses")]
#[command(about = "Run an MSES split/interp/merge job described by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "mses-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the transform mode from config
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Dry run - show what would be processed without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(if args.verbose {
            Some("debug")
        } else {
            config.log_level()
        });
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));
    }

    tracing::info!("🚀 Starting TOML-based MSES job");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(mode) = args.mode {
        config.transform.mode = mode;
        tracing::info!("🔧 Mode overridden to: {}", mode);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let pipeline = MsesPipeline::new(LocalStorage::default(), config);
    let engine = MsesEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Job completed successfully!");
            println!("✅ Output saved to: {}", output_path);
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

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("   Input: {}", config.input_path());
    if let Some(lower) = config.lower_input_path() {
        tracing::info!("   Lower surface input: {}", lower);
    }
    tracing::info!("   Mode: {}", config.mode());
    if config.mode() == Mode::Interp {
        let grid = config.grid();
        tracing::info!(
            "   Grid: {} points in [{}, {}]",
            grid.points,
            grid.x_min,
            grid.x_max
        );
    }
    tracing::info!(
        "   Output: {} ({:?}, archive: {})",
        config.output_path(),
        config.delimiter(),
        config.archive()
    );
}

/// Files a real run reads; the lower surface file only in merge mode.
fn job_inputs(config: &TomlConfig) -> Vec<&str> {
    let mut inputs = vec![config.input_path()];
    if config.mode() == Mode::Merge {
        inputs.extend(config.lower_input_path());
    }
    inputs
}

/// Parse the inputs and report what a real run would operate on.
fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    for path in job_inputs(config) {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input '{}'", path))?;
        let table = parse_table(&content).with_context(|| format!("failed to parse '{}'", path))?;
        tracing::info!(
            "   {}: {} points, columns {:?}",
            path,
            table.len(),
            table.names()
        );
    }

    Ok(())
}
