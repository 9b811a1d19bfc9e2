use clap::Parser;
use nippelboard::adapters::{media::TracingMediaPlayer, serial::TokioSerialConnector};
use nippelboard::utils::error::ErrorSeverity;
use nippelboard::utils::{logger, validation::Validate};
use nippelboard::{CliConfig, Soundboard, TomlSettingsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting nippelboard");
    tracing::info!("📁 Loading settings from: {}", cli.config);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let store = TomlSettingsStore::new(&cli.config);
    let mut settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load settings file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut settings);

    // 驗證設定
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let soundboard =
        Soundboard::new(settings, TracingMediaPlayer::new()).with_settings_store(store);

    if let Err(e) = soundboard.run(&TokioSerialConnector).await {
        tracing::error!(
            "❌ Soundboard stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

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

    Ok(())
}
