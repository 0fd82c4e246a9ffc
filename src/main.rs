use clap::Parser;
use learning_map::config::toml_config::LogFormat;
use learning_map::utils::error::{ErrorSeverity, MapError};
use learning_map::utils::logger;
use learning_map::{app, CliConfig, LocalStorage, PlannerSession, Settings};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // The log format comes from the config file, so config errors are
    // reported before any subscriber exists.
    let settings = match Settings::load(cli.config.as_deref(), cli.data_dir.clone()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    match settings.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose, settings.log_level.as_deref()),
        LogFormat::Json => logger::init_json_logger(cli.verbose, settings.log_level.as_deref()),
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
        tracing::debug!("Settings: {:?}", settings);
    }

    if let Err(e) = run(cli, &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &MapError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(cli: CliConfig, settings: &Settings) -> Result<(), MapError> {
    let storage = LocalStorage::new(settings.data_dir.clone());
    let mut session = PlannerSession::open(storage).await?;
    app::run(cli.command, &mut session, settings).await
}
