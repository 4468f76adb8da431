use anyhow::Context;
use clap::Parser;
use pets_api::app::server;
use pets_api::utils::{logger, validation::Validate};
use pets_api::{CliConfig, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pets-api");

    let settings = Settings::load(&cli).context("failed to load configuration")?;
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e).context("invalid configuration");
    }

    server::run(settings).await.context("server terminated with an error")?;

    tracing::info!("✅ pets-api stopped");
    Ok(())
}
