//! Bundle Panel - Databricks asset bundle 控制面板
//!
//! Usage:
//! - Default: `bundle-panel` (listens on 0.0.0.0:8050)
//! - Custom port: `bundle-panel --port 9000`
//!
//! CLI path, template and target come from the environment
//! (`DATABRICKS_CLI_PATH`, `BUNDLE_TEMPLATE_PATH`, `BUNDLE_TARGET`, ...).

use clap::Parser;

use bundle_panel::EnvConfig;

/// 命令行参数，覆盖环境变量
#[derive(Debug, Parser)]
#[command(name = "bundle-panel", version, about = "Browser control panel for Databricks asset bundles")]
struct Cli {
    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bundle_panel::init_tracing();

    let mut config = EnvConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    bundle_panel::run(config).await
}
