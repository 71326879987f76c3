use std::path::PathBuf;

use clap::Parser;

use config_service::config::{load_config, ServiceConfig};

#[derive(Parser)]
#[command(name = "config-service", version, about = "Hierarchical configuration resolution service")]
struct Cli {
    /// Service configuration file (TOML). Defaults apply if the default file is absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tree definition file, overriding `[tree] path`.
    #[arg(short, long)]
    tree: Option<PathBuf>,
}

const DEFAULT_CONFIG: &str = "config-service.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => load_config(&path)?,
        None if PathBuf::from(DEFAULT_CONFIG).exists() => {
            load_config(&PathBuf::from(DEFAULT_CONFIG))?
        }
        None => ServiceConfig::default(),
    };
    if let Some(tree) = cli.tree {
        config.tree.path = tree.to_string_lossy().into_owned();
    }

    config_service::lifecycle::run(config).await?;
    Ok(())
}
