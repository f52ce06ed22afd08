use anyhow::Result;
use clap::Parser;

use radiolab::{config::Settings, routes::Route, App};

#[derive(Parser)]
#[command(name = "radiolab")]
#[command(about = "Terminal console for radiograph analysis projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Page to open first, e.g. /projects/12/analyze or /upload?projectId=12
    #[arg(default_value = "/")]
    path: Route,

    /// Settings file; RADIOLAB_CONFIG or ./radiolab.toml when omitted
    #[arg(long)]
    config: Option<String>,

    /// Backend base URL, overriding the settings file
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match cli.config.as_deref() {
        Some(path) => Settings::load(path)?,
        None => Settings::new()?,
    };
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
        settings.validate()?;
    }

    // Logging is initialized in App::run() with buffer support
    App::new(settings, cli.path).run().await?;

    Ok(())
}
