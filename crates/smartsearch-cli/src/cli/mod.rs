mod handlers;
mod logging;
mod render;
mod setup;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use handlers::AppContext;
use setup::{Cli, Commands};
use smartsearch::api::SmartSearchApi;
use smartsearch::config::SmartSearchConfig;
use smartsearch::store::fs::FileTargetStore;

const CONFIG_FILE: &str = "smartsearch.toml";

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let project_dirs = ProjectDirs::from("org", "zetkin", "smartsearch");
    let config_path = cli.config_file.clone().or_else(|| {
        project_dirs
            .as_ref()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    });
    let config = SmartSearchConfig::load(config_path.as_deref())?;
    logging::init(&config.log_level, cli.verbose)?;

    let data_dir = match cli.data_dir.clone().or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => project_dirs
            .as_ref()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("No data directory: pass --data-dir or set SMARTSEARCH_DATA_DIR")?,
    };

    let ctx = AppContext {
        api: SmartSearchApi::new(
            FileTargetStore::new(data_dir).with_pretty_json(config.pretty_json),
        ),
        pretty: config.pretty_json,
    };

    let output = dispatch(&ctx, cli.command).await?;
    print!("{output}");
    Ok(())
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<String> {
    match command {
        Commands::Kinds => Ok(handlers::kinds(ctx)),
        Commands::Show { target } => handlers::show(ctx, target.target()?).await,
        Commands::Add {
            target,
            kind,
            op,
            config,
        } => handlers::add(ctx, target.target()?, kind, op, config.as_deref()).await,
        Commands::Edit {
            target,
            position,
            op,
            config,
        } => handlers::edit(ctx, target.target()?, position, op, config.as_deref()).await,
        Commands::Delete { target, position } => {
            handlers::delete(ctx, target.target()?, position).await
        }
        Commands::Compile { file } => handlers::compile(ctx, &file).await,
    }
}

