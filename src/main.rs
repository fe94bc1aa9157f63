use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::{info, warn};

use scribed::config::{read_config, Config};
use scribed::logger::configure_logger;
use scribed::server::server_run;
use scribed::views::store::RedisStore;
use scribed::views::ViewCounter;

const CFG_FILE_NAME: &str = "scribed.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

fn get_config_path() -> Option<PathBuf> {
    let exe_path = env::current_exe().unwrap();
    let exe_dir = exe_path.parent().unwrap();
    let cur_dir = env::current_dir().unwrap();

    if exe_dir.join(CFG_FILE_NAME).exists() {
        return Some(exe_dir.join(CFG_FILE_NAME));
    }

    if cur_dir.join(CFG_FILE_NAME).exists() {
        return Some(cur_dir.join(CFG_FILE_NAME));
    }

    let cfg_dir = dirs::config_dir()?;
    if cfg_dir.join(CFG_FILE_NAME).exists() {
        return Some(cfg_dir.join(CFG_FILE_NAME));
    }

    None
}

fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = cfg_path
        .or_else(get_config_path)
        .context("Could not find a scribed configuration file")?;

    let config = read_config(&config_path)
        .with_context(|| format!("Error reading config from {}", config_path.to_str().unwrap()))?;

    Ok(config)
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            eprintln!("Please run scribed --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    // The view-count store is required up front: a missing URL should fail
    // the start, not every request after it
    let store = RedisStore::from_env().context("View-count store is not configured")?;
    let views = ViewCounter::new(store, config.views_key_prefix().as_str());

    info!("Starting Scribed =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    info!("Listening on {}:{}", config.server.address, config.server.port);

    server_run(config, views).await?;

    Ok(())
}
