use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Site {
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Paths {
    pub content_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Defaults {
    pub index_base_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Deserialize)]
pub struct Views {
    pub key_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
    pub views: Option<Views>,
}

impl Config {
    pub fn index_base_name(&self) -> String {
        self.defaults
            .index_base_name
            .clone()
            .unwrap_or_else(|| "page".to_string())
    }

    pub fn views_key_prefix(&self) -> String {
        self.views
            .as_ref()
            .and_then(|v| v.key_prefix.clone())
            .unwrap_or_else(|| crate::views::DEFAULT_KEY_PREFIX.to_string())
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.to_str().unwrap(), e))),
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir),
    };

    Ok(cfg)
}
