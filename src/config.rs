use std::{env, fs, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_VAR: &str = "LISPY_CONFIG";
pub const PROMPT_VAR: &str = "LISPY_PROMPT";

/// Settings for the interactive loop.
///
/// Read from the JSON file named by `LISPY_CONFIG` when it is set, with
/// `LISPY_PROMPT` overriding the prompt. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prompt: String,
    pub banner: Vec<String>,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "lispy> ".to_owned(),
            banner: vec![
                "Lispy Version 0.0.0.0.0.1".to_owned(),
                "Press Ctrl+c to exit".to_owned(),
                String::new(),
            ],
            history_file: None,
        }
    }
}

impl Config {
    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match env::var_os(CONFIG_VAR) {
            Some(path) => {
                let source = fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {:?}", path))?;
                Self::from_json(&source)
                    .with_context(|| format!("parsing config file {:?}", path))?
            }
            None => Self::default(),
        };

        if let Ok(prompt) = env::var(PROMPT_VAR) {
            config.prompt = prompt;
        }
        Ok(config)
    }
}
