use std::env;
use std::path::PathBuf;

use crate::api_connection::endpoints::{
    DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL, DEFAULT_SPOONACULAR_URL,
};

pub const SPOONACULAR_KEY_VAR: &str = "SPOONACULAR_API_KEY";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
const SPOONACULAR_URL_VAR: &str = "SPOONACULAR_BASE_URL";
const OPENAI_URL_VAR: &str = "OPENAI_BASE_URL";
const OPENAI_MODEL_VAR: &str = "OPENAI_MODEL";
const DATA_DIR_VAR: &str = "LEFTOVERS_DATA_DIR";
const CATALOG_VAR: &str = "LEFTOVERS_CATALOG";

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub spoonacular_api_key: Option<String>,
    pub spoonacular_url: String,
    pub openai_api_key: Option<String>,
    pub openai_url: String,
    pub openai_model: String,
    /// Directory holding the favorites file.
    pub data_dir: PathBuf,
    /// Optional CSV catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spoonacular_api_key: None,
            spoonacular_url: DEFAULT_SPOONACULAR_URL.to_string(),
            openai_api_key: None,
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            data_dir: PathBuf::from("."),
            catalog_path: None,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(non_empty)
    }

    /// Builds settings from any variable lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            spoonacular_api_key: lookup(SPOONACULAR_KEY_VAR),
            spoonacular_url: lookup(SPOONACULAR_URL_VAR).unwrap_or(defaults.spoonacular_url),
            openai_api_key: lookup(OPENAI_KEY_VAR),
            openai_url: lookup(OPENAI_URL_VAR).unwrap_or(defaults.openai_url),
            openai_model: lookup(OPENAI_MODEL_VAR).unwrap_or(defaults.openai_model),
            data_dir: lookup(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            catalog_path: lookup(CATALOG_VAR).map(PathBuf::from),
        }
    }
}
