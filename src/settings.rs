use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_PDF_PATH: &str = "assets/SeasonSchedule.pdf";
const DEFAULT_OUT_PATH: &str = "data/index.json";

/// Paths used when no CLI flag overrides them.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pdf_path: PathBuf,
    pub out_path: PathBuf,
}

impl Settings {
    /// Defaults, overridden by `SCHEDULE_PDF_PATH` / `SCHEDULE_OUT_PATH`.
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("SCHEDULE"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("pdf_path", DEFAULT_PDF_PATH)?
            .set_default("out_path", DEFAULT_OUT_PATH)?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
