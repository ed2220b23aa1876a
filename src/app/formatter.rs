use crate::app::cli::OutputFormat;
use anyhow::{Context, Result};
use include_vars_dir::TaskResult;

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn render(result: &TaskResult, format: OutputFormat) -> Result<String> {
        let rendered = match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(result).context("Failed to render result as JSON")?
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(result).context("Failed to render result as YAML")?
            }
        };

        Ok(rendered.trim_end().to_string())
    }
}
