pub mod json;
pub mod md;

use crate::error::ReputeError;
use crate::types::report::{LedgerStatus, ScoreReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_score(report: &ScoreReport, format: OutputFormat) -> Result<String, ReputeError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(ReputeError::Json),
        OutputFormat::Md => Ok(md::score_markdown(report)),
    }
}

pub fn render_status(status: &LedgerStatus, format: OutputFormat) -> Result<String, ReputeError> {
    match format {
        OutputFormat::Json => json::to_json(status).map_err(ReputeError::Json),
        OutputFormat::Md => Ok(md::status_markdown(status)),
    }
}
