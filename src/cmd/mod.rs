pub mod grade;
pub mod holistic;

use clap::Args;
use hanzi_grader::api::load_request;
use hanzi_grader::error::GradeResult;
use hanzi_grader::protocol::GradeRequest;
use std::path::PathBuf;

/// The three files that make up one grading request.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Character metadata (JSON).
    #[arg(long)]
    pub request: PathBuf,

    /// Standard segment stream (one JSON record per line).
    #[arg(long)]
    pub standard: PathBuf,

    /// Evaluate segment stream (one JSON record per line).
    #[arg(long)]
    pub evaluate: PathBuf,
}

impl RequestArgs {
    pub fn load(&self) -> GradeResult<GradeRequest> {
        load_request(&self.request, &self.standard, &self.evaluate)
    }
}
