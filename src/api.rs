use crate::error::GradeResult;
use crate::protocol::{parse_segment_lines, CharacterMeta, GradeRequest};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a request from its three files: character metadata (JSON) plus
/// the standard and evaluate segment streams (one JSON record per line).
pub fn load_request<P: AsRef<Path>>(meta: P, standard: P, evaluate: P) -> GradeResult<GradeRequest> {
    let meta: CharacterMeta = serde_json::from_str(&fs::read_to_string(meta)?)?;
    let standard = parse_segment_lines(&fs::read_to_string(standard)?)?;
    let evaluate = parse_segment_lines(&fs::read_to_string(evaluate)?)?;
    debug!(
        "API: request '{}' with {} standard and {} evaluate segments",
        meta.character.name,
        standard.len(),
        evaluate.len()
    );
    Ok(GradeRequest::from_parts(meta, standard, evaluate))
}
