use crate::error::GradeResult;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A raw pen sample in source coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

/// One captured segment: its source bounding box plus the polyline inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub start_x: f64,
    pub end_x: f64,
    pub start_y: f64,
    pub end_y: f64,
    #[serde(default)]
    pub list: Vec<RawPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CharacterInfo {
    pub name: String,
    /// Composition code: a single space for single-body characters,
    /// otherwise an Ideographic Description Character.
    #[serde(rename = "type")]
    pub composition: String,
    #[serde(default)]
    pub struction_index_array: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StructionInfo {
    pub stroke_index_array: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TypedBuilder)]
pub struct StrokeInfo {
    #[builder(setter(into))]
    pub name: String,
    pub order: usize,
    #[builder(default = true)]
    #[serde(default = "yes")]
    pub is_valid: bool,
    #[builder(default = true)]
    #[serde(default = "yes")]
    pub is_reliable: bool,
    #[builder(default = false)]
    #[serde(default)]
    pub is_skip: bool,
    pub segment_index_array: Vec<usize>,
}

fn yes() -> bool {
    true
}

/// Character metadata shared by both the standard and the evaluate side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CharacterMeta {
    pub character: CharacterInfo,
    #[serde(default)]
    pub structions: Vec<StructionInfo>,
    pub strokes: Vec<StrokeInfo>,
    #[serde(default = "yes")]
    pub is_character_right: bool,
}

/// Everything one grading call needs besides the rule table.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GradeRequest {
    pub standard: Vec<SegmentRecord>,
    pub evaluate: Vec<SegmentRecord>,
    pub character: CharacterInfo,
    #[builder(default)]
    pub structions: Vec<StructionInfo>,
    pub strokes: Vec<StrokeInfo>,
    #[builder(default = true)]
    pub is_character_right: bool,
}

impl GradeRequest {
    pub fn from_parts(
        meta: CharacterMeta,
        standard: Vec<SegmentRecord>,
        evaluate: Vec<SegmentRecord>,
    ) -> Self {
        GradeRequest::builder()
            .standard(standard)
            .evaluate(evaluate)
            .character(meta.character)
            .structions(meta.structions)
            .strokes(meta.strokes)
            .is_character_right(meta.is_character_right)
            .build()
    }
}

/// Parses line-delimited segment records, skipping blank lines.
pub fn parse_segment_lines(content: &str) -> GradeResult<Vec<SegmentRecord>> {
    let mut records = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}
