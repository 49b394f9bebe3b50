#![allow(dead_code)]

use hanzi_grader::api::load_request;
use hanzi_grader::protocol::{CharacterInfo, GradeRequest, RawPoint, SegmentRecord, StrokeInfo, StructionInfo};
use hanzi_grader::rules::RuleTable;
use hanzi_grader::Grader;
use std::path::PathBuf;

pub fn data_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(rel)
}

pub fn rule_table() -> RuleTable {
    RuleTable::load_from_file(data_path("rules/default.json")).expect("default rule table must load")
}

pub fn grader() -> Grader {
    Grader::new(rule_table())
}

/// One of the bundled sample requests, e.g. `sample("shi")`.
pub fn sample(name: &str) -> GradeRequest {
    load_request(
        data_path(&format!("samples/{}.json", name)),
        data_path(&format!("samples/{}_standard.jsonl", name)),
        data_path(&format!("samples/{}_evaluate.jsonl", name)),
    )
    .expect("sample request must load")
}

/// A straight pen-down sampled at 9 points, in a 256x256 source box so
/// coordinates map one-to-one onto the default canvas.
pub fn line(from: (f64, f64), to: (f64, f64)) -> SegmentRecord {
    let list = (0..9)
        .map(|i| {
            let t = i as f64 / 8.0;
            RawPoint {
                x: from.0 + (to.0 - from.0) * t,
                y: from.1 + (to.1 - from.1) * t,
            }
        })
        .collect();
    SegmentRecord {
        start_x: 0.0,
        end_x: 256.0,
        start_y: 0.0,
        end_y: 256.0,
        list,
    }
}

/// Moves the points, not the source box.
pub fn shifted(rec: &SegmentRecord, dx: f64, dy: f64) -> SegmentRecord {
    let mut out = rec.clone();
    for p in &mut out.list {
        p.x += dx;
        p.y += dy;
    }
    out
}

/// 十: a horizontal then a vertical stroke.
pub fn shi_lines() -> Vec<SegmentRecord> {
    vec![line((56.0, 120.0), (200.0, 120.0)), line((128.0, 40.0), (128.0, 220.0))]
}

/// 川: a falling stroke and two verticals.
pub fn chuan_lines() -> Vec<SegmentRecord> {
    vec![
        line((78.0, 50.0), (62.0, 200.0)),
        line((128.0, 56.0), (128.0, 190.0)),
        line((190.0, 40.0), (190.0, 220.0)),
    ]
}

/// Builder for grading requests; standard and evaluate start out identical
/// with stroke `i` mapped to segment `i`.
pub struct RequestBuilder {
    request: GradeRequest,
}

impl RequestBuilder {
    pub fn new(name: &str, composition: &str, strokes: &[&str], segments: Vec<SegmentRecord>) -> Self {
        let strokes = strokes
            .iter()
            .enumerate()
            .map(|(i, n)| StrokeInfo::builder().name(*n).order(i).segment_index_array(vec![i]).build())
            .collect();
        Self {
            request: GradeRequest::builder()
                .standard(segments.clone())
                .evaluate(segments)
                .character(CharacterInfo {
                    name: name.to_string(),
                    composition: composition.to_string(),
                    struction_index_array: Vec::new(),
                })
                .strokes(strokes)
                .build(),
        }
    }

    pub fn shi() -> Self {
        Self::new("十", " ", &["横", "竖"], shi_lines())
    }

    pub fn chuan() -> Self {
        Self::new("川", "⿲", &["撇", "竖", "竖"], chuan_lines()).structions(&[&[0], &[1], &[2]])
    }

    pub fn structions(mut self, groups: &[&[usize]]) -> Self {
        self.request.structions = groups
            .iter()
            .map(|g| StructionInfo {
                stroke_index_array: g.to_vec(),
            })
            .collect();
        self.request.character.struction_index_array = (0..groups.len()).collect();
        self
    }

    pub fn composition(mut self, code: &str) -> Self {
        self.request.character.composition = code.to_string();
        self
    }

    pub fn evaluate(mut self, segments: Vec<SegmentRecord>) -> Self {
        self.request.evaluate = segments;
        self
    }

    pub fn standard(mut self, segments: Vec<SegmentRecord>) -> Self {
        self.request.standard = segments;
        self
    }

    pub fn mapping(mut self, order: usize, segments: Vec<usize>) -> Self {
        self.request.strokes[order].segment_index_array = segments;
        self
    }

    pub fn skip(mut self, order: usize) -> Self {
        self.request.strokes[order].is_skip = true;
        self
    }

    pub fn unreliable(mut self, order: usize) -> Self {
        self.request.strokes[order].is_reliable = false;
        self
    }

    pub fn wrong_character(mut self) -> Self {
        self.request.is_character_right = false;
        self
    }

    pub fn build(self) -> GradeRequest {
        self.request
    }
}

pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
