use crate::consts::POINT_MARGIN_CANVASES;
use crate::error::{GradeError, GradeResult};
use crate::geometry::shapes::{Character, Composition, Segment, Stroke, Struction};
use crate::protocol::{GradeRequest, SegmentRecord};
use std::str::FromStr;
use tracing::debug;

/// Which rendering of the character is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Standard,
    Evaluate,
}

/// Normalizes raw segment records into the `width` x `height` canvas.
/// Segment indices follow record order.
pub fn load_segments(records: &[SegmentRecord], width: u32, height: u32) -> GradeResult<Vec<Segment>> {
    records
        .iter()
        .enumerate()
        .map(|(index, rec)| {
            let span_x = rec.end_x - rec.start_x;
            let span_y = rec.end_y - rec.start_y;
            if span_x == 0.0 || span_y == 0.0 {
                return Err(GradeError::DegenerateGeometry(format!(
                    "segment {} has a zero-extent box ({} x {})",
                    index, span_x, span_y
                )));
            }
            let points = rec
                .list
                .iter()
                .map(|p| {
                    (
                        clamp_to_margin((p.x - rec.start_x) * width as f64 / span_x, width),
                        clamp_to_margin((p.y - rec.start_y) * height as f64 / span_y, height),
                    )
                })
                .collect();
            Ok(Segment { index, points })
        })
        .collect()
}

/// Keeps a stray stylus sample within one margin of the canvas so the
/// rasterizer's integer interpolation stays small.
fn clamp_to_margin(value: f64, extent: u32) -> i32 {
    let margin = extent as f64 * POINT_MARGIN_CANVASES;
    value.clamp(-margin, extent as f64 + margin) as i32
}

/// Assembles strokes and structions for one side of a request.
///
/// The standard side maps every stroke to the segment at its own `order`
/// and requires exactly one segment per stroke definition. The evaluate side
/// uses the caller's segment lists and reliability flags. Skipped strokes
/// are dropped on both sides; struction stroke indices refer to the
/// remaining strokes.
pub fn build_character(segments: Vec<Segment>, request: &GradeRequest, side: Side) -> GradeResult<Character> {
    let info = &request.character;
    let composition = Composition::from_str(&info.composition).map_err(|_| {
        GradeError::Validation(format!("unknown composition code '{}'", info.composition))
    })?;

    if side == Side::Standard && segments.len() != request.strokes.len() {
        return Err(GradeError::StandardMismatch {
            segments: segments.len(),
            strokes: request.strokes.len(),
        });
    }

    let mut strokes = Vec::with_capacity(request.strokes.len());
    for stroke_info in request.strokes.iter().filter(|s| !s.is_skip) {
        let (picked, is_reliable) = match side {
            Side::Standard => (vec![stroke_info.order], true),
            Side::Evaluate => (stroke_info.segment_index_array.clone(), stroke_info.is_reliable),
        };
        if picked.is_empty() {
            return Err(GradeError::Validation(format!(
                "stroke {} ({}) maps no segments",
                stroke_info.order, stroke_info.name
            )));
        }
        let stroke_segments = picked
            .iter()
            .map(|&i| {
                segments.get(i).cloned().ok_or_else(|| {
                    GradeError::Validation(format!(
                        "stroke {} references segment {} of {}",
                        stroke_info.order,
                        i,
                        segments.len()
                    ))
                })
            })
            .collect::<GradeResult<Vec<_>>>()?;

        strokes.push(Stroke {
            name: stroke_info.name.clone(),
            order: stroke_info.order,
            is_valid: stroke_info.is_valid,
            is_reliable,
            segments: stroke_segments,
        });
    }

    let structions = if request.structions.is_empty() {
        Vec::new()
    } else {
        build_structions(&strokes, request)?
    };

    if composition.is_single_body() && !structions.is_empty() {
        return Err(GradeError::Validation(format!(
            "single-body character '{}' cannot carry structions",
            info.name
        )));
    }
    if !structions.is_empty() {
        check_partition(request, strokes.len())?;
    }

    debug!(
        "built {:?} '{}' ({}): {} segments, {} strokes, {} structions",
        side,
        info.name,
        composition,
        segments.len(),
        strokes.len(),
        structions.len()
    );

    Ok(Character {
        name: info.name.clone(),
        composition,
        segments,
        strokes,
        structions,
    })
}

fn build_structions(strokes: &[Stroke], request: &GradeRequest) -> GradeResult<Vec<Struction>> {
    request
        .character
        .struction_index_array
        .iter()
        .map(|&si| {
            let struction_info = request.structions.get(si).ok_or_else(|| {
                GradeError::Validation(format!(
                    "struction {} missing ({} defined)",
                    si,
                    request.structions.len()
                ))
            })?;
            let members = struction_info
                .stroke_index_array
                .iter()
                .map(|&i| {
                    strokes.get(i).cloned().ok_or_else(|| {
                        GradeError::Validation(format!(
                            "struction {} references stroke {} of {}",
                            si,
                            i,
                            strokes.len()
                        ))
                    })
                })
                .collect::<GradeResult<Vec<_>>>()?;
            Ok(Struction { strokes: members })
        })
        .collect()
}

/// Composite structions must cover every stroke exactly once.
fn check_partition(request: &GradeRequest, stroke_count: usize) -> GradeResult<()> {
    let used: Vec<usize> = request
        .character
        .struction_index_array
        .iter()
        .filter_map(|&si| request.structions.get(si))
        .flat_map(|s| s.stroke_index_array.iter().copied())
        .collect();

    if request.character.struction_index_array.len() < 2 {
        return Err(GradeError::Validation(format!(
            "composite character '{}' needs at least 2 structions",
            request.character.name
        )));
    }

    let mut sorted = used.clone();
    sorted.sort_unstable();
    if sorted != (0..stroke_count).collect::<Vec<_>>() {
        return Err(GradeError::Validation(format!(
            "structions of '{}' do not partition its {} strokes: {:?}",
            request.character.name, stroke_count, used
        )));
    }
    Ok(())
}
