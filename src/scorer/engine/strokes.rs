use super::record_signed;
use crate::consts::{codes, ANGLE_STROKES, POSITION_STROKES};
use crate::error::GradeResult;
use crate::geometry::deviation::{half_angle_difference, length_ratio, top_offset};
use crate::geometry::shapes::Stroke;
use crate::rules::{LookupArgs, Metric};
use crate::scorer::types::{LevelScore, StrokeScore};
use crate::scorer::ScoringContext;
use tracing::debug;

/// Scores standard/evaluate strokes paired by order. Returns the per-stroke
/// results and the summed deduction averaged over the standard stroke count.
pub fn score_strokes(
    ctx: &ScoringContext<'_>,
    standard: &[&Stroke],
    evaluate: &[&Stroke],
) -> GradeResult<(Vec<StrokeScore>, f64)> {
    let scores = standard
        .iter()
        .zip(evaluate.iter())
        .map(|(s, e)| score_stroke(ctx, s, e))
        .collect::<GradeResult<Vec<_>>>()?;

    let total: f64 = scores.iter().map(|s| s.level.deduction()).sum();
    let deduction = if standard.is_empty() {
        0.0
    } else {
        total / standard.len() as f64
    };
    debug!("{} stroke pairs, averaged deduction {:.4}", scores.len(), deduction);
    Ok((scores, deduction))
}

/// Position, angle and size of one stroke pair. Metrics whose whitelist
/// does not contain the stroke name are left out of the level.
pub fn score_stroke(ctx: &ScoringContext<'_>, standard: &Stroke, evaluate: &Stroke) -> GradeResult<StrokeScore> {
    let (_, height) = ctx.canvas();
    let name = standard.name.as_str();
    let args = LookupArgs::stroke(standard.order + 1, name);
    let mut level = LevelScore::default();

    let on_position = POSITION_STROKES.contains(&name);
    let on_angle = ANGLE_STROKES.contains(&name);
    if !on_position && !on_angle {
        return Ok(StrokeScore {
            order: standard.order,
            name: standard.name.clone(),
            level,
        });
    }

    let label = format!("stroke {} ({})", standard.order, name);
    let std_shape = ctx.stroke_shape(standard, &format!("standard {}", label))?;
    let eval_shape = ctx.stroke_shape(evaluate, &format!("evaluate {}", label))?;

    if on_position {
        let offset = top_offset(&std_shape, &eval_shape, height)?;
        let mut result = ctx.metric(Metric::StrokePosition).with_raw(offset);
        record_signed(ctx, &mut result, offset, codes::SHIFT_UP, codes::SHIFT_DOWN, args);
        level.insert(result);
    }

    if on_angle {
        let diff = half_angle_difference(&std_shape, &eval_shape);
        let mut result = ctx.metric(Metric::StrokeAngle).with_raw(diff);
        record_signed(ctx, &mut result, diff, codes::TILT_LEFT, codes::TILT_RIGHT, args);
        level.insert(result);

        let ratio = length_ratio(&std_shape, &eval_shape)?;
        let mut result = ctx.metric(Metric::StrokeSize).with_raw(ratio);
        if ratio < 1.0 {
            result.record(ctx.lookup(Metric::StrokeSize, 1.0 - ratio, codes::STROKE_SHORTER, args));
        } else if ratio > 1.0 {
            result.record(ctx.lookup(Metric::StrokeSize, 1.0 - 1.0 / ratio, codes::STROKE_LONGER, args));
        }
        level.insert(result);
    }

    Ok(StrokeScore {
        order: standard.order,
        name: standard.name.clone(),
        level,
    })
}
