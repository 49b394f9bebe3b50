use super::record_signed;
use super::structions::{score_half_angle, score_position, score_scale, score_size};
use crate::consts::{codes, CHARACTER_SIZE_BAND};
use crate::error::GradeResult;
use crate::geometry::deviation::{size_ratio, tie_line_difference, Shape};
use crate::geometry::shapes::{Composition, Struction};
use crate::rules::{LookupArgs, Metric};
use crate::scorer::types::{LevelScore, MetricResult};
use crate::scorer::ScoringContext;
use tracing::debug;

/// How the character angle is judged for each composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AngleRule {
    /// Half-angle of the whole character.
    WholeShape,
    /// Two components; falls back to their tie-line when the component
    /// angles do not agree.
    Pair,
    /// Three components in a row or column.
    Triple,
    /// The outer frame (component 0) decides.
    Frame,
    /// Two components, no tie-line fallback.
    Interlocked,
}

impl From<Composition> for AngleRule {
    fn from(c: Composition) -> Self {
        use Composition::*;
        match c {
            SingleBody => AngleRule::WholeShape,
            LeftRight | TopBottom => AngleRule::Pair,
            LeftMiddleRight | TopMiddleBottom => AngleRule::Triple,
            FullSurround | SurroundFromAbove | SurroundFromBelow | SurroundFromLeft => AngleRule::Frame,
            SurroundFromUpperLeft | SurroundFromUpperRight | SurroundFromLowerLeft | Overlaid => {
                AngleRule::Interlocked
            }
        }
    }
}

/// Scores the whole character. `struction_angles` holds each struction's
/// angle code and raw half-angle difference, in struction order.
pub fn score_character(ctx: &ScoringContext<'_>, struction_angles: &[(u8, f64)]) -> GradeResult<LevelScore> {
    let std_shape = ctx.character_shape(&ctx.standard, "standard character")?;
    let eval_shape = ctx.character_shape(&ctx.evaluate, "evaluate character")?;

    let mut level = LevelScore::default();
    level.insert(score_position(ctx, Metric::CharacterPosition, &std_shape, &eval_shape)?);
    let ratio = size_ratio(&std_shape, &eval_shape);
    level.insert(score_size(ctx, Metric::CharacterSize, ratio, CHARACTER_SIZE_BAND)?);
    level.insert(score_scale(ctx, Metric::CharacterScale, ratio));

    let rule = AngleRule::from(ctx.standard.composition);
    let angle = match rule {
        AngleRule::WholeShape => score_half_angle(ctx, Metric::CharacterAngle, &std_shape, &eval_shape),
        _ if ctx.evaluate.structions.is_empty() => ctx.metric(Metric::CharacterAngle),
        AngleRule::Pair => pair_angle(ctx, struction_angles, true)?,
        AngleRule::Interlocked => pair_angle(ctx, struction_angles, false)?,
        AngleRule::Triple => triple_angle(ctx, struction_angles)?,
        AngleRule::Frame => frame_angle(ctx, struction_angles),
    };
    debug!(
        "character angle via {:?}: code {}, raw {:.4}",
        rule,
        angle.code(),
        angle.raw_value
    );
    level.insert(angle);
    Ok(level)
}

/// Raw struction angle with the smallest magnitude; ties keep the first.
fn gentlest(struction_angles: &[(u8, f64)]) -> Option<f64> {
    struction_angles
        .iter()
        .map(|&(_, v)| v)
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
}

fn record_bucket(ctx: &ScoringContext<'_>, value: f64, code: u8) -> MetricResult {
    let mut result = ctx.metric(Metric::CharacterAngle).with_raw(value);
    result.record(ctx.lookup(Metric::CharacterAngle, value, code, LookupArgs::default()));
    result
}

fn struction_shapes(ctx: &ScoringContext<'_>, structions: &[Struction], side: &str) -> GradeResult<Vec<Shape>> {
    structions
        .iter()
        .enumerate()
        .map(|(i, s)| ctx.struction_shape(s, &format!("{} struction {}", side, i)))
        .collect()
}

/// Component shapes for both sides, or `None` when either side has fewer
/// than `needed`.
fn paired_shapes(ctx: &ScoringContext<'_>, needed: usize) -> GradeResult<Option<(Vec<Shape>, Vec<Shape>)>> {
    if ctx.standard.structions.len() < needed || ctx.evaluate.structions.len() < needed {
        return Ok(None);
    }
    let standard = struction_shapes(ctx, &ctx.standard.structions[..needed], "standard")?;
    let evaluate = struction_shapes(ctx, &ctx.evaluate.structions[..needed], "evaluate")?;
    Ok(Some((standard, evaluate)))
}

fn pair_angle(ctx: &ScoringContext<'_>, struction_angles: &[(u8, f64)], tie_line_fallback: bool) -> GradeResult<MetricResult> {
    let Some((&(first, _), &(second, _))) = struction_angles.first().zip(struction_angles.get(1)) else {
        return Ok(ctx.metric(Metric::CharacterAngle));
    };

    let bucket = match (first, second) {
        (codes::TILT_LEFT, codes::TILT_LEFT) => Some(codes::TILT_LEFT),
        (codes::TILT_RIGHT, codes::TILT_RIGHT) => Some(codes::TILT_RIGHT),
        (codes::TILT_LEFT, codes::TILT_RIGHT) | (codes::TILT_RIGHT, codes::TILT_LEFT) => Some(codes::TILT_MIXED),
        _ => None,
    };
    if let (Some(code), Some(value)) = (bucket, gentlest(struction_angles)) {
        return Ok(record_bucket(ctx, value, code));
    }
    if !tie_line_fallback {
        return Ok(ctx.metric(Metric::CharacterAngle));
    }

    let Some((s, e)) = paired_shapes(ctx, 2)? else {
        return Ok(ctx.metric(Metric::CharacterAngle));
    };
    let diff = tie_line_difference((&s[0], &s[1]), (&e[0], &e[1]));
    let mut result = ctx.metric(Metric::CharacterAngle).with_raw(diff);
    record_signed(ctx, &mut result, diff, codes::TILT_LEFT, codes::TILT_RIGHT, LookupArgs::default());
    Ok(result)
}

fn triple_angle(ctx: &ScoringContext<'_>, struction_angles: &[(u8, f64)]) -> GradeResult<MetricResult> {
    if struction_angles.is_empty() {
        return Ok(ctx.metric(Metric::CharacterAngle));
    }
    let left = struction_angles.iter().filter(|(c, _)| *c == codes::TILT_LEFT).count();
    let right = struction_angles.iter().filter(|(c, _)| *c == codes::TILT_RIGHT).count();
    let bucket = if left >= 2 && right == 0 {
        Some(codes::TILT_LEFT)
    } else if right >= 2 && left == 0 {
        Some(codes::TILT_RIGHT)
    } else if left >= 1 && right >= 1 {
        Some(codes::TILT_MIXED)
    } else {
        None
    };
    if let (Some(code), Some(value)) = (bucket, gentlest(struction_angles)) {
        return Ok(record_bucket(ctx, value, code));
    }

    let Some((s, e)) = paired_shapes(ctx, 3)? else {
        return Ok(ctx.metric(Metric::CharacterAngle));
    };
    let d01 = tie_line_difference((&s[0], &s[1]), (&e[0], &e[1]));
    let d12 = tie_line_difference((&s[1], &s[2]), (&e[1], &e[2]));
    let smaller = if d12.abs() < d01.abs() { d12 } else { d01 };

    if d01 == 0.0 && d12 == 0.0 {
        Ok(ctx.metric(Metric::CharacterAngle))
    } else if d01 <= 0.0 && d12 <= 0.0 {
        Ok(record_bucket(ctx, smaller, codes::TILT_LEFT))
    } else if d01 >= 0.0 && d12 >= 0.0 {
        Ok(record_bucket(ctx, smaller, codes::TILT_RIGHT))
    } else if (d01 >= 0.0 && d12 <= 0.0) || (d01 <= 0.0 && d12 >= 0.0) {
        Ok(record_bucket(ctx, smaller, codes::TILT_MIXED))
    } else {
        // Only reachable with NaN tie-lines; each line is scored on its own.
        let args = LookupArgs::default();
        let mut result = ctx.metric(Metric::CharacterAngle).with_raw(d01);
        record_signed(ctx, &mut result, d01, codes::TILT_LEFT, codes::TILT_RIGHT, args);
        record_signed(ctx, &mut result, d12, codes::TILT_LEFT, codes::TILT_RIGHT, args);
        Ok(result)
    }
}

fn frame_angle(ctx: &ScoringContext<'_>, struction_angles: &[(u8, f64)]) -> MetricResult {
    match struction_angles.first() {
        Some(&(code, value)) if code == codes::TILT_LEFT || code == codes::TILT_RIGHT => {
            record_bucket(ctx, value, code)
        }
        _ => ctx.metric(Metric::CharacterAngle),
    }
}
