use super::record_signed;
use crate::consts::{codes, SCALE_BAND, STRUCTION_SIZE_BAND};
use crate::error::{GradeError, GradeResult};
use crate::geometry::deviation::{
    diagonal_position_deviation, half_angle_difference, position_deviation, size_ratio, Shape, SizeRatio,
};
use crate::rules::{LookupArgs, Metric};
use crate::scorer::types::{LevelScore, MetricResult, StructionScore};
use crate::scorer::ScoringContext;
use tracing::debug;

/// Per-struction results plus the values the character level and the
/// report need from them.
#[derive(Debug, Clone)]
pub struct StructionSummary {
    pub scores: Vec<StructionScore>,
    /// Summed deduction averaged over the standard struction count.
    pub deduction: f64,
    /// Index of the first struction with the largest deduction.
    pub worst: Option<usize>,
}

pub fn score_structions(ctx: &ScoringContext<'_>) -> GradeResult<StructionSummary> {
    let scores = ctx
        .standard
        .structions
        .iter()
        .zip(ctx.evaluate.structions.iter())
        .enumerate()
        .map(|(index, (s, e))| {
            let std_shape = ctx.struction_shape(s, &format!("standard struction {}", index))?;
            let eval_shape = ctx.struction_shape(e, &format!("evaluate struction {}", index))?;
            let mut level = LevelScore::default();
            level.insert(score_position(ctx, Metric::StructionPosition, &std_shape, &eval_shape)?);
            let ratio = size_ratio(&std_shape, &eval_shape);
            level.insert(score_size(ctx, Metric::StructionSize, ratio, STRUCTION_SIZE_BAND)?);
            level.insert(score_scale(ctx, Metric::StructionScale, ratio));
            level.insert(score_half_angle(ctx, Metric::StructionAngle, &std_shape, &eval_shape));
            Ok(StructionScore {
                index,
                segment_indices: e.segment_indices(),
                level,
            })
        })
        .collect::<GradeResult<Vec<_>>>()?;

    let deductions: Vec<f64> = scores.iter().map(|s| s.level.deduction()).collect();
    let standard_count = ctx.standard.structions.len();
    let deduction = if standard_count == 0 {
        0.0
    } else {
        deductions.iter().sum::<f64>() / standard_count as f64
    };

    let mut worst: Option<usize> = None;
    for (i, d) in deductions.iter().enumerate() {
        if worst.map_or(true, |w| *d > deductions[w]) {
            worst = Some(i);
        }
    }
    debug!(
        "struction deductions {:?}, averaged {:.4}, worst {:?}",
        deductions, deduction, worst
    );

    Ok(StructionSummary {
        scores,
        deduction,
        worst,
    })
}

/// Two-pass position check shared by the struction and character levels.
/// The 45 degree pass runs first; the axis-aligned pass only runs when the
/// rotated one recorded nothing.
pub(crate) fn score_position(
    ctx: &ScoringContext<'_>,
    metric: Metric,
    standard: &Shape,
    evaluate: &Shape,
) -> GradeResult<MetricResult> {
    let (width, height) = ctx.canvas();
    let args = LookupArgs::default();
    let mut result = ctx.metric(metric);

    let rot = diagonal_position_deviation(standard, evaluate, width, height)?;
    let mut recorded = record_signed(ctx, &mut result, rot.dx, codes::DIAG_X_NEG, codes::DIAG_X_POS, args);
    recorded |= record_signed(ctx, &mut result, rot.dy, codes::DIAG_Y_NEG, codes::DIAG_Y_POS, args);
    if recorded {
        return Ok(result.with_raw(rot.dx));
    }

    let axis = position_deviation(standard, evaluate, width, height)?;
    record_signed(ctx, &mut result, axis.dx, codes::SHIFT_LEFT, codes::SHIFT_RIGHT, args);
    record_signed(ctx, &mut result, axis.dy, codes::SHIFT_UP, codes::SHIFT_DOWN, args);
    Ok(result.with_raw(axis.dx))
}

/// Uniform over- or under-sizing: both axes outside `band` on the same side.
pub(crate) fn score_size(
    ctx: &ScoringContext<'_>,
    metric: Metric,
    ratio: SizeRatio,
    band: (f64, f64),
) -> GradeResult<MetricResult> {
    let area = ratio.area();
    if area == 0.0 {
        return Err(GradeError::DegenerateGeometry(format!(
            "{} ratio {}x{} has zero area",
            metric, ratio.width, ratio.height
        )));
    }
    let (lo, hi) = band;
    let args = LookupArgs::default();
    let mut result = ctx.metric(metric).with_raw(area);
    if ratio.width < lo && ratio.height < lo {
        result.record(ctx.lookup(metric, 1.0 - area.min(1.0), codes::TOO_SMALL, args));
    } else if ratio.width > hi && ratio.height > hi {
        result.record(ctx.lookup(metric, 1.0 - (1.0 / area).min(1.0), codes::TOO_LARGE, args));
    }
    Ok(result)
}

/// Aspect skew: one axis matches and the other does not, or the two axes
/// move in opposite directions.
pub(crate) fn score_scale(ctx: &ScoringContext<'_>, metric: Metric, ratio: SizeRatio) -> MetricResult {
    let (lo, hi) = SCALE_BAND;
    let in_band = |r: f64| r > lo && r <= hi;
    let (w, h) = (ratio.width, ratio.height);
    let bucket = if in_band(w) && h > hi {
        Some((codes::TALL, 1.0 - (1.0 / h).min(1.0)))
    } else if in_band(h) && w > hi {
        Some((codes::WIDE, 1.0 - (1.0 / w).min(1.0)))
    } else if in_band(h) && w < lo {
        Some((codes::NARROW, 1.0 - w.min(1.0)))
    } else if in_band(w) && h < lo {
        Some((codes::SHORT, 1.0 - h.min(1.0)))
    } else if w < lo && h > hi {
        Some((codes::NARROW_TALL, 1.0 - (w / h).min(1.0)))
    } else if h < lo && w > hi {
        Some((codes::WIDE_SHORT, 1.0 - (h / w).min(1.0)))
    } else {
        None
    };

    let mut result = ctx.metric(metric);
    if let Some((code, magnitude)) = bucket {
        result.record(ctx.lookup(metric, magnitude, code, LookupArgs::default()));
        result.raw_value = magnitude;
    }
    result
}

/// Signed half-angle difference; the raw value is kept even when it is
/// within tolerance because the character level reads it back.
pub(crate) fn score_half_angle(
    ctx: &ScoringContext<'_>,
    metric: Metric,
    standard: &Shape,
    evaluate: &Shape,
) -> MetricResult {
    let diff = half_angle_difference(standard, evaluate);
    let mut result = ctx.metric(metric).with_raw(diff);
    record_signed(ctx, &mut result, diff, codes::TILT_LEFT, codes::TILT_RIGHT, LookupArgs::default());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::engine::fixtures::bars;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 1.3, 1, 0.1)]
    #[case(1.05, 1.15, 1, 0.04)]
    #[case(1.0, 0.85, 2, 0.04)]
    #[case(1.3, 1.0, 3, 0.1)]
    #[case(0.7, 1.0, 8, 0.1)]
    #[case(0.7, 1.3, 9, 0.1)]
    #[case(1.3, 0.85, 10, 0.1)]
    #[case(1.0, 1.0, 0, 0.0)]
    #[case(0.7, 0.7, 0, 0.0)]
    #[case(1.3, 1.3, 0, 0.0)]
    fn test_scale_buckets(#[case] width: f64, #[case] height: f64, #[case] code: u8, #[case] amount: f64) {
        let fixture = bars("⿰", 2);
        let result = score_scale(&fixture.context(), Metric::StructionScale, SizeRatio { width, height });
        assert_eq!(result.code(), code, "{}x{}", width, height);
        assert!((result.amount() - amount).abs() < 1e-12, "amount {}", result.amount());
    }

    #[rstest]
    #[case(0.7, 0.7, 1, 0.1)]
    #[case(0.75, 0.9, 0, 0.0)]
    #[case(1.3, 1.3, 2, 0.1)]
    #[case(1.25, 1.1, 0, 0.0)]
    #[case(0.7, 1.3, 0, 0.0)]
    fn test_size_needs_both_axes_outside_the_band(
        #[case] width: f64,
        #[case] height: f64,
        #[case] code: u8,
        #[case] amount: f64,
    ) {
        let fixture = bars("⿰", 2);
        let ratio = SizeRatio { width, height };
        let result = score_size(&fixture.context(), Metric::StructionSize, ratio, STRUCTION_SIZE_BAND).unwrap();
        assert_eq!(result.code(), code, "{}x{}", width, height);
        assert!((result.amount() - amount).abs() < 1e-12, "amount {}", result.amount());
    }

    #[test]
    fn test_zero_area_ratio_is_degenerate() {
        let fixture = bars("⿰", 2);
        let ratio = SizeRatio { width: 0.0, height: 1.0 };
        let err = score_size(&fixture.context(), Metric::StructionSize, ratio, STRUCTION_SIZE_BAND).unwrap_err();
        assert!(matches!(err, GradeError::DegenerateGeometry(_)));
    }
}
