use crate::consts::codes;
use crate::protocol::StrokeInfo;
use crate::rules::{Deduction, Lookup, LookupArgs, Metric};
use crate::scorer::types::{LevelScore, MetricResult};
use crate::scorer::ScoringContext;
use tracing::debug;

/// Stroke count, stroke order and character correctness.
pub fn score_base(ctx: &ScoringContext<'_>) -> LevelScore {
    let diff = stroke_count_diff(ctx);
    let mut level = LevelScore::default();
    level.insert(score_count(ctx, diff));
    level.insert(score_order(ctx, diff));
    level.insert(score_correctness(ctx));
    debug!("base checks: count diff {}, deduction {:.4}", diff, level.deduction());
    level
}

/// Evaluate segment count minus standard segment count.
pub fn stroke_count_diff(ctx: &ScoringContext<'_>) -> i64 {
    ctx.request.evaluate.len() as i64 - ctx.request.standard.len() as i64
}

fn score_count(ctx: &ScoringContext<'_>, diff: i64) -> MetricResult {
    let mut result = ctx.metric(Metric::StrokeCount).with_raw(diff as f64);
    let code = match diff.signum() {
        1 => codes::TOO_MANY,
        -1 => codes::TOO_FEW,
        _ => return result,
    };
    let args = LookupArgs::count(diff.unsigned_abs() as usize);
    result.record(ctx.lookup(Metric::StrokeCount, 1.0, code, args));
    result
}

fn score_order(ctx: &ScoringContext<'_>, diff: i64) -> MetricResult {
    let mut result = ctx.metric(Metric::StrokeOrder);
    if diff != 0 {
        // A different stroke count leaves order undefined.
        result.record(Lookup::Deviation(Deduction {
            amount: result.full_score,
            comment: String::new(),
            code: codes::FLAGGED,
            sounds: Vec::new(),
        }));
        return result;
    }

    if let Some(flagged) = first_out_of_order(&ctx.request.strokes) {
        let info = ctx.request.strokes.get(flagged.order).unwrap_or(flagged);
        let args = LookupArgs::stroke(flagged.order + 1, &info.name);
        result.record(ctx.lookup(Metric::StrokeOrder, 1.0, codes::FLAGGED, args));
        result.raw_value = flagged.order as f64;
    }
    result
}

/// First stroke whose order differs from its first mapped segment. A
/// skipped stroke ends the scan as correct.
pub fn first_out_of_order(strokes: &[StrokeInfo]) -> Option<&StrokeInfo> {
    for info in strokes {
        if info.is_skip {
            return None;
        }
        match info.segment_index_array.first() {
            Some(&first) if first != info.order => return Some(info),
            _ => continue,
        }
    }
    None
}

fn score_correctness(ctx: &ScoringContext<'_>) -> MetricResult {
    let mut result = ctx.metric(Metric::IncorrectCharacter);
    if !ctx.request.is_character_right {
        result.record(ctx.lookup(Metric::IncorrectCharacter, 1.0, codes::FLAGGED, LookupArgs::default()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(order: usize, segments: Vec<usize>, is_skip: bool) -> StrokeInfo {
        StrokeInfo::builder()
            .name("横")
            .order(order)
            .is_skip(is_skip)
            .segment_index_array(segments)
            .build()
    }

    #[test]
    fn test_order_scan_flags_first_mismatch() {
        let strokes = vec![info(0, vec![0], false), info(1, vec![2], false), info(2, vec![1], false)];
        assert_eq!(first_out_of_order(&strokes).map(|s| s.order), Some(1));
    }

    #[test]
    fn test_skip_short_circuits_order_scan() {
        let strokes = vec![info(0, vec![0], false), info(1, vec![1], true), info(2, vec![0], false)];
        assert!(first_out_of_order(&strokes).is_none());
    }

    #[test]
    fn test_stroke_without_segments_is_passed_over() {
        let strokes = vec![info(0, vec![], false), info(1, vec![1], false)];
        assert!(first_out_of_order(&strokes).is_none());
    }
}
