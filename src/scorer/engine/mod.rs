pub mod base;
pub mod character;
pub mod strokes;
pub mod structions;

use super::types::{LevelBreakdown, MetricResult, ScoringMode};
use super::ScoringContext;
use crate::error::GradeResult;
use crate::rules::{LookupArgs, Metric};
use tracing::debug;

/// Records a signed deviation into `result`, choosing `neg_code` or
/// `pos_code` by sign. Zero records nothing.
pub(crate) fn record_signed(
    ctx: &ScoringContext<'_>,
    result: &mut MetricResult,
    value: f64,
    neg_code: u8,
    pos_code: u8,
    args: LookupArgs<'_>,
) -> bool {
    if value < 0.0 {
        result.record(ctx.lookup(result.metric, value, neg_code, args))
    } else if value > 0.0 {
        result.record(ctx.lookup(result.metric, value, pos_code, args))
    } else {
        false
    }
}

/// Runs every level scorer bottom-up and picks the final formula.
pub fn score_levels(ctx: &ScoringContext<'_>) -> GradeResult<LevelBreakdown> {
    let composite = !ctx.standard.composition.is_single_body();
    let component_mode = composite && ctx.settings.is_struction;

    let standard_strokes = ctx.standard.strokes_by_order();
    let evaluate_strokes = ctx.evaluate.strokes_by_order();

    let (mode, strokes, stroke_deduction, structions, struction_deduction, worst) = if !component_mode {
        let (strokes, deduction) = strokes::score_strokes(ctx, &standard_strokes, &evaluate_strokes)?;
        (ScoringMode::StrokeLevel, strokes, deduction, Vec::new(), 0.0, None)
    } else if ctx.evaluate.structions.is_empty() {
        (ScoringMode::CharacterOnly, Vec::new(), 0.0, Vec::new(), 0.0, None)
    } else {
        let (strokes, stroke_deduction) = strokes::score_strokes(ctx, &standard_strokes, &evaluate_strokes)?;
        let summary = structions::score_structions(ctx)?;
        (
            ScoringMode::ComponentLevel,
            strokes,
            stroke_deduction,
            summary.scores,
            summary.deduction,
            summary.worst,
        )
    };
    debug!("scoring mode {:?} for '{}'", mode, ctx.standard.name);

    let struction_angles: Vec<(u8, f64)> = structions
        .iter()
        .map(|s| {
            (
                s.level.code(Metric::StructionAngle),
                s.level.raw_value(Metric::StructionAngle),
            )
        })
        .collect();

    let character = character::score_character(ctx, &struction_angles)?;
    let base = base::score_base(ctx);

    let character_deduction = character.deduction();
    let base_deduction = base.deduction();
    debug!(
        "deductions: character {:.4}, structions {:.4}, strokes {:.4}, base {:.4}",
        character_deduction, struction_deduction, stroke_deduction, base_deduction
    );

    Ok(LevelBreakdown {
        mode,
        character,
        structions,
        strokes,
        base,
        character_deduction,
        struction_deduction,
        stroke_deduction,
        base_deduction,
        worst_struction: worst,
    })
}

impl LevelBreakdown {
    /// Final score on a 0-100 scale. Deliberately unclamped.
    pub fn total(&self) -> f64 {
        match self.mode {
            ScoringMode::StrokeLevel => {
                100.0 * (1.0 - self.character_deduction - self.stroke_deduction - self.base_deduction)
            }
            ScoringMode::ComponentLevel => {
                100.0
                    * (1.0
                        - self.character_deduction
                        - self.struction_deduction
                        - self.stroke_deduction
                        - self.base_deduction)
            }
            ScoringMode::CharacterOnly => {
                100.0 * (1.0 - 2.0 * (self.character_deduction + self.base_deduction))
            }
        }
    }
}
