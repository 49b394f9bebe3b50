use super::engine::base::stroke_count_diff;
use super::types::{LevelBreakdown, LevelScore, StrokeScore};
use super::ScoringContext;
use crate::config::HighlightMode;
use crate::consts::{
    COMMENT_SEPARATOR, CORRECT_TEXT, ERROR_NONE, ERROR_STROKE_COUNT, ERROR_STROKE_ORDER, ERROR_WRONG_CHARACTER,
    SPEED_SCORE,
};
use crate::error::GradeResult;
use crate::rules::Metric;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The flat diagnostic record consumed by existing clients. Field names
/// are fixed by the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyReport {
    #[serde(rename = "centerOfGravityType")]
    pub center_of_gravity_type: i32,
    #[serde(rename = "centerOfGravityScore")]
    pub center_of_gravity_score: i32,
    pub error: i32,
    #[serde(rename = "fontSize")]
    pub font_size: i32,
    #[serde(rename = "fontSizeScore")]
    pub font_size_score: i32,
    #[serde(rename = "fountScore")]
    pub fount_score: i32,
    #[serde(rename = "fountType")]
    pub fount_type: i32,
    pub score: i32,
    #[serde(rename = "spacingStructure")]
    pub spacing_structure: String,
    #[serde(rename = "spacingStructureScore")]
    pub spacing_structure_score: i32,
    pub status: bool,
    #[serde(rename = "strokeCount")]
    pub stroke_count: String,
    #[serde(rename = "strokeCountDiff")]
    pub stroke_count_diff: i64,
    #[serde(rename = "strokeCountScore")]
    pub stroke_count_score: i32,
    #[serde(rename = "strokeLength")]
    pub stroke_length: String,
    #[serde(rename = "strokeLengthScore")]
    pub stroke_length_score: i32,
    #[serde(rename = "strokeOrder")]
    pub stroke_order: String,
    #[serde(rename = "strokeOrderScore")]
    pub stroke_order_score: i32,
    #[serde(rename = "z100speedScore")]
    pub speed_score: i32,
    #[serde(rename = "z102struction")]
    pub struction: String,
    #[serde(rename = "z101structionScore")]
    pub struction_score: i32,
    #[serde(rename = "z103strokeCountSound")]
    pub stroke_count_sound: Vec<String>,
    #[serde(rename = "z104strokeOrderSound")]
    pub stroke_order_sound: Vec<String>,
    #[serde(rename = "z105spacingStructureSound")]
    pub spacing_structure_sound: Vec<String>,
    #[serde(rename = "z106strokeLengthSound")]
    pub stroke_length_sound: Vec<String>,
    #[serde(rename = "z107structionSound")]
    pub struction_sound: Vec<String>,
    #[serde(rename = "z108incorrectCharacterSound")]
    pub incorrect_character_sound: Vec<String>,
}

/// Result of one deviation-engine grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    /// Unclamped final score, 0-100 for well-formed input.
    pub score: f64,
    pub report: LegacyReport,
    /// Indices the UI paints red; meaning depends on the highlight mode.
    pub highlight: Vec<usize>,
    pub breakdown: LevelBreakdown,
}

fn or_correct(text: String) -> String {
    if text.is_empty() {
        CORRECT_TEXT.to_string()
    } else {
        text
    }
}

fn join_comments<'a>(comments: impl IntoIterator<Item = &'a str>) -> String {
    comments.into_iter().filter(|c| !c.is_empty()).join(COMMENT_SEPARATOR)
}

/// Un-truncated percentage, used where the report averages before truncating.
fn exact_percent(level: &LevelScore, metric: Metric, full_score: f64) -> f64 {
    exact_percent_of(full_score, level.get(metric).map_or(0.0, |r| r.amount()))
}

fn center_of_gravity_type(code: u8) -> i32 {
    match code {
        6 => 7,
        7 => 6,
        c @ 1..=8 => c as i32,
        _ => 0,
    }
}

fn font_size_type(size_code: u8, scale_code: u8) -> i32 {
    let mut font_size = match size_code {
        1 | 2 => size_code as i32,
        _ => 0,
    };
    if scale_code > 0 {
        font_size = scale_code as i32 + 10;
    }
    match font_size {
        11 => 3,
        12 => 4,
        other => other,
    }
}

fn fount_type(angle_code: u8) -> i32 {
    match angle_code {
        1 => 1,
        2 => 3,
        3 => 2,
        _ => 0,
    }
}

/// Stroke-length diagnosis: the `top` lowest length scores below 100,
/// worst first, with their indices in the order-sorted stroke list.
struct LengthDiagnosis {
    text: String,
    sounds: Vec<String>,
    indices: Vec<usize>,
    score: i32,
}

fn diagnose_length(ctx: &ScoringContext<'_>, strokes: &[StrokeScore]) -> LengthDiagnosis {
    let full = ctx.rules.full_score(Metric::StrokeSize);
    let scores: Vec<f64> = strokes
        .iter()
        .map(|s| exact_percent(&s.level, Metric::StrokeSize, full))
        .collect();

    let flagged: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s < 100.0)
        .sorted_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .take(ctx.settings.top_strokes_count)
        .collect();

    let size_of = |i: usize| strokes[i].level.get(Metric::StrokeSize);
    let text = join_comments(flagged.iter().filter_map(|&i| size_of(i)).map(|r| r.comment()));
    let sounds = flagged
        .iter()
        .filter_map(|&i| size_of(i))
        .flat_map(|r| r.sounds().iter().cloned())
        .collect();
    let score = if scores.is_empty() {
        100
    } else {
        (scores.iter().sum::<f64>() / scores.len() as f64) as i32
    };

    LengthDiagnosis {
        text,
        sounds,
        indices: flagged,
        score,
    }
}

/// Projects a level breakdown into the legacy report and picks the
/// highlight set.
pub fn assemble(ctx: &ScoringContext<'_>, breakdown: LevelBreakdown) -> GradeResult<GradeOutcome> {
    let rules = ctx.rules;
    let character = &breakdown.character;
    let base = &breakdown.base;
    let score = breakdown.total();

    // Centre of gravity, size and tilt.
    let center_of_gravity_type = center_of_gravity_type(character.code(Metric::CharacterPosition));
    let center_of_gravity_score = character.sub_score(Metric::CharacterPosition);
    let font_size = font_size_type(
        character.code(Metric::CharacterSize),
        character.code(Metric::CharacterScale),
    );
    let font_size_score = exact_percent(character, Metric::CharacterSize, rules.full_score(Metric::CharacterSize))
        .min(exact_percent(character, Metric::CharacterScale, rules.full_score(Metric::CharacterScale)))
        as i32;
    let fount_type = fount_type(character.code(Metric::CharacterAngle));
    let fount_score = character.sub_score(Metric::CharacterAngle);

    // Base checks.
    let count = base.get(Metric::StrokeCount);
    let stroke_count = count.map(|r| r.comment().to_string()).unwrap_or_default();
    let stroke_count_sound = count.map(|r| r.sounds().to_vec()).unwrap_or_default();
    let stroke_count_diff = stroke_count_diff(ctx);
    let stroke_count_score = base.sub_score(Metric::StrokeCount);

    let order = base.get(Metric::StrokeOrder);
    let stroke_order = order.map(|r| r.comment().to_string()).unwrap_or_default();
    let stroke_order_sound = order.map(|r| r.sounds().to_vec()).unwrap_or_default();
    let stroke_order_score = base.sub_score(Metric::StrokeOrder);

    let length = diagnose_length(ctx, &breakdown.strokes);

    // Stroke position and angle, metric-major.
    let layout_metrics = [Metric::StrokePosition, Metric::StrokeAngle];
    let layout_results = layout_metrics
        .iter()
        .flat_map(|&m| breakdown.strokes.iter().map(move |s| (m, s.level.get(m))))
        .collect::<Vec<_>>();
    let layout_scores: Vec<f64> = layout_results
        .iter()
        .map(|(m, r)| match r {
            Some(r) => exact_percent_of(r.full_score, r.amount()),
            None => exact_percent_of(rules.full_score(*m), 0.0),
        })
        .collect();
    let stroke_layout_score = if layout_scores.is_empty() {
        100
    } else {
        (layout_scores.iter().sum::<f64>() / layout_scores.len() as f64) as i32
    };
    let spacing_structure_score = (center_of_gravity_score as f64 * 0.3
        + font_size_score as f64 * 0.3
        + fount_score as f64 * 0.3
        + stroke_layout_score as f64 * 0.1) as i32;

    // Character comments first, topped up with stroke layout comments.
    let display = ctx.settings.top_structions_count;
    let character_comments: Vec<&str> = character.results().map(|r| r.comment()).filter(|c| !c.is_empty()).collect();
    let stroke_comments = layout_results
        .iter()
        .filter_map(|(_, r)| *r)
        .map(|r| r.comment())
        .filter(|c| !c.is_empty());
    let room = display.saturating_sub(character_comments.len());
    let spacing_structure = join_comments(
        character_comments
            .iter()
            .copied()
            .chain(stroke_comments.take(room)),
    );

    let character_sounds: Vec<&[String]> = character.results().map(|r| r.sounds()).filter(|s| !s.is_empty()).collect();
    let stroke_sounds = layout_results
        .iter()
        .filter_map(|(_, r)| *r)
        .map(|r| r.sounds())
        .filter(|s| !s.is_empty());
    let room = display.saturating_sub(character_sounds.len());
    let spacing_structure_sound = character_sounds
        .iter()
        .copied()
        .chain(stroke_sounds.take(room))
        .flatten()
        .cloned()
        .collect();

    // Structions.
    let struction_metrics = [
        Metric::StructionPosition,
        Metric::StructionAngle,
        Metric::StructionSize,
        Metric::StructionScale,
    ];
    let struction_score = if breakdown.structions.is_empty() {
        100
    } else {
        let total: f64 = breakdown
            .structions
            .iter()
            .flat_map(|s| struction_metrics.iter().map(move |&m| exact_percent(&s.level, m, rules.full_score(m))))
            .sum();
        (total / (breakdown.structions.len() * struction_metrics.len()) as f64) as i32
    };
    let worst = breakdown.worst_struction();
    let struction = worst.map_or_else(String::new, |w| join_comments(w.level.results().map(|r| r.comment())));
    let struction_sound = worst
        .map(|w| w.level.results().flat_map(|r| r.sounds().iter().cloned()).collect())
        .unwrap_or_default();

    // Errors: a stroke count mismatch outranks everything else.
    let mut error = ERROR_NONE;
    if !ctx.request.is_character_right {
        error = ERROR_WRONG_CHARACTER;
    } else if stroke_order_score < 100 {
        error = ERROR_STROKE_ORDER;
    }
    if stroke_count_diff != 0 {
        error = ERROR_STROKE_COUNT;
    }
    let incorrect_character_sound = if ctx.request.is_character_right {
        Vec::new()
    } else {
        base.get(Metric::IncorrectCharacter)
            .map(|r| r.sounds().to_vec())
            .unwrap_or_default()
    };

    let report = LegacyReport {
        center_of_gravity_type,
        center_of_gravity_score,
        error,
        font_size,
        font_size_score,
        fount_score,
        fount_type,
        score: score as i32,
        spacing_structure: or_correct(spacing_structure),
        spacing_structure_score,
        status: true,
        stroke_count: or_correct(stroke_count),
        stroke_count_diff,
        stroke_count_score,
        stroke_length: or_correct(length.text),
        stroke_length_score: length.score,
        stroke_order: or_correct(stroke_order),
        stroke_order_score,
        speed_score: SPEED_SCORE,
        struction: or_correct(struction),
        struction_score,
        stroke_count_sound,
        stroke_order_sound,
        spacing_structure_sound,
        stroke_length_sound: length.sounds,
        struction_sound,
        incorrect_character_sound,
    };

    let highlight = match ctx.settings.highlight_mode()? {
        HighlightMode::Strokes => length.indices,
        HighlightMode::Struction => match worst {
            Some(w) => w.segment_indices.clone(),
            None => {
                warn!(
                    "⚠️  struction highlight requested for '{}' but no struction was scored",
                    ctx.request.character.name
                );
                Vec::new()
            }
        },
    };

    Ok(GradeOutcome {
        score,
        report,
        highlight,
        breakdown,
    })
}

#[inline(always)]
fn exact_percent_of(full_score: f64, deducted: f64) -> f64 {
    if full_score == 0.0 {
        100.0
    } else {
        100.0 * (full_score - deducted) / full_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_gravity_swaps_diagonal_y_codes() {
        assert_eq!(center_of_gravity_type(6), 7);
        assert_eq!(center_of_gravity_type(7), 6);
        assert_eq!(center_of_gravity_type(5), 5);
        assert_eq!(center_of_gravity_type(0), 0);
    }

    #[test]
    fn test_font_size_prefers_scale_code() {
        assert_eq!(font_size_type(1, 0), 1);
        assert_eq!(font_size_type(2, 1), 3);
        assert_eq!(font_size_type(0, 2), 4);
        assert_eq!(font_size_type(0, 9), 19);
    }

    #[test]
    fn test_fount_type_mapping() {
        assert_eq!(fount_type(1), 1);
        assert_eq!(fount_type(2), 3);
        assert_eq!(fount_type(3), 2);
        assert_eq!(fount_type(0), 0);
    }

    #[test]
    fn test_join_comments_drops_empty_entries() {
        assert_eq!(join_comments(["a", "", "b"]), "a，b");
        assert_eq!(or_correct(String::new()), CORRECT_TEXT);
    }
}
