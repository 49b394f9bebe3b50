use super::ScoringContext;
use crate::consts::{ANGLE_STROKES, HOLISTIC_CEIL, HOLISTIC_FLOOR};
use crate::error::{GradeError, GradeResult};
use crate::geometry::deviation::half_angle_difference;
use crate::geometry::{blank, fill_polygon, ink_count, outer_hull, overlap_ratio, polygon_centroid, Mask};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

/// Breakdown of a holistic grade. Overlaps and sub-scores are fractions
/// of 1; `total` is on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticScore {
    pub total: f64,
    pub overlap_raw: f64,
    pub overlap_resized: f64,
    /// Mean centred overlap of paired structions; only in component mode.
    pub component_overlap: Option<f64>,
    pub scale_score: f64,
    pub stroke_score: f64,
}

/// Hull overlap of two shapes once their centroids coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullOverlap {
    pub raw: f64,
    pub resized: f64,
    /// Standard centroid minus evaluate centroid, pixels.
    pub displacement: (f64, f64),
}

fn hull_polygon(mask: &Mask, label: &str) -> GradeResult<(Vec<(f64, f64)>, (f64, f64))> {
    let hull: Vec<(f64, f64)> = outer_hull(mask)
        .into_iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();
    let center = polygon_centroid(&hull)
        .ok_or_else(|| GradeError::DegenerateGeometry(format!("{} has no convex hull", label)))?;
    Ok((hull, center))
}

fn render(vertices: &[(f64, f64)], width: u32, height: u32) -> Mask {
    let mut canvas = blank(width, height);
    fill_polygon(&mut canvas, vertices);
    canvas
}

/// Renders both hulls on a canvas twice the character size, moves the
/// evaluate hull onto the standard centroid and measures overlap, then
/// rescales it to the standard hull's area and measures again.
pub fn centered_overlap(standard: &Mask, evaluate: &Mask) -> GradeResult<HullOverlap> {
    let (width, height) = standard.dimensions();
    let offset = (width as f64 / 2.0, height as f64 / 2.0);
    let (std_hull, std_center) = hull_polygon(standard, "standard shape")?;
    let (eval_hull, eval_center) = hull_polygon(evaluate, "evaluate shape")?;

    let std_poly: Vec<(f64, f64)> = std_hull.iter().map(|&(x, y)| (x + offset.0, y + offset.1)).collect();
    let eval_poly: Vec<(f64, f64)> = eval_hull
        .iter()
        .map(|&(x, y)| (x - eval_center.0 + std_center.0 + offset.0, y - eval_center.1 + std_center.1 + offset.1))
        .collect();

    let (cw, ch) = (width * 2, height * 2);
    let std_canvas = render(&std_poly, cw, ch);
    let eval_canvas = render(&eval_poly, cw, ch);
    let raw = overlap_ratio(&std_canvas, &eval_canvas)
        .ok_or_else(|| GradeError::DegenerateGeometry("hull union is empty".into()))?;

    let eval_area = ink_count(&eval_canvas);
    if eval_area == 0 {
        return Err(GradeError::DegenerateGeometry("evaluate hull has zero area".into()));
    }
    let k = (ink_count(&std_canvas) as f64 / eval_area as f64).sqrt();
    let anchor = (std_center.0 + offset.0, std_center.1 + offset.1);
    let scaled: Vec<(f64, f64)> = eval_poly
        .iter()
        .map(|&(x, y)| (anchor.0 + (x - anchor.0) * k, anchor.1 + (y - anchor.1) * k))
        .collect();
    let resized = overlap_ratio(&std_canvas, &render(&scaled, cw, ch))
        .ok_or_else(|| GradeError::DegenerateGeometry("resized hull union is empty".into()))?;

    Ok(HullOverlap {
        raw,
        resized,
        displacement: (std_center.0 - eval_center.0, std_center.1 - eval_center.1),
    })
}

/// Piecewise-linear penalty for a centroid displacement, in bands of 20% of
/// the half canvas. Continuous across band edges.
pub fn displacement_penalty(dx: f64, dy: f64, half_width: f64, half_height: f64) -> f64 {
    let d = (dx.abs() / half_width).max(dy.abs() / half_height);
    match (d * 5.0).floor() as i64 {
        i64::MIN..=0 => 0.0,
        1 => (d - 0.2) * 0.5,
        2 => (d - 0.4) + 0.1,
        3 => (d - 0.6) * 1.5 + 0.3,
        _ => (d - 0.8) * 2.0 + 0.6,
    }
}

/// `1 - max|angle diff| / PI` over reliable, angle-checked stroke pairs;
/// full credit when strokes are unreliable or the counts differ.
fn stroke_angle_score(ctx: &ScoringContext<'_>) -> GradeResult<f64> {
    let standard = &ctx.standard.strokes;
    let evaluate = &ctx.evaluate.strokes;
    if !ctx.settings.is_stroke_reliable || standard.len() != evaluate.len() {
        return Ok(1.0);
    }
    let mut worst: Option<f64> = None;
    for (s, e) in standard.iter().zip(evaluate.iter()) {
        if !ANGLE_STROKES.contains(&e.name.as_str()) || !e.is_reliable {
            continue;
        }
        let std_shape = ctx.stroke_shape(s, "standard stroke")?;
        let eval_shape = ctx.stroke_shape(e, "evaluate stroke")?;
        let diff = half_angle_difference(&std_shape, &eval_shape).abs();
        worst = Some(worst.map_or(diff, |w| w.max(diff)));
    }
    Ok(worst.map_or(1.0, |w| 1.0 - w / PI))
}

/// Mean centred overlap of paired structions; zero when the pairing is
/// missing or uneven.
fn component_overlap(ctx: &ScoringContext<'_>) -> GradeResult<f64> {
    let standard = &ctx.standard.structions;
    let evaluate = &ctx.evaluate.structions;
    if evaluate.is_empty() || evaluate.len() != standard.len() {
        return Ok(0.0);
    }
    let (w, h, pen) = (ctx.settings.width, ctx.settings.height, ctx.settings.pen_width);
    let mut total = 0.0;
    for (s, e) in standard.iter().zip(evaluate.iter()) {
        total += centered_overlap(&s.draw(w, h, pen), &e.draw(w, h, pen))?.raw;
    }
    Ok(total / standard.len() as f64)
}

/// Rule-table-free similarity score, clamped and reported on 0-100.
pub fn score(ctx: &ScoringContext<'_>) -> GradeResult<HolisticScore> {
    let s = ctx.settings;
    let standard = ctx.standard.draw_ink(s.width, s.height, s.pen_width);
    let evaluate = ctx.evaluate.draw_ink(s.width, s.height, s.pen_width);
    let overlap = centered_overlap(&standard, &evaluate)?;

    let (width, height) = ctx.canvas();
    let (dx, dy) = overlap.displacement;
    let scale_score = 1.0 - displacement_penalty(dx, dy, width / 2.0, height / 2.0);
    let stroke_score = stroke_angle_score(ctx)?;

    let (r, z) = (overlap.raw, overlap.resized);
    let component_mode = !ctx.standard.composition.is_single_body() && s.is_struction;
    let (blend, component) = if component_mode {
        let c = component_overlap(ctx)?;
        (
            (1.0 - (1.0 - (0.57 * r + 0.37 * z + 0.06 * c)) * 1.5) * 0.8 + 0.2 * scale_score + 0.05,
            Some(c),
        )
    } else if s.is_stroke_reliable {
        (
            (1.0 - (1.0 - (0.2 * r + 0.8 * z)) * 1.7) * 0.8 + 0.2 * scale_score - 0.4 * (1.0 - stroke_score) + 0.1,
            None,
        )
    } else {
        (
            (1.0 - (1.0 - (0.7 * r + 0.3 * z)) * 1.7) * 0.8 + 0.2 * scale_score + 0.05,
            None,
        )
    };
    debug!(
        "holistic terms: raw {:.4}, resized {:.4}, scale {:.4}, stroke {:.4}, component {:?}, blend {:.4}",
        r, z, scale_score, stroke_score, component, blend
    );

    Ok(HolisticScore {
        total: blend.clamp(HOLISTIC_FLOOR, HOLISTIC_CEIL) * 100.0,
        overlap_raw: r,
        overlap_resized: z,
        component_overlap: component,
        scale_score,
        stroke_score,
    })
}
