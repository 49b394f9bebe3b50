use super::{bounding_rect, half_angle, min_rect_sides, rect_center, rotated_box, Mask};
use crate::consts::DIAGONAL_PASS_DEGREES;
use crate::error::{GradeError, GradeResult};
use imageproc::rect::Rect;
use std::f64::consts::{FRAC_PI_2, PI};

/// A rasterized shape with its axis-aligned box resolved up front.
/// Construction fails on an empty raster, so every extractor below can
/// divide by box extents freely.
#[derive(Debug, Clone)]
pub struct Shape {
    pub mask: Mask,
    pub rect: Rect,
}

impl Shape {
    pub fn new(mask: Mask, label: &str) -> GradeResult<Self> {
        let rect = bounding_rect(&mask)
            .ok_or_else(|| GradeError::DegenerateGeometry(format!("{} has no ink", label)))?;
        Ok(Self { mask, rect })
    }

    #[inline(always)]
    pub fn center(&self) -> (f64, f64) {
        rect_center(&self.rect)
    }
}

/// Centre displacement (evaluate minus standard) normalized by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionDeviation {
    pub dx: f64,
    pub dy: f64,
}

/// Per-axis extent ratios, evaluate over standard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRatio {
    pub width: f64,
    pub height: f64,
}

impl SizeRatio {
    #[inline(always)]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

fn canvas_dims(width: f64, height: f64) -> GradeResult<()> {
    if width == 0.0 || height == 0.0 {
        return Err(GradeError::DegenerateGeometry(format!(
            "canvas {}x{} cannot normalize a deviation",
            width, height
        )));
    }
    Ok(())
}

pub fn position_deviation(
    standard: &Shape,
    evaluate: &Shape,
    width: f64,
    height: f64,
) -> GradeResult<PositionDeviation> {
    canvas_dims(width, height)?;
    let (sx, sy) = standard.center();
    let (ex, ey) = evaluate.center();
    Ok(PositionDeviation {
        dx: (ex - sx) / width,
        dy: (ey - sy) / height,
    })
}

/// Same as [`position_deviation`] but measured after rotating both shapes
/// by 45 degrees about the canvas centre.
pub fn diagonal_position_deviation(
    standard: &Shape,
    evaluate: &Shape,
    width: f64,
    height: f64,
) -> GradeResult<PositionDeviation> {
    canvas_dims(width, height)?;
    let missing = || GradeError::DegenerateGeometry("rotated shape has no ink".into());
    let s = rotated_box(&standard.mask, DIAGONAL_PASS_DEGREES).ok_or_else(missing)?;
    let e = rotated_box(&evaluate.mask, DIAGONAL_PASS_DEGREES).ok_or_else(missing)?;
    Ok(PositionDeviation {
        dx: (e.center.0 - s.center.0) / width,
        dy: (e.center.1 - s.center.1) / height,
    })
}

pub fn size_ratio(standard: &Shape, evaluate: &Shape) -> SizeRatio {
    SizeRatio {
        width: evaluate.rect.width() as f64 / standard.rect.width() as f64,
        height: evaluate.rect.height() as f64 / standard.rect.height() as f64,
    }
}

/// Vertical offset of the box tops, normalized by canvas height. Negative
/// when the evaluate shape sits higher.
pub fn top_offset(standard: &Shape, evaluate: &Shape, height: f64) -> GradeResult<f64> {
    canvas_dims(1.0, height)?;
    Ok((evaluate.rect.top() - standard.rect.top()) as f64 / height)
}

/// Ratio of the longer sides of the minimum-area rotated rectangles.
pub fn length_ratio(standard: &Shape, evaluate: &Shape) -> GradeResult<f64> {
    let longer = |shape: &Shape| min_rect_sides(&shape.mask).map(|(a, b)| a.max(b));
    let std_len = longer(standard).unwrap_or(0.0);
    if std_len == 0.0 {
        return Err(GradeError::DegenerateGeometry(
            "standard stroke has zero length".into(),
        ));
    }
    Ok(longer(evaluate).unwrap_or(0.0) / std_len)
}

/// Signed half-angle difference (evaluate minus standard), radians, in
/// (-PI/2, PI/2]. Half-angles are line orientations, so the difference is
/// taken modulo PI.
pub fn half_angle_difference(standard: &Shape, evaluate: &Shape) -> f64 {
    let s = half_angle(&standard.mask).unwrap_or(0.0);
    let e = half_angle(&evaluate.mask).unwrap_or(0.0);
    let diff = wrap_angle(e - s);
    if diff > FRAC_PI_2 {
        diff - PI
    } else if diff <= -FRAC_PI_2 {
        diff + PI
    } else {
        diff
    }
}

/// Wraps an angle into (-PI, PI].
pub fn wrap_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Difference between the centroid-to-centroid lines of two component
/// pairs, in units of PI.
pub fn tie_line_difference(
    standard: (&Shape, &Shape),
    evaluate: (&Shape, &Shape),
) -> f64 {
    let line = |a: &Shape, b: &Shape| {
        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        (by - ay).atan2(bx - ax)
    };
    wrap_angle(line(evaluate.0, evaluate.1) - line(standard.0, standard.1)) / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::INK;
    use crate::geometry::blank;
    use image::Luma;

    fn block(x0: u32, y0: u32, w: u32, h: u32) -> Shape {
        let mut m = blank(100, 100);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                m.put_pixel(x, y, Luma([INK]));
            }
        }
        Shape::new(m, "block").unwrap()
    }

    #[test]
    fn test_empty_shape_is_degenerate() {
        let err = Shape::new(blank(10, 10), "stroke").unwrap_err();
        assert!(matches!(err, GradeError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_position_deviation_sign() {
        let s = block(40, 40, 10, 10);
        let e = block(50, 30, 10, 10);
        let d = position_deviation(&s, &e, 100.0, 100.0).unwrap();
        assert!((d.dx - 0.1).abs() < 1e-9);
        assert!((d.dy + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_size_ratio() {
        let s = block(10, 10, 20, 10);
        let e = block(10, 10, 10, 20);
        let r = size_ratio(&s, &e);
        assert_eq!((r.width, r.height), (0.5, 2.0));
        assert_eq!(r.area(), 1.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((wrap_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert_eq!(wrap_angle(PI), PI);
    }

    #[test]
    fn test_near_vertical_strokes_differ_by_a_small_angle() {
        let upright = block(45, 10, 6, 80);
        let mut m = blank(100, 100);
        for y in 10..90u32 {
            let x0 = 45 + (y - 10) / 20;
            for x in x0..x0 + 6 {
                m.put_pixel(x, y, Luma([INK]));
            }
        }
        let leaning = Shape::new(m, "leaning").unwrap();
        let d = half_angle_difference(&upright, &leaning);
        assert!(d.abs() < 0.2, "difference was {}", d);
        assert_eq!(half_angle_difference(&upright, &upright), 0.0);
    }

    #[test]
    fn test_tie_line_difference_for_raised_right_component() {
        let sl = block(10, 40, 20, 20);
        let sr = block(60, 40, 20, 20);
        let el = block(10, 40, 20, 20);
        let er = block(60, 20, 20, 20);
        let d = tie_line_difference((&sl, &sr), (&el, &er));
        assert!(d < 0.0);
    }
}
