pub mod deviation;
pub mod shapes;

use crate::consts::INK;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::geometric_transformations::Projection;
use imageproc::geometry::{convex_hull, min_area_rect};
use imageproc::point::Point;
use imageproc::rect::Rect;
use itertools::Itertools;

/// Binary raster of a shape: `INK` on foreground, zero elsewhere.
pub type Mask = GrayImage;

#[inline(always)]
pub fn blank(width: u32, height: u32) -> Mask {
    GrayImage::new(width, height)
}

#[inline(always)]
fn is_ink(p: &Luma<u8>) -> bool {
    p.0[0] > 0
}

pub fn ink_points(mask: &Mask) -> Vec<Point<i32>> {
    mask.enumerate_pixels()
        .filter(|(_, _, p)| is_ink(p))
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect()
}

pub fn ink_count(mask: &Mask) -> usize {
    mask.pixels().filter(|p| is_ink(p)).count()
}

/// Pixel-wise union. Both masks must share dimensions.
pub fn union_into(dst: &mut Mask, src: &Mask) {
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        if is_ink(s) {
            *d = Luma([INK]);
        }
    }
}

/// Axis-aligned bounding box with inclusive extents, so any ink yields a
/// rectangle of at least 1x1.
pub fn bounding_rect(mask: &Mask) -> Option<Rect> {
    let points = ink_points(mask);
    let (min_x, max_x) = points.iter().map(|p| p.x).minmax().into_option()?;
    let (min_y, max_y) = points.iter().map(|p| p.y).minmax().into_option()?;
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}

#[inline(always)]
pub fn rect_center(rect: &Rect) -> (f64, f64) {
    (
        rect.left() as f64 + rect.width() as f64 / 2.0,
        rect.top() as f64 + rect.height() as f64 / 2.0,
    )
}

/// Axis-aligned box of the ink after rotating it about the canvas centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedBox {
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
}

pub fn rotated_box(mask: &Mask, degrees: f32) -> Option<RotatedBox> {
    let (cx, cy) = (mask.width() as f32 / 2.0, mask.height() as f32 / 2.0);
    let projection = Projection::translate(cx, cy)
        * Projection::rotate(degrees.to_radians())
        * Projection::translate(-cx, -cy);

    let rotated: Vec<(f32, f32)> = ink_points(mask)
        .into_iter()
        .map(|p| projection * (p.x as f32, p.y as f32))
        .collect();

    let (min_x, max_x) = rotated.iter().map(|p| p.0).minmax_by(f32::total_cmp).into_option()?;
    let (min_y, max_y) = rotated.iter().map(|p| p.1).minmax_by(f32::total_cmp).into_option()?;
    let width = (max_x - min_x) as f64 + 1.0;
    let height = (max_y - min_y) as f64 + 1.0;
    Some(RotatedBox {
        center: (min_x as f64 + width / 2.0, min_y as f64 + height / 2.0),
        width,
        height,
    })
}

/// Convex hull of the ink, built from its outer contours.
pub fn outer_hull(mask: &Mask) -> Vec<Point<i32>> {
    let border: Vec<Point<i32>> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .flat_map(|c| c.points)
        .collect();
    if border.is_empty() {
        return Vec::new();
    }
    convex_hull(&border[..])
}

/// Side lengths of the minimum-area rotated rectangle around the ink.
pub fn min_rect_sides(mask: &Mask) -> Option<(f64, f64)> {
    let hull = outer_hull(mask);
    if hull.is_empty() {
        return None;
    }
    let corners = min_area_rect(&hull[..]);
    let side = |a: Point<i32>, b: Point<i32>| {
        let (dx, dy) = ((a.x - b.x) as f64, (a.y - b.y) as f64);
        (dx * dx + dy * dy).sqrt()
    };
    Some((side(corners[0], corners[1]), side(corners[1], corners[2])))
}

/// Orientation of the line joining the centroids of the two halves of the
/// ink, split across its principal axis. Radians, direction normalized so
/// the principal axis points towards +x.
pub fn half_angle(mask: &Mask) -> Option<f64> {
    let points = ink_points(mask);
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y as f64).sum::<f64>() / n;

    let (mut mu20, mut mu02, mut mu11) = (0.0, 0.0, 0.0);
    for p in &points {
        let (dx, dy) = (p.x as f64 - mx, p.y as f64 - my);
        mu20 += dx * dx;
        mu02 += dy * dy;
        mu11 += dx * dy;
    }
    let theta = 0.5 * (2.0 * mu11).atan2(mu20 - mu02);
    let (ax, ay) = (theta.cos(), theta.sin());

    let (mut lo, mut hi) = ((0.0, 0.0, 0usize), (0.0, 0.0, 0usize));
    for p in &points {
        let (dx, dy) = (p.x as f64 - mx, p.y as f64 - my);
        let half = if dx * ax + dy * ay < 0.0 { &mut lo } else { &mut hi };
        half.0 += p.x as f64;
        half.1 += p.y as f64;
        half.2 += 1;
    }
    if lo.2 == 0 || hi.2 == 0 {
        return Some(0.0);
    }
    let lo_c = (lo.0 / lo.2 as f64, lo.1 / lo.2 as f64);
    let hi_c = (hi.0 / hi.2 as f64, hi.1 / hi.2 as f64);
    Some((hi_c.1 - lo_c.1).atan2(hi_c.0 - lo_c.0))
}

/// Area-weighted centroid of a polygon; falls back to the vertex mean for
/// polygons without area.
pub fn polygon_centroid(vertices: &[(f64, f64)]) -> Option<(f64, f64)> {
    if vertices.is_empty() {
        return None;
    }
    let (mut area2, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for (a, b) in vertices.iter().circular_tuple_windows() {
        let cross = a.0 * b.1 - b.0 * a.1;
        area2 += cross;
        cx += (a.0 + b.0) * cross;
        cy += (a.1 + b.1) * cross;
    }
    if area2.abs() < f64::EPSILON {
        let n = vertices.len() as f64;
        let sx: f64 = vertices.iter().map(|v| v.0).sum();
        let sy: f64 = vertices.iter().map(|v| v.1).sum();
        return Some((sx / n, sy / n));
    }
    Some((cx / (3.0 * area2), cy / (3.0 * area2)))
}

/// Fills a polygon given in floating coordinates. Polygons that collapse to
/// a line or a point are drawn as such.
pub fn fill_polygon(canvas: &mut Mask, vertices: &[(f64, f64)]) {
    let mut poly: Vec<Point<i32>> = vertices
        .iter()
        .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .dedup()
        .collect();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }

    let ink = Luma([INK]);
    match poly.len() {
        0 => {}
        1 => {
            let p = poly[0];
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
                canvas.put_pixel(p.x as u32, p.y as u32, ink);
            }
        }
        2 => draw_line_segment_mut(
            canvas,
            (poly[0].x as f32, poly[0].y as f32),
            (poly[1].x as f32, poly[1].y as f32),
            ink,
        ),
        _ => draw_polygon_mut(canvas, &poly, ink),
    }
}

/// Intersection over union of two equally sized masks.
pub fn overlap_ratio(a: &Mask, b: &Mask) -> Option<f64> {
    let (mut inter, mut union) = (0usize, 0usize);
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        match (is_ink(pa), is_ink(pb)) {
            (true, true) => {
                inter += 1;
                union += 1;
            }
            (true, false) | (false, true) => union += 1,
            _ => {}
        }
    }
    if union == 0 {
        None
    } else {
        Some(inter as f64 / union as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: u32, x0: u32, y0: u32, side: u32) -> Mask {
        let mut m = blank(size, size);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                m.put_pixel(x, y, Luma([INK]));
            }
        }
        m
    }

    #[test]
    fn test_bounding_rect_is_inclusive() {
        let m = square(20, 4, 6, 5);
        let r = bounding_rect(&m).unwrap();
        assert_eq!((r.left(), r.top(), r.width(), r.height()), (4, 6, 5, 5));
        assert_eq!(rect_center(&r), (6.5, 8.5));
    }

    #[test]
    fn test_empty_mask_has_no_geometry() {
        let m = blank(10, 10);
        assert!(bounding_rect(&m).is_none());
        assert!(half_angle(&m).is_none());
        assert!(outer_hull(&m).is_empty());
        assert!(rotated_box(&m, 45.0).is_none());
    }

    #[test]
    fn test_half_angle_of_horizontal_bar() {
        let mut m = blank(40, 40);
        for x in 5..35 {
            for y in 18..21 {
                m.put_pixel(x, y, Luma([INK]));
            }
        }
        let a = half_angle(&m).unwrap();
        assert!(a.abs() < 1e-6, "horizontal bar angle was {}", a);
    }

    #[test]
    fn test_polygon_centroid_of_square() {
        let c = polygon_centroid(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
        assert!((c.0 - 2.0).abs() < 1e-9 && (c.1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio_identity_and_disjoint() {
        let a = square(20, 2, 2, 4);
        let b = square(20, 12, 12, 4);
        assert_eq!(overlap_ratio(&a, &a), Some(1.0));
        assert_eq!(overlap_ratio(&a, &b), Some(0.0));
        assert_eq!(overlap_ratio(&blank(5, 5), &blank(5, 5)), None);
    }
}
