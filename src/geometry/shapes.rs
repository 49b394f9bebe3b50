use super::{blank, union_into, Mask};
use crate::consts::INK;
use image::Luma;
use imageproc::drawing::draw_filled_circle_mut;
use strum_macros::{Display, EnumIter, EnumString};

/// Topology of a character, keyed by its Ideographic Description Character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum Composition {
    #[strum(serialize = " ")]
    SingleBody,
    #[strum(serialize = "⿰")]
    LeftRight,
    #[strum(serialize = "⿱")]
    TopBottom,
    #[strum(serialize = "⿲")]
    LeftMiddleRight,
    #[strum(serialize = "⿳")]
    TopMiddleBottom,
    #[strum(serialize = "⿴")]
    FullSurround,
    #[strum(serialize = "⿵")]
    SurroundFromAbove,
    #[strum(serialize = "⿶")]
    SurroundFromBelow,
    #[strum(serialize = "⿷")]
    SurroundFromLeft,
    #[strum(serialize = "⿸")]
    SurroundFromUpperLeft,
    #[strum(serialize = "⿹")]
    SurroundFromUpperRight,
    #[strum(serialize = "⿺")]
    SurroundFromLowerLeft,
    #[strum(serialize = "⿻")]
    Overlaid,
}

impl Composition {
    #[inline(always)]
    pub fn is_single_body(self) -> bool {
        self == Composition::SingleBody
    }
}

/// A normalized polyline captured in one pen-down.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub points: Vec<(i32, i32)>,
}

impl Segment {
    /// Paints the polyline with a round brush of `pen_width` diameter.
    pub fn draw_onto(&self, canvas: &mut Mask, pen_width: u32) {
        let radius = (pen_width / 2).max(1) as i32;
        let ink = Luma([INK]);
        if let [only] = self.points.as_slice() {
            draw_filled_circle_mut(canvas, *only, radius, ink);
            return;
        }
        for pair in self.points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
            for s in 0..=steps {
                let x = x0 + (x1 - x0) * s / steps;
                let y = y0 + (y1 - y0) * s / steps;
                draw_filled_circle_mut(canvas, (x, y), radius, ink);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub name: String,
    pub order: usize,
    pub is_valid: bool,
    pub is_reliable: bool,
    pub segments: Vec<Segment>,
}

impl Stroke {
    pub fn draw(&self, width: u32, height: u32, pen_width: u32) -> Mask {
        let mut canvas = blank(width, height);
        for segment in &self.segments {
            segment.draw_onto(&mut canvas, pen_width);
        }
        canvas
    }

    pub fn segment_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().map(|s| s.index)
    }
}

/// A structural component: the strokes of one radical.
#[derive(Debug, Clone, PartialEq)]
pub struct Struction {
    pub strokes: Vec<Stroke>,
}

impl Struction {
    pub fn draw(&self, width: u32, height: u32, pen_width: u32) -> Mask {
        let mut canvas = blank(width, height);
        for stroke in &self.strokes {
            union_into(&mut canvas, &stroke.draw(width, height, pen_width));
        }
        canvas
    }

    pub fn segment_indices(&self) -> Vec<usize> {
        self.strokes.iter().flat_map(|s| s.segment_indices()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub composition: Composition,
    pub segments: Vec<Segment>,
    pub strokes: Vec<Stroke>,
    pub structions: Vec<Struction>,
}

impl Character {
    /// Union of all mapped strokes.
    pub fn draw(&self, width: u32, height: u32, pen_width: u32) -> Mask {
        let mut canvas = blank(width, height);
        for stroke in &self.strokes {
            union_into(&mut canvas, &stroke.draw(width, height, pen_width));
        }
        canvas
    }

    /// Union of every captured segment, mapped to a stroke or not.
    pub fn draw_ink(&self, width: u32, height: u32, pen_width: u32) -> Mask {
        let mut canvas = blank(width, height);
        for segment in &self.segments {
            segment.draw_onto(&mut canvas, pen_width);
        }
        canvas
    }

    /// All strokes reachable through the structions, ordered by stroke order.
    /// Falls back to the flat stroke list for characters without structions.
    pub fn strokes_by_order(&self) -> Vec<&Stroke> {
        let mut strokes: Vec<&Stroke> = if self.structions.is_empty() {
            self.strokes.iter().collect()
        } else {
            self.structions.iter().flat_map(|s| s.strokes.iter()).collect()
        };
        strokes.sort_by_key(|s| s.order);
        strokes
    }
}
