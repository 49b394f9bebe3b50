/// Default canvas edge (pixels) that every segment is normalized into.
pub const DEFAULT_CANVAS_SIZE: u32 = 256;

/// Default brush diameter used when rasterizing segments.
pub const DEFAULT_PEN_WIDTH: u32 = 8;

/// Default number of stroke-length comments merged into the report.
pub const DEFAULT_TOP_STROKES: usize = 3;

/// Default number of layout comments merged into the report.
pub const DEFAULT_TOP_STRUCTIONS: usize = 3;

/// Normalized points are clamped to this many canvas extents beyond each
/// edge; ink that far out never overlaps the canvas anyway.
pub const POINT_MARGIN_CANVASES: f64 = 1.0;

/// Foreground intensity of a rasterized mask.
pub const INK: u8 = 255;

/// Rotation applied for the diagonal position pass (degrees).
pub const DIAGONAL_PASS_DEGREES: f32 = 45.0;

/// Stroke names that receive a position check.
pub const POSITION_STROKES: &[&str] = &[
    "横", "横钩", "横折", "竖折", "竖", "竖钩", "弯钩", "竖提", "捺", "斜钩", "撇", "提",
];

/// Stroke names that receive angle and size checks.
pub const ANGLE_STROKES: &[&str] = &[
    "横", "横钩", "竖", "竖钩", "弯钩", "竖提", "捺", "斜钩", "撇", "提",
];

/// Size band applied to structions: (lower, upper).
pub const STRUCTION_SIZE_BAND: (f64, f64) = (0.8, 1.2);

/// Size band applied to the whole character.
pub const CHARACTER_SIZE_BAND: (f64, f64) = (0.9, 1.1);

/// Band inside which one axis counts as "matching" for scale checks.
pub const SCALE_BAND: (f64, f64) = (0.9, 1.1);

/// Bucket codes handed to the rule table.
pub mod codes {
    pub const NONE: u8 = 0;

    // Axis-aligned position pass
    pub const SHIFT_LEFT: u8 = 1;
    pub const SHIFT_RIGHT: u8 = 2;
    pub const SHIFT_UP: u8 = 3;
    pub const SHIFT_DOWN: u8 = 4;
    // Diagonal (45 degree) position pass
    pub const DIAG_X_NEG: u8 = 5;
    pub const DIAG_Y_POS: u8 = 6;
    pub const DIAG_Y_NEG: u8 = 7;
    pub const DIAG_X_POS: u8 = 8;

    pub const TILT_LEFT: u8 = 1;
    pub const TILT_RIGHT: u8 = 2;
    pub const TILT_MIXED: u8 = 3;

    pub const TOO_SMALL: u8 = 1;
    pub const TOO_LARGE: u8 = 2;

    pub const STROKE_LONGER: u8 = 1;
    pub const STROKE_SHORTER: u8 = 2;

    pub const TALL: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const WIDE: u8 = 3;
    pub const NARROW: u8 = 8;
    pub const NARROW_TALL: u8 = 9;
    pub const WIDE_SHORT: u8 = 10;

    pub const TOO_MANY: u8 = 1;
    pub const TOO_FEW: u8 = 2;

    pub const FLAGGED: u8 = 1;
}

/// Placeholder written into every empty report text field.
pub const CORRECT_TEXT: &str = "正确";

/// Separator used when merging comments.
pub const COMMENT_SEPARATOR: &str = "，";

/// Report error codes.
pub const ERROR_NONE: i32 = 0;
pub const ERROR_STROKE_COUNT: i32 = 2;
pub const ERROR_STROKE_ORDER: i32 = 3;
pub const ERROR_WRONG_CHARACTER: i32 = 7001;

/// Writing speed is not measured; the report always carries full marks.
pub const SPEED_SCORE: i32 = 100;

/// Holistic scores never leave this range (fractions of 1).
pub const HOLISTIC_FLOOR: f64 = 0.3;
pub const HOLISTIC_CEIL: f64 = 1.0;
