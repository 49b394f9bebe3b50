use crate::consts::{DEFAULT_CANVAS_SIZE, DEFAULT_PEN_WIDTH, DEFAULT_TOP_STROKES, DEFAULT_TOP_STRUCTIONS};
use crate::error::{GradeError, GradeResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};

/// Which evaluate segments the report asks the UI to paint red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// Indices of the worst strokes by length score.
    Strokes,
    /// Segment indices of the worst-scoring struction.
    Struction,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    // === CANVAS ===
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    pub width: u32,
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    pub height: u32,
    #[arg(long, default_value_t = DEFAULT_PEN_WIDTH)]
    pub pen_width: u32,

    // === REPORT ===
    #[arg(long, default_value_t = 1)]
    pub red_component: u8,
    #[arg(long, default_value_t = DEFAULT_TOP_STROKES)]
    pub top_strokes_count: usize,
    #[arg(long, default_value_t = DEFAULT_TOP_STRUCTIONS)]
    pub top_structions_count: usize,

    // === MODES ===
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub is_struction: bool,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub is_stroke_reliable: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            pen_width: DEFAULT_PEN_WIDTH,
            red_component: 1,
            top_strokes_count: DEFAULT_TOP_STROKES,
            top_structions_count: DEFAULT_TOP_STRUCTIONS,
            is_struction: true,
            is_stroke_reliable: true,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> GradeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GradeError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.pen_width == 0 {
            return Err(GradeError::Config("pen_width must be positive".into()));
        }
        self.highlight_mode().map(|_| ())
    }

    pub fn highlight_mode(&self) -> GradeResult<HighlightMode> {
        match self.red_component {
            1 => Ok(HighlightMode::Strokes),
            2 => Ok(HighlightMode::Struction),
            other => Err(GradeError::Config(format!(
                "red_component must be 1 or 2, got {}",
                other
            ))),
        }
    }

    #[inline(always)]
    pub fn canvas(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn merge_from_cli(&mut self, cli_settings: &EngineSettings, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_settings.$field.clone();
                }
            };
        }

        update_if_present!(width, "width");
        update_if_present!(height, "height");
        update_if_present!(pen_width, "pen_width");

        update_if_present!(red_component, "red_component");
        update_if_present!(top_strokes_count, "top_strokes_count");
        update_if_present!(top_structions_count, "top_structions_count");

        update_if_present!(is_struction, "is_struction");
        update_if_present!(is_stroke_reliable, "is_stroke_reliable");
    }
}
