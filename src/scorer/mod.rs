pub mod aggregate;
pub mod builder;
pub mod engine;
pub mod holistic;
pub mod types;

pub use self::aggregate::{GradeOutcome, LegacyReport};
pub use self::holistic::HolisticScore;
pub use self::types::{LevelBreakdown, LevelScore, MetricResult, ScoringMode};

use self::builder::{build_character, load_segments, Side};
use crate::config::EngineSettings;
use crate::error::GradeResult;
use crate::geometry::deviation::Shape;
use crate::geometry::shapes::{Character, Stroke, Struction};
use crate::protocol::GradeRequest;
use crate::rules::{Lookup, LookupArgs, Metric, RuleTable};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Everything one grading call reads. Built fresh per call and never
/// mutated, so a single [`Grader`] can serve concurrent requests.
pub struct ScoringContext<'a> {
    pub rules: &'a RuleTable,
    pub settings: &'a EngineSettings,
    pub request: &'a GradeRequest,
    pub standard: Character,
    pub evaluate: Character,
}

impl<'a> ScoringContext<'a> {
    pub fn new(rules: &'a RuleTable, settings: &'a EngineSettings, request: &'a GradeRequest) -> GradeResult<Self> {
        let (w, h) = settings.canvas();
        let standard = build_character(load_segments(&request.standard, w, h)?, request, Side::Standard)?;
        let evaluate = build_character(load_segments(&request.evaluate, w, h)?, request, Side::Evaluate)?;
        Ok(Self {
            rules,
            settings,
            request,
            standard,
            evaluate,
        })
    }

    #[inline(always)]
    pub fn canvas(&self) -> (f64, f64) {
        (self.settings.width as f64, self.settings.height as f64)
    }

    pub fn stroke_shape(&self, stroke: &Stroke, label: &str) -> GradeResult<Shape> {
        let s = self.settings;
        Shape::new(stroke.draw(s.width, s.height, s.pen_width), label)
    }

    pub fn struction_shape(&self, struction: &Struction, label: &str) -> GradeResult<Shape> {
        let s = self.settings;
        Shape::new(struction.draw(s.width, s.height, s.pen_width), label)
    }

    pub fn character_shape(&self, character: &Character, label: &str) -> GradeResult<Shape> {
        let s = self.settings;
        Shape::new(character.draw(s.width, s.height, s.pen_width), label)
    }

    #[inline(always)]
    pub fn lookup(&self, metric: Metric, magnitude: f64, code: u8, args: LookupArgs<'_>) -> Lookup {
        self.rules.lookup(metric, magnitude, code, args)
    }

    #[inline(always)]
    pub fn metric(&self, metric: Metric) -> MetricResult {
        MetricResult::new(metric, self.rules.full_score(metric))
    }
}

/// Shareable grading engine: an immutable rule table plus settings.
#[derive(Clone)]
pub struct Grader {
    rules: Arc<RuleTable>,
    settings: EngineSettings,
}

impl Grader {
    pub fn new(rules: RuleTable) -> Self {
        let settings = rules.settings.clone();
        info!(
            "⚙️  Grader ready: canvas {}x{}, pen {}, struction scoring {}",
            settings.width, settings.height, settings.pen_width, settings.is_struction
        );
        Self {
            rules: Arc::new(rules),
            settings,
        }
    }

    /// Same table, different settings (e.g. CLI overrides).
    pub fn with_settings(&self, settings: EngineSettings) -> GradeResult<Self> {
        settings.validate()?;
        Ok(Self {
            rules: Arc::clone(&self.rules),
            settings,
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GradeResult<Self> {
        Ok(Self::new(RuleTable::load_from_file(path)?))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn context<'a>(&'a self, request: &'a GradeRequest) -> GradeResult<ScoringContext<'a>> {
        ScoringContext::new(&self.rules, &self.settings, request)
    }

    /// Runs the deviation engine and projects the result into the report.
    pub fn grade(&self, request: &GradeRequest) -> GradeResult<GradeOutcome> {
        let ctx = self.context(request)?;
        let breakdown = engine::score_levels(&ctx)?;
        let outcome = aggregate::assemble(&ctx, breakdown)?;
        info!(
            "📝 Graded '{}': {:.2} ({:?})",
            request.character.name, outcome.score, outcome.breakdown.mode
        );
        Ok(outcome)
    }

    /// Runs the convex-hull overlap path.
    pub fn holistic(&self, request: &GradeRequest) -> GradeResult<HolisticScore> {
        let ctx = self.context(request)?;
        let score = holistic::score(&ctx)?;
        info!(
            "🔷 Holistic '{}': {:.2}",
            request.character.name, score.total
        );
        Ok(score)
    }
}
