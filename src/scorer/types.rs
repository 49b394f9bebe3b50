use crate::consts::codes;
use crate::rules::{Deduction, Lookup, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

/// Integer percentage of a metric's full score left after a deduction.
/// Metrics without weight count as perfect.
#[inline(always)]
pub fn percent(full_score: f64, deducted: f64) -> i32 {
    if full_score == 0.0 {
        100
    } else {
        (100.0 * (full_score - deducted) / full_score) as i32
    }
}

/// All deductions recorded against one metric at one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub metric: Metric,
    pub full_score: f64,
    pub deductions: Vec<Deduction>,
    /// Signed deviation that was measured, in the metric's own unit.
    pub raw_value: f64,
}

impl MetricResult {
    pub fn new(metric: Metric, full_score: f64) -> Self {
        Self {
            metric,
            full_score,
            deductions: Vec::new(),
            raw_value: 0.0,
        }
    }

    pub fn with_raw(mut self, raw_value: f64) -> Self {
        self.raw_value = raw_value;
        self
    }

    /// Records a lookup outcome; returns whether it carried a deviation.
    pub fn record(&mut self, lookup: Lookup) -> bool {
        match lookup {
            Lookup::Deviation(d) => {
                self.deductions.push(d);
                true
            }
            Lookup::NoDeviation => false,
        }
    }

    /// Total deduction, capped at the metric's full score.
    pub fn amount(&self) -> f64 {
        let sum: f64 = self.deductions.iter().map(|d| d.amount).sum();
        sum.min(self.full_score).max(0.0)
    }

    /// The bucket code of the first recorded deviation.
    pub fn code(&self) -> u8 {
        self.deductions.first().map_or(codes::NONE, |d| d.code)
    }

    pub fn comment(&self) -> &str {
        self.deductions.first().map_or("", |d| d.comment.as_str())
    }

    pub fn sounds(&self) -> &[String] {
        self.deductions.first().map_or(&[][..], |d| d.sounds.as_slice())
    }

    pub fn sub_score(&self) -> i32 {
        percent(self.full_score, self.amount())
    }
}

/// Metric results of one scoring level, iterated in metric order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelScore {
    pub metrics: BTreeMap<Metric, MetricResult>,
}

impl LevelScore {
    pub fn insert(&mut self, result: MetricResult) {
        self.metrics.insert(result.metric, result);
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricResult> {
        self.metrics.get(&metric)
    }

    pub fn deduction(&self) -> f64 {
        self.metrics.values().map(MetricResult::amount).sum()
    }

    pub fn code(&self, metric: Metric) -> u8 {
        self.get(metric).map_or(codes::NONE, MetricResult::code)
    }

    pub fn raw_value(&self, metric: Metric) -> f64 {
        self.get(metric).map_or(0.0, |r| r.raw_value)
    }

    /// Sub-score of a metric; metrics that were never measured count as perfect.
    pub fn sub_score(&self, metric: Metric) -> i32 {
        self.get(metric).map_or(100, MetricResult::sub_score)
    }

    pub fn results(&self) -> impl Iterator<Item = &MetricResult> {
        self.metrics.values()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeScore {
    pub order: usize,
    pub name: String,
    pub level: LevelScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructionScore {
    pub index: usize,
    pub segment_indices: Vec<usize>,
    pub level: LevelScore,
}

/// How the final score was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// `1 - character - strokes - base`
    StrokeLevel,
    /// `1 - character - structions - strokes - base`
    ComponentLevel,
    /// `1 - 2 * (character + base)`
    CharacterOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBreakdown {
    pub mode: ScoringMode,
    pub character: LevelScore,
    pub structions: Vec<StructionScore>,
    pub strokes: Vec<StrokeScore>,
    pub base: LevelScore,
    pub character_deduction: f64,
    pub struction_deduction: f64,
    pub stroke_deduction: f64,
    pub base_deduction: f64,
    pub worst_struction: Option<usize>,
}

impl LevelBreakdown {
    pub fn worst_struction(&self) -> Option<&StructionScore> {
        self.worst_struction.and_then(|i| self.structions.get(i))
    }
}
