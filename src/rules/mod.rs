pub mod loader;

use crate::config::EngineSettings;
use crate::consts::codes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Every measured quantity the rule table can price.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    StrokePosition,
    StrokeAngle,
    StrokeSize,
    StructionPosition,
    StructionSize,
    StructionScale,
    StructionAngle,
    CharacterPosition,
    CharacterSize,
    CharacterScale,
    CharacterAngle,
    StrokeCount,
    StrokeOrder,
    IncorrectCharacter,
}

const POSITION_CODES: &[u8] = &[
    codes::SHIFT_LEFT,
    codes::SHIFT_RIGHT,
    codes::SHIFT_UP,
    codes::SHIFT_DOWN,
    codes::DIAG_X_NEG,
    codes::DIAG_Y_POS,
    codes::DIAG_Y_NEG,
    codes::DIAG_X_POS,
];
const SCALE_CODES: &[u8] = &[
    codes::TALL,
    codes::SHORT,
    codes::WIDE,
    codes::NARROW,
    codes::NARROW_TALL,
    codes::WIDE_SHORT,
];

impl Metric {
    /// Bucket codes a rule for this metric may carry.
    pub fn allowed_codes(self) -> &'static [u8] {
        match self {
            Metric::StrokePosition => &[codes::SHIFT_UP, codes::SHIFT_DOWN],
            Metric::StrokeAngle | Metric::StructionAngle => &[codes::TILT_LEFT, codes::TILT_RIGHT],
            Metric::StrokeSize => &[codes::STROKE_LONGER, codes::STROKE_SHORTER],
            Metric::StructionPosition | Metric::CharacterPosition => POSITION_CODES,
            Metric::StructionSize | Metric::CharacterSize => &[codes::TOO_SMALL, codes::TOO_LARGE],
            Metric::StructionScale | Metric::CharacterScale => SCALE_CODES,
            Metric::CharacterAngle => &[codes::TILT_LEFT, codes::TILT_RIGHT, codes::TILT_MIXED],
            Metric::StrokeCount => &[codes::TOO_MANY, codes::TOO_FEW],
            Metric::StrokeOrder | Metric::IncorrectCharacter => &[codes::FLAGGED],
        }
    }
}

/// One priced deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deduction {
    pub amount: f64,
    pub comment: String,
    pub code: u8,
    pub sounds: Vec<String>,
}

/// Outcome of a rule-table lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The deviation is inside tolerance.
    NoDeviation,
    Deviation(Deduction),
}

/// Values substituted into `{order}`, `{name}` and `{count}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupArgs<'a> {
    pub order: Option<usize>,
    pub name: Option<&'a str>,
    pub count: Option<usize>,
}

impl<'a> LookupArgs<'a> {
    pub fn stroke(order: usize, name: &'a str) -> Self {
        Self {
            order: Some(order),
            name: Some(name),
            count: None,
        }
    }

    pub fn count(count: usize) -> Self {
        Self {
            count: Some(count),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub code: u8,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "unbounded")]
    pub max: f64,
    pub deduction: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub sound: Vec<String>,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

impl Rule {
    #[inline(always)]
    fn matches(&self, code: u8, magnitude: f64) -> bool {
        self.code == code && magnitude >= self.min && magnitude < self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRules {
    pub full_score: f64,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Validated rule table: one rule set for every [`Metric`].
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub settings: EngineSettings,
    metrics: BTreeMap<Metric, MetricRules>,
}

impl RuleTable {
    pub fn full_score(&self, metric: Metric) -> f64 {
        self.metrics.get(&metric).map_or(0.0, |m| m.full_score)
    }

    pub fn rules(&self, metric: Metric) -> &[Rule] {
        self.metrics.get(&metric).map_or(&[][..], |m| m.rules.as_slice())
    }

    /// Prices `|magnitude|` within the bucket `code`.
    pub fn lookup(&self, metric: Metric, magnitude: f64, code: u8, args: LookupArgs<'_>) -> Lookup {
        let Some(set) = self.metrics.get(&metric) else {
            return Lookup::NoDeviation;
        };
        let magnitude = magnitude.abs();
        match set.rules.iter().find(|r| r.matches(code, magnitude)) {
            Some(rule) if rule.deduction > 0.0 => Lookup::Deviation(Deduction {
                amount: rule.deduction.min(set.full_score),
                comment: render_comment(&rule.comment, args),
                code,
                sounds: rule.sound.clone(),
            }),
            _ => Lookup::NoDeviation,
        }
    }
}

fn render_comment(template: &str, args: LookupArgs<'_>) -> String {
    let mut text = template.to_string();
    if let Some(order) = args.order {
        text = text.replace("{order}", &order.to_string());
    }
    if let Some(name) = args.name {
        text = text.replace("{name}", name);
    }
    if let Some(count) = args.count {
        text = text.replace("{count}", &count.to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_comment_fills_known_placeholders() {
        let text = render_comment("第{order}笔{name}偏高", LookupArgs::stroke(2, "横"));
        assert_eq!(text, "第2笔横偏高");
        let text = render_comment("多写了{count}笔", LookupArgs::count(3));
        assert_eq!(text, "多写了3笔");
        let text = render_comment("{order}", LookupArgs::default());
        assert_eq!(text, "{order}");
    }
}
