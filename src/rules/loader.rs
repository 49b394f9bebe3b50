use super::{Metric, MetricRules, RuleTable};
use crate::config::EngineSettings;
use crate::error::{GradeError, GradeResult};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RuleTableFile {
    #[serde(default)]
    settings: EngineSettings,
    metrics: HashMap<String, MetricRules>,
}

impl RuleTable {
    /// Builds a table, rejecting incomplete or inconsistent rule sets.
    pub fn new(settings: EngineSettings, metrics: BTreeMap<Metric, MetricRules>) -> GradeResult<Self> {
        settings.validate()?;

        for metric in Metric::iter() {
            let set = metrics
                .get(&metric)
                .ok_or_else(|| GradeError::Config(format!("metric '{}' is missing", metric)))?;
            validate_metric(metric, set)?;
        }

        Ok(Self { settings, metrics })
    }

    pub fn from_json_str(content: &str) -> GradeResult<Self> {
        let raw: RuleTableFile = serde_json::from_str(content)?;

        let mut metrics = BTreeMap::new();
        for (key, set) in raw.metrics {
            let metric = Metric::from_str(&key)
                .map_err(|_| GradeError::Config(format!("unknown metric '{}'", key)))?;
            debug!("rule set '{}': {} rules", metric, set.rules.len());
            metrics.insert(metric, set);
        }

        Self::new(raw.settings, metrics)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GradeResult<Self> {
        let path = path.as_ref();
        info!("📜 Loading rule table: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn validate_metric(metric: Metric, set: &MetricRules) -> GradeResult<()> {
    if set.full_score.is_nan() || set.full_score < 0.0 {
        return Err(GradeError::Config(format!(
            "metric '{}' has invalid full_score {}",
            metric, set.full_score
        )));
    }

    let allowed = metric.allowed_codes();
    for (i, rule) in set.rules.iter().enumerate() {
        if !allowed.contains(&rule.code) {
            return Err(GradeError::Config(format!(
                "metric '{}' rule #{} uses code {} (allowed: {:?})",
                metric, i, rule.code, allowed
            )));
        }
        if rule.min > rule.max {
            return Err(GradeError::Config(format!(
                "metric '{}' rule #{} has min {} above max {}",
                metric, i, rule.min, rule.max
            )));
        }
        if rule.deduction < 0.0 || rule.deduction > set.full_score {
            return Err(GradeError::Config(format!(
                "metric '{}' rule #{} deducts {} outside [0, {}]",
                metric, i, rule.deduction, set.full_score
            )));
        }
    }
    Ok(())
}
