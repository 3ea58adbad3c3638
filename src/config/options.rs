//! Ledger options and their validation
//!
//! Options arrive loosely typed (from a config file or a host application).
//! Validation never fails: every unusable value is replaced by its default,
//! logged, and listed in the returned [`ConfigReport`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::progression::{GrowthConfig, GrowthMode};

pub const KEY_GROWTH_MODE: &str = "growth_mode";
pub const KEY_GAP_OR_MULTIPLIER: &str = "gap_or_multiplier";
pub const KEY_START_AT_ZERO: &str = "start_at_zero";
pub const KEY_RETURN_DETAILS: &str = "return_details";

/// Fully resolved ledger configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub growth: GrowthConfig,
    /// Attach [`TransitionDetails`](crate::progression::TransitionDetails)
    /// to add/subtract results
    pub return_details: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            return_details: false,
        }
    }
}

impl LedgerConfig {
    pub fn new(growth: GrowthConfig) -> Self {
        Self { growth, return_details: false }
    }

    pub fn with_details(mut self, return_details: bool) -> Self {
        self.return_details = return_details;
        self
    }

    /// Validate a loosely typed option map
    pub fn from_value(options: &Value) -> ConfigReport {
        let mut report = ConfigReport::default();
        let empty = Map::new();
        let map = match options {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                report.reject("options", describe(other), "all defaults");
                &empty
            }
        };

        for key in map.keys() {
            if ![KEY_GROWTH_MODE, KEY_GAP_OR_MULTIPLIER, KEY_START_AT_ZERO, KEY_RETURN_DETAILS]
                .contains(&key.as_str())
            {
                report.reject(key, "unrecognized option".to_string(), "ignored");
            }
        }

        let mode = match map.get(KEY_GROWTH_MODE) {
            None => GrowthMode::default(),
            Some(Value::String(name)) => match parse_mode(name) {
                Some(mode) => mode,
                None => {
                    report.reject(KEY_GROWTH_MODE, describe(&Value::String(name.clone())), "quadratic");
                    GrowthMode::default()
                }
            },
            Some(other) => {
                report.reject(KEY_GROWTH_MODE, describe(other), "quadratic");
                GrowthMode::default()
            }
        };

        let parameter = match map.get(KEY_GAP_OR_MULTIPLIER) {
            None => mode.default_parameter(),
            Some(value) => match value.as_f64() {
                Some(number) => number.abs(),
                None => {
                    let fallback = mode.default_parameter();
                    report.reject(KEY_GAP_OR_MULTIPLIER, describe(value), &fallback.to_string());
                    fallback
                }
            },
        };

        let start_at_zero = report.boolean(map, KEY_START_AT_ZERO, true);
        let return_details = report.boolean(map, KEY_RETURN_DETAILS, false);

        let mut growth = GrowthConfig {
            mode,
            gap_or_multiplier: parameter,
            start_at_zero,
        };
        if let Some(issue) = growth.parameter_issue() {
            let fallback = mode.default_parameter();
            report.reject(KEY_GAP_OR_MULTIPLIER, issue, &fallback.to_string());
            growth.gap_or_multiplier = fallback;
        }
        let growth = growth.normalized();

        report.config = LedgerConfig { growth, return_details };
        report
    }
}

/// One option that was replaced by its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOption {
    pub key: String,
    pub reason: String,
    pub fallback: String,
}

/// Outcome of validating options: the applied config plus what was coerced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReport {
    pub config: LedgerConfig,
    pub rejected: Vec<RejectedOption>,
}

impl ConfigReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn into_config(self) -> LedgerConfig {
        self.config
    }

    fn reject(&mut self, key: &str, reason: String, fallback: &str) {
        log::warn!("Invalid {} input ({}). Using {}", key, reason, fallback);
        self.rejected.push(RejectedOption {
            key: key.to_string(),
            reason,
            fallback: fallback.to_string(),
        });
    }

    fn boolean(&mut self, map: &Map<String, Value>, key: &str, default: bool) -> bool {
        match map.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.reject(key, describe(other), &default.to_string());
                default
            }
        }
    }
}

fn parse_mode(name: &str) -> Option<GrowthMode> {
    match name.trim().to_ascii_lowercase().as_str() {
        "linear" => Some(GrowthMode::Linear),
        "quadratic" => Some(GrowthMode::Quadratic),
        "cubic" => Some(GrowthMode::Cubic),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "map".to_string(),
    }
}
