//! Query execution options
//!
//! This module contains `QueryOptions` and the engine-wide defaults they fall
//! back to. It lives in a neutral location so both the engine and the
//! standalone post-query filter can consume it.

use crate::error::{QueryError, Result};
use serde_json::Value as JsonValue;
use std::time::Duration;
use strata_core::{BudgetLimits, MaxItems, QueryWindow};

/// Per-query routing hint for the fast-path selector.
///
/// `Accelerated` requests the pre-shaped query form; the selector still
/// verifies the denormalized projection table is usable before routing to it.
/// The hint affects which candidates are produced, never how they are
/// filtered or paginated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FastPathHint {
    /// Always use the standard query form
    #[default]
    Standard,
    /// Use the accelerated form when the projection table supports it
    Accelerated,
}

/// Options for one page-assembly call
///
/// Controls the skip/limit window, the permission-check budget, and fast-path
/// routing. Budget ceilings left unset fall back to [`EngineConfig`] defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryOptions {
    /// Skip/limit window applied after permission trimming
    pub window: QueryWindow,
    /// Per-query permission-check ceilings
    pub budget: BudgetLimits,
    /// Fast-path routing hint
    pub fast_path_hint: FastPathHint,
}

impl QueryOptions {
    /// Create options with defaults: unlimited window, unlimited budget,
    /// standard query form
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the skip/limit window
    pub fn with_window(mut self, window: QueryWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the number of accepted candidates to skip
    pub fn with_skip_count(mut self, skip_count: u64) -> Self {
        self.window = QueryWindow::new(skip_count, self.window.max_items());
        self
    }

    /// Set the page size bound
    pub fn with_max_items(mut self, max_items: MaxItems) -> Self {
        self.window = QueryWindow::new(self.window.skip_count(), max_items);
        self
    }

    /// Set the permission-check count ceiling
    pub fn with_max_permission_checks(mut self, max_checks: u64) -> Self {
        self.budget = self.budget.with_max_checks(max_checks);
        self
    }

    /// Set the permission-check wall-clock ceiling
    pub fn with_max_permission_check_time(mut self, max_time: Duration) -> Self {
        self.budget = self.budget.with_max_check_time(max_time);
        self
    }

    /// Set the fast-path routing hint
    pub fn with_fast_path_hint(mut self, hint: FastPathHint) -> Self {
        self.fast_path_hint = hint;
        self
    }

    /// Parse options from a JSON `opts` object value.
    ///
    /// Accepts kebab, snake, and camel key variants:
    ///
    /// - `skip-count` / `skip_count` / `skipCount`
    /// - `max-items` / `max_items` / `maxItems` (`-1` means unlimited)
    /// - `max-permission-checks` / `max_permission_checks` / `maxPermissionChecks`
    /// - `max-permission-check-time-millis` / `max_permission_check_time_millis`
    ///   / `maxPermissionCheckTimeMillis`
    /// - `fast-path` / `fast_path` / `fastPath` (`"standard"` or `"accelerated"`)
    ///
    /// Absent keys keep their defaults; present keys with invalid values are
    /// rejected rather than ignored.
    pub fn from_opts_value(opts: Option<&JsonValue>) -> Result<Self> {
        let Some(opts) = opts.and_then(|v| v.as_object()) else {
            return Ok(Self::default());
        };

        let lookup = |kebab: &str, snake: &str, camel: &str| -> Option<&JsonValue> {
            opts.get(kebab)
                .or_else(|| opts.get(snake))
                .or_else(|| opts.get(camel))
        };

        let int_field = |name: &'static str, value: &JsonValue| -> Result<i64> {
            value
                .as_i64()
                .ok_or_else(|| QueryError::InvalidOptions(format!("{name} must be an integer")))
        };

        let mut options = Self::default();

        let skip_count = match lookup("skip-count", "skip_count", "skipCount") {
            Some(v) => int_field("skip-count", v)?,
            None => 0,
        };
        let max_items = match lookup("max-items", "max_items", "maxItems") {
            Some(v) => int_field("max-items", v)?,
            None => -1,
        };
        options.window = QueryWindow::from_raw(skip_count, max_items)?;

        if let Some(v) = lookup(
            "max-permission-checks",
            "max_permission_checks",
            "maxPermissionChecks",
        ) {
            let checks = v.as_u64().ok_or_else(|| {
                QueryError::InvalidOptions("max-permission-checks must be a non-negative integer".into())
            })?;
            options.budget = options.budget.with_max_checks(checks);
        }

        if let Some(v) = lookup(
            "max-permission-check-time-millis",
            "max_permission_check_time_millis",
            "maxPermissionCheckTimeMillis",
        ) {
            let millis = v.as_u64().ok_or_else(|| {
                QueryError::InvalidOptions(
                    "max-permission-check-time-millis must be a non-negative integer".into(),
                )
            })?;
            options.budget = options
                .budget
                .with_max_check_time(Duration::from_millis(millis));
        }

        if let Some(v) = lookup("fast-path", "fast_path", "fastPath") {
            let tag = v.as_str().ok_or_else(|| {
                QueryError::InvalidOptions("fast-path must be a string".into())
            })?;
            options.fast_path_hint = match tag {
                "standard" => FastPathHint::Standard,
                "accelerated" => FastPathHint::Accelerated,
                other => {
                    return Err(QueryError::InvalidOptions(format!(
                        "unknown fast-path tag: {other:?}"
                    )))
                }
            };
        }

        Ok(options)
    }
}

/// Engine-wide configuration
///
/// Per-query options override these; unset query values fall back here.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Default permission-check ceilings
    pub default_budget: BudgetLimits,
    /// Minimum interval between column snapshot refreshes
    pub column_refresh_interval: Duration,
}

impl EngineConfig {
    pub const DEFAULT_COLUMN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

    /// Set default budget ceilings applied when a query sets none
    pub fn with_default_budget(mut self, budget: BudgetLimits) -> Self {
        self.default_budget = budget;
        self
    }

    /// Set the column snapshot refresh interval
    pub fn with_column_refresh_interval(mut self, interval: Duration) -> Self {
        self.column_refresh_interval = interval;
        self
    }

    /// Reject unusable configuration
    pub fn validate(&self) -> Result<()> {
        if self.column_refresh_interval.is_zero() {
            return Err(QueryError::InvalidConfig(
                "column refresh interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_budget: BudgetLimits::unlimited(),
            column_refresh_interval: Self::DEFAULT_COLUMN_REFRESH_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let opts = QueryOptions::default();
        assert_eq!(opts.window.skip_count(), 0);
        assert!(opts.window.max_items().is_unlimited());
        assert!(opts.budget.is_unlimited());
        assert_eq!(opts.fast_path_hint, FastPathHint::Standard);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = QueryOptions::new()
            .with_skip_count(10)
            .with_max_items(MaxItems::Limit(25))
            .with_max_permission_checks(1000)
            .with_max_permission_check_time(Duration::from_secs(5))
            .with_fast_path_hint(FastPathHint::Accelerated);

        assert_eq!(opts.window.skip_count(), 10);
        assert_eq!(opts.window.max_items(), MaxItems::Limit(25));
        assert_eq!(opts.budget.max_checks, Some(1000));
        assert_eq!(opts.budget.max_check_time, Some(Duration::from_secs(5)));
        assert_eq!(opts.fast_path_hint, FastPathHint::Accelerated);
    }

    #[test]
    fn test_from_opts_none_is_default() {
        let opts = QueryOptions::from_opts_value(None).unwrap();
        assert!(opts.budget.is_unlimited());
        assert!(opts.window.max_items().is_unlimited());
    }

    #[test]
    fn test_from_opts_kebab_keys() {
        let value = json!({
            "skip-count": 5,
            "max-items": 20,
            "max-permission-checks": 100,
            "max-permission-check-time-millis": 250,
            "fast-path": "accelerated",
        });
        let opts = QueryOptions::from_opts_value(Some(&value)).unwrap();
        assert_eq!(opts.window.skip_count(), 5);
        assert_eq!(opts.window.max_items(), MaxItems::Limit(20));
        assert_eq!(opts.budget.max_checks, Some(100));
        assert_eq!(opts.budget.max_check_time, Some(Duration::from_millis(250)));
        assert_eq!(opts.fast_path_hint, FastPathHint::Accelerated);
    }

    #[test]
    fn test_from_opts_camel_and_snake_variants() {
        let camel = json!({"skipCount": 2, "maxItems": -1, "maxPermissionChecks": 7});
        let opts = QueryOptions::from_opts_value(Some(&camel)).unwrap();
        assert_eq!(opts.window.skip_count(), 2);
        assert!(opts.window.max_items().is_unlimited());
        assert_eq!(opts.budget.max_checks, Some(7));

        let snake = json!({"skip_count": 3, "max_items": 0});
        let opts = QueryOptions::from_opts_value(Some(&snake)).unwrap();
        assert_eq!(opts.window.skip_count(), 3);
        assert_eq!(opts.window.max_items(), MaxItems::Limit(0));
    }

    #[test]
    fn test_from_opts_rejects_invalid_values() {
        let negative_skip = json!({"skip-count": -1});
        assert!(QueryOptions::from_opts_value(Some(&negative_skip)).is_err());

        let bad_max = json!({"max-items": -2});
        assert!(QueryOptions::from_opts_value(Some(&bad_max)).is_err());

        let bad_tag = json!({"fast-path": "turbo"});
        assert!(QueryOptions::from_opts_value(Some(&bad_tag)).is_err());

        let bad_type = json!({"max-permission-checks": "many"});
        assert!(QueryOptions::from_opts_value(Some(&bad_type)).is_err());
    }

    #[test]
    fn test_engine_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());

        let zero = EngineConfig::default().with_column_refresh_interval(Duration::ZERO);
        assert!(zero.validate().is_err());
    }
}
