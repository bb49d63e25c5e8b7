/*!
 * Ledger Configuration
 *
 * Runtime configuration for ledger sizing and leak report rendering
 */

use miette::Diagnostic;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment override; numbers must be unsigned integers and flags 0/1/true/false.")
    )]
    InvalidValue { var: &'static str, value: String },

    #[error("Unknown report sort order: {0:?}")]
    #[diagnostic(code(config::unknown_sort_order), help("Use one of: id, tag, age."))]
    UnknownSortOrder(String),
}

/// Ordering of entries in a rendered leak report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending identity
    #[default]
    Id,
    /// Kind tag, then identity
    Tag,
    /// Oldest entries first
    Age,
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortOrder::Id),
            "tag" => Ok(SortOrder::Tag),
            "age" => Ok(SortOrder::Age),
            other => Err(ConfigError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Leak report rendering options
///
/// These only affect the rendered text. Counts always cover every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub sort: SortOrder,
    /// Maximum number of entry lines rendered; `None` renders all
    pub max_lines: Option<usize>,
    pub show_age: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort: SortOrder::Id,
            max_lines: None,
            show_age: true,
        }
    }
}

impl ReportConfig {
    /// Compact rendering for noisy test suites
    pub const fn brief() -> Self {
        Self {
            sort: SortOrder::Tag,
            max_lines: Some(20),
            show_age: false,
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn with_age(mut self, show_age: bool) -> Self {
        self.show_age = show_age;
        self
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Capacity reserved for the entry map up front
    pub initial_capacity: usize,
    pub report: ReportConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            report: ReportConfig::default(),
        }
    }
}

impl LedgerConfig {
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Build a configuration from defaults plus environment overrides
    ///
    /// Environment variables:
    /// - LEDGER_INITIAL_CAPACITY: entry map capacity (default: 256)
    /// - LEDGER_REPORT_MAX_LINES: rendered entry lines (default: unlimited)
    /// - LEDGER_REPORT_SORT: id | tag | age (default: id)
    /// - LEDGER_REPORT_SHOW_AGE: 0 | 1 | true | false (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`LedgerConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("LEDGER_INITIAL_CAPACITY") {
            config.initial_capacity = parse_usize("LEDGER_INITIAL_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("LEDGER_REPORT_MAX_LINES") {
            config.report.max_lines = Some(parse_usize("LEDGER_REPORT_MAX_LINES", &value)?);
        }
        if let Some(value) = lookup("LEDGER_REPORT_SORT") {
            config.report.sort = value.parse()?;
        }
        if let Some(value) = lookup("LEDGER_REPORT_SHOW_AGE") {
            config.report.show_age = parse_flag("LEDGER_REPORT_SHOW_AGE", &value)?;
        }

        Ok(config)
    }
}

fn parse_usize(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
