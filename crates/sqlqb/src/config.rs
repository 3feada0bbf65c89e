use crate::error::{QbError, QbResult};
use crate::param::PlaceholderStyle;
use serde::{Deserialize, Serialize};

fn default_log_sql_max_len() -> Option<usize> {
    Some(200)
}

/// Builder settings that survive statement resets.
///
/// ```toml
/// placeholders = "question_mark"
/// log_sql_max_len = 120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QbConfig {
    /// Placeholder convention for rendered SQL.
    pub placeholders: PlaceholderStyle,
    /// Truncate SQL in log events (in bytes, at a char boundary). `None` means no truncation.
    #[serde(default = "default_log_sql_max_len")]
    pub log_sql_max_len: Option<usize>,
}

impl Default for QbConfig {
    fn default() -> Self {
        Self {
            placeholders: PlaceholderStyle::default(),
            log_sql_max_len: default_log_sql_max_len(),
        }
    }
}

impl QbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> QbResult<Self> {
        toml::from_str(s).map_err(QbError::from)
    }

    /// Set the placeholder style.
    pub fn placeholders(mut self, style: PlaceholderStyle) -> Self {
        self.placeholders = style;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.log_sql_max_len = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.log_sql_max_len = None;
        self
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn truncate_for_log<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.log_sql_max_len {
            Some(max) if sql.len() > max => {
                format!("{}...", truncate_at_char_boundary(sql, max)).into()
            }
            _ => sql.into(),
        }
    }
}

fn truncate_at_char_boundary(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
