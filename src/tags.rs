//! Tag configuration: the seven delimiter strings the scanner recognizes.

use serde::Deserialize;

/// Resolved tag table. Every role is a non-empty marker string.
///
/// Created once per compilation call and immutable thereafter. No uniqueness
/// validation is performed: overlapping markers mis-tokenize under scan
/// order, which is accepted caller risk rather than a compiler error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tags {
    /// Statement-line marker.
    pub statement: String,
    /// Block-open marker.
    pub block_open: String,
    /// Block-close marker.
    pub block_close: String,
    /// Raw (un-escaped) substitution opener.
    pub raw_open: String,
    /// Raw substitution closer.
    pub raw_close: String,
    /// Escaped substitution opener.
    pub esc_open: String,
    /// Escaped substitution closer.
    pub esc_close: String,
}

impl Default for Tags {
    fn default() -> Self {
        Tags {
            statement: "@=".to_string(),
            block_open: "@{".to_string(),
            block_close: "@}".to_string(),
            raw_open: "{{=".to_string(),
            raw_close: "=}}".to_string(),
            esc_open: "{{:".to_string(),
            esc_close: ":}}".to_string(),
        }
    }
}

/// Per-call tag overrides. Roles left as `None` (or set to an empty string)
/// resolve to the built-in defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagOverrides {
    pub statement: Option<String>,
    pub block_open: Option<String>,
    pub block_close: Option<String>,
    pub raw_open: Option<String>,
    pub raw_close: Option<String>,
    pub esc_open: Option<String>,
    pub esc_close: Option<String>,
}

impl TagOverrides {
    /// Fill missing roles with defaults, producing the resolved table.
    pub fn resolve(&self) -> Tags {
        let defaults = Tags::default();
        Tags {
            statement: pick(&self.statement, defaults.statement),
            block_open: pick(&self.block_open, defaults.block_open),
            block_close: pick(&self.block_close, defaults.block_close),
            raw_open: pick(&self.raw_open, defaults.raw_open),
            raw_close: pick(&self.raw_close, defaults.raw_close),
            esc_open: pick(&self.esc_open, defaults.esc_open),
            esc_close: pick(&self.esc_close, defaults.esc_close),
        }
    }
}

fn pick(override_: &Option<String>, default: String) -> String {
    match override_ {
        Some(marker) if !marker.is_empty() => marker.clone(),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tags = TagOverrides::default().resolve();
        assert_eq!(tags, Tags::default());
        assert_eq!(tags.statement, "@=");
        assert_eq!(tags.raw_open, "{{=");
        assert_eq!(tags.esc_close, ":}}");
    }

    #[test]
    fn test_partial_override() {
        let overrides = TagOverrides {
            statement: Some("%".to_string()),
            raw_open: Some("[[".to_string()),
            raw_close: Some("]]".to_string()),
            ..TagOverrides::default()
        };
        let tags = overrides.resolve();
        assert_eq!(tags.statement, "%");
        assert_eq!(tags.raw_open, "[[");
        assert_eq!(tags.raw_close, "]]");
        assert_eq!(tags.block_open, "@{");
        assert_eq!(tags.esc_open, "{{:");
    }

    #[test]
    fn test_empty_override_falls_back_to_default() {
        let overrides = TagOverrides {
            block_open: Some(String::new()),
            ..TagOverrides::default()
        };
        assert_eq!(overrides.resolve().block_open, "@{");
    }

    #[test]
    fn test_deserialize_overrides() {
        let overrides: TagOverrides =
            serde_json::from_str(r###"{"statement": "##", "esc_open": "<%"}"###)
                .expect("valid overrides");
        let tags = overrides.resolve();
        assert_eq!(tags.statement, "##");
        assert_eq!(tags.esc_open, "<%");
        assert_eq!(tags.esc_close, ":}}");
    }
}
