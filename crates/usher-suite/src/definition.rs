//! Target definition types and structures.
//!
//! This module defines the data structures for target definitions loaded
//! from TOML files. A target definition carries everything application-
//! specific the checks need: selectors, expected UI copy, backend markers
//! and the rate-limit threshold. UI copy is kept verbatim in the
//! application's language since the checks match it against the rendered
//! DOM.

use crate::error::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use usher_core::TargetId;

/// Complete target definition loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Core target metadata
    pub target: TargetMetadata,

    /// Feedback widget selectors
    pub widget: WidgetSelectors,

    /// Feedback category display labels
    pub categories: CategoryLabels,

    /// Expected UI copy for assertions
    pub messages: MessageMarkers,

    /// Backend observation markers
    pub backend: BackendMarkers,

    /// Rate-limit behaviour of the backend
    pub rate_limit: RateLimitPolicy,
}

impl TargetDefinition {
    /// Get the target ID.
    #[must_use]
    pub fn id(&self) -> &TargetId {
        &self.target.id
    }

    /// Validate the target definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.target.name.is_empty() {
            return Err(SuiteError::ValidationError {
                target_id: self.target.id.to_string(),
                reason: "target name cannot be empty".to_string(),
            });
        }

        if !self.target.base_url.starts_with("http://")
            && !self.target.base_url.starts_with("https://")
        {
            return Err(SuiteError::ValidationError {
                target_id: self.target.id.to_string(),
                reason: format!("base_url must be http(s), got '{}'", self.target.base_url),
            });
        }

        let required_selectors = [
            ("widget.open_button", &self.widget.open_button),
            ("widget.panel", &self.widget.panel),
            ("widget.close_button", &self.widget.close_button),
            ("widget.category_combobox", &self.widget.category_combobox),
            ("widget.option_role", &self.widget.option_role),
            ("widget.content_input", &self.widget.content_input),
            ("widget.submit_text", &self.widget.submit_text),
        ];
        for (field, value) in required_selectors {
            if value.is_empty() {
                return Err(SuiteError::ValidationError {
                    target_id: self.target.id.to_string(),
                    reason: format!("{field} cannot be empty"),
                });
            }
        }

        if self.backend.host_marker.is_empty() {
            return Err(SuiteError::ValidationError {
                target_id: self.target.id.to_string(),
                reason: "backend.host_marker cannot be empty".to_string(),
            });
        }

        if self.rate_limit.hourly_threshold == 0 || self.rate_limit.hourly_threshold > 100 {
            return Err(SuiteError::ValidationError {
                target_id: self.target.id.to_string(),
                reason: format!(
                    "rate_limit.hourly_threshold must be 1-100, got {}",
                    self.rate_limit.hourly_threshold
                ),
            });
        }

        Ok(())
    }
}

/// Core target metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMetadata {
    /// Unique target identifier (e.g., "marquee")
    pub id: TargetId,

    /// Human-readable application name
    pub name: String,

    /// Default base URL (overridable by harness config)
    pub base_url: String,
}

/// Selectors for the feedback widget.
///
/// CSS selectors for elements with stable ids or attributes; button text
/// for controls the application renders without stable hooks (looked up
/// by XPath text match).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSelectors {
    /// Floating button that opens the feedback panel
    pub open_button: String,
    /// The open panel overlay
    pub panel: String,
    /// Button that closes the panel
    pub close_button: String,
    /// Category combobox trigger
    pub category_combobox: String,
    /// Combobox option role selector
    pub option_role: String,
    /// Title input
    pub title_input: String,
    /// Content textarea
    pub content_input: String,
    /// Name input
    pub name_input: String,
    /// Email input
    pub email_input: String,
    /// Submit button text for the basic form
    pub submit_text: String,
    /// Button text advancing to the bonus detail step
    pub next_step_text: String,
    /// Submit button text for the bonus report form
    pub bonus_submit_text: String,
    /// Step-2 bonus detail selectors
    pub bonus: BonusSelectors,
}

/// Selectors for the bonus-report detail step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusSelectors {
    /// Movie title input
    pub movie_title_input: String,
    /// Movie english title input
    pub movie_english_title_input: String,
    /// Cinema combobox trigger text
    pub cinema_combobox_text: String,
    /// Bonus type combobox trigger text
    pub bonus_type_combobox_text: String,
    /// Bonus name input
    pub bonus_name_input: String,
    /// Bonus description textarea
    pub bonus_description_input: String,
    /// Acquisition method input
    pub acquisition_method_input: String,
    /// Availability period start input
    pub period_start_input: String,
    /// Availability period end input
    pub period_end_input: String,
    /// Quantity limit input
    pub quantity_limit_input: String,
    /// Source type combobox trigger text
    pub source_combobox_text: String,
    /// Source URL input
    pub source_url_input: String,
    /// Source description input
    pub source_description_input: String,
}

/// Display labels of the feedback categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLabels {
    /// General suggestion category
    pub suggestion: String,
    /// Bonus completion report category
    pub bonus_completion: String,
}

/// Expected UI copy used in assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMarkers {
    /// Text shown with a successful submission
    pub success_marker: String,
    /// Element containing the submission reference id
    pub submission_id_element: String,
    /// Text shown when the hourly rate limit rejects a submission
    pub rate_limit_marker: String,
    /// Validation error shown when no category is selected
    pub category_required: String,
}

/// Substrings identifying backend persistence calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendMarkers {
    /// Backend host substring (e.g., "supabase.co")
    pub host_marker: String,
    /// Resource name substring (e.g., "user_feedbacks")
    pub resource_marker: String,
}

/// Rate-limit behaviour the backend enforces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Submissions allowed per hour before rejection
    pub hourly_threshold: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::bundled_definition;

    #[test]
    fn test_bundled_definition_is_valid() {
        let def = bundled_definition().expect("bundled definition parses");
        assert!(def.validate().is_ok());
        assert_eq!(def.id().as_str(), "marquee");
        assert_eq!(def.rate_limit.hourly_threshold, 3);
        assert_eq!(def.backend.host_marker, "supabase.co");
    }

    #[test]
    fn test_validation_rejects_empty_selector() {
        let mut def = bundled_definition().expect("bundled definition parses");
        def.widget.panel = String::new();
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("widget.panel"));
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let mut def = bundled_definition().expect("bundled definition parses");
        def.target.base_url = "localhost:9002".to_string();
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let mut def = bundled_definition().expect("bundled definition parses");
        def.rate_limit.hourly_threshold = 0;
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_definition_round_trip() {
        let def = bundled_definition().expect("bundled definition parses");
        let toml_str = toml::to_string_pretty(&def).expect("serialize");
        let parsed: TargetDefinition = toml::from_str(&toml_str).expect("parse back");
        assert_eq!(parsed.messages.success_marker, def.messages.success_marker);
        assert_eq!(
            parsed.widget.bonus.movie_title_input,
            def.widget.bonus.movie_title_input
        );
    }
}
