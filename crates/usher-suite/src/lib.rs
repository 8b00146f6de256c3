//! The Marquee feedback-widget suite.
//!
//! Everything application-specific lives here as data: the target
//! definition (selectors, expected UI copy, backend markers, rate-limit
//! threshold) loaded from TOML, and the shipped checks that drive the
//! feedback widget through the shared browser session.

pub mod checks;
pub mod definition;
pub mod error;
pub mod loader;
pub mod panel;

pub use checks::standard_suite;
pub use definition::TargetDefinition;
pub use error::{Result, SuiteError};
pub use loader::{bundled_definition, TargetLoader};
pub use panel::WidgetPanel;
