//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence and defaults
//! - `field_resolution`: Credential, criteria and retry policy resolution
//! - `validation`: Configuration consistency validation

mod helpers;
