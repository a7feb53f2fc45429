//! CLI operation handlers.
//!
//! [`scan`] wires configuration, the retrying gateway, the report sink and
//! the scan pipeline together.

pub mod scan;
