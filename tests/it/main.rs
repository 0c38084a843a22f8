//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary following matklad's best practices,
//! reducing linking overhead to a single link step.
//!
//! Structure:
//! - helpers: Shared fixtures (stub content, canvas builder, fake monitors)
//! - integration: Multi-component workflow tests
//! - unit: Single-component unit tests

mod helpers;
