//! Integration tests for catalognav
//!
//! Tests are organized by component:
//! - catalog_client_test: Content API HTTP client (request shape, parsing, error kinds)
//! - compose_test: Dispatcher, listing composer and cached lookups
//! - navigation_test: Navigator actions end to end against a fake catalog
//! - common: Shared fixtures (fake Content API, scripted shell, record builders)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
