//! Shared fixtures for service-level tests.

pub(crate) mod helpers;
