//! Shared fixtures for unit tests.

pub(crate) mod events;
pub(crate) mod wkb;

pub(crate) use events::EventLog;
