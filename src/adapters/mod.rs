//! External integrations
//!
//! Adapters isolate third-party APIs from the core. The only adapter today
//! is the Deputy workforce API.

pub mod deputy;
