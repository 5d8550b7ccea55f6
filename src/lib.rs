//! Reconnect onboarding: profile wizard core and its REST host.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
