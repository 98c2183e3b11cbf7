//! Infrastructure layer - Backends and services

pub mod cache;
pub mod knowledge;
pub mod logging;
pub mod services;
