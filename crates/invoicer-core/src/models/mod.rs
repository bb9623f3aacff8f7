//! Invoice data models and configuration.

pub mod config;
pub mod invoice;
pub mod request;
