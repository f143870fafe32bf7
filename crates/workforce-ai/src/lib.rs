//! Core library for the multilingual workforce assistant: a fixed
//! request-processing pipeline over deterministic HR and earned-wage rule
//! engines, with external classification, generation, translation, and policy
//! search held behind explicit seams.

pub mod assistant;
pub mod capabilities;
pub mod config;
pub mod engines;
pub mod error;
pub mod i18n;
pub mod records;
pub mod telemetry;
