//! Terminal presentation.

pub mod dashboard;
