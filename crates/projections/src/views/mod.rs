//! Concrete read models.

pub mod active_wills;
pub mod disinheritance_risk;
