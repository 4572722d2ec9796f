#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Terminal admin screens for a medical office: the specialty catalog and the
//! office profile, backed by a REST API.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod tui;
