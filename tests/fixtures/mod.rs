//! Test fixtures for route-planner.
//!
//! Provides realistic test data including:
//! - Real Kaohsiung locations
//! - Scripted geocode providers
//! - A tiny local HTTP responder for exercising the real provider clients

#![allow(dead_code)]

pub mod http;
pub mod kaohsiung_locations;
pub mod providers;

pub use kaohsiung_locations::*;
pub use providers::*;
