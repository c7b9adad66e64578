//! # hadir-server
//!
//! HTTP server library for the hadir attendance system.
//!
//! This library provides the API handlers and state management for hadir.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
