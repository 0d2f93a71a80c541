//! Integration test suite for Naka.
//!
//! Exercises the full path from raw contract responses and scripted
//! adapters through the coefficient engine into tracker snapshots.

pub mod helpers;
