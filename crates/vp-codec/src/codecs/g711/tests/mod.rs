//! G.711 Test Module
//!
//! This module contains comprehensive tests for the G.711 codec implementation,
//! including unit tests, integration tests, and ITU-T compliance validation.

pub mod library_tests;
pub mod quick_itu_test; 