//! G.722 Test Modules
//!
//! This module organizes the test suite for the G.722 codec implementation.

mod reference_tests;
