//! Tests for the expression IR

mod helpers;

mod annotation_tests;
mod serial_tests;
