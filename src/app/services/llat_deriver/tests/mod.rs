//! Tests for LLAT sensor derivation

mod coordinates_tests;
mod llat_tests;
