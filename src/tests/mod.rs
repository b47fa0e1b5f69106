//! Test suite for the neon clock binary and library working together.

mod fit_tests;
mod ticker_tests;
