//! Crate-level test suites that cut across module boundaries.

mod parser_tests;
