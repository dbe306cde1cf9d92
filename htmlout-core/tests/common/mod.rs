//! Test infrastructure for the HTML out-transformer
//!
//! Provides fixture loading, stochastic input generation, a JSON token
//! producer, and assertion helpers.

#![allow(dead_code)]

mod harness;

pub use generators::Gen;
pub use harness::{
    assert_balanced, collect_formatted, format_markup, init_tracing, run_test, run_with_variations,
};
pub use json::{json_tokens, parse_json_tokens};
pub use loader::{load_fixtures_by_name, FixtureToken, TestCase};
