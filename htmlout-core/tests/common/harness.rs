//! Test harness for running fixture cases with stochastic variations

use crate::common::loader::fixture_name;
use crate::common::{Gen, TestCase};
use htmlout_core::{DataToken, HtmlOutTransformer, MarkupToken, TransformError, Value};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: Vec<DataToken>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Install a test subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Format a markup token for comparison
pub fn format_markup(token: &MarkupToken) -> String {
    match token {
        MarkupToken::ElementBegin(name) => format!("ElementBegin {:?}", fixture_name(name)),
        MarkupToken::ElementEnd => "ElementEnd".to_string(),
        MarkupToken::Attribute(name) => format!("Attribute {:?}", fixture_name(name)),
        MarkupToken::Primitive { name: Some(name), .. } => format!("Name {:?}", fixture_name(name)),
        MarkupToken::Primitive { value, name: None } => match value {
            Value::Null => "Null".to_string(),
            Value::Bool(b) => format!("Bool {:?}", b.to_string()),
            Value::Integer(i) => format!("Integer {:?}", i.to_string()),
            Value::Float(x) => format!("Float {:?}", x.to_string()),
            Value::String(s) => format!("String {:?}", s),
        },
    }
}

fn format_error(err: &TransformError) -> String {
    match err.malformed_kind() {
        Some(kind) => format!("Error {:?}", kind),
        None => format!("Error {}", err),
    }
}

/// Transform and format every output item, errors included
pub fn collect_formatted(input: Vec<DataToken>) -> Vec<String> {
    HtmlOutTransformer::new()
        .transform(input)
        .map(|item| match item {
            Ok(token) => format_markup(&token),
            Err(err) => format_error(&err),
        })
        .collect()
}

/// Panic unless begin/end counts match and never go negative
pub fn assert_balanced(tokens: &[MarkupToken]) {
    let mut depth: i64 = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            MarkupToken::ElementBegin(_) => depth += 1,
            MarkupToken::ElementEnd => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0, "Element depth went negative at token {}: {:?}", i, token);
    }
    assert_eq!(depth, 0, "Unbalanced output: {} elements left open", depth);
}

fn expected_lines(case: &TestCase) -> Vec<String> {
    let mut expected: Vec<String> = case.output.iter().map(|t| t.formatted()).collect();
    if let Some(kind) = &case.error {
        expected.push(format!("Error {}", kind));
    }
    expected
}

fn case_input(case: &TestCase) -> Vec<DataToken> {
    case.input.iter().map(|t| t.to_data_token()).collect()
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let input = case_input(case);
    let actual = collect_formatted(input.clone());
    let expected = expected_lines(case);

    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Token count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Token {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Number of complete top-level values in a token sequence
fn top_level_values(input: &[DataToken]) -> usize {
    let mut depth = 0usize;
    let mut count = 0;
    for token in input {
        match token {
            DataToken::ArrayBegin(_) | DataToken::ObjectBegin(_) => depth += 1,
            DataToken::ArrayEnd | DataToken::ObjectEnd => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    count += 1;
                }
            }
            DataToken::Primitive(_) if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

/// A few random sibling items (properties with values, for objects)
fn push_items(input: &mut Vec<DataToken>, gen: &mut Gen, in_object: bool) {
    for _ in 0..gen.geometric(0.3) {
        if in_object {
            input.push(DataToken::Property(gen.name()));
        }
        input.extend(gen.document(2));
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - Geometric nesting depth (α=0.6): the case becomes an array item or
///   a property value, with random siblings before and after
/// - 40% chance of a random top-level value above
/// - 40% chance of a random top-level value below
///
/// Only cases that are a single well-formed value are varied; others
/// pass trivially.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let canonical = case_input(case);
    let expected = expected_lines(case);

    if case.error.is_some() || top_level_values(&canonical) != 1 {
        return TestResult {
            passed: true,
            input: canonical,
            expected: expected.clone(),
            actual: expected,
            seed: gen.seed,
            errors: Vec::new(),
        };
    }

    let mut input = Vec::new();

    if gen.chance(0.4) {
        input.extend(gen.document(3));
    }

    let mut closers = Vec::new();
    for _ in 0..gen.geometric(0.6) {
        if gen.chance(0.5) {
            input.push(DataToken::ArrayBegin(gen.container_name()));
            push_items(&mut input, gen, false);
            closers.push(DataToken::ArrayEnd);
        } else {
            input.push(DataToken::ObjectBegin(gen.container_name()));
            push_items(&mut input, gen, true);
            input.push(DataToken::Property(gen.name()));
            closers.push(DataToken::ObjectEnd);
        }
    }

    input.extend(canonical.iter().cloned());

    // Trailing siblings go after the case but before each container end
    while let Some(closer) = closers.pop() {
        push_items(&mut input, gen, closer == DataToken::ObjectEnd);
        input.push(closer);
    }

    if gen.chance(0.4) {
        input.extend(gen.document(3));
    }

    let actual = collect_formatted(input.clone());

    // The case's output minus its div wrapper must appear as one
    // contiguous run somewhere in the wrapped output.
    let inner = &expected[1..expected.len() - 1];
    let mut errors = Vec::new();

    if !inner.is_empty() && !actual.windows(inner.len()).any(|w| w == inner) {
        errors.push(format!("Case output not found contiguously: {:?}", inner));
    }

    for act in &actual {
        if act.starts_with("Error") {
            errors.push(format!("Unexpected error: {}", act));
        }
    }

    if actual.first().map(String::as_str) != Some("ElementBegin \"div\"") {
        errors.push("Output does not start with the div wrapper".to_string());
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set HTMLOUT_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        for (i, t) in self.input.iter().enumerate() {
            eprintln!("  {}: {:?}", i, t);
        }
        eprintln!("\nExpected tokens:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual tokens:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
