//! Condition evaluator for block-form `if` and `while` headers.
//!
//! A small fixed vocabulary of comparison phrases, tried in order. Numeric
//! comparisons coerce the variable through `f64` (numeric strings parse);
//! a failed coercion makes the comparison false, never an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::context::ExecutionContext;
use crate::trace::trace_log;

struct ConditionPatterns {
    greater: Regex,
    less: Regex,
    equals_text: Regex,
    equals_int: Regex,
}

fn patterns() -> &'static ConditionPatterns {
    static PATTERNS: OnceLock<ConditionPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ConditionPatterns {
        greater: Regex::new(r"(\w+) is greater than (\d+)").expect("static condition pattern"),
        less: Regex::new(r"(\w+) is less than (\d+)").expect("static condition pattern"),
        equals_text: Regex::new(r#"(\w+) equals? ['"](.+?)['"]"#).expect("static condition pattern"),
        equals_int: Regex::new(r"(\w+) equals? (\d+)").expect("static condition pattern"),
    })
}

/// Evaluate a condition phrase against current variable state.
///
/// Unrecognized phrases evaluate to `true`: a deliberate default-pass
/// policy so that a block with a malformed condition runs instead of
/// silently disappearing. Flagged for review rather than changed.
pub fn evaluate_condition(ctx: &ExecutionContext, condition: &str) -> bool {
    let p = patterns();

    if let Some(caps) = p.greater.captures(condition) {
        let threshold: f64 = caps[2].parse().unwrap_or(0.0);
        let result = ctx
            .variables
            .get(&caps[1])
            .and_then(|v| v.coerce_number())
            .map(|n| n > threshold)
            .unwrap_or(false);
        trace_log!("exec", "condition '{}' -> {}", condition, result);
        return result;
    }

    if let Some(caps) = p.less.captures(condition) {
        let threshold: f64 = caps[2].parse().unwrap_or(0.0);
        let result = ctx
            .variables
            .get(&caps[1])
            .and_then(|v| v.coerce_number())
            .map(|n| n < threshold)
            .unwrap_or(false);
        trace_log!("exec", "condition '{}' -> {}", condition, result);
        return result;
    }

    if let Some(caps) = p.equals_text.captures(condition) {
        let result = ctx
            .variables
            .get(&caps[1])
            .map(|v| v.to_string() == caps[2])
            .unwrap_or(false);
        trace_log!("exec", "condition '{}' -> {}", condition, result);
        return result;
    }

    if let Some(caps) = p.equals_int.captures(condition) {
        let expected: f64 = caps[2].parse().unwrap_or(0.0);
        let result = ctx
            .variables
            .get(&caps[1])
            .and_then(|v| v.coerce_number())
            .map(|n| n == expected)
            .unwrap_or(false);
        trace_log!("exec", "condition '{}' -> {}", condition, result);
        return result;
    }

    // Default-pass for unrecognized condition forms.
    trace_log!("exec", "condition '{}' unrecognized, defaulting true", condition);
    true
}
