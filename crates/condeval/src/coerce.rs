//! Inter-kind coercion rules (§4.3).
//!
//! Every function here is total in the sense that it always produces either
//! a value or a [`ConvertError`] — never a panic — and every call emits a
//! trace line describing the attempt, indented to the evaluation depth it
//! ran at.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use condeval_lex::{TraceWriter, Version};

use crate::error::ConvertError;
use crate::value::{Value, ValueKind};

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn trace_success(trace: &dyn TraceWriter, depth: usize, kind: ValueKind, rendered: &str) {
    trace.verbose(&format!("{}=> ({}) {}", indent(depth), kind, rendered));
}

fn trace_failure(trace: &dyn TraceWriter, depth: usize, from: ValueKind, to: ValueKind) {
    trace.verbose(&format!("{}=> Unable to coerce {} to {}.", indent(depth), from, to));
}

/// Formats a number the way `to_string` does: shortest round-trip decimal,
/// trailing fractional zeros (and then a bare trailing `.`) stripped.
fn format_number(n: Decimal) -> String {
    let normalized = n.normalize();
    if normalized.is_zero() {
        "0".to_string()
    } else {
        normalized.to_string()
    }
}

/// Renders a value the way the String coercion does, for every kind that
/// coercion can't fail on. Used both by `to_string_value` and by trace
/// output for the other coercions.
fn render(value: &Value) -> String {
    match value {
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Version(v) => v.to_string(),
        Value::Null => String::new(),
        Value::Array(_) => "[Array]".to_string(),
        Value::Object(_) => "[Object]".to_string(),
    }
}

/// Boolean coercion never fails (§4.3).
pub fn to_boolean(value: &Value, trace: &dyn TraceWriter, depth: usize) -> bool {
    let result = match value {
        Value::Boolean(b) => *b,
        Value::Number(n) => !n.is_zero(),
        Value::String(s) => !s.is_empty(),
        Value::Version(_) | Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    };
    trace_success(trace, depth, ValueKind::Boolean, if result { "True" } else { "False" });
    result
}

fn parse_number_string(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    let without_commas: String = trimmed.chars().filter(|c| *c != ',').collect();
    let without_commas = without_commas.trim();
    let without_sign = without_commas.strip_prefix('+').unwrap_or(without_commas);
    Decimal::from_str(without_sign).ok()
}

pub fn to_number(value: &Value, trace: &dyn TraceWriter, depth: usize) -> Result<Decimal, ConvertError> {
    let result = match value {
        Value::Boolean(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Number(n) => Some(*n),
        Value::Null => Some(Decimal::ZERO),
        Value::String(s) => parse_number_string(s),
        Value::Version(_) | Value::Array(_) | Value::Object(_) => None,
    };
    match result {
        Some(n) => {
            trace_success(trace, depth, ValueKind::Number, &format_number(n));
            Ok(n)
        }
        None => {
            trace_failure(trace, depth, value.kind(), ValueKind::Number);
            Err(ConvertError {
                value: render(value),
                from_kind: value.kind(),
                to_kind: ValueKind::Number,
            })
        }
    }
}

pub fn to_string_value(value: &Value, trace: &dyn TraceWriter, depth: usize) -> Result<String, ConvertError> {
    match value {
        Value::Array(_) | Value::Object(_) => {
            trace_failure(trace, depth, value.kind(), ValueKind::String);
            Err(ConvertError {
                value: render(value),
                from_kind: value.kind(),
                to_kind: ValueKind::String,
            })
        }
        _ => {
            let rendered = render(value);
            trace_success(trace, depth, ValueKind::String, &rendered);
            Ok(rendered)
        }
    }
}

/// Converts a decimal to a 2-component version, honoring the signed
/// 32-bit range of the components it was distilled from (the version
/// type itself stores `u32`s, but `2147483648.1` — one past `i32::MAX` —
/// is defined to fail this particular conversion).
fn number_to_version(n: Decimal) -> Option<Version> {
    let text = format_number(n);
    let mut parts = text.split('.');
    let major = parts.next()?.parse::<i32>().ok()?;
    let minor = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Version::new(major as u32, minor as u32, None, None))
}

pub fn to_version(value: &Value, trace: &dyn TraceWriter, depth: usize) -> Result<Version, ConvertError> {
    let result = match value {
        Value::Version(v) => Some(*v),
        Value::Number(n) => number_to_version(*n),
        Value::String(s) => s.trim().parse::<Version>().ok(),
        Value::Boolean(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    match result {
        Some(v) => {
            trace_success(trace, depth, ValueKind::Version, &v.to_string());
            Ok(v)
        }
        None => {
            trace_failure(trace, depth, value.kind(), ValueKind::Version);
            Err(ConvertError {
                value: render(value),
                from_kind: value.kind(),
                to_kind: ValueKind::Version,
            })
        }
    }
}

/// `eq`'s rule: the left operand's kind determines the target kind; the
/// right operand is coerced toward it. A failed coercion means unequal, not
/// an error.
pub fn values_equal(left: &Value, right: &Value, trace: &dyn TraceWriter, depth: usize) -> bool {
    match left {
        Value::Boolean(l) => to_boolean(right, trace, depth) == *l,
        Value::Number(l) => to_number(right, trace, depth).map(|r| r == *l).unwrap_or(false),
        Value::String(l) => to_string_value(right, trace, depth)
            .map(|r| l.eq_ignore_ascii_case(&r))
            .unwrap_or(false),
        Value::Version(l) => to_version(right, trace, depth).map(|r| r == *l).unwrap_or(false),
        Value::Null => matches!(right, Value::Null),
        Value::Array(l) => matches!(right, Value::Array(r) if std::rc::Rc::ptr_eq(l, r)),
        Value::Object(l) => matches!(right, Value::Object(r) if std::rc::Rc::ptr_eq(l, r)),
    }
}

/// `lt`/`le`/`gt`/`ge`'s rule: the left operand is normalized to one of the
/// four ordered kinds (forcibly converted to Number if it is none of them),
/// then the right operand is forcibly converted to the left's kind.
pub fn compare_values(
    left: &Value,
    right: &Value,
    trace: &dyn TraceWriter,
    depth: usize,
) -> Result<Ordering, ConvertError> {
    let ordered_kind = match left.kind() {
        ValueKind::Boolean | ValueKind::Number | ValueKind::String | ValueKind::Version => left.kind(),
        ValueKind::Array | ValueKind::Object | ValueKind::Null => ValueKind::Number,
    };

    match ordered_kind {
        ValueKind::Boolean => {
            let l = to_boolean(left, trace, depth);
            let r = to_boolean(right, trace, depth);
            Ok(l.cmp(&r))
        }
        ValueKind::Number => {
            let l = to_number(left, trace, depth)?;
            let r = to_number(right, trace, depth)?;
            Ok(l.cmp(&r))
        }
        ValueKind::String => {
            let l = to_string_value(left, trace, depth)?;
            let r = to_string_value(right, trace, depth)?;
            Ok(l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase()))
        }
        ValueKind::Version => {
            let l = to_version(left, trace, depth)?;
            let r = to_version(right, trace, depth)?;
            l.partial_cmp(&r).ok_or_else(|| ConvertError {
                value: render(right),
                from_kind: ValueKind::Version,
                to_kind: ValueKind::Version,
            })
        }
        ValueKind::Array | ValueKind::Object | ValueKind::Null => unreachable!("normalized above"),
    }
}

/// Best-effort numeric coercion used for array indexing, where a String
/// index is tried as a number but a failure yields `Null` rather than a
/// `ConvertError` (§4.4).
pub fn to_index(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => *n,
        Value::String(s) if !s.is_empty() => Decimal::from_str(s.trim()).ok()?,
        _ => return None,
    };
    if !n.fract().is_zero() {
        return None;
    }
    n.to_i64()
}
