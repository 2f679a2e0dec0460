//! Decides whether a measured value lies outside its printed reference range.
//!
//! Both inputs stay raw strings on the record; they are only parsed here, for
//! the duration of one comparison. Anything that cannot be compared yields
//! [`RangeFlag::Unknown`] rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::{NUMBER, UNSIGNED_NUMBER};
use crate::models::RangeFlag;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRange {
    Interval { low: f64, high: f64 },
    LessThan { bound: f64, inclusive: bool },
    GreaterThan { bound: f64, inclusive: bool },
    TextualCategory(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Numeric(f64),
    Label(String),
}

static INTERVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({NUMBER})\s*[-–]\s*({UNSIGNED_NUMBER})$"))
        .expect("interval range regex should be valid")
});

static BOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(<=|>=|=<|=>|≤|≥|<|>)\s*({UNSIGNED_NUMBER})$"))
        .expect("bound range regex should be valid")
});

static UP_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^up\s*to\s*({UNSIGNED_NUMBER})$"))
        .expect("up-to range regex should be valid")
});

static CATEGORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{Alphabetic}[\p{Alphabetic}\s-]*$").expect("category regex should be valid")
});

/// Qualitative reference labels and the results that satisfy or violate them.
struct Category {
    label: &'static str,
    acceptable: &'static [&'static str],
    abnormal: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        label: "negative",
        acceptable: &["negative", "nil", "absent", "not detected", "non reactive"],
        abnormal: &["positive", "detected", "present", "reactive", "trace"],
    },
    Category {
        label: "normal",
        acceptable: &["normal"],
        abnormal: &["abnormal"],
    },
    Category {
        label: "non reactive",
        acceptable: &["non reactive", "negative"],
        abnormal: &["reactive", "positive"],
    },
    Category {
        label: "not detected",
        acceptable: &["not detected", "negative", "absent"],
        abnormal: &["detected", "positive", "present"],
    },
    Category {
        label: "absent",
        acceptable: &["absent", "nil", "negative", "not detected"],
        abnormal: &["present", "positive", "trace", "detected"],
    },
    Category {
        label: "nil",
        acceptable: &["nil", "absent", "negative", "not detected"],
        abnormal: &["present", "positive", "trace", "detected"],
    },
];

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Lowercase, hyphens as spaces, single spaces.
pub fn normalize_label(raw: &str) -> String {
    raw.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_range(raw: &str) -> Option<ParsedRange> {
    let raw = raw.trim();

    if let Some(caps) = INTERVAL.captures(raw) {
        let low = parse_number(&caps[1])?;
        let high = parse_number(&caps[2])?;
        // a reversed interval is more likely an OCR slip than a real range
        return (low <= high).then_some(ParsedRange::Interval { low, high });
    }

    if let Some(caps) = BOUND.captures(raw) {
        let bound = parse_number(&caps[2])?;
        return Some(match &caps[1] {
            "<" => ParsedRange::LessThan { bound, inclusive: false },
            "<=" | "=<" | "≤" => ParsedRange::LessThan { bound, inclusive: true },
            ">" => ParsedRange::GreaterThan { bound, inclusive: false },
            _ => ParsedRange::GreaterThan { bound, inclusive: true },
        });
    }

    if let Some(caps) = UP_TO.captures(raw) {
        let bound = parse_number(&caps[1])?;
        return Some(ParsedRange::LessThan { bound, inclusive: true });
    }

    if CATEGORY.is_match(raw) {
        return Some(ParsedRange::TextualCategory(normalize_label(raw)));
    }

    None
}

/// Numeric when possible (a leading comparator such as `<` is ignored),
/// otherwise a normalized label. Blank input yields `None`.
pub fn parse_value(raw: &str) -> Option<ParsedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let numeric = trimmed.trim_start_matches(['<', '>', '=', '≤', '≥']).trim();
    match parse_number(numeric) {
        Some(n) => Some(ParsedValue::Numeric(n)),
        None => Some(ParsedValue::Label(normalize_label(trimmed))),
    }
}

impl ParsedRange {
    pub fn evaluate(&self, value: &ParsedValue) -> RangeFlag {
        match (self, value) {
            (ParsedRange::Interval { low, high }, ParsedValue::Numeric(v)) => {
                RangeFlag::from_out_of_range(v < low || v > high)
            }
            (ParsedRange::LessThan { bound, inclusive }, ParsedValue::Numeric(v)) => {
                let within = if *inclusive { v <= bound } else { v < bound };
                RangeFlag::from_out_of_range(!within)
            }
            (ParsedRange::GreaterThan { bound, inclusive }, ParsedValue::Numeric(v)) => {
                let within = if *inclusive { v >= bound } else { v > bound };
                RangeFlag::from_out_of_range(!within)
            }
            (ParsedRange::TextualCategory(label), ParsedValue::Label(value)) => {
                evaluate_category(label, value)
            }
            _ => RangeFlag::Unknown,
        }
    }
}

fn evaluate_category(label: &str, value: &str) -> RangeFlag {
    let Some(category) = CATEGORIES.iter().find(|c| c.label == label) else {
        return RangeFlag::Unknown;
    };

    if category.acceptable.contains(&value) {
        RangeFlag::InRange
    } else if category.abnormal.contains(&value) {
        RangeFlag::OutOfRange
    } else {
        RangeFlag::Unknown
    }
}

/// Compare a raw value against a raw reference range.
pub fn evaluate(value: Option<&str>, range: Option<&str>) -> RangeFlag {
    let (Some(value), Some(range)) = (value, range) else {
        return RangeFlag::Unknown;
    };

    match (parse_value(value), parse_range(range)) {
        (Some(value), Some(range)) => range.evaluate(&value),
        _ => RangeFlag::Unknown,
    }
}
