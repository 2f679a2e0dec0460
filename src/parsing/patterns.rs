//! Pre-compiled regular expressions shared by the parsing stages.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Integer or decimal with optional sign and optional thousands separators.
pub(crate) const NUMBER: &str = r"[-+]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";

/// Same as [`NUMBER`] without the sign; used for the upper bound of an interval.
pub(crate) const UNSIGNED_NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";

/// Header, footer and boilerplate lines found on printed lab reports.
///
/// Each entry is compiled case-insensitively and matched against the trimmed line.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Table header rows
    r"^test(?:\s*name)?\s+(?:result|value|observed\s+value)s?\b.*\bunits?\b",
    r"^(?:investigations?|parameters?|test\s+descriptions?|tests?)\b.*\b(?:results?|values?)\b.*\b(?:ranges?|intervals?|units?)\b",
    r"^(?:bio\.?\s*)?ref(?:erence|\.)?\s*(?:range|interval)s?\s*$",
    // Separator rows
    r"^[-=_*~.\s]+$",
    // Page markers
    r"\bpage\s*:?\s*\d+\s*(?:of|/)\s*\d+\b",
    r"^page\s*[:#]?\s*\d+$",
    r"end\s+of\s+(?:the\s+)?report",
    // Signature blocks
    r"\b(?:authori[sz]ed|verified|approved|checked|electronically\s+signed)\s+(?:by|signatory)\b",
    r"\b(?:patho|micro|bio)logist\b",
    r"\btechnologist\b",
    r"\bsignature\b",
    r"^dr\.?\s+[a-z]+.*\b(?:md|mbbs|dnb|phd|dcp)\b",
    r"^dr\.?\s+\p{Alphabetic}[\p{Alphabetic}.,()&\s]*$",
    // Disclaimers
    r"computer[\s-]+generated",
    r"correlate\s+clinically|clinical\s+correlation",
    r"not\s+valid\s+for\s+medico[\s-]*legal",
    r"results?\s+(?:relate|pertain)s?\s+only\s+to",
    r"^interpret(?:ation|ive)?\b",
    r"\binterpret(?:ed)?\s+(?:with|in\s+(?:the\s+)?(?:light|context))\b",
    // Rows carrying a calendar date are collection/report metadata
    r"\b\d{1,2}-\d{1,2}-(?:\d{4}|\d{2})\b",
    r"\b\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})\b",
    r"\b\d{1,2}[-/\s](?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*[-/\s]\d{4}\b",
    // Patient and sample metadata rows
    r"^(?:patient(?:'s)?\s*(?:name|id)?|name|age(?:\s*/\s*(?:sex|gender))?|sex|gender|ref(?:erred)?\.?\s*by|referring\s+(?:doctor|physician)|consultant|lab\s*(?:no|id)\.?|reg(?:istration)?\.?\s*(?:no|id)\.?|uhid|mrn|bill\s*no\.?|sample\s*(?:id|no\.?|type)|specimen(?:\s+type)?|(?:sample\s+)?(?:collected|received|reported|registered)(?:\s+(?:on|at|date))?|date(?:\s+of\s+\w+)?|time)\s*:",
];

pub(crate) static DEFAULT_IGNORE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|pattern| {
            compile_case_insensitive(pattern).expect("default ignore pattern should be valid")
        })
        .collect()
});

/// Numeric interval such as `13.5-17.5` or `4,000 – 11,000`.
pub(crate) static INTERVAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({NUMBER})\s*[-–]\s*({UNSIGNED_NUMBER})"))
        .expect("interval regex should be valid")
});

/// One-sided bound such as `<0.5`, `>= 60` or `≤ 200`.
pub(crate) static BOUND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(<=|>=|=<|=>|≤|≥|<|>)\s*({UNSIGNED_NUMBER})"))
        .expect("bound regex should be valid")
});

/// `Up to 40` style upper bound.
pub(crate) static UP_TO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bup\s*to\s*({UNSIGNED_NUMBER})"))
        .expect("up-to regex should be valid")
});

/// Standalone numeric token. A compound `4-5` counts as a single token so that
/// it never gets split into two separate values.
pub(crate) static VALUE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{NUMBER}(?:-{UNSIGNED_NUMBER})?"))
        .expect("value token regex should be valid")
});

/// Qualitative results printed instead of a number.
pub(crate) static QUALITATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:not\s+detected|non[\s-]*reactive|detected|reactive|positive|negative|abnormal|normal|present|absent|nil|trace)\b",
    )
    .expect("qualitative regex should be valid")
});

/// Lab unit vocabulary. Longer spellings come first because the regex engine
/// takes the first alternative that matches at a position.
const UNIT_VOCABULARY: &[&str] = &[
    r"mL/min/1\.73\s?m(?:²|2)",
    r"thousands?/cu\.?\s?mm",
    r"millions?/cu\.?\s?mm",
    r"lakhs?/cu\.?\s?mm",
    r"cells/cu\.?\s?mm",
    r"cells/[µμu]L",
    r"(?:x\s?)?10\^?[36]/[µμu]L",
    r"mm/1st\s?hr",
    r"mm/hr",
    r"mEq/Litre",
    r"mEq/L",
    r"[mµμu]IU/mL",
    r"IU/mL",
    r"IU/L",
    r"U/mL",
    r"U/L",
    r"[µμu]mol/L",
    r"mmol/L",
    r"nmol/L",
    r"pmol/L",
    r"[µμu]g/dL",
    r"[µμu]g/L",
    r"gms?/dL",
    r"g/dL",
    r"mg/dL",
    r"mg/L",
    r"ng/mL",
    r"ng/dL",
    r"pg/mL",
    r"g/L",
    r"/cu\.?\s?mm",
    r"/[µμu]L",
    r"/hpf",
    r"H\.P\.F\.?",
    r"/lpf",
    r"fL",
    r"pg",
    r"seconds",
    r"secs?",
    r"%",
];

pub(crate) static UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternation = UNIT_VOCABULARY.join("|");
    compile_case_insensitive(&format!("(?:{alternation})")).expect("unit regex should be valid")
});

/// Leading list numbering such as `1.`, `12)` or `(3)`.
pub(crate) static LIST_NUMBERING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?\d{1,2}[.)]\s+").expect("list numbering regex should be valid")
});

/// At least two consecutive letters; anything less is not a usable test name.
pub(crate) static NAME_LETTERS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Alphabetic}{2,}").expect("name letters regex should be valid")
});

pub(crate) fn compile_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_default_patterns_compile() {
        assert_eq!(DEFAULT_IGNORE_REGEXES.len(), DEFAULT_IGNORE_PATTERNS.len());
    }

    #[test]
    fn test_unit_regex_prefers_longer_spelling() {
        let m = UNIT_REGEX.find("Platelets 2.5 lakhs/cumm").unwrap();
        assert_eq!(m.as_str(), "lakhs/cumm");
        let m = UNIT_REGEX.find("ALT 32 IU/L").unwrap();
        assert_eq!(m.as_str(), "IU/L");
    }

    #[test]
    fn test_interval_regex_handles_thousands() {
        let caps = INTERVAL_REGEX.captures("4,000-11,000").unwrap();
        assert_eq!(&caps[1], "4,000");
        assert_eq!(&caps[2], "11,000");
    }
}
