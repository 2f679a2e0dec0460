//! Per-line field extraction.
//!
//! Each matcher is a pure function over one line of text. They run in a fixed
//! order (range, unit, value, qualitative) and every later matcher is told
//! which spans the earlier ones already claimed, so two kinds never overlap.

use regex::Regex;

use super::line_classifier::CandidateLine;
use super::patterns::{
    BOUND_REGEX, INTERVAL_REGEX, LIST_NUMBERING_REGEX, NAME_LETTERS_REGEX, QUALITATIVE_REGEX,
    UNIT_REGEX, UP_TO_REGEX, VALUE_TOKEN_REGEX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Value,
    Unit,
    Range,
}

/// A substring of a line recognized as one field, with byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub kind: FieldKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl FieldMatch {
    fn new(kind: FieldKind, line: &str, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: line[start..end].to_string(),
            start,
            end,
        }
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Everything extracted from one candidate line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFields {
    pub value: Option<FieldMatch>,
    pub unit: Option<FieldMatch>,
    pub range: Option<FieldMatch>,
    /// Text before the earliest field, cleaned
    pub name: Option<String>,
    /// Free text that may name the test on the following line
    pub residual: Option<String>,
}

impl LineFields {
    /// A line opens a record only when it has a value or a range.
    pub fn has_measurement(&self) -> bool {
        self.value.is_some() || self.range.is_some()
    }

    pub fn matches(&self) -> Vec<&FieldMatch> {
        [&self.range, &self.unit, &self.value]
            .into_iter()
            .flatten()
            .collect()
    }
}

pub fn extract_fields(line: &CandidateLine) -> LineFields {
    extract_fields_from_text(&line.text)
}

pub fn extract_fields_from_text(line: &str) -> LineFields {
    let mut range = match_range(line);
    let unit = match_unit(line, &claimed(&[&range]));

    let mut value = match_value(line, &claimed(&[&range, &unit]), unit.as_ref());
    if value.is_none() {
        let (qualitative_value, qualitative_range) =
            match_qualitative(line, &claimed(&[&range, &unit]));
        value = qualitative_value;
        if range.is_none() {
            range = qualitative_range;
        }
    }

    let mut fields = LineFields {
        value,
        unit,
        range,
        name: None,
        residual: None,
    };

    let spans: Vec<(usize, usize)> = fields.matches().iter().map(|m| (m.start, m.end)).collect();
    if let Some(first) = spans.iter().map(|(start, _)| *start).min() {
        fields.name = clean_name(&line[..first]);
        if fields.has_measurement() {
            let last = spans.iter().map(|(_, end)| *end).max().unwrap_or(first);
            fields.residual = clean_name(&line[last..]);
        }
    } else {
        fields.residual = clean_name(line);
    }

    fields
}

fn claimed(fields: &[&Option<FieldMatch>]) -> Vec<FieldMatch> {
    fields.iter().filter_map(|f| (*f).clone()).collect()
}

fn overlaps_any(taken: &[FieldMatch], start: usize, end: usize) -> bool {
    taken.iter().any(|m| m.overlaps(start, end))
}

fn char_before(line: &str, idx: usize) -> Option<char> {
    line[..idx].chars().next_back()
}

fn char_after(line: &str, idx: usize) -> Option<char> {
    line[idx..].chars().next()
}

/// A number must not be glued to a word, another number, or a path.
fn numeric_start_ok(line: &str, start: usize) -> bool {
    match char_before(line, start) {
        None => true,
        Some(c) => !(c.is_alphanumeric() || matches!(c, '.' | '-' | '/' | ',')),
    }
}

/// `12-03` in `12-03-2024` is the start of a date, not an interval.
fn continues_as_date(line: &str, end: usize) -> bool {
    let mut rest = line[end..].chars();
    matches!(
        (rest.next(), rest.next()),
        (Some('-' | '/'), Some(c)) if c.is_ascii_digit()
    )
}

/// Reference range: interval first, then one-sided bounds, then "up to".
///
/// Within one pattern the rightmost match wins, because the reference column
/// is printed last on a result row.
pub fn match_range(line: &str) -> Option<FieldMatch> {
    let interval = rightmost(line, &INTERVAL_REGEX, |start, end| {
        numeric_start_ok(line, start)
            && !matches!(char_after(line, end), Some(c) if c.is_ascii_digit() || c == '.')
            && !continues_as_date(line, end)
    });

    interval
        .or_else(|| {
            rightmost(line, &BOUND_REGEX, |_, end| {
                !matches!(char_after(line, end), Some(c) if c.is_ascii_digit() || c == '.')
            })
        })
        .or_else(|| rightmost(line, &UP_TO_REGEX, |_, _| true))
        .map(|(start, end)| FieldMatch::new(FieldKind::Range, line, start, end))
}

fn rightmost(
    line: &str,
    re: &Regex,
    accept: impl Fn(usize, usize) -> bool,
) -> Option<(usize, usize)> {
    re.find_iter(line)
        .map(|m| (m.start(), m.end()))
        .filter(|(start, end)| accept(*start, *end))
        .last()
}

/// First unit from the vocabulary that is not glued to surrounding letters.
pub fn match_unit(line: &str, taken: &[FieldMatch]) -> Option<FieldMatch> {
    UNIT_REGEX
        .find_iter(line)
        .filter(|m| !overlaps_any(taken, m.start(), m.end()))
        .find(|m| {
            let before_ok = !matches!(char_before(line, m.start()), Some(c) if c.is_alphabetic());
            // trailing punctuation after a unit is tolerated
            let rest = line[m.end()..].trim_start_matches(['.', ',', ';', ':']);
            let after_ok = !matches!(rest.chars().next(), Some(c) if c.is_alphanumeric());
            before_ok && after_ok
        })
        .map(|m| FieldMatch::new(FieldKind::Unit, line, m.start(), m.end()))
}

/// Numeric value token.
///
/// Tokens inside an already-claimed span or glued to letters are skipped.
/// Tokens printed before the unit/range are preferred; among them the one
/// closest to the start of the line wins.
pub fn match_value(
    line: &str,
    taken: &[FieldMatch],
    unit: Option<&FieldMatch>,
) -> Option<FieldMatch> {
    let candidates: Vec<FieldMatch> = VALUE_TOKEN_REGEX
        .find_iter(line)
        .filter(|m| !overlaps_any(taken, m.start(), m.end()))
        .filter(|m| numeric_start_ok(line, m.start()))
        .filter(|m| {
            let glued_unit = unit.is_some_and(|u| u.start == m.end());
            glued_unit
                || match char_after(line, m.end()) {
                    None => true,
                    Some(c) => c.is_whitespace() || matches!(c, ',' | ';' | ':' | ')' | ']' | '*' | '|'),
                }
        })
        .map(|m| FieldMatch::new(FieldKind::Value, line, m.start(), m.end()))
        .collect();

    let anchor = taken.iter().map(|m| m.start).min();
    let preferred = anchor.and_then(|anchor| candidates.iter().find(|c| c.end <= anchor));

    preferred.or_else(|| candidates.first()).cloned()
}

/// Qualitative words inside a name (`C-Reactive`) do not count.
fn qualitative_start_ok(line: &str, start: usize) -> bool {
    !matches!(char_before(line, start), Some(c) if c.is_alphanumeric() || c == '-')
}

/// Qualitative result such as "Positive" or "Non Reactive", with the printed
/// qualitative reference when one follows it directly.
///
/// The result column comes after the name, so the search works from the end
/// of the line: the last qualitative word is the result, unless the word
/// right before it (with nothing but spacing in between) is also
/// qualitative, in which case that one is the result and the last is the
/// reference.
pub fn match_qualitative(
    line: &str,
    taken: &[FieldMatch],
) -> (Option<FieldMatch>, Option<FieldMatch>) {
    let found: Vec<(usize, usize)> = QUALITATIVE_REGEX
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .filter(|(start, end)| !overlaps_any(taken, *start, *end))
        .filter(|(start, _)| qualitative_start_ok(line, *start))
        .collect();

    let Some(&(last_start, last_end)) = found.last() else {
        return (None, None);
    };

    let paired = found
        .len()
        .checked_sub(2)
        .map(|i| found[i])
        .filter(|(_, prev_end)| !line[*prev_end..last_start].chars().any(char::is_alphanumeric));

    match paired {
        Some((start, end)) => (
            Some(FieldMatch::new(FieldKind::Value, line, start, end)),
            Some(FieldMatch::new(FieldKind::Range, line, last_start, last_end)),
        ),
        None => (
            Some(FieldMatch::new(FieldKind::Value, line, last_start, last_end)),
            None,
        ),
    }
}

/// Strip list numbering and stray punctuation; `None` unless the remainder
/// looks like a word.
pub fn clean_name(fragment: &str) -> Option<String> {
    let fragment = fragment.trim();
    let fragment = LIST_NUMBERING_REGEX.replace(fragment, "");
    let cleaned = fragment
        .trim_start_matches(|c: char| !c.is_alphanumeric() && c != '(')
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')')
        .trim();

    if NAME_LETTERS_REGEX.is_match(cleaned) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(m: &Option<FieldMatch>) -> Option<&str> {
        m.as_ref().map(|m| m.text.as_str())
    }

    #[test]
    fn test_standard_result_row() {
        let fields = extract_fields_from_text("HEMOGLOBIN 14.5 g/dL 13.5-17.5");
        assert_eq!(fields.name.as_deref(), Some("HEMOGLOBIN"));
        assert_eq!(text(&fields.value), Some("14.5"));
        assert_eq!(text(&fields.unit), Some("g/dL"));
        assert_eq!(text(&fields.range), Some("13.5-17.5"));
        assert_eq!(fields.residual, None);
    }

    #[test]
    fn test_offsets_point_into_the_line() {
        let line = "HEMOGLOBIN 14.5 g/dL 13.5-17.5";
        let fields = extract_fields_from_text(line);
        let range = fields.range.unwrap();
        assert_eq!(&line[range.start..range.end], "13.5-17.5");
        assert_eq!(range.kind, FieldKind::Range);
    }

    #[test]
    fn test_bound_range() {
        let fields = extract_fields_from_text("C-Reactive Protein 16.17 mg/L <0.5");
        assert_eq!(fields.name.as_deref(), Some("C-Reactive Protein"));
        assert_eq!(text(&fields.value), Some("16.17"));
        assert_eq!(text(&fields.unit), Some("mg/L"));
        assert_eq!(text(&fields.range), Some("<0.5"));
    }

    #[test]
    fn test_up_to_range() {
        let fields = extract_fields_from_text("SGPT (ALT) 28 U/L Up to 40");
        assert_eq!(fields.name.as_deref(), Some("SGPT (ALT)"));
        assert_eq!(text(&fields.value), Some("28"));
        assert_eq!(text(&fields.range), Some("Up to 40"));
    }

    #[test]
    fn test_digits_inside_names_are_not_values() {
        let fields = extract_fields_from_text("Vitamin B12 450 pg/mL 200-900");
        assert_eq!(fields.name.as_deref(), Some("Vitamin B12"));
        assert_eq!(text(&fields.value), Some("450"));

        let fields = extract_fields_from_text("HbA1c 5.6 % 4.0-5.6");
        assert_eq!(fields.name.as_deref(), Some("HbA1c"));
        assert_eq!(text(&fields.value), Some("5.6"));
        assert_eq!(text(&fields.unit), Some("%"));
        assert_eq!(text(&fields.range), Some("4.0-5.6"));
    }

    #[test]
    fn test_hyphenated_name_prefix_is_not_a_value() {
        let fields = extract_fields_from_text("25-OH Vitamin D 32 ng/mL 30-100");
        assert_eq!(text(&fields.value), Some("32"));
        assert_eq!(text(&fields.range), Some("30-100"));
        assert_eq!(fields.name.as_deref(), Some("25-OH Vitamin D"));
    }

    #[test]
    fn test_thousands_separators() {
        let fields = extract_fields_from_text("Total Leucocyte Count 7,500 cells/cumm 4,000-11,000");
        assert_eq!(text(&fields.value), Some("7,500"));
        assert_eq!(text(&fields.unit), Some("cells/cumm"));
        assert_eq!(text(&fields.range), Some("4,000-11,000"));
    }

    #[test]
    fn test_rightmost_interval_is_the_range() {
        let fields = extract_fields_from_text("Pus Cells 4-5 /hpf 0-5");
        assert_eq!(text(&fields.range), Some("0-5"));
        assert_eq!(text(&fields.value), Some("4-5"));
        assert_eq!(text(&fields.unit), Some("/hpf"));
        assert_eq!(fields.name.as_deref(), Some("Pus Cells"));
    }

    #[test]
    fn test_unit_glued_to_value() {
        let fields = extract_fields_from_text("Hemoglobin 11.2g/dL 12.0-15.5");
        assert_eq!(text(&fields.value), Some("11.2"));
        assert_eq!(text(&fields.unit), Some("g/dL"));
    }

    #[test]
    fn test_unit_not_matched_inside_words() {
        let fields = extract_fields_from_text("Fluid Volume 20 mL");
        assert_eq!(fields.unit, None);
        assert_eq!(text(&fields.value), Some("20"));
        assert_eq!(fields.name.as_deref(), Some("Fluid Volume"));
    }

    #[test]
    fn test_qualitative_value_and_range() {
        let fields = extract_fields_from_text("HIV I & II Antibody Non Reactive Non Reactive");
        assert_eq!(fields.name.as_deref(), Some("HIV I & II Antibody"));
        assert_eq!(text(&fields.value), Some("Non Reactive"));
        assert_eq!(text(&fields.range), Some("Non Reactive"));
    }

    #[test]
    fn test_qualitative_value_without_range() {
        let fields = extract_fields_from_text("Urine Ketones Positive");
        assert_eq!(text(&fields.value), Some("Positive"));
        assert_eq!(fields.range, None);
    }

    #[test]
    fn test_qualitative_word_inside_name_is_not_the_result() {
        let fields = extract_fields_from_text("C-Reactive Protein Negative");
        assert_eq!(fields.name.as_deref(), Some("C-Reactive Protein"));
        assert_eq!(text(&fields.value), Some("Negative"));
        assert_eq!(fields.range, None);
    }

    #[test]
    fn test_last_qualitative_word_is_the_result() {
        let fields = extract_fields_from_text("Gram Positive Cocci Present");
        assert_eq!(fields.name.as_deref(), Some("Gram Positive Cocci"));
        assert_eq!(text(&fields.value), Some("Present"));
        assert_eq!(fields.range, None);
    }

    #[test]
    fn test_date_is_not_an_interval() {
        let fields = extract_fields_from_text("Collected 12-03-2024");
        assert_eq!(fields.range, None);
        let fields = extract_fields_from_text("Drawn 12/03/2024");
        assert_eq!(fields.range, None);
    }

    #[test]
    fn test_name_only_line_is_residual() {
        let fields = extract_fields_from_text("Total Leucocyte Count (TLC):");
        assert!(!fields.has_measurement());
        assert_eq!(fields.name, None);
        assert_eq!(fields.residual.as_deref(), Some("Total Leucocyte Count (TLC)"));
    }

    #[test]
    fn test_range_only_line() {
        let fields = extract_fields_from_text("13.5-17.5");
        assert!(fields.has_measurement());
        assert_eq!(fields.value, None);
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_trailing_text_becomes_residual() {
        let fields = extract_fields_from_text("Glucose 98 mg/dL 70-110 Post Prandial");
        assert_eq!(fields.name.as_deref(), Some("Glucose"));
        assert_eq!(fields.residual.as_deref(), Some("Post Prandial"));
    }

    #[test]
    fn test_no_fields_in_noise() {
        let fields = extract_fields_from_text("@@ ## !!");
        assert!(!fields.has_measurement());
        assert_eq!(fields.unit, None);
        assert_eq!(fields.residual, None);
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("1. Hemoglobin :").as_deref(), Some("Hemoglobin"));
        assert_eq!(clean_name("  Hematocrit ( ").as_deref(), Some("Hematocrit"));
        assert_eq!(clean_name("(PCV) Packed Cell Volume -").as_deref(), Some("(PCV) Packed Cell Volume"));
        assert_eq!(clean_name("12 -"), None);
        assert_eq!(clean_name(""), None);
    }

    #[test]
    fn test_matchers_never_overlap() {
        let lines = [
            "HEMOGLOBIN 14.5 g/dL 13.5-17.5",
            "Pus Cells 4-5 /hpf 0-5",
            "Platelet Count 2.5 lakhs/cumm 1.5-4.5",
            "WBC 7.2 10^3/uL 4.0-11.0",
        ];
        for line in lines {
            let fields = extract_fields_from_text(line);
            let matches = fields.matches();
            for (i, a) in matches.iter().enumerate() {
                for b in matches.iter().skip(i + 1) {
                    assert!(!a.overlaps(b.start, b.end), "{line}: {a:?} overlaps {b:?}");
                }
            }
        }
    }
}
