use tracing::debug;

use super::field_extractor::{extract_fields, LineFields};
use super::line_classifier::CandidateLine;
use crate::models::TestRecord;

/// Name fragment left over from the previous candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingName {
    position: usize,
    text: String,
}

/// State threaded through the fold over candidate lines.
///
/// Only ever holds the residual of the line just processed; it is replaced on
/// every step and cleared when a record consumes it.
#[derive(Debug, Default)]
pub struct CarryOver {
    pending: Option<PendingName>,
}

impl CarryOver {
    /// Take the pending name if it came from the line directly above `line`.
    fn take_for(&mut self, line: &CandidateLine) -> Option<String> {
        self.pending
            .take()
            .filter(|pending| line.follows(pending.position))
            .map(|pending| pending.text)
    }

    fn replaced_by(line: &CandidateLine, residual: Option<String>) -> Self {
        Self {
            pending: residual.map(|text| PendingName {
                position: line.position,
                text,
            }),
        }
    }
}

/// Build one record from a line's fields, returning the carry-over for the
/// next line. Lines without a value or range produce no record.
pub fn assemble_line(
    line: &CandidateLine,
    fields: LineFields,
    mut carry: CarryOver,
) -> (Option<TestRecord>, CarryOver) {
    if !fields.has_measurement() {
        return (None, CarryOver::replaced_by(line, fields.residual));
    }

    let test_name = match fields.name {
        Some(name) => Some(name),
        None => {
            let carried = carry.take_for(line);
            if carried.is_some() {
                debug!("Line {} takes its name from the previous line", line.position);
            }
            carried
        }
    };

    let record = TestRecord {
        test_name,
        test_value: fields.value.map(|m| m.text),
        bio_reference_range: fields.range.map(|m| m.text),
        test_unit: fields.unit.map(|m| m.text),
        ..Default::default()
    };

    let next = CarryOver::replaced_by(line, fields.residual);
    (Some(record).filter(TestRecord::has_measurement), next)
}

/// Left-to-right fold over candidate lines producing records in line order.
pub fn assemble(lines: &[CandidateLine]) -> Vec<TestRecord> {
    let (records, _) = lines.iter().fold(
        (Vec::new(), CarryOver::default()),
        |(mut records, carry), line| {
            let fields = extract_fields(line);
            let (record, carry) = assemble_line(line, fields, carry);
            records.extend(record);
            (records, carry)
        },
    );
    records
}
