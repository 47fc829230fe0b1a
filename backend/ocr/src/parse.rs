//! Inspection-report text parser.
//!
//! Turns raw OCR output into the fixed set of labeled report fields.
//! Parsing never fails; a field the OCR pass didn't find stays an empty
//! string.

use once_cell::sync::Lazy;
use regex::Regex;

use vinforge_core::{FieldLabel, OcrFieldSet};

/// A label candidate (letters, spaces, slashes) followed by a colon-or-space
/// separator and the rest of the line.
static LABEL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z /]+)[: ]+(.*)$").unwrap());

/// Parse one OCR pass's raw text into labeled fields.
///
/// Lines whose label is unknown are treated as unlabeled prose. A line that
/// doesn't look like a label at all becomes the value of the most recently
/// set field, but only while that field's value is still empty — OCR
/// sometimes wraps a value onto its own line.
pub fn parse_fields(raw: &str) -> OcrFieldSet {
    let mut fields = OcrFieldSet::new();
    // Continuation target for value-on-next-line handling. Local to this
    // call; the parser keeps no state between invocations.
    let mut last_field: Option<FieldLabel> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = LABEL_LINE_RE.captures(line) {
            let label = normalize_label(&caps[1]);
            match FieldLabel::from_normalized(&label) {
                Some(known) => {
                    fields.set(known, caps[2].trim());
                    last_field = Some(known);
                }
                None => {
                    // Unrelated text; don't let it leak into the last field.
                    last_field = None;
                }
            }
        } else if let Some(pending) = last_field {
            if fields.get(pending).is_empty() {
                fields.set(pending, line);
            }
        }
    }

    fields.trim_values();
    fields
}

/// Lowercase, collapse runs of whitespace to single spaces, trim.
fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Test ID: 4421897\n\
eVIN: 1FTEX1EP7JKE00001\n\
User VIN: 1FTEX1EP7JKE00001\n\
License Plate: 7ABC123\n\
Test Type: Smog Check\n\
Protocol: OBD\n\
Test Result: PASS\n\
Test Date/Time: 2024-03-08 10:42\n";

    #[test]
    fn parses_all_labeled_lines() {
        let fields = parse_fields(SAMPLE);
        assert_eq!(fields.get(FieldLabel::TestId), "4421897");
        assert_eq!(fields.get(FieldLabel::Evin), "1FTEX1EP7JKE00001");
        assert_eq!(fields.get(FieldLabel::UserVin), "1FTEX1EP7JKE00001");
        assert_eq!(fields.get(FieldLabel::LicensePlate), "7ABC123");
        assert_eq!(fields.get(FieldLabel::TestType), "Smog Check");
        assert_eq!(fields.get(FieldLabel::Protocol), "OBD");
        assert_eq!(fields.get(FieldLabel::TestResult), "PASS");
        assert_eq!(fields.get(FieldLabel::TestDateTime), "2024-03-08 10:42");
    }

    #[test]
    fn is_idempotent_for_identical_input() {
        let first = parse_fields(SAMPLE);
        let second = parse_fields(SAMPLE);
        for label in FieldLabel::ALL {
            assert_eq!(first.get(label), second.get(label));
        }
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let fields = parse_fields("EVIN: 1FTEX1EP7JKE00001\nLICENSE PLATE: 8XYZ900");
        assert_eq!(fields.get(FieldLabel::Evin), "1FTEX1EP7JKE00001");
        assert_eq!(fields.get(FieldLabel::LicensePlate), "8XYZ900");
    }

    #[test]
    fn collapses_spaces_inside_labels() {
        let fields = parse_fields("License   Plate: 7ABC123");
        assert_eq!(fields.get(FieldLabel::LicensePlate), "7ABC123");
    }

    #[test]
    fn continuation_line_fills_empty_field_once() {
        let fields = parse_fields("eVIN:\n1FTEX1EP7JKE00001\n2GCEK19T0Y1000002");
        // The first bare line completes eVIN; the second must not overwrite it.
        assert_eq!(fields.get(FieldLabel::Evin), "1FTEX1EP7JKE00001");
    }

    #[test]
    fn unknown_label_clears_continuation_state() {
        let fields = parse_fields("eVIN:\nStation Address: 12 Main St\n1FTEX1EP7JKE00001");
        // "Station Address" is an unknown label, so the trailing bare line
        // must not be attributed to eVIN.
        assert_eq!(fields.get(FieldLabel::Evin), "");
    }

    #[test]
    fn missing_vin_labels_stay_empty() {
        let fields = parse_fields("License Plate: 7ABC123");
        assert_eq!(fields.get(FieldLabel::Evin), "");
        assert_eq!(fields.get(FieldLabel::UserVin), "");
        assert_eq!(fields.get(FieldLabel::LicensePlate), "7ABC123");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let fields = parse_fields("\n\n   \nTest Result: PASS\n\n");
        assert_eq!(fields.get(FieldLabel::TestResult), "PASS");
    }
}
