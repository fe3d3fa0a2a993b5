use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    FieldCandidate, FieldKind, Reading, ReadingSource, ValidationViolation, ViolationKind,
};

/// Clinically plausible bounds applied by the range checks.
/// Values outside these bounds are rejected, never clamped.
pub mod bounds {
    /// Lowest systolic pressure accepted, mmHg
    pub const SYSTOLIC_MIN: u32 = 60;

    /// Highest systolic pressure accepted, mmHg
    pub const SYSTOLIC_MAX: u32 = 260;

    /// Lowest diastolic pressure accepted, mmHg
    pub const DIASTOLIC_MIN: u32 = 30;

    /// Highest diastolic pressure accepted, mmHg
    pub const DIASTOLIC_MAX: u32 = 200;

    /// Pulse must be positive
    pub const PULSE_MIN: u32 = 1;

    /// Highest pulse accepted, bpm
    pub const PULSE_MAX: u32 = 299;
}

/// Inclusive (min, max) bounds for a field
fn field_bounds(kind: FieldKind) -> (u32, u32) {
    match kind {
        FieldKind::Systolic => (bounds::SYSTOLIC_MIN, bounds::SYSTOLIC_MAX),
        FieldKind::Diastolic => (bounds::DIASTOLIC_MIN, bounds::DIASTOLIC_MAX),
        FieldKind::Pulse => (bounds::PULSE_MIN, bounds::PULSE_MAX),
    }
}

/// Apply the domain rules to one candidate triple and construct the reading
/// when every rule passes.
///
/// Violations accumulate rather than short-circuit so a single submission
/// surfaces every problem at once instead of forcing resubmission per field.
pub fn validate(
    systolic: &FieldCandidate,
    diastolic: &FieldCandidate,
    pulse: &FieldCandidate,
    source: ReadingSource,
    captured_at: DateTime<Utc>,
) -> Result<Reading, Vec<ValidationViolation>> {
    let mut violations = Vec::new();

    for candidate in [systolic, diastolic, pulse] {
        match candidate.parsed_value {
            None => violations.push(ValidationViolation {
                field_kind: candidate.field_kind,
                kind: ViolationKind::NotANumber,
                raw_text: candidate.raw_text.clone(),
            }),
            Some(value) => {
                let (min, max) = field_bounds(candidate.field_kind);
                if value < min || value > max {
                    violations.push(ValidationViolation {
                        field_kind: candidate.field_kind,
                        kind: ViolationKind::OutOfRange,
                        raw_text: candidate.raw_text.clone(),
                    });
                }
            }
        }
    }

    // Fires even when both pressures individually passed their range checks
    if let (Some(sys), Some(dia)) = (systolic.parsed_value, diastolic.parsed_value) {
        if sys <= dia {
            violations.push(ValidationViolation {
                field_kind: FieldKind::Systolic,
                kind: ViolationKind::InternalInconsistency,
                raw_text: systolic.raw_text.clone(),
            });
        }
    }

    match (systolic.parsed_value, diastolic.parsed_value, pulse.parsed_value) {
        (Some(sys), Some(dia), Some(pul)) if violations.is_empty() => Ok(Reading {
            id: Uuid::new_v4().to_string(),
            systolic: sys as u16,
            diastolic: dia as u16,
            pulse: pul as u16,
            captured_at,
            source,
            confidence: weakest_confidence(source, [systolic, diastolic, pulse]),
        }),
        _ => Err(violations),
    }
}

/// Camera readings carry the weakest per-field recognition confidence;
/// manual submissions carry none
fn weakest_confidence(source: ReadingSource, candidates: [&FieldCandidate; 3]) -> Option<f32> {
    if source == ReadingSource::Manual {
        return None;
    }

    let mut weakest: Option<f32> = None;
    for candidate in candidates {
        if let Some(confidence) = candidate.confidence {
            weakest = Some(weakest.map_or(confidence, |w| w.min(confidence)));
        }
    }
    weakest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::parser::parse_field;
    use chrono::TimeZone;

    fn taken() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn manual(systolic: &str, diastolic: &str, pulse: &str) -> Result<Reading, Vec<ValidationViolation>> {
        validate(
            &parse_field(systolic, FieldKind::Systolic),
            &parse_field(diastolic, FieldKind::Diastolic),
            &parse_field(pulse, FieldKind::Pulse),
            ReadingSource::Manual,
            taken(),
        )
    }

    fn camera_candidate(raw: &str, kind: FieldKind, confidence: f32) -> FieldCandidate {
        let mut candidate = parse_field(raw, kind);
        candidate.confidence = Some(confidence);
        candidate
    }

    #[test]
    fn test_valid_triple_constructs_reading_with_exact_values() {
        let reading = manual("120", "80", "72").unwrap();

        assert_eq!(reading.systolic, 120);
        assert_eq!(reading.diastolic, 80);
        assert_eq!(reading.pulse, 72);
        assert_eq!(reading.source, ReadingSource::Manual);
        assert_eq!(reading.confidence, None);
        assert_eq!(reading.captured_at, taken());
    }

    #[test]
    fn test_each_reading_gets_its_own_id() {
        let first = manual("120", "80", "72").unwrap();
        let second = manual("120", "80", "72").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_malformed_field_reports_not_a_number_exactly_once() {
        let violations = manual("120", "low", "72").unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_kind, FieldKind::Diastolic);
        assert_eq!(violations[0].kind, ViolationKind::NotANumber);
        assert_eq!(violations[0].raw_text, "low");
    }

    #[test]
    fn test_all_malformed_fields_are_reported_together() {
        let violations = manual("", "abc", "-70").unwrap_err();

        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::NotANumber));
    }

    #[test]
    fn test_inverted_pressures_report_exactly_one_inconsistency() {
        // Both values pass their range checks individually
        let violations = manual("80", "120", "72").unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::InternalInconsistency);
    }

    #[test]
    fn test_equal_pressures_are_inconsistent() {
        let violations = manual("110", "110", "72").unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::InternalInconsistency);
    }

    #[test]
    fn test_out_of_range_accumulates_without_masking_valid_fields() {
        let violations = manual("300", "80", "72").unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_kind, FieldKind::Systolic);
        assert_eq!(violations[0].kind, ViolationKind::OutOfRange);
    }

    #[test]
    fn test_range_and_inconsistency_accumulate() {
        // In-range but inverted: only the inconsistency fires
        let violations = manual("70", "190", "72").unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::InternalInconsistency);

        // Everything wrong at once: all three range checks plus the
        // inconsistency, in field order
        let violations = manual("50", "210", "500").unwrap_err();
        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::OutOfRange,
                ViolationKind::OutOfRange,
                ViolationKind::OutOfRange,
                ViolationKind::InternalInconsistency,
            ]
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(manual("260", "200", "299").is_ok());
        assert!(manual("60", "30", "1").is_ok());
    }

    #[test]
    fn test_values_just_outside_bounds_are_rejected() {
        let violations = manual("59", "80", "72").unwrap_err();
        assert!(violations.iter().any(|v| {
            v.field_kind == FieldKind::Systolic && v.kind == ViolationKind::OutOfRange
        }));

        let violations = manual("261", "80", "72").unwrap_err();
        assert_eq!(violations[0].kind, ViolationKind::OutOfRange);

        let violations = manual("120", "29", "72").unwrap_err();
        assert_eq!(violations[0].field_kind, FieldKind::Diastolic);

        let violations = manual("120", "201", "72").unwrap_err();
        assert_eq!(violations[0].field_kind, FieldKind::Diastolic);

        let violations = manual("120", "80", "0").unwrap_err();
        assert_eq!(violations[0].field_kind, FieldKind::Pulse);

        let violations = manual("120", "80", "300").unwrap_err();
        assert_eq!(violations[0].field_kind, FieldKind::Pulse);
    }

    #[test]
    fn test_camera_reading_carries_weakest_confidence() {
        let reading = validate(
            &camera_candidate("124", FieldKind::Systolic, 0.95),
            &camera_candidate("82", FieldKind::Diastolic, 0.61),
            &camera_candidate("67", FieldKind::Pulse, 0.88),
            ReadingSource::Camera,
            taken(),
        )
        .unwrap();

        assert_eq!(reading.source, ReadingSource::Camera);
        assert_eq!(reading.confidence, Some(0.61));
    }

    #[test]
    fn test_manual_reading_never_carries_confidence() {
        // Even if candidates were tagged, manual submissions stay untagged
        let reading = validate(
            &camera_candidate("124", FieldKind::Systolic, 0.95),
            &camera_candidate("82", FieldKind::Diastolic, 0.61),
            &camera_candidate("67", FieldKind::Pulse, 0.88),
            ReadingSource::Manual,
            taken(),
        )
        .unwrap();

        assert_eq!(reading.confidence, None);
    }
}
