use crate::entities::{FieldCandidate, FieldKind};

/// Turn one raw token (form text, route parameter, recognized fragment) into
/// a typed candidate for the validator.
///
/// Pure and total: every failure mode is represented as an absent
/// `parsed_value` for the validator to inspect, never an error or a panic.
pub fn parse_field(raw_text: &str, field_kind: FieldKind) -> FieldCandidate {
    let trimmed = raw_text.trim();

    // Blood pressure and pulse values are always positive, so an explicit
    // sign is malformed rather than stripped. Leading zeros are accepted
    // and normalized by the integer parse.
    let parsed_value = if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // A digit string too long for u32 is far outside any clinical range;
        // saturate so the range check reports it instead of "not a number".
        Some(trimmed.parse::<u32>().unwrap_or(u32::MAX))
    } else {
        None
    };

    FieldCandidate {
        raw_text: raw_text.to_string(),
        parsed_value,
        field_kind,
        confidence: None,
    }
}
