use chrono::{DateTime, Utc};

use crate::entities::reading::{Reading, ReadingSource};
use pressure_log_data::models::StoredReading;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from domain entity to data model for a reading
pub fn convert_to_stored_reading(reading: &Reading) -> StoredReading {
    StoredReading {
        id: reading.id.clone(),
        systolic: reading.systolic,
        diastolic: reading.diastolic,
        pulse: reading.pulse,
        taken: reading.captured_at.to_rfc3339(),
        source: reading.source.as_str().to_string(),
        confidence: reading.confidence,
    }
}

/// Convert from data model to domain entity for a reading.
///
/// The data layer stores the timestamp and source as plain strings; a record
/// that does not map back cleanly is reported rather than silently repaired.
pub fn convert_to_domain_reading(stored: StoredReading) -> Result<Reading, String> {
    let captured_at = DateTime::parse_from_rfc3339(&stored.taken)
        .map_err(|_| format!("Invalid timestamp in stored reading: {}", stored.taken))?
        .with_timezone(&Utc);

    let source = match stored.source.as_str() {
        "manual" => ReadingSource::Manual,
        "camera" => ReadingSource::Camera,
        other => return Err(format!("Unknown reading source: {}", other)),
    };

    Ok(Reading {
        id: stored.id,
        systolic: stored.systolic,
        diastolic: stored.diastolic,
        pulse: stored.pulse,
        captured_at,
        source,
        confidence: stored.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_reading() -> Reading {
        Reading {
            id: "123e4567-e89b-12d3-a456-426614174000".to_string(),
            systolic: 118,
            diastolic: 76,
            pulse: 64,
            captured_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
            source: ReadingSource::Camera,
            confidence: Some(0.88),
        }
    }

    #[test]
    fn test_stored_round_trip_preserves_every_field() {
        let reading = make_reading();

        let stored = convert_to_stored_reading(&reading);
        let back = convert_to_domain_reading(stored).unwrap();

        assert_eq!(back, reading);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let mut stored = convert_to_stored_reading(&make_reading());
        stored.source = "telepathy".to_string();

        let result = convert_to_domain_reading(stored);
        assert!(result.unwrap_err().contains("Unknown reading source"));
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let mut stored = convert_to_stored_reading(&make_reading());
        stored.taken = "2024-03-01 08:30:00".to_string();

        let result = convert_to_domain_reading(stored);
        assert!(result.unwrap_err().contains("Invalid timestamp"));
    }
}
