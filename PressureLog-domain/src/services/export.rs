use chrono::{DateTime, Utc};

use crate::entities::Reading;

/// Header line for exported readings
const CSV_HEADER: &str = "taken,systolic,diastolic,pulse,source,confidence";

/// Render the readings taken within the inclusive range as CSV, one line
/// per reading, in input order.
///
/// Every column is numeric, a timestamp or a fixed label, so no quoting is
/// needed; the confidence column is empty for manual readings.
pub fn readings_to_csv(
    readings: &[Reading],
    from_inclusive: DateTime<Utc>,
    to_inclusive: DateTime<Utc>,
) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for reading in readings {
        if reading.captured_at < from_inclusive || reading.captured_at > to_inclusive {
            continue;
        }

        let confidence = reading
            .confidence
            .map(|c| format!("{:.2}", c))
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            reading.captured_at.to_rfc3339(),
            reading.systolic,
            reading.diastolic,
            reading.pulse,
            reading.source.as_str(),
            confidence,
        ));
    }

    out
}
