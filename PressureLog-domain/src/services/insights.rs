use serde::{Deserialize, Serialize};

use crate::entities::Reading;

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 Hypertension (systolic ≥ 140 or diastolic ≥ 90)
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 and/or diastolic ≥ 120)
    HypertensiveCrisis,
}

/// Categorize blood pressure based on measurements
pub fn categorize(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic >= 180 || diastolic >= 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120 && diastolic < 80 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

/// Aggregate statistics over a snapshot of readings, for the table header
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReadingsSummary {
    /// Average systolic reading
    pub avg_systolic: f64,

    /// Average diastolic reading
    pub avg_diastolic: f64,

    /// Average pulse rate
    pub avg_pulse: f64,

    /// Highest recorded systolic reading
    pub max_systolic: u16,

    /// Lowest recorded systolic reading
    pub min_systolic: u16,

    /// Highest recorded diastolic reading
    pub max_diastolic: u16,

    /// Lowest recorded diastolic reading
    pub min_diastolic: u16,

    /// Category of the average pressures
    pub category: BloodPressureCategory,

    /// Number of readings summarized
    pub reading_count: usize,
}

/// Summarize a snapshot of readings; `None` when there is nothing to show
pub fn summarize(readings: &[Reading]) -> Option<ReadingsSummary> {
    if readings.is_empty() {
        return None;
    }

    let mut sum_systolic = 0.0;
    let mut sum_diastolic = 0.0;
    let mut sum_pulse = 0.0;

    let mut max_systolic = u16::MIN;
    let mut min_systolic = u16::MAX;
    let mut max_diastolic = u16::MIN;
    let mut min_diastolic = u16::MAX;

    for reading in readings {
        sum_systolic += reading.systolic as f64;
        sum_diastolic += reading.diastolic as f64;
        sum_pulse += reading.pulse as f64;

        max_systolic = max_systolic.max(reading.systolic);
        min_systolic = min_systolic.min(reading.systolic);
        max_diastolic = max_diastolic.max(reading.diastolic);
        min_diastolic = min_diastolic.min(reading.diastolic);
    }

    let count = readings.len();
    let avg_systolic = sum_systolic / count as f64;
    let avg_diastolic = sum_diastolic / count as f64;

    Some(ReadingsSummary {
        avg_systolic,
        avg_diastolic,
        avg_pulse: sum_pulse / count as f64,
        max_systolic,
        min_systolic,
        max_diastolic,
        min_diastolic,
        category: categorize(avg_systolic as u16, avg_diastolic as u16),
        reading_count: count,
    })
}
