// End-to-end tests for the capture pipeline, the storage seam and the
// presentation engine working together.

use chrono::{DateTime, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use pressure_log_data::repository::tests::MockReadingRepository;
use pressure_log_data::repository::{ReadingRepository, RepositoryError};
use pressure_log_domain::capture::{
    CaptureError, ImageFrame, ManualEntry, StubRecognitionEngine,
};
use pressure_log_domain::entities::{BoundingRegion, ReadingSource, TextFragment};
use pressure_log_domain::services::{
    build_view, ReadingsService, ReadingsServiceError, ReadingsServiceTrait, SortDirection,
    SortKey,
};

fn taken(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

fn entry(systolic: &str, diastolic: &str, pulse: &str, hour: u32) -> ManualEntry {
    ManualEntry {
        systolic: systolic.to_string(),
        diastolic: diastolic.to_string(),
        pulse: pulse.to_string(),
        taken: taken(hour),
    }
}

// 400x600 frame: systolic band y < 200, diastolic 200..400, pulse >= 400
fn frame() -> ImageFrame {
    ImageFrame {
        bytes: vec![0u8; 16],
        width: 400,
        height: 600,
    }
}

fn fragment(text: &str, y: u32, confidence: f32) -> TextFragment {
    TextFragment {
        text: text.to_string(),
        region: BoundingRegion { x: 40, y, width: 120, height: 60 },
        confidence,
    }
}

fn in_memory_service() -> ReadingsService<ReadingRepository, StubRecognitionEngine> {
    ReadingsService::new(ReadingRepository::new(), StubRecognitionEngine::empty())
}

#[tokio::test]
async fn manual_reading_survives_the_storage_round_trip() {
    let service = in_memory_service();

    let recorded = service
        .record_manual_entry(&entry("118", "76", "64", 8))
        .await
        .unwrap();

    let listed = service.list_readings().await.unwrap();
    assert_eq!(listed.len(), 1);

    // Field-by-field equality after save and retrieval
    let retrieved = &listed[0];
    assert_eq!(retrieved.id, recorded.id);
    assert_eq!(retrieved.systolic, 118);
    assert_eq!(retrieved.diastolic, 76);
    assert_eq!(retrieved.pulse, 64);
    assert_eq!(retrieved.captured_at, recorded.captured_at);
    assert_eq!(retrieved.source, ReadingSource::Manual);
    assert_eq!(retrieved.confidence, None);
}

#[tokio::test]
async fn captured_reading_flows_from_frame_to_view() {
    let engine = StubRecognitionEngine::with_fragments(vec![
        fragment("132", 40, 0.94),
        fragment("88", 250, 0.79),
        fragment("71", 470, 0.90),
    ]);
    let service = ReadingsService::new(ReadingRepository::new(), engine);

    let outcome = service
        .record_capture(&frame(), taken(9), &CancellationToken::new())
        .await
        .unwrap();
    assert!(!outcome.suspect);

    let listed = service.list_readings().await.unwrap();
    assert_eq!(listed[0].source, ReadingSource::Camera);
    assert_eq!(listed[0].confidence, Some(0.79));

    let view = build_view(
        &listed,
        SortKey::default(),
        SortDirection::default(),
        |_| true,
        0,
        10,
    );
    assert_eq!(view.total_count, 1);
    assert_eq!(view.rows[0].reading.systolic, 132);
    assert_eq!(view.rows[0].display_rank, 1);
}

#[tokio::test]
async fn view_orders_stored_readings_most_recent_first() {
    let service = in_memory_service();
    service.record_manual_entry(&entry("118", "76", "64", 7)).await.unwrap();
    service.record_manual_entry(&entry("124", "82", "70", 12)).await.unwrap();
    service.record_manual_entry(&entry("121", "79", "68", 19)).await.unwrap();

    let listed = service.list_readings().await.unwrap();
    let view = build_view(
        &listed,
        SortKey::default(),
        SortDirection::default(),
        |_| true,
        0,
        10,
    );

    let hours: Vec<u32> = view
        .rows
        .iter()
        .map(|row| row.reading.captured_at.format("%H").to_string().parse().unwrap())
        .collect();
    assert_eq!(hours, vec![19, 12, 7]);
}

#[tokio::test]
async fn failed_capture_corrects_through_the_prefilled_form() {
    // The camera misread the readout: only the systolic row was recognized
    let engine = StubRecognitionEngine::with_fragments(vec![fragment("132", 40, 0.94)]);
    let service = ReadingsService::new(ReadingRepository::new(), engine);

    let result = service
        .record_capture(&frame(), taken(9), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(ReadingsServiceError::Invalid(_))));

    // The view redirects to the form with corrected route parameters, which
    // re-enter the ordinary manual path
    let corrected = ManualEntry::from_route_params("132", "88", "71", taken(9));
    let reading = service.record_manual_entry(&corrected).await.unwrap();

    assert_eq!(reading.systolic, 132);
    assert_eq!(reading.source, ReadingSource::Manual);
    assert_eq!(service.list_readings().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancelled_capture_saves_nothing() {
    let engine = StubRecognitionEngine::with_fragments(vec![
        fragment("132", 40, 0.94),
        fragment("88", 250, 0.79),
        fragment("71", 470, 0.90),
    ]);
    let service = ReadingsService::new(ReadingRepository::new(), engine);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = service.record_capture(&frame(), taken(9), &cancel).await;

    assert!(matches!(
        result,
        Err(ReadingsServiceError::Capture(CaptureError::Cancelled))
    ));
    assert!(service.list_readings().await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_failure_reaches_the_caller_unchanged() {
    let service = ReadingsService::new(
        MockReadingRepository::new().with_save_failure(),
        StubRecognitionEngine::empty(),
    );

    let result = service.record_manual_entry(&entry("118", "76", "64", 8)).await;

    match result.unwrap_err() {
        ReadingsServiceError::Storage(RepositoryError::Storage(message)) => {
            assert_eq!(message, "mock is configured to fail save");
        }
        other => panic!("expected Storage failure, got {:?}", other),
    }
}

#[tokio::test]
async fn list_failure_reaches_the_caller_unchanged() {
    let service = ReadingsService::new(
        MockReadingRepository::new().with_list_failure(),
        StubRecognitionEngine::empty(),
    );

    let result = service.list_readings().await;

    assert!(matches!(
        result,
        Err(ReadingsServiceError::Storage(RepositoryError::Storage(_)))
    ));
}

#[tokio::test]
async fn deleting_a_reading_removes_it_from_the_dataset() {
    let service = in_memory_service();
    let first = service.record_manual_entry(&entry("118", "76", "64", 8)).await.unwrap();
    let second = service.record_manual_entry(&entry("124", "82", "70", 9)).await.unwrap();

    service.delete_reading(&first.id).await.unwrap();

    let listed = service.list_readings().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);

    // Deleting an unknown id surfaces the repository's not-found error
    let result = service.delete_reading(&first.id).await;
    assert!(matches!(
        result,
        Err(ReadingsServiceError::Storage(RepositoryError::NotFound(_)))
    ));
}

#[tokio::test]
async fn csv_export_covers_the_inclusive_range() {
    let service = in_memory_service();
    service.record_manual_entry(&entry("118", "76", "64", 6)).await.unwrap();
    service.record_manual_entry(&entry("124", "82", "70", 12)).await.unwrap();
    service.record_manual_entry(&entry("121", "79", "68", 22)).await.unwrap();

    let csv = service.export_csv(taken(6), taken(12)).await.unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "taken,systolic,diastolic,pulse,source,confidence");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",118,76,64,manual,"));
    assert!(lines[2].contains(",124,82,70,manual,"));
}
