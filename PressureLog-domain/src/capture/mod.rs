// Reading capture pipeline, in dependency order: field parser, OCR
// extraction adapter, validator, assembler

pub mod assembler;
pub mod ocr;
pub mod parser;
pub mod validator;

// Re-export the types the form and camera views work with
pub use assembler::{CaptureError, CapturedReading, ManualEntry, ReadingAssembler};
pub use ocr::{ImageFrame, OcrExtractionAdapter, RecognitionEngine, RecognitionError, StubRecognitionEngine};
