#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub const TRACING_TARGET: &str = "driveloom_extraction";

mod block;
mod error;
mod extractor;
mod extractors;
mod kind;
pub mod ocr;

pub use block::{Block, Document};
pub use error::{ExtractionError, ExtractionResult};
pub use extractor::Extractor;
pub use kind::ExtractorKind;
pub use ocr::{HttpOcrConfig, HttpOcrProvider, OcrPage, OcrProvider};
