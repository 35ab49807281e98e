//! Service layer for mxp-ex
//!
//! - `narrative_generator`: text-generation backend client
//! - `orchestrator`: explanation pipeline
//! - `analyzer_client` / `verdict_source`: external analysis capabilities
//! - `media_store`: upload storage

pub mod analyzer_client;
pub mod media_store;
pub mod narrative_generator;
pub mod orchestrator;
pub mod verdict_source;

pub use analyzer_client::{AnalyzerError, HttpMediaAnalyzer, MediaAnalyzer};
pub use media_store::{detect_file_type, MediaStore, StoreError, StoredFile};
pub use narrative_generator::{
    ChatCompletionsGenerator, GenerationFailure, GeneratorConfig, NarrativeGenerator,
};
pub use orchestrator::ExplanationOrchestrator;
pub use verdict_source::{CatalogVoteVerdict, HttpVerdictSource, VerdictSource};
