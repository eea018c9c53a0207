// Feature Extractor: uploaded CV -> text -> CvFeatures.
// Decoding is the only fallible step; extraction degrades to sentinels.
// PDF decoding is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod decode;
pub mod extractor;
pub mod handlers;
pub mod vocabulary;

pub use vocabulary::Vocabulary;
