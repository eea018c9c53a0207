// Match Scorer and Recommendation Ranker.
// Scoring is synchronous and side-effect-free; all I/O goes through store.
// The only randomness is the exploratory jitter, injected via JitterSource.

pub mod handlers;
pub mod jitter;
pub mod profile;
pub mod ranker;
pub mod requirements;
pub mod scorer;
pub mod store;
pub mod tfidf;

pub use scorer::MatchEngine;
