//! folio-infrastructure — persistence adapters for the conversation
//! session manager.
//!
//! Implements the two persistence tiers behind
//! [`folio_core::transcript::TranscriptRepository`]: an in-process
//! session store for anonymous visitors and a JSON file store for
//! identified ones, plus the path layout and the profile bootstrap.

pub mod json_repository;
pub mod paths;
pub mod profile;
pub mod session_repository;
pub mod tiered_repository;

pub use json_repository::JsonTranscriptRepository;
pub use paths::FolioPaths;
pub use session_repository::SessionTranscriptRepository;
pub use tiered_repository::TieredTranscriptRepository;
