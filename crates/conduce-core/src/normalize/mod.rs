//! Model-name normalization: regex cleaning plus learned corrections.

mod cleaner;
mod corrections;

pub use cleaner::ModelNormalizer;
pub use corrections::{CorrectionBackend, CorrectionStore, FileBackend, MemoryBackend};
