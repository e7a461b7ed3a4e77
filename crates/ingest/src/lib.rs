//! MediSearch Ingestion
//!
//! PHI masking and JSONL preprocessing for clinical notes, plus the
//! masked-note to vector-record embedding step.

mod jsonl;
mod masking;
mod pipeline;

pub use jsonl::{read_jsonl, write_jsonl, MaskedNote, RawNote};
pub use masking::PhiMasker;
pub use pipeline::{embed_notes, mask_file, mask_note};
