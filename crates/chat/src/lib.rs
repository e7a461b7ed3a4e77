//! MediSearch Chat
//!
//! Retrieval-augmented clinical Q&A: embed the question, rank stored
//! notes, and answer over the retrieved context.

mod engine;
mod prompts;

pub use engine::{ChatAnswer, ChatEngine};
pub use prompts::{answer_prompt, build_context, CLINICAL_PROMPT, EMPTY_CONTEXT};
