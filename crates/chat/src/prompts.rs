//! Prompt templates for clinical answers

use medisearch_vector::SearchMatch;

/// Base prompt for answering over retrieved context
pub const CLINICAL_PROMPT: &str = "You are a clinical-assistant. Using the retrieved anonymized patient context below, provide a safe, evidence-based, and conservative clinical answer. Do NOT reveal PHI. If insufficient data, say so.";

/// Shown in place of context when retrieval found nothing
pub const EMPTY_CONTEXT: &str = "No contextual records found.";

/// Longest snippet of a record quoted into the prompt
const MAX_SNIPPET_CHARS: usize = 600;

/// Render retrieved matches into the context block of the prompt
pub fn build_context(matches: &[SearchMatch]) -> String {
    if matches.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    matches
        .iter()
        .map(|m| format!("- {}", truncate_chars(&m.content, MAX_SNIPPET_CHARS)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the full generation prompt
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContext:\n{}\n\nQuestion:\n{}\n\nAnswer:",
        CLINICAL_PROMPT, context, question
    )
}

/// Truncate to at most `max` characters without splitting a code point
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
