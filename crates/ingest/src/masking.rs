use regex::Regex;

/// Replaces common PHI shapes in free text with redaction tokens
///
/// Rule-based masking over emails, phone numbers, dates, long digit runs
/// (MRN-like ids) and `patient:`/`name:` tags. Passes run in a fixed order
/// so overlapping shapes resolve the same way every time. This is not a
/// certified de-identification step; it is the hygiene layer in front of
/// the embedding model.
pub struct PhiMasker {
    email: Regex,
    phone: Regex,
    date_iso: Regex,
    date_slash: Regex,
    digit_run: Regex,
    name_tag: Regex,
}

impl PhiMasker {
    pub fn new() -> Self {
        // Literal patterns, compilation cannot fail.
        Self {
            email: Regex::new(r"\b[\w\.-]+@[\w\.-]+\.\w{2,4}\b").unwrap(),
            phone: Regex::new(r"\b(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}\b")
                .unwrap(),
            date_iso: Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap(),
            date_slash: Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap(),
            digit_run: Regex::new(r"\b\d{6,}\b").unwrap(),
            name_tag: Regex::new(r"(?i)(patient|name):\s*[A-Z][a-z]+").unwrap(),
        }
    }

    /// Mask PHI in `text`, returning the redacted copy
    pub fn mask(&self, text: &str) -> String {
        let masked = self.email.replace_all(text, "[REDACTED_EMAIL]");
        let masked = self.phone.replace_all(&masked, "[REDACTED_PHONE]");
        let masked = self.date_iso.replace_all(&masked, "[REDACTED_DATE]");
        let masked = self.date_slash.replace_all(&masked, "[REDACTED_DATE]");
        let masked = self.digit_run.replace_all(&masked, "[REDACTED_ID]");
        let masked = self.name_tag.replace_all(&masked, "${1}: [REDACTED_NAME]");
        masked.into_owned()
    }
}

impl Default for PhiMasker {
    fn default() -> Self {
        Self::new()
    }
}
