use medisearch_common::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// A clinical note as submitted, before PHI masking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNote {
    /// Patient identifier as provided by the source system
    #[serde(default)]
    pub patient_id: Option<String>,

    /// Free-text note (may contain PHI)
    pub text: String,

    /// Timestamp of the note, if the source recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A note after masking
///
/// The raw text is not carried through; only the masked form leaves the
/// preprocessing step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskedNote {
    /// Anonymized identifier
    pub anon_id: String,

    /// Note text with PHI replaced by redaction tokens
    pub text_masked: String,

    /// Timestamp carried over from the raw note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Read a JSONL file, one item per non-empty line
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(serde_json::from_str(&line)?);
    }

    Ok(items)
}

/// Write items to a JSONL file, one item per line
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let mut file = File::create(path)?;
    for item in items {
        serde_json::to_writer(&mut file, item)?;
        file.write_all(b"\n")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("medisearch-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_jsonl_round_trip() {
        let path = temp_path("round-trip.jsonl");
        let notes = vec![
            MaskedNote {
                anon_id: "patient_001".to_string(),
                text_masked: "Patient has mild fever and headache.".to_string(),
                timestamp: Some("2025-11-07 10:00:00".to_string()),
            },
            MaskedNote {
                anon_id: "patient_002".to_string(),
                text_masked: "Patient reports shortness of breath and cough.".to_string(),
                timestamp: None,
            },
        ];

        write_jsonl(&path, &notes).unwrap();
        let loaded: Vec<MaskedNote> = read_jsonl(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].anon_id, "patient_001");
        assert_eq!(loaded[0].timestamp.as_deref(), Some("2025-11-07 10:00:00"));
        assert_eq!(loaded[1].timestamp, None);
    }

    #[test]
    fn test_read_jsonl_skips_blank_lines() {
        let path = temp_path("blank-lines.jsonl");
        std::fs::write(
            &path,
            "{\"patient_id\":\"p1\",\"text\":\"note one\"}\n\n{\"text\":\"note two\"}\n",
        )
        .unwrap();

        let notes: Vec<RawNote> = read_jsonl(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].patient_id.as_deref(), Some("p1"));
        // patient_id is optional in source data.
        assert_eq!(notes[1].patient_id, None);
    }

    #[test]
    fn test_read_jsonl_rejects_malformed_line() {
        let path = temp_path("malformed.jsonl");
        std::fs::write(&path, "{\"text\":\"good\"}\nnot json\n").unwrap();

        let result: Result<Vec<RawNote>> = read_jsonl(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
