use std::path::Path;

use medisearch_common::Result;
use medisearch_llm::LlmClient;
use medisearch_vector::VectorRecord;
use tracing::info;

use crate::jsonl::{read_jsonl, write_jsonl, MaskedNote, RawNote};
use crate::masking::PhiMasker;

/// Mask a single raw note
///
/// Notes without a usable patient_id get the anonymized id "anon".
pub fn mask_note(masker: &PhiMasker, note: &RawNote) -> MaskedNote {
    MaskedNote {
        anon_id: note
            .patient_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| "anon".to_string()),
        text_masked: masker.mask(&note.text),
        timestamp: note.timestamp.clone(),
    }
}

/// Mask a raw JSONL note file into a masked JSONL file
///
/// Returns the number of notes written.
pub fn mask_file(masker: &PhiMasker, input: &Path, output: &Path) -> Result<usize> {
    let raw: Vec<RawNote> = read_jsonl(input)?;

    let masked: Vec<MaskedNote> = raw.iter().map(|note| mask_note(masker, note)).collect();
    write_jsonl(output, &masked)?;

    info!(
        "Masked {} notes: {} -> {}",
        masked.len(),
        input.display(),
        output.display()
    );
    Ok(masked.len())
}

/// Embed masked notes into vector records, one embedding call per note
pub async fn embed_notes(
    llm: &dyn LlmClient,
    model: &str,
    notes: &[MaskedNote],
) -> Result<Vec<VectorRecord>> {
    let mut records = Vec::with_capacity(notes.len());

    for note in notes {
        let vector = llm.embed(model, &note.text_masked).await?;
        let mut record = VectorRecord::new(note.anon_id.clone(), vector, note.text_masked.clone());
        if let Some(timestamp) = &note.timestamp {
            record = record.with_metadata("timestamp", timestamp.clone());
        }
        records.push(record);
    }

    info!("Embedded {} notes with model {}", records.len(), model);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medisearch_llm::GenerateRequest;

    struct StubEmbedder;

    #[async_trait]
    impl LlmClient for StubEmbedder {
        async fn generate(&self, _request: GenerateRequest) -> Result<String> {
            Ok("stub".to_string())
        }

        async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>> {
            // Deterministic toy embedding from text bytes.
            let mut vector = vec![0.0f32; 4];
            for (i, byte) in text.bytes().enumerate() {
                vector[i % 4] += f32::from(byte) / 255.0;
            }
            Ok(vector)
        }

        async fn test_connection(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("medisearch-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_mask_note_uses_patient_id() {
        let masker = PhiMasker::new();
        let note = RawNote {
            patient_id: Some("patient_004".to_string()),
            text: "Seen on 2025-11-07, stable.".to_string(),
            timestamp: Some("2025-11-07 10:00:00".to_string()),
        };

        let masked = mask_note(&masker, &note);
        assert_eq!(masked.anon_id, "patient_004");
        assert_eq!(masked.text_masked, "Seen on [REDACTED_DATE], stable.");
        assert_eq!(masked.timestamp.as_deref(), Some("2025-11-07 10:00:00"));
    }

    #[test]
    fn test_mask_note_falls_back_to_anon() {
        let masker = PhiMasker::new();

        let missing = RawNote {
            patient_id: None,
            text: "No id on this note.".to_string(),
            timestamp: None,
        };
        assert_eq!(mask_note(&masker, &missing).anon_id, "anon");

        let blank = RawNote {
            patient_id: Some("   ".to_string()),
            text: "Blank id on this note.".to_string(),
            timestamp: None,
        };
        assert_eq!(mask_note(&masker, &blank).anon_id, "anon");
    }

    #[test]
    fn test_mask_file_drops_raw_text() {
        let input = temp_path("mask-in.jsonl");
        let output = temp_path("mask-out.jsonl");
        std::fs::write(
            &input,
            "{\"patient_id\":\"p1\",\"text\":\"Call 555-123-4567\",\"timestamp\":\"t0\"}\n",
        )
        .unwrap();

        let masker = PhiMasker::new();
        let count = mask_file(&masker, &input, &output).unwrap();
        assert_eq!(count, 1);

        let written = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();

        assert!(written.contains("[REDACTED_PHONE]"));
        assert!(!written.contains("555-123-4567"));
        // Only the masked field is present in the output.
        assert!(!written.contains("\"text\""));
    }

    #[tokio::test]
    async fn test_embed_notes_builds_records() {
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

        let records = embed_notes(&StubEmbedder, "stub-model", &notes).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "patient_001");
        assert_eq!(records[0].dimension(), 4);
        assert_eq!(records[0].content, "Patient has mild fever and headache.");
        assert_eq!(
            records[0].metadata.get("timestamp").map(String::as_str),
            Some("2025-11-07 10:00:00")
        );
        assert!(records[1].metadata.is_empty());
    }
}
