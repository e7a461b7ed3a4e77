use anyhow::Result;
use clap::{Parser, Subcommand};
use medisearch_common::{logger, AppConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use medisearch_chat::ChatEngine;
use medisearch_ingest::{embed_notes, mask_file, mask_note, read_jsonl, MaskedNote, PhiMasker, RawNote};
use medisearch_llm::{LlmClient, OllamaClient};
use medisearch_vector::VectorStore;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "medisearch")]
#[command(about = "MediSearch - PHI-masked semantic search over clinical notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Ingest three sample notes and run a similarity query
    Demo,

    /// Interactive retrieval-augmented Q&A over a masked note file
    Chat {
        /// Masked JSONL note file to load
        #[arg(long, default_value = "data/sample_ehr_masked.jsonl")]
        data: PathBuf,
    },

    /// Measure query latency over a masked note file
    Bench {
        /// Masked JSONL note file to load
        #[arg(long, default_value = "data/sample_ehr_masked.jsonl")]
        data: PathBuf,

        /// Number of queries to run
        #[arg(long, default_value = "20")]
        queries: usize,

        /// Results per query
        #[arg(long, default_value = "5")]
        top_k: usize,
    },

    /// Mask PHI in a raw JSONL note file
    Mask {
        /// Raw JSONL input
        #[arg(long, default_value = "data/sample_ehr.jsonl")]
        input: PathBuf,

        /// Masked JSONL output
        #[arg(long, default_value = "data/sample_ehr_masked.jsonl")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            // Override with CLI arguments
            std::env::set_var("SERVER_HOST", &host);
            std::env::set_var("SERVER_PORT", port.to_string());

            let config = AppConfig::from_env()?;
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("MediSearch starting...");
            tracing::info!("  Host: {}", host);
            tracing::info!("  Port: {}", port);
            tracing::info!("  Index: {}", config.index_name);
            tracing::info!("  PHI masking: {}", config.mask_phi);

            println!("Server listening on http://{}:{}", host, port);

            medisearch_server::start_server(config).await?;
        }
        Some(Commands::Demo) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;
            run_demo(&config).await?;
        }
        Some(Commands::Chat { data }) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;
            run_chat(&config, &data).await?;
        }
        Some(Commands::Bench { data, queries, top_k }) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;
            run_bench(&config, &data, queries, top_k).await?;
        }
        Some(Commands::Mask { input, output }) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;
            run_mask(&input, &output)?;
        }
        None => {
            // Default: start server with default config
            let config = AppConfig::from_env()?;
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("MediSearch starting with default configuration...");

            let bind_addr = config.server_bind_address();
            println!("Server listening on http://{}", bind_addr);

            medisearch_server::start_server(config).await?;
        }
    }

    Ok(())
}

/// Connect to Ollama, failing fast when the backend is down
async fn connect_ollama(config: &AppConfig) -> Result<OllamaClient> {
    let client = OllamaClient::new(&config.ollama_base_url)?;
    if !client.test_connection().await? {
        anyhow::bail!("Ollama is not reachable at {}", config.ollama_base_url);
    }
    Ok(client)
}

/// Ingest three sample notes, then query with the first stored vector
async fn run_demo(config: &AppConfig) -> Result<()> {
    let client = connect_ollama(config).await?;

    println!("Preprocessing data (masking PHI)...");
    let masker = PhiMasker::new();
    let now = chrono::Utc::now().to_rfc3339();
    let raw_notes = vec![
        RawNote {
            patient_id: Some("patient_001".to_string()),
            text: "Patient has mild fever and headache.".to_string(),
            timestamp: Some(now.clone()),
        },
        RawNote {
            patient_id: Some("patient_002".to_string()),
            text: "Patient reports shortness of breath and cough.".to_string(),
            timestamp: Some(now.clone()),
        },
        RawNote {
            patient_id: Some("patient_003".to_string()),
            text: "Patient shows signs of elevated blood pressure.".to_string(),
            timestamp: Some(now),
        },
    ];
    let masked: Vec<MaskedNote> = raw_notes.iter().map(|note| mask_note(&masker, note)).collect();

    println!("Building embeddings...");
    let records = embed_notes(&client, &config.embedding_model, &masked).await?;
    let query_vector = records[0].vector.clone();

    println!("Upserting vectors...");
    let store = VectorStore::new();
    let index = store.create_index(&config.index_name);
    store.upsert(&index, records)?;

    println!("Ingest complete.\n");

    println!("[Query Demo] Top results:");
    let started = Instant::now();
    let matches = store.query(&index, &query_vector, 3)?;
    let latency = started.elapsed().as_secs_f64();

    for (i, m) in matches.iter().enumerate() {
        let timestamp = m.metadata.get("timestamp").map(String::as_str).unwrap_or("-");
        println!(
            "{}. ID: {}, Content: {}, Timestamp: {}",
            i + 1,
            m.id,
            m.content,
            timestamp
        );
    }
    println!("\nQuery latency: {:.4} seconds", latency);

    Ok(())
}

/// Load a masked note file and answer questions from stdin
async fn run_chat(config: &AppConfig, data: &Path) -> Result<()> {
    let client: Arc<dyn LlmClient> = Arc::new(connect_ollama(config).await?);

    let notes: Vec<MaskedNote> = read_jsonl(data)?;
    if notes.is_empty() {
        anyhow::bail!("No notes in {}", data.display());
    }

    println!("Embedding {} notes from {}...", notes.len(), data.display());
    let records = embed_notes(client.as_ref(), &config.embedding_model, &notes).await?;

    let store = Arc::new(VectorStore::new());
    let index = store.create_index(&config.index_name);
    store.upsert(&index, records)?;

    let engine = ChatEngine::new(
        Arc::clone(&client),
        Arc::clone(&store),
        index,
        &config.embedding_model,
        &config.llm_model,
    );

    println!("Ask a clinical question (exit to quit).");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match engine.answer(question).await {
            Ok(answered) => {
                println!("\n{}\n", answered.answer);
                println!(
                    "[{} sources, retrieval {:.1} ms]",
                    answered.matches.len(),
                    answered.retrieval_ms
                );
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

/// Embed a masked note file once, then measure query latency
async fn run_bench(config: &AppConfig, data: &Path, n_queries: usize, top_k: usize) -> Result<()> {
    let notes: Vec<MaskedNote> = read_jsonl(data)?;
    if notes.is_empty() {
        anyhow::bail!("No notes in {}", data.display());
    }

    // Reuse note text as query text so scores stay realistic.
    let queries: Vec<&str> = notes
        .iter()
        .take(n_queries)
        .map(|note| note.text_masked.as_str())
        .collect();
    // The stats below index into the latency list, so an empty run has
    // nothing to report.
    if queries.is_empty() {
        anyhow::bail!("No queries to run");
    }

    let client = connect_ollama(config).await?;

    println!("Embedding {} notes...", notes.len());
    let records = embed_notes(&client, &config.embedding_model, &notes).await?;

    let store = VectorStore::new();
    let index = store.create_index(&config.index_name);
    store.upsert(&index, records)?;

    println!("Running {} queries...", queries.len());
    let mut latencies_ms = Vec::with_capacity(queries.len());
    for q in &queries {
        let vector = client.embed(&config.embedding_model, q).await?;
        // Time only the in-memory ranking, not the embedding call.
        let started = Instant::now();
        let _ = store.query(&index, &vector, top_k)?;
        latencies_ms.push(started.elapsed().as_secs_f64() * 1000.0);
    }

    let mut sorted = latencies_ms.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };
    let p95_idx = ((count as f64 * 0.95) as usize)
        .saturating_sub(1)
        .min(count - 1);

    println!("Query stats (ms):");
    println!("  count: {}", count);
    println!("  mean: {:.4}", mean);
    println!("  median: {:.4}", median);
    println!("  p95: {:.4}", sorted[p95_idx]);

    Ok(())
}

/// Mask a raw JSONL note file in one shot
fn run_mask(input: &Path, output: &Path) -> Result<()> {
    let masker = PhiMasker::new();
    let count = mask_file(&masker, input, output)?;
    println!("Masked {} notes -> {}", count, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medisearch_ingest::write_jsonl;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("medisearch-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_bench_rejects_zero_queries() {
        let path = temp_path("bench-zero-queries.jsonl");
        let notes = vec![MaskedNote {
            anon_id: "patient_001".to_string(),
            text_masked: "Patient has mild fever and headache.".to_string(),
            timestamp: None,
        }];
        write_jsonl(&path, &notes).unwrap();

        let config = AppConfig::default();
        let err = run_bench(&config, &path, 0, 5).await.unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(err.to_string().contains("No queries to run"));
    }

    #[tokio::test]
    async fn test_bench_rejects_empty_note_file() {
        let path = temp_path("bench-empty.jsonl");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::default();
        let err = run_bench(&config, &path, 20, 5).await.unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(err.to_string().contains("No notes in"));
    }
}
