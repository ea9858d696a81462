use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::Result;
use crate::config::Config;
use crate::embeddings::{EmbeddingProvider, OllamaClient};
use crate::indexer::Indexer;
use crate::kb::load_documents;
use crate::lang::detect_language;
use crate::llm::provider_from_config;
use crate::retriever::Retriever;
use crate::risk::RiskLabel;
use crate::store::{LanceStore, VectorStore};
use crate::triage::{TriageEngine, TriageResult};

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("style template is valid"),
    );
    bar.set_message(message.to_string());
    bar
}

/// Rebuild the knowledge base collection from the configured directory.
#[inline]
pub async fn ingest(config: &Config) -> Result<()> {
    let kb_dir = config.kb_dir_path();
    info!("Ingesting knowledge base from {:?}", kb_dir);

    let documents = load_documents(&kb_dir)?;
    if documents.is_empty() {
        println!(
            "No documents found in {}. Add PDF/MD/TXT files and rerun.",
            kb_dir.display()
        );
        return Ok(());
    }

    let embedder = Arc::new(OllamaClient::new(&config.ollama)?);
    embedder.ping()?;

    let store = Arc::new(LanceStore::open(&config.vector_store_path()).await?);

    let indexer = Indexer::new(
        embedder as Arc<dyn EmbeddingProvider>,
        store as Arc<dyn VectorStore>,
        config.chunking.clone(),
    );

    let bar = spinner("Embedding and indexing chunks...");
    let summary = indexer.build(&documents).await?;
    bar.finish_and_clear();

    println!(
        "Indexed {} chunks from {} documents.",
        summary.chunks_indexed, summary.documents_processed
    );
    Ok(())
}

/// Search the knowledge base and print the matching snippets.
#[inline]
pub async fn search(config: &Config, query: &str, k: usize) -> Result<()> {
    let embedder = Arc::new(OllamaClient::new(&config.ollama)?);
    let store = Arc::new(LanceStore::open(&config.vector_store_path()).await?);
    let retriever = Retriever::new(embedder, store);

    let snippets = retriever.search(query, k).await?;

    if snippets.is_empty() {
        println!("No matching knowledge found. Has the index been built?");
        return Ok(());
    }

    for (i, snippet) in snippets.iter().enumerate() {
        let preview: String = snippet.text.chars().take(300).collect();
        println!("{}. [{}]", i + 1, snippet.source);
        println!("   {}", preview);
        println!();
    }
    Ok(())
}

/// Run a triage request for a complaint or transcript and print the result.
#[inline]
pub async fn triage(
    config: &Config,
    text: &str,
    k: usize,
    risk_score: Option<f64>,
) -> Result<()> {
    let language = detect_language(text);
    info!("Detected language: {}", language);

    let chat = provider_from_config(config)?;

    let embedder = Arc::new(OllamaClient::new(&config.ollama)?);
    let store = Arc::new(LanceStore::open(&config.vector_store_path()).await?);
    let engine = TriageEngine::new(Retriever::new(embedder, store));

    let bar = spinner("Waiting for the triage model...");
    let reply = engine.answer(text, &language, chat.as_ref(), k).await?;
    bar.finish_and_clear();

    match TriageResult::from_value(&reply.triage) {
        Some(result) => {
            let rendered = serde_json::to_string_pretty(&result)
                .unwrap_or_else(|_| reply.triage.to_string());
            println!("{}", rendered);
        }
        None => {
            // Schema-invalid output is still worth showing, flagged as raw
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "raw": reply.triage }))
                    .unwrap_or_else(|_| reply.triage.to_string())
            );
        }
    }
    println!("language: {}", reply.language);

    if let Some(score) = risk_score {
        println!("risk: {} ({:.2})", RiskLabel::from_score(score), score);
    }
    Ok(())
}

/// Print the active configuration as TOML.
#[inline]
pub fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| crate::TriageError::Config(e.to_string()))?;
    println!("# {}", config.config_file_path().display());
    print!("{}", rendered);
    Ok(())
}

/// Write the current (or default) configuration to disk.
#[inline]
pub fn init_config(config: &Config) -> Result<()> {
    config.save()?;
    println!("Wrote {}", config.config_file_path().display());
    Ok(())
}
