use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use revq_core::Config;
use revq_llm::openai::OpenAiProvider;
use revq_llm::provider::{EmbedFn, LlmProvider};
use revq_memory::QdrantOps;
use revq_memory::document::{IngestionPipeline, PdfLoader, SplitterConfig, TextSplitter};
use revq_search::{RetrieverKind, SearchChain};

#[derive(Parser)]
#[command(name = "revq", version, about = "Question answering over a revenue PDF")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the configured PDF, normalize it, and store embedded chunks.
    Ingest,
    /// Interactive question loop against the ingested collection.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_subscriber();

    let cli = Cli::parse();
    let config = Config::from_env().context("configuration error")?;

    match cli.command {
        Command::Ingest => run_ingest(&config).await,
        Command::Chat => run_chat(&config).await,
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn create_provider(config: &Config) -> Arc<OpenAiProvider> {
    Arc::new(OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.chat_model.clone(),
        Some(config.embedding_model.clone()),
    ))
}

fn embed_fn(provider: Arc<OpenAiProvider>) -> EmbedFn {
    Box::new(move |text: &str| {
        let provider = Arc::clone(&provider);
        let text = text.to_owned();
        Box::pin(async move { provider.embed(&text).await })
    })
}

async fn run_ingest(config: &Config) -> anyhow::Result<()> {
    let provider = create_provider(config);
    let store = Arc::new(QdrantOps::new(&config.qdrant_url)?);

    let pipeline = IngestionPipeline::new(
        TextSplitter::new(SplitterConfig::default()),
        store,
        config.collection.clone(),
        config.pdf_file_name(),
        embed_fn(provider),
    );

    let loader = PdfLoader::default();
    let count = pipeline
        .load_and_ingest(&loader, &config.pdf_path)
        .await
        .with_context(|| format!("failed to ingest {}", config.pdf_path.display()))?;

    println!(
        "Ingested {count} chunk(s) from {} into collection {:?}",
        config.pdf_path.display(),
        config.collection
    );
    Ok(())
}

async fn run_chat(config: &Config) -> anyhow::Result<()> {
    let provider = create_provider(config);
    let store = Arc::new(QdrantOps::new(&config.qdrant_url)?);
    let theme = ColorfulTheme::default();

    println!("revq v{}", env!("CARGO_PKG_VERSION"));

    loop {
        let modes = ["self-query", "similarity", "exit"];
        let choice = Select::with_theme(&theme)
            .with_prompt("Retrieval mode")
            .items(&modes)
            .default(0)
            .interact()?;
        let kind = match choice {
            0 => RetrieverKind::SelfQuery,
            1 => RetrieverKind::Similarity,
            _ => break,
        };

        let question: String = Input::with_theme(&theme)
            .with_prompt("Question")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("question cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let chain = SearchChain::new(
            Arc::clone(&store) as Arc<dyn revq_memory::VectorStore>,
            Arc::clone(&provider),
            config.collection.clone(),
            kind,
        );

        match chain.ask(&question).await {
            Ok(response) => {
                println!("\n{}\n", response.answer);

                let show_context = Confirm::with_theme(&theme)
                    .with_prompt("Show retrieved context?")
                    .default(false)
                    .interact()?;
                if show_context {
                    for (i, chunk) in response.context.iter().enumerate() {
                        let preview: String = chunk.content.chars().take(200).collect();
                        println!("--- chunk {} (score {:.3}) ---", i + 1, chunk.score);
                        println!("{preview}");
                        if let Some(min) = chunk.payload.get("min_revenue") {
                            let max = chunk
                                .payload
                                .get("max_revenue")
                                .cloned()
                                .unwrap_or_default();
                            println!("min_revenue: {min}, max_revenue: {max}");
                        }
                    }
                    println!();
                }
            }
            Err(e) => {
                tracing::error!("query failed: {e}");
                eprintln!("error: {e}");
            }
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Ask another question?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
    }

    Ok(())
}
