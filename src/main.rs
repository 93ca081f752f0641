use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::EnvFilter;

use careline_gateway::api::{ApiServer, ApiState};
use careline_gateway::channels::WhatsAppChannel;
use careline_gateway::language::TranslateClient;
use careline_gateway::llm::ChatClient;
use careline_gateway::media::TranscribeClient;
use careline_gateway::retrieval::{Collections, Embedder, HttpRetriever, SearchClient};
use careline_gateway::{Config, Pipeline};

/// Careline - WhatsApp gateway for a grounded social-support assistant
#[derive(Parser)]
#[command(name = "careline", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "CARELINE_PORT", default_value = "8080")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,careline_gateway=info",
        1 => "info,careline_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(port = cli.port, "starting careline gateway");

    let config = Config::load()?;

    let channel = Arc::new(WhatsAppChannel::new(
        config.whatsapp.access_token,
        config.whatsapp.phone_number_id,
    )?);

    // Chat and transcription share the hosted model endpoint and key.
    let transcribe_key = SecretString::from(config.model.api_key.expose_secret().to_owned());

    let chat = Arc::new(ChatClient::new(
        config.model.base_url.clone(),
        config.model.api_key,
        config.model.chat_model,
        config.model.max_tokens,
    ));

    let transcriber = Arc::new(TranscribeClient::new(
        config.model.base_url,
        transcribe_key,
        config.model.transcribe_model,
    ));

    let embedder = Embedder::new(
        config.embeddings.base_url,
        config.embeddings.api_key,
        config.embeddings.model,
    )?;
    let search = SearchClient::new(config.search.base_url, config.search.api_key);
    let collections = Collections {
        finance: config.search.finance_index,
        healthcare: config.search.healthcare_index,
        food: config.search.food_index,
    };
    let retriever = Arc::new(HttpRetriever::new(embedder, search, collections));

    let translator = config.translate.map(|t| {
        Arc::new(TranslateClient::new(t.base_url, t.api_key))
            as Arc<dyn careline_gateway::language::Translator>
    });

    let pipeline = Arc::new(Pipeline::new(chat, retriever, translator));

    let state = Arc::new(ApiState {
        verify_token: config.verify_token,
        channel,
        pipeline,
        transcriber,
    });

    ApiServer::new(state, cli.port).run().await?;

    Ok(())
}
