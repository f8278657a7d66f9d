//! Application state wiring the orchestrator to its concrete adapters.

use std::sync::Arc;

use secrecy::SecretString;

use gemgate_core::chat::orchestrator::ChatOrchestrator;
use gemgate_core::session::store::SessionStore;
use gemgate_infra::fetch::HttpFileFetcher;
use gemgate_infra::gemini::GeminiProvider;
use gemgate_infra::secret::env_secret;
use gemgate_types::config::ProxyConfig;

/// The orchestrator pinned to the infra implementations. Gemini serves as
/// both uploader and chat provider.
pub type ConcreteOrchestrator = ChatOrchestrator<HttpFileFetcher, GeminiProvider, GeminiProvider>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
}

impl AppState {
    /// Resolve the API key from the environment and wire the services.
    pub fn init(config: &ProxyConfig) -> anyhow::Result<Self> {
        let api_key = env_secret(&config.gemini.api_key_env)?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &ProxyConfig, api_key: SecretString) -> anyhow::Result<Self> {
        let fetcher = Arc::new(HttpFileFetcher::new()?);
        let gemini = Arc::new(GeminiProvider::new(api_key, &config.gemini)?);

        let orchestrator =
            ChatOrchestrator::new(fetcher, gemini.clone(), gemini, SessionStore::new())
                .with_timeouts(config.timeouts);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
        })
    }
}
