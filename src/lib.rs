pub mod api;
pub mod config;
pub mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::ClassifierConfig;
use crate::pipeline::classification::ContentClassifier;

/// Start the classification service and block until it shuts down.
pub fn run() -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ClassifierConfig::from_env()?;
    let policy = config.load_policy()?;
    if !config.is_configured() {
        tracing::warn!(
            env = config::ENV_PROVIDER_URL,
            "Completion provider not configured, all verdicts will be synthesized locally"
        );
    }

    // Blocking HTTP clients are built and dropped outside the async runtime.
    let classifier = Arc::new(ContentClassifier::from_env_config(&config, policy));
    tracing::info!(
        model = %config.model,
        provider_configured = classifier.is_provider_configured(),
        "Classifier ready"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(api::serve(config.bind_addr, Arc::clone(&classifier)));
    drop(runtime);
    result
}
