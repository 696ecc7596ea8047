use std::sync::Arc;

use ag_core::{ChatModel, Result};
use tracing::info;

use crate::{Config, Provider};

pub mod dummy;
pub mod openrouter;

pub use dummy::DummyModel;
pub use openrouter::OpenRouterModel;

pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn ChatModel>> {
    let config = config.unwrap_or_default();
    let model: Arc<dyn ChatModel> = match config.provider {
        Provider::OpenRouter => Arc::new(OpenRouterModel::new(&config)?),
        Provider::Dummy => Arc::new(DummyModel::new()),
    };
    info!("Using {} chat model ({})", model.name(), config.model_name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_model() {
        let dummy = create_model(Some(Config {
            provider: Provider::Dummy,
            ..Default::default()
        }))
        .await
        .unwrap();
        assert_eq!(dummy.name(), "Dummy");

        // The default provider needs a key.
        assert!(create_model(None).await.is_err());

        let openrouter = create_model(Some(Config {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
        assert_eq!(openrouter.name(), "OpenRouter");
    }
}
