//! Application state and dependency injection.

use dolphin_core::ModelService;

use crate::service::{ApiKeys, ParserHandle, Result, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    parser: ParserHandle,
    api_keys: ApiKeys,
}

impl ServiceState {
    /// Creates state from already built parts.
    pub fn new(parser: ParserHandle, api_keys: ApiKeys) -> Self {
        Self { parser, api_keys }
    }

    /// Initializes application state from configuration.
    ///
    /// Loads the API keys and wraps `model` into a parser using the
    /// configured batch policy. Passing `None` starts the service without a
    /// model.
    pub async fn from_config(config: &ServiceConfig, model: Option<ModelService>) -> Result<Self> {
        config.validate()?;

        let service_state = Self {
            parser: config.parser_handle(model),
            api_keys: config.load_api_keys().await?,
        };

        Ok(service_state)
    }

    /// The parser handle.
    pub fn parser(&self) -> &ParserHandle {
        &self.parser
    }

    /// The accepted API keys.
    pub fn api_keys(&self) -> &ApiKeys {
        &self.api_keys
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(parser: ParserHandle);
impl_di!(api_keys: ApiKeys);
