//! Application state management.

use std::sync::Arc;

use crate::auth::{AuthGateway, OAuthGateway};
use crate::store::{Backend, JsonFileBackend, MemoryBackend, StatsService, StoreError};

use super::config::{BackendKind, Config, StorageConfig};

/// Statistics service over whichever backend was configured.
pub type SharedStats = Arc<StatsService<Box<dyn Backend>>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    stats: SharedStats,
    auth: Option<Arc<dyn AuthGateway>>,
}

impl AppState {
    /// Create a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let backend = Self::open_backend(&config.storage)?;
        let auth = config
            .auth
            .clone()
            .map(|auth| Arc::new(OAuthGateway::new(auth.with_env_fallback())) as Arc<dyn AuthGateway>);

        Ok(Self::new(backend).with_auth_gateway(auth))
    }

    /// State over an already-open backend, with login disabled.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            stats: Arc::new(StatsService::new(backend)),
            auth: None,
        }
    }

    /// Replace the login gateway.
    pub fn with_auth_gateway(mut self, auth: Option<Arc<dyn AuthGateway>>) -> Self {
        self.auth = auth;
        self
    }

    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    pub fn auth(&self) -> Option<&Arc<dyn AuthGateway>> {
        self.auth.as_ref()
    }

    fn open_backend(config: &StorageConfig) -> Result<Box<dyn Backend>, StateError> {
        let open_err = |source| StateError::OpenStore {
            backend: config.backend,
            path: config.path.clone(),
            source,
        };

        match config.backend {
            BackendKind::Memory => Ok(Box::new(MemoryBackend::new())),
            BackendKind::File => JsonFileBackend::init(&config.path)
                .map(|b| Box::new(b) as Box<dyn Backend>)
                .map_err(open_err),
            #[cfg(feature = "kv")]
            BackendKind::Kv => crate::store::FjallBackend::open(std::path::Path::new(&config.path))
                .map(|b| Box::new(b) as Box<dyn Backend>)
                .map_err(open_err),
            #[cfg(not(feature = "kv"))]
            BackendKind::Kv => Err(StateError::BackendUnavailable(config.backend)),
        }
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open or initialize the configured store.
    OpenStore {
        backend: BackendKind,
        path: String,
        source: StoreError,
    },
    /// The backend was not compiled into this binary.
    BackendUnavailable(BackendKind),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore {
                backend,
                path,
                source,
            } => {
                write!(f, "Failed to open {:?} store at '{}': {}", backend, path, source)
            }
            StateError::BackendUnavailable(backend) => {
                write!(f, "Storage backend {:?} is not enabled in this build", backend)
            }
        }
    }
}

impl std::error::Error for StateError {}
