//! Provider selection, resolved once at startup.
//!
//! The registry holds every constructed adapter and pins two roles: the
//! default provider for blocking generation and the async provider driving
//! the job pipeline. Capability mismatches are configuration errors and
//! surface at construction, not at request time.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderKind, VideoProvider};

/// Which provider serves each role.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub default_provider: ProviderKind,
    pub async_provider: ProviderKind,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::Blotato,
            async_provider: ProviderKind::Blotato,
        }
    }
}

impl RegistryConfig {
    /// Read role assignments from `VIDEO_PROVIDER` and `VIDEO_ASYNC_PROVIDER`.
    pub fn from_env() -> ProviderResult<Self> {
        let defaults = Self::default();
        let default_provider = match std::env::var("VIDEO_PROVIDER") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.default_provider,
        };
        let async_provider = match std::env::var("VIDEO_ASYNC_PROVIDER") {
            Ok(v) => v.parse()?,
            Err(_) => default_provider,
        };
        Ok(Self {
            default_provider,
            async_provider,
        })
    }
}

pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn VideoProvider>>,
    default_kind: ProviderKind,
    async_kind: ProviderKind,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("default_kind", &self.default_kind)
            .field("async_kind", &self.async_kind)
            .finish()
    }
}

impl ProviderRegistry {
    /// Build the registry, verifying that both configured roles resolve to a
    /// registered provider and that the async role actually supports
    /// asynchronous generation.
    pub fn new(
        providers: Vec<Arc<dyn VideoProvider>>,
        config: RegistryConfig,
    ) -> ProviderResult<Self> {
        let providers: HashMap<ProviderKind, Arc<dyn VideoProvider>> =
            providers.into_iter().map(|p| (p.kind(), p)).collect();

        if !providers.contains_key(&config.default_provider) {
            return Err(ProviderError::Configuration(format!(
                "default provider {} is not registered",
                config.default_provider
            )));
        }
        let async_provider = providers.get(&config.async_provider).ok_or_else(|| {
            ProviderError::Configuration(format!(
                "async provider {} is not registered",
                config.async_provider
            ))
        })?;
        if !async_provider.supports_async() {
            return Err(ProviderError::Configuration(format!(
                "provider {} does not support asynchronous generation",
                config.async_provider
            )));
        }

        info!(
            default_role = %config.default_provider,
            async_role = %config.async_provider,
            "provider registry initialized"
        );

        Ok(Self {
            providers,
            default_kind: config.default_provider,
            async_kind: config.async_provider,
        })
    }

    /// The provider serving blocking generation.
    pub fn default_provider(&self) -> Arc<dyn VideoProvider> {
        Arc::clone(&self.providers[&self.default_kind])
    }

    /// The async-capable provider driving the job pipeline.
    pub fn async_provider(&self) -> Arc<dyn VideoProvider> {
        Arc::clone(&self.providers[&self.async_kind])
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn VideoProvider>> {
        self.providers.get(&kind).map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sora::SoraProvider;
    use async_trait::async_trait;

    struct FakeAsyncProvider;

    #[async_trait]
    impl VideoProvider for FakeAsyncProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Blotato
        }

        async fn request_creation(
            &self,
            _prompt: &str,
            _style: Option<&str>,
        ) -> ProviderResult<String> {
            Ok("creation-1".to_string())
        }

        async fn fetch_result(&self, _creation_id: &str) -> ProviderResult<Option<String>> {
            Ok(None)
        }

        async fn generate_blocking(
            &self,
            _prompt: &str,
            _style: Option<&str>,
        ) -> ProviderResult<String> {
            Ok("https://cdn.example.com/v.mp4".to_string())
        }
    }

    #[test]
    fn test_sync_only_provider_rejected_for_async_role() {
        let err = ProviderRegistry::new(
            vec![Arc::new(SoraProvider::new())],
            RegistryConfig {
                default_provider: ProviderKind::Sora,
                async_provider: ProviderKind::Sora,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_unregistered_provider_rejected() {
        let err = ProviderRegistry::new(
            vec![Arc::new(SoraProvider::new())],
            RegistryConfig {
                default_provider: ProviderKind::Blotato,
                async_provider: ProviderKind::Blotato,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_roles_resolve_independently() {
        let registry = ProviderRegistry::new(
            vec![Arc::new(SoraProvider::new()), Arc::new(FakeAsyncProvider)],
            RegistryConfig {
                default_provider: ProviderKind::Sora,
                async_provider: ProviderKind::Blotato,
            },
        )
        .unwrap();
        assert_eq!(registry.default_provider().kind(), ProviderKind::Sora);
        assert_eq!(registry.async_provider().kind(), ProviderKind::Blotato);
        assert!(registry.get(ProviderKind::Blotato).is_some());
    }
}
