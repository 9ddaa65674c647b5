use crate::{
    config::myconfig::Config,
    di::{DependenciesInject, DependenciesInjectDeps},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{ConnectionPool, JwtConfig, RedisClient, RedisConfig},
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
    pub jwt_config: DynJwtService,
    pub system_metrics: Arc<SystemMetrics>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("registry", &self.registry)
            .field("jwt_config", &self.jwt_config)
            .field("system_metrics", &self.system_metrics)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let redis_config = RedisConfig::new(
            config.redis.host.clone(),
            config.redis.port,
            config.redis.db,
            config.redis.password.clone(),
        );

        let redis = RedisClient::new(&redis_config).context("Failed to create Redis pool")?;

        // Price cache is best effort.
        if let Err(e) = redis.ping().await {
            warn!("⚠️ Redis not reachable at startup, price cache disabled until it is: {e:#}");
        }

        let deps = DependenciesInjectDeps {
            pool,
            redis,
            lock_timeout: config.lock_timeout,
            price_cache_ttl: config.price_cache_ttl,
        };

        let di_container = DependenciesInject::new(deps, &mut registry);

        system_metrics.register(&mut registry);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;

        Ok(Self {
            di_container,
            registry: Arc::new(registry),
            jwt_config,
            system_metrics,
        })
    }
}
