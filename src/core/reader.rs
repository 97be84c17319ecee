use std::future::Future;

use tracing::{debug, info};
use url::Url;

use crate::core::fetch::Spider;
use crate::core::health::NodeState;
use crate::error::HealthError;
use crate::schemas::{BootstrapDoc, PoolDoc, decode};
use crate::url_utils::resolve_pool_url;

/// Anything that can report the per-node health of a cluster.
pub trait HealthSource: Send + 'static {
    fn get_states(&mut self) -> impl Future<Output = Result<Vec<NodeState>, HealthError>> + Send;
}

/// Reads node health through the REST status API.
///
/// The first call downloads the bootstrap document to discover where the named pool
/// lives. Once found, that pool url is kept for the lifetime of the reader and the
/// bootstrap document is never read again.
pub struct ClusterHealthReader {
    spider: Spider,
    bootstrap_url: Url,
    pool_url: Option<Url>,
    pool_name: String,
}

impl ClusterHealthReader {
    pub fn new(spider: Spider, bootstrap_url: Url, pool_name: impl Into<String>) -> Self {
        Self {
            spider,
            bootstrap_url,
            pool_url: None,
            pool_name: pool_name.into(),
        }
    }

    pub fn bootstrap_url(&self) -> &Url {
        &self.bootstrap_url
    }

    pub fn pool_url(&self) -> Option<&Url> {
        self.pool_url.as_ref()
    }

    pub fn pool_name(&self) -> &str {
        &self.pool_name
    }

    pub async fn get_states(&mut self) -> Result<Vec<NodeState>, HealthError> {
        let pool_url = match &self.pool_url {
            Some(url) => url.clone(),
            None => self.bootstrap().await?,
        };

        let body = self.spider.fetch(&pool_url).await?;
        let doc: PoolDoc = decode("pool document", &body)?;

        let states = doc
            .nodes
            .iter()
            .map(|node| NodeState::from_status(&node.status))
            .collect::<Vec<_>>();
        debug!(pool = %self.pool_name, nodes = states.len(), "read node states");

        Ok(states)
    }

    /// Locate the pool in the bootstrap document and cache its url.
    async fn bootstrap(&mut self) -> Result<Url, HealthError> {
        info!(url = %self.bootstrap_url, pool = %self.pool_name, "bootstrapping");

        let body = self.spider.fetch(&self.bootstrap_url).await?;
        let doc: BootstrapDoc = decode("bootstrap document", &body)?;

        let entry = doc
            .pools
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&self.pool_name))
            .ok_or_else(|| HealthError::PoolNotFound(self.pool_name.clone()))?;

        let pool_url = resolve_pool_url(&self.bootstrap_url, &entry.uri).map_err(|e| {
            HealthError::InvalidResponse(format!("bad uri {:?} for pool {}: {}", entry.uri, entry.name, e))
        })?;

        info!(pool = %self.pool_name, url = %pool_url, "discovered pool");
        self.pool_url = Some(pool_url.clone());

        Ok(pool_url)
    }
}

impl HealthSource for ClusterHealthReader {
    async fn get_states(&mut self) -> Result<Vec<NodeState>, HealthError> {
        ClusterHealthReader::get_states(self).await
    }
}
