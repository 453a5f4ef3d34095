use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{CachePolicy, Resolver, Shortener, ShortenerConfig};
use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub shortener: Arc<Shortener>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Wires the services around one repository, cache, clock and click queue.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        clock: Arc<dyn Clock>,
        click_sender: mpsc::Sender<ClickEvent>,
        cache_policy: CachePolicy,
        shortener_config: ShortenerConfig,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(
            link_repository.clone(),
            cache.clone(),
            click_sender.clone(),
            clock.clone(),
            cache_policy,
        ));
        let shortener = Arc::new(Shortener::new(
            link_repository.clone(),
            clock,
            shortener_config,
        ));

        Self {
            resolver,
            shortener,
            link_repository,
            cache,
            click_sender,
        }
    }
}
