#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use shortlink::application::services::{CachePolicy, ShortenerConfig};
use shortlink::domain::click_event::ClickEvent;
use shortlink::domain::clock::ManualClock;
use shortlink::domain::entities::{LinkRecord, NewLinkRecord};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::cache::MemoryCache;
use shortlink::infrastructure::persistence::MemoryLinkRepository;
use shortlink::routes::router;
use shortlink::state::AppState;

pub const BASE_URL: &str = "https://s.example.com";

/// A fully in-memory service with a clock the test controls.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryLinkRepository>,
    pub cache: Arc<MemoryCache>,
    pub clock: ManualClock,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn test_app() -> TestApp {
    test_app_with_policy(CachePolicy::default())
}

pub fn test_app_with_policy(policy: CachePolicy) -> TestApp {
    let clock = ManualClock::new(Utc::now());
    let repo = Arc::new(MemoryLinkRepository::new());
    let cache = Arc::new(MemoryCache::with_clock(Arc::new(clock.clone())));
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        repo.clone(),
        cache.clone(),
        Arc::new(clock.clone()),
        tx,
        policy,
        ShortenerConfig {
            base_url: BASE_URL.to_string(),
            id_length: 7,
            max_attempts: 3,
        },
    );

    TestApp {
        router: router(state),
        repo,
        cache,
        clock,
        clicks: rx,
    }
}

pub fn capped_policy() -> CachePolicy {
    CachePolicy {
        positive_ttl: Duration::from_secs(86_400),
        negative_ttl: Duration::from_secs(300),
        cap_to_expiry: true,
    }
}

pub async fn create_link(
    repo: &MemoryLinkRepository,
    id: &str,
    url: &str,
    created_at: DateTime<Utc>,
    ttl: Option<TimeDelta>,
) -> LinkRecord {
    repo.insert(NewLinkRecord {
        id: id.to_string(),
        original_url: url.to_string(),
        short_url: format!("{}/{}", BASE_URL, id),
        created_at,
        expires_at: ttl.map(|d| created_at + d),
    })
    .await
    .unwrap()
}
