//! Timer abstraction and the periodic series refresh loop.
//!
//! Components never sleep on the wall clock directly: they wait on an injected
//! [`Scheduler`], so tests can run every timer path instantly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::signal::SignalSynthesizer;
use crate::state::AppStateStore;

/// Source of delays for periodic and single-shot triggers.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Resolve once `duration` has elapsed on this scheduler's clock.
    async fn sleep(&self, duration: Duration);
}

/// Scheduler backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Scheduler that resolves immediately and records each requested delay.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    requested: Mutex<Vec<Duration>>,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in call order.
    pub fn requested(&self) -> Vec<Duration> {
        match self.requested.lock() {
            Ok(r) => r.clone(),
            Err(_) => vec![],
        }
    }
}

#[async_trait]
impl Scheduler for ImmediateScheduler {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut r) = self.requested.lock() {
            r.push(duration);
        }
    }
}

// =============================================================================
// ShutdownHandle
// =============================================================================

/// Cloneable stop signal for a [`RefreshLoop`].
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    triggered: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop. Takes effect at the next tick boundary.
    pub fn shutdown(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    async fn notified(&self) {
        self.notify.notified().await;
    }
}

// =============================================================================
// RefreshLoop
// =============================================================================

/// Periodic trigger that regenerates the consumption series into the store.
pub struct RefreshLoop {
    store: Arc<AppStateStore>,
    synthesizer: SignalSynthesizer,
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    seed: Option<u64>,
    max_ticks: Option<usize>,
    shutdown: ShutdownHandle,
}

impl RefreshLoop {
    pub fn new(
        store: Arc<AppStateStore>,
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
    ) -> Self {
        let synthesizer = SignalSynthesizer::from_tariff(&store.tariff());
        Self {
            store,
            synthesizer,
            scheduler,
            interval,
            seed: None,
            max_ticks: None,
            shutdown: ShutdownHandle::new(),
        }
    }

    /// Use a fixed seed so every refresh yields the same noise.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Stop on its own after `ticks` refreshes.
    pub fn with_max_ticks(mut self, ticks: usize) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Generate a series ending now and store it.
    pub fn refresh_once(&self) -> Result<()> {
        let now = Utc::now();
        let series = match self.seed {
            Some(seed) => self.synthesizer.generate_seeded(now, seed),
            None => self
                .synthesizer
                .generate_daily_series(now, &mut rand::rng()),
        };
        self.store.replace_energy_series(series)
    }

    /// Refresh immediately, then once per interval until shut down or the
    /// tick limit is reached. Returns the number of refreshes performed.
    pub async fn run(&self) -> usize {
        info!(interval_ms = self.interval.as_millis() as u64, "Series refresh loop started");
        let mut ticks = 0usize;

        loop {
            if self.shutdown.is_triggered() || self.limit_reached(ticks) {
                break;
            }

            match self.refresh_once() {
                Ok(()) => debug!(tick = ticks, "Series refreshed"),
                Err(e) => warn!(error = %e, "Series refresh failed"),
            }
            ticks += 1;

            if self.limit_reached(ticks) {
                break;
            }

            tokio::select! {
                biased;
                _ = self.shutdown.notified() => break,
                _ = self.scheduler.sleep(self.interval) => {}
            }
        }

        info!(ticks, "Series refresh loop stopped");
        ticks
    }

    fn limit_reached(&self, ticks: usize) -> bool {
        self.max_ticks.is_some_and(|max| ticks >= max)
    }
}
