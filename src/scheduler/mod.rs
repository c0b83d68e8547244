//! Periodic refresh orchestration.
//!
//! A single recurring timer drives refresh cycles over the tracked asset
//! universe. Cycles never overlap: an atomic running flag drops (not
//! queues) any trigger that fires while a cycle is in flight, and a guard
//! object clears the flag on every exit path so an erroring cycle cannot
//! deadlock the next tick.
//!
//! Each cycle runs two sequential fan-out phases with allSettled
//! semantics: every task in a phase runs concurrently and one task's
//! failure never cancels its siblings. Phase B starts only after every
//! Phase A task has settled. A retention cleanup closes the cycle.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::analysis::strategy;
use crate::config::SchedulerConfig;
use crate::domain::{Timeframe, TRACKED_ASSETS};
use crate::error::Result;
use crate::predictor::{NewsService, PredictionGenerator};
use crate::service::MarketDataService;
use crate::store::{PredictionStore, StrategyStore};

type CycleTask<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Shared cycle coordination state.
///
/// The running flag is the only cross-task mutable coordination point; it
/// must stay atomic because the runtime schedules cycles across threads.
#[derive(Debug, Default)]
pub struct SchedulerState {
    running: AtomicBool,
    cycles_completed: AtomicU64,
}

impl SchedulerState {
    /// Whether a refresh cycle is currently in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Number of cycles that ran to completion.
    #[must_use]
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed.load(Ordering::Relaxed)
    }
}

/// Clears the running flag when the cycle exits, normally or not.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to control a started scheduler.
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl SchedulerHandle {
    /// Signal the scheduler to shut down. Safe to call after the loop has
    /// already stopped.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Drives the periodic refresh cycles.
pub struct Scheduler {
    market: Arc<MarketDataService>,
    generator: Arc<PredictionGenerator>,
    news: Arc<NewsService>,
    strategies: Arc<dyn StrategyStore>,
    store: Arc<dyn PredictionStore>,
    config: SchedulerConfig,
    state: Arc<SchedulerState>,
}

impl Scheduler {
    pub fn new(
        market: Arc<MarketDataService>,
        generator: Arc<PredictionGenerator>,
        news: Arc<NewsService>,
        strategies: Arc<dyn StrategyStore>,
        store: Arc<dyn PredictionStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            market,
            generator,
            news,
            strategies,
            store,
            config,
            state: Arc::new(SchedulerState::default()),
        }
    }

    /// Cycle coordination state, shared with the running loop.
    #[must_use]
    pub fn state(&self) -> Arc<SchedulerState> {
        Arc::clone(&self.state)
    }

    /// Start the recurring timer plus one warm-up cycle shortly after
    /// process start. Returns the shutdown handle.
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let warmup = Duration::from_secs(self.config.warmup_delay_secs);
        let cycle = Duration::from_secs(self.config.cycle_secs);

        info!(
            cycle_secs = self.config.cycle_secs,
            warmup_delay_secs = self.config.warmup_delay_secs,
            "Scheduler started"
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Scheduler shutting down before warm-up");
                    return;
                }
                _ = tokio::time::sleep(warmup) => {
                    info!("Running warm-up refresh cycle");
                    self.run_cycle().await;
                }
            }

            let mut interval = tokio::time::interval(cycle);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // Consume the immediate first tick; the warm-up already ran.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Scheduler shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.run_cycle().await;
                    }
                }
            }
        });

        SchedulerHandle { shutdown_tx }
    }

    /// Run one refresh cycle, unless one is already in flight.
    ///
    /// A losing trigger is dropped entirely; it is neither queued nor
    /// deferred to the next tick.
    pub async fn run_cycle(&self) {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh cycle already in flight, skipping trigger");
            return;
        }
        let _guard = CycleGuard(&self.state.running);

        // Phase A: exchange depth per asset + strategy metric drift.
        let mut phase_a: Vec<CycleTask<'_>> = TRACKED_ASSETS
            .iter()
            .map(|&asset| {
                Box::pin(async move { self.market.refresh_depth(asset).await.map(|_| ()) })
                    as CycleTask<'_>
            })
            .collect();
        phase_a.push(Box::pin(self.drift_strategies()));
        Self::settle("A", phase_a).await;

        // Phase B: AI predictions per asset + the news batch.
        let mut phase_b: Vec<CycleTask<'_>> = TRACKED_ASSETS
            .iter()
            .map(|&asset| {
                Box::pin(async move {
                    self.generator
                        .try_refresh(asset, Timeframe::OneHour)
                        .await
                        .map(|_| ())
                }) as CycleTask<'_>
            })
            .collect();
        phase_b.push(Box::pin(async move {
            self.news.refresh().await.map(|_| ())
        }));
        Self::settle("B", phase_b).await;

        self.cleanup().await;

        self.state.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Await a fan-out phase and log its tally. Failed tasks have already
    /// logged their own cause at the point of failure.
    async fn settle(phase: &str, tasks: Vec<CycleTask<'_>>) {
        let total = tasks.len();
        let ok = join_all(tasks)
            .await
            .into_iter()
            .filter(Result::is_ok)
            .count();

        if ok == total {
            info!(phase, ok, total, "Refresh phase complete");
        } else {
            warn!(phase, ok, total, "Refresh phase completed with failures");
        }
    }

    async fn drift_strategies(&self) -> Result<()> {
        let mut strategies = self.strategies.list().await?;
        let mut rng = StdRng::from_entropy();

        for item in &mut strategies {
            strategy::drift(item, &mut rng);
            self.strategies.save(item).await?;
        }

        debug!(strategies = strategies.len(), "Strategy metrics drifted");
        Ok(())
    }

    async fn cleanup(&self) {
        let cutoff = Utc::now() - chrono::Duration::hours(self.config.retention_hours);
        match self.store.delete_older_than(cutoff).await {
            Ok(0) => debug!("No expired predictions to clean up"),
            Ok(deleted) => info!(deleted, "Cleaned up expired predictions"),
            Err(err) => warn!(error = %err, "Prediction cleanup failed"),
        }
    }
}
