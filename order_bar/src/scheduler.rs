use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use log::*;
use tokio::time::{interval, MissedTickBehavior};

use crate::{
    errors::CycleError,
    favicon::IconPath,
    metrics::{fetch_today_order_count, OrderCountSource},
    notifier::{status_text, StatusSink},
};

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(1);

/// What to do when a fetch-and-notify cycle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleErrorPolicy {
    /// Log the error and wait for the next tick.
    #[default]
    SkipCycle,
    /// Log the error and stop updating. The error is handed back to the caller.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub interval: Duration,
    pub error_policy: CycleErrorPolicy,
    /// Stop after this many updates. `None` runs until the process is terminated.
    pub max_updates: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_UPDATE_INTERVAL, error_policy: CycleErrorPolicy::default(), max_updates: None }
    }
}

/// One tick's worth of work: count today's orders, then show the count on the widget.
pub struct UpdateCycle<S, N> {
    source: S,
    sink: N,
    icon: IconPath,
}

impl<S: OrderCountSource, N: StatusSink> UpdateCycle<S, N> {
    pub fn new(source: S, sink: N, icon: IconPath) -> Self {
        Self { source, sink, icon }
    }

    pub async fn run_once<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<u64, CycleError> {
        let count = fetch_today_order_count(&self.source, now).await?;
        let text = status_text(count);
        self.sink.push_status(&text, &self.icon.to_string()).await?;
        Ok(count)
    }
}

/// Runs an [`UpdateCycle`] immediately and then once per interval. Cycles run one after the other on the calling
/// task. If a cycle overruns the interval, the next one starts as soon as it finishes and the schedule shifts; missed
/// ticks are never replayed.
pub struct UpdateScheduler<S, N> {
    cycle: UpdateCycle<S, N>,
    config: ScheduleConfig,
    state: SchedulerState,
    updates: u64,
    failures: u64,
}

impl<S: OrderCountSource, N: StatusSink> UpdateScheduler<S, N> {
    pub fn new(cycle: UpdateCycle<S, N>, config: ScheduleConfig) -> Self {
        Self { cycle, config, state: SchedulerState::Idle, updates: 0, failures: 0 }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The number of cycles run so far, successful or not.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Only returns if `max_updates` is reached (`Ok`) or a cycle fails under [`CycleErrorPolicy::Exit`] (`Err`).
    pub async fn run(&mut self) -> Result<(), CycleError> {
        let mut timer = interval(self.config.interval.max(MIN_UPDATE_INTERVAL));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.state = SchedulerState::Running;
        info!("🕰️ Order count updates started. Updating every {:?}", self.config.interval);
        loop {
            if self.config.max_updates.is_some_and(|max| self.updates >= max) {
                info!("🕰️ Stopping after {} updates ({} failed)", self.updates, self.failures);
                self.state = SchedulerState::Finished;
                return Ok(());
            }
            timer.tick().await;
            let result = self.cycle.run_once(&Local::now()).await;
            self.updates += 1;
            match result {
                Ok(count) => info!("🕰️ Widget updated. {count} orders today"),
                Err(e) => {
                    self.failures += 1;
                    match self.config.error_policy {
                        CycleErrorPolicy::SkipCycle => {
                            error!("🕰️ Update failed. Trying again at the next tick. {e}");
                        },
                        CycleErrorPolicy::Exit => {
                            error!("🕰️ Update failed. Stopping. {e}");
                            self.state = SchedulerState::Finished;
                            return Err(e);
                        },
                    }
                },
            }
        }
    }
}
