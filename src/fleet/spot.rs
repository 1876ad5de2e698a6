use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Provider-reported state of one spot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotRequestStatus {
    Open,
    Fulfilled { instance_id: String },
    /// Cancelled, failed or otherwise closed without an instance.
    Closed { code: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotRequestUpdate {
    pub request_id: String,
    pub status: SpotRequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Pending { waiting: Vec<String> },
    Fulfilled { instance_ids: Vec<String> },
    /// Gave up; carries the requests that never produced an instance.
    Expired { unfulfilled: Vec<String> },
}

impl PollState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Pending { .. })
    }
}

/// Tracks a batch of spot requests until every one is fulfilled or the
/// tick budget runs out. Each call to [`SpotRequestPoll::tick`] is one poll.
#[derive(Debug, Clone)]
pub struct SpotRequestPoll {
    waiting: BTreeSet<String>,
    fulfilled: Vec<String>,
    closed: Vec<String>,
    ticks: u32,
    max_ticks: u32,
}

impl SpotRequestPoll {
    #[must_use]
    pub fn new(request_ids: &[String], max_ticks: u32) -> Self {
        Self {
            waiting: request_ids.iter().cloned().collect(),
            fulfilled: Vec::new(),
            closed: Vec::new(),
            ticks: 0,
            max_ticks,
        }
    }

    #[must_use]
    pub fn waiting(&self) -> Vec<String> {
        self.waiting.iter().cloned().collect()
    }

    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Current state without consuming a tick.
    #[must_use]
    pub fn state(&self) -> PollState {
        if self.waiting.is_empty() && self.closed.is_empty() {
            return PollState::Fulfilled {
                instance_ids: self.fulfilled.clone(),
            };
        }
        if self.ticks >= self.max_ticks || (self.waiting.is_empty() && !self.closed.is_empty()) {
            let mut unfulfilled = self.waiting();
            unfulfilled.extend(self.closed.iter().cloned());
            return PollState::Expired { unfulfilled };
        }
        PollState::Pending {
            waiting: self.waiting(),
        }
    }

    /// Applies one round of provider updates. Updates for unknown or
    /// already settled requests are ignored; terminal states never change.
    pub fn tick(&mut self, updates: &[SpotRequestUpdate]) -> PollState {
        if self.state().is_terminal() {
            return self.state();
        }
        self.ticks = self.ticks.saturating_add(1);
        for update in updates {
            if !self.waiting.remove(&update.request_id) {
                continue;
            }
            match &update.status {
                SpotRequestStatus::Open => {
                    self.waiting.insert(update.request_id.clone());
                }
                SpotRequestStatus::Fulfilled { instance_id } => {
                    info!("spot bee `{}` joined the swarm.", instance_id);
                    self.fulfilled.push(instance_id.clone());
                }
                SpotRequestStatus::Closed { code } => {
                    debug!(request = %update.request_id, code = %code, "Spot request closed");
                    self.closed.push(update.request_id.clone());
                }
            }
        }
        self.state()
    }
}

/// Where spot request updates come from.
#[async_trait]
pub trait SpotRequestSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns the provider's error when the requests cannot be described.
    async fn describe(&self, request_ids: &[String]) -> Result<Vec<SpotRequestUpdate>, Self::Error>;
}

/// Drives `poll` on a fixed interval until it settles.
///
/// # Errors
///
/// Propagates the first error reported by `source`.
pub async fn wait_for_fulfillment<S>(
    source: &S,
    poll: &mut SpotRequestPoll,
    interval: Duration,
) -> Result<PollState, S::Error>
where
    S: SpotRequestSource + ?Sized,
{
    // A zero period would panic inside tokio.
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
    loop {
        let current = poll.state();
        if current.is_terminal() {
            return Ok(current);
        }
        ticker.tick().await;
        let updates = source.describe(&poll.waiting()).await?;
        poll.tick(&updates);
    }
}
