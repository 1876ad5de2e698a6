use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::error::{AppError, AppResult};

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|id| (*id).to_owned()).collect()
}

fn update(request_id: &str, status: SpotRequestStatus) -> SpotRequestUpdate {
    SpotRequestUpdate {
        request_id: request_id.to_owned(),
        status,
    }
}

fn fulfilled(request_id: &str, instance_id: &str) -> SpotRequestUpdate {
    update(
        request_id,
        SpotRequestStatus::Fulfilled {
            instance_id: instance_id.to_owned(),
        },
    )
}

#[test]
fn requests_settle_across_ticks() -> AppResult<()> {
    let mut poll = SpotRequestPoll::new(&ids(&["sir-1", "sir-2"]), 5);

    let first = poll.tick(&[fulfilled("sir-1", "i-1"), update("sir-2", SpotRequestStatus::Open)]);
    if first
        != (PollState::Pending {
            waiting: ids(&["sir-2"]),
        })
    {
        return Err(AppError::validation(format!("Unexpected state: {:?}", first)));
    }

    let second = poll.tick(&[fulfilled("sir-2", "i-2")]);
    if second
        != (PollState::Fulfilled {
            instance_ids: ids(&["i-1", "i-2"]),
        })
    {
        return Err(AppError::validation(format!("Unexpected state: {:?}", second)));
    }
    if poll.ticks() != 2 {
        return Err(AppError::validation("Two polls expected"));
    }
    Ok(())
}

#[test]
fn tick_budget_expires_the_poll() -> AppResult<()> {
    let mut poll = SpotRequestPoll::new(&ids(&["sir-1", "sir-2"]), 2);
    poll.tick(&[fulfilled("sir-1", "i-1")]);
    let state = poll.tick(&[]);
    if state
        != (PollState::Expired {
            unfulfilled: ids(&["sir-2"]),
        })
    {
        return Err(AppError::validation(format!("Unexpected state: {:?}", state)));
    }

    // Terminal states are sticky and stop counting.
    let after = poll.tick(&[fulfilled("sir-2", "i-2")]);
    if after != state || poll.ticks() != 2 {
        return Err(AppError::validation("Expired poll must not change"));
    }
    Ok(())
}

#[test]
fn closed_requests_expire_once_nothing_waits() -> AppResult<()> {
    let mut poll = SpotRequestPoll::new(&ids(&["sir-1", "sir-2"]), 10);
    let state = poll.tick(&[
        fulfilled("sir-1", "i-1"),
        update(
            "sir-2",
            SpotRequestStatus::Closed {
                code: "capacity-not-available".to_owned(),
            },
        ),
        fulfilled("sir-9", "i-9"),
    ]);
    if state
        != (PollState::Expired {
            unfulfilled: ids(&["sir-2"]),
        })
    {
        return Err(AppError::validation(format!("Unexpected state: {:?}", state)));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
#[error("describe failed")]
struct DescribeFailed;

struct ScriptedSource {
    rounds: Mutex<Vec<Vec<SpotRequestUpdate>>>,
}

#[async_trait]
impl SpotRequestSource for ScriptedSource {
    type Error = DescribeFailed;

    async fn describe(&self, _request_ids: &[String]) -> Result<Vec<SpotRequestUpdate>, DescribeFailed> {
        let mut rounds = self.rounds.lock().map_err(|_poisoned| DescribeFailed)?;
        if rounds.is_empty() {
            return Err(DescribeFailed);
        }
        Ok(rounds.remove(0))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn driver_polls_until_fulfilled() -> AppResult<()> {
    let source = ScriptedSource {
        rounds: Mutex::new(vec![
            vec![update("sir-1", SpotRequestStatus::Open)],
            vec![fulfilled("sir-1", "i-1")],
        ]),
    };
    let mut poll = SpotRequestPoll::new(&ids(&["sir-1"]), 5);
    let state = wait_for_fulfillment(&source, &mut poll, Duration::from_millis(1))
        .await
        .map_err(|err| AppError::validation(err.to_string()))?;
    if state
        != (PollState::Fulfilled {
            instance_ids: ids(&["i-1"]),
        })
    {
        return Err(AppError::validation(format!("Unexpected state: {:?}", state)));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn driver_surfaces_source_errors() -> AppResult<()> {
    let source = ScriptedSource {
        rounds: Mutex::new(Vec::new()),
    };
    let mut poll = SpotRequestPoll::new(&ids(&["sir-1"]), 5);
    match wait_for_fulfillment(&source, &mut poll, Duration::from_millis(1)).await {
        Err(DescribeFailed) => Ok(()),
        Ok(state) => Err(AppError::validation(format!("Expected error, got {:?}", state))),
    }
}
