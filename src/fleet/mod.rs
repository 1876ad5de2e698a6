//! Fleet-side helpers that sit outside the attack core.

mod spot;

#[cfg(test)]
mod tests;

pub use spot::{
    PollState, SpotRequestPoll, SpotRequestSource, SpotRequestStatus,
    SpotRequestUpdate, wait_for_fulfillment,
};
