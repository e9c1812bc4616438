//! Periodic sampler background task

use tokio::{
    sync::mpsc::WeakUnboundedSender,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

use super::{driver::Event, now};
use crate::state::timing::SAMPLE_PERIOD;

/// Spawn the task that feeds a clock sample to the driver every [`SAMPLE_PERIOD`]
///
/// Runs until aborted by the driver or until the driver goes away. Holds only a
/// weak sender so it never keeps the driver's queue open on its own.
pub(crate) fn spawn_sampler(events: WeakUnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Sampler started ({}ms)", SAMPLE_PERIOD.as_millis());

        let mut interval = interval(SAMPLE_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let sent = events
                .upgrade()
                .is_some_and(|events| events.send(Event::Tick(now())).is_ok());
            if !sent {
                debug!("Driver closed, sampler exiting");
                break;
            }
        }
    })
}
