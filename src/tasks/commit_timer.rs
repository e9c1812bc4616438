//! One-shot crossfade commit task

use tokio::{sync::mpsc::WeakUnboundedSender, task::JoinHandle, time::sleep};
use tracing::debug;

use super::driver::Event;
use crate::state::timing::FADE;

/// Spawn the task that asks the driver to commit crossfade `epoch` after [`FADE`]
pub(crate) fn spawn_commit_timer(events: WeakUnboundedSender<Event>, epoch: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(FADE).await;
        let sent = events
            .upgrade()
            .is_some_and(|events| events.send(Event::CommitTransition { epoch }).is_ok());
        if !sent {
            debug!("Driver closed before crossfade {} committed", epoch);
        }
    })
}
