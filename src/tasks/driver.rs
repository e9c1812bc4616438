//! Session driver: the single event loop that owns the coach and its timers

use std::time::Instant;

use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender},
        oneshot, watch,
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{commit_timer::spawn_commit_timer, now, sampler::spawn_sampler};
use crate::{
    catalog::{PatternKey, SessionKey},
    state::{Coach, CoachView, CommitOutcome},
};

/// Commands the presentation layer can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start if idle, stop if running
    PrimaryAction,
    /// Choose the pattern for the next session
    SelectPattern(PatternKey),
    /// Choose the session length for the next session
    SelectSession(SessionKey),
}

/// Everything that reaches the driver's event loop
#[derive(Debug)]
pub(crate) enum Event {
    Command(Command),
    Tick(Instant),
    CommitTransition { epoch: u64 },
    /// Answered once no session is running, after every event queued before it
    WaitIdle(oneshot::Sender<()>),
    Shutdown,
}

/// Owns the [`Coach`] together with the sampler and commit timer handles
///
/// Events are handled one at a time, so no locking is needed. Every path that
/// leaves the running state (manual stop, completion, restart, shutdown)
/// releases both timers and answers any idle waiters.
///
/// The loop ends on [`DriverHandle::shutdown`] or once every handle is
/// dropped; the timer tasks only hold weak senders.
#[derive(Debug)]
pub struct SessionDriver {
    coach: Coach,
    events_tx: WeakUnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    view_tx: watch::Sender<CoachView>,
    /// Keep the receiver alive to prevent channel closure
    _view_rx: watch::Receiver<CoachView>,
    sampler: Option<JoinHandle<()>>,
    commit: Option<JoinHandle<()>>,
    /// Identifies the crossfade the outstanding commit timer belongs to
    epoch: u64,
    idle_waiters: Vec<oneshot::Sender<()>>,
}

/// Cloneable handle for sending commands to a running [`SessionDriver`] and
/// watching its view
#[derive(Debug, Clone)]
pub struct DriverHandle {
    events: UnboundedSender<Event>,
    view: watch::Receiver<CoachView>,
}

impl DriverHandle {
    fn post(&self, event: Event) -> Result<(), String> {
        self.events
            .send(event)
            .map_err(|_| "Session driver is not running".to_string())
    }

    pub fn send(&self, command: Command) -> Result<(), String> {
        self.post(Event::Command(command))
    }

    /// Ask the driver to stop any session and exit its loop
    pub fn shutdown(&self) -> Result<(), String> {
        self.post(Event::Shutdown)
    }

    /// Latest published view
    pub fn view(&self) -> CoachView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoachView> {
        self.view.clone()
    }

    /// Wait until no session is running
    ///
    /// Goes through the event queue, so commands sent earlier from this task
    /// are applied before the driver decides whether it is idle.
    pub async fn wait_idle(&self) -> Result<(), String> {
        let (tx, rx) = oneshot::channel();
        self.post(Event::WaitIdle(tx))?;
        rx.await.map_err(|_| "Session driver closed".to_string())
    }
}

impl SessionDriver {
    pub fn new(coach: Coach) -> (Self, DriverHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(coach.view(now()));

        let driver_tx = events_tx.downgrade();
        let handle = DriverHandle {
            events: events_tx,
            view: view_rx.clone(),
        };

        let driver = Self {
            coach,
            events_tx: driver_tx,
            events_rx,
            view_tx,
            _view_rx: view_rx,
            sampler: None,
            commit: None,
            epoch: 0,
            idle_waiters: Vec::new(),
        };

        (driver, handle)
    }

    pub fn coach(&self) -> &Coach {
        &self.coach
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn has_pending_commit(&self) -> bool {
        self.commit.is_some()
    }

    /// Process events until shutdown or until every handle is gone
    pub async fn run(mut self) {
        info!("Session driver started");

        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }

        self.stop_session();
        self.publish(now());
        self.release_idle_waiters();
        info!("Session driver stopped");
    }

    /// Handle one event; returns `false` once the loop should exit
    pub(crate) fn handle_event(&mut self, event: Event) -> bool {
        let at = match event {
            Event::Command(command) => {
                let at = now();
                self.handle_command(command, at);
                at
            }
            Event::Tick(at) => {
                if !self.handle_tick(at) {
                    return true;
                }
                at
            }
            Event::CommitTransition { epoch } => {
                if !self.handle_commit(epoch) {
                    return true;
                }
                now()
            }
            Event::WaitIdle(waiter) => {
                if self.coach.is_running() {
                    self.idle_waiters.push(waiter);
                } else {
                    let _ = waiter.send(());
                }
                return true;
            }
            Event::Shutdown => {
                debug!("Shutdown requested");
                return false;
            }
        };

        self.publish(at);
        if !self.coach.is_running() {
            self.release_idle_waiters();
        }
        true
    }

    fn handle_command(&mut self, command: Command, at: Instant) {
        debug!("Command: {:?}", command);
        match command {
            Command::PrimaryAction => {
                if self.coach.is_running() {
                    self.stop_session();
                } else {
                    self.start_session(at);
                }
            }
            Command::SelectPattern(key) => self.coach.set_selected_pattern(key),
            Command::SelectSession(key) => self.coach.set_selected_session(key),
        }
    }

    /// Returns whether the sample was applied
    fn handle_tick(&mut self, at: Instant) -> bool {
        if !self.coach.is_running() {
            debug!("Ignoring sample queued before the session ended");
            return false;
        }

        let outcome = self.coach.tick(at);
        if outcome.flagged_stop {
            info!("Session time is up, finishing the current cycle");
        }
        if outcome.transition.is_some() {
            self.schedule_commit();
        }
        true
    }

    /// Returns whether the commit belonged to the current crossfade
    fn handle_commit(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || self.commit.is_none() {
            debug!(
                "Discarding stale crossfade commit {} (current {})",
                epoch, self.epoch
            );
            return false;
        }
        self.commit = None;

        match self.coach.commit_transition() {
            CommitOutcome::Completed => {
                self.cancel_sampler();
            }
            CommitOutcome::Advanced { .. } => {}
            CommitOutcome::Ignored => {
                warn!("Crossfade commit {} found nothing pending", epoch);
            }
        }
        true
    }

    fn start_session(&mut self, at: Instant) {
        self.cancel_timers();
        self.coach.start(at);
        self.sampler = Some(spawn_sampler(self.events_tx.clone()));
    }

    fn stop_session(&mut self) {
        self.coach.stop();
        self.cancel_timers();
    }

    /// Call after publishing, so woken waiters see the idle view
    fn release_idle_waiters(&mut self) {
        for waiter in self.idle_waiters.drain(..) {
            // The waiting task may have given up already
            let _ = waiter.send(());
        }
    }

    fn schedule_commit(&mut self) {
        self.cancel_commit();
        self.epoch += 1;
        self.commit = Some(spawn_commit_timer(self.events_tx.clone(), self.epoch));
    }

    fn cancel_timers(&mut self) {
        self.cancel_sampler();
        self.cancel_commit();
    }

    fn cancel_sampler(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            debug!("Cancelling sampler");
            sampler.abort();
        }
    }

    fn cancel_commit(&mut self) {
        if let Some(commit) = self.commit.take() {
            debug!("Cancelling crossfade commit {}", self.epoch);
            commit.abort();
            // Anything already queued for this crossfade is now stale
            self.epoch += 1;
        }
    }

    fn publish(&self, at: Instant) {
        if let Err(e) = self.view_tx.send(self.coach.view(at)) {
            warn!("Failed to publish view: {}", e);
        }
    }
}
