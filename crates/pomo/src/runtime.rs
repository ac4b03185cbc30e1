//! Event loop driving a [`Timer`]
//!
//! Commands, the 1 second ticks and the deferred auto-start all go through
//! one `select!` loop, so the timer is only ever touched by a single task.
//!
//! The auto-start delay is not canceled by a pause issued during the delay:
//! when it fires, `start()` runs regardless.

use std::future;
use std::pin::Pin;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, Interval, Sleep};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::event::{Command, Event};
use crate::store::Store;
use crate::timer::{Timer, TICK_PERIOD};

/// Sending half used by the presentation layer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl TimerHandle {
    pub fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Timer runtime has stopped"))
    }
}

pub struct Runtime<S, C> {
    timer: Timer<S, C>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<Event>,
    /// Present only between `Started` and `Paused`
    ticker: Option<Interval>,
    auto_start: Option<Pin<Box<Sleep>>>,
}

enum Step {
    Command(Option<Command>),
    Tick,
    AutoStart,
}

impl<S: Store, C: Clock> Runtime<S, C> {
    /// Wrap `timer` in a runtime, returning the command handle and the
    /// event stream alongside it
    pub fn new(timer: Timer<S, C>) -> (Self, TimerHandle, mpsc::UnboundedReceiver<Event>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            timer,
            commands: command_rx,
            events: event_tx,
            ticker: None,
            auto_start: None,
        };

        (runtime, TimerHandle { commands: command_tx }, event_rx)
    }

    /// Process commands and timers until `Shutdown` or until every handle is
    /// dropped, then return the timer.
    pub async fn run(mut self) -> Timer<S, C> {
        loop {
            let step = tokio::select! {
                biased;
                command = self.commands.recv() => Step::Command(command),
                _ = next_tick(&mut self.ticker) => Step::Tick,
                _ = deadline(&mut self.auto_start) => Step::AutoStart,
            };

            let events = match step {
                Step::Command(None) | Step::Command(Some(Command::Shutdown)) => {
                    debug!("Timer runtime shutting down");
                    break;
                }
                Step::Command(Some(command)) => {
                    debug!("Command: {:?}", command);
                    self.timer.handle(command)
                }
                Step::Tick => self.timer.tick(),
                Step::AutoStart => {
                    self.auto_start = None;
                    debug!("Auto-start delay elapsed");
                    self.timer.start()
                }
            };

            self.dispatch(events);
        }

        self.timer
    }

    /// Apply scheduling side effects, then forward events to the presentation
    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            match &event {
                Event::Started { .. } => {
                    self.ticker = Some(interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD));
                }
                Event::Paused => self.ticker = None,
                Event::AutoStartScheduled { delay } => {
                    self.auto_start = Some(Box::pin(sleep(*delay)));
                }
                _ => {}
            }

            if self.events.send(event).is_err() {
                trace!("No event subscriber, dropping event");
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}

async fn deadline(delay: &mut Option<Pin<Box<Sleep>>>) {
    match delay {
        Some(delay) => delay.as_mut().await,
        None => future::pending().await,
    }
}
