//! Minimal actor runtime.
//!
//! Every actor owns an unbounded tokio mailbox that is polled with
//! `try_recv`. Nothing here spawns tasks: the owner of a [`Mailbox`] drains
//! it, and an actor drains its own children from [`Actor::run_children`], so
//! one call to [`Mailbox::drain`] runs the whole subtree to quiescence on the
//! calling thread.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{MachineError, Result};

/// A state machine that reacts to one event at a time.
pub trait Actor {
    type Event: fmt::Debug;
    type Output;

    /// Process a single event. Outputs for the parent go to `outbox`.
    fn handle(&mut self, event: Self::Event, outbox: &mut Vec<Self::Output>) -> Result<()>;

    /// Drain child mailboxes and react to what they produced.
    fn run_children(&mut self, _outbox: &mut Vec<Self::Output>) -> Drained {
        Drained::default()
    }
}

/// Bookkeeping returned by a drain pass.
#[derive(Debug, Default)]
pub struct Drained {
    /// Number of events handled, including descendants.
    pub processed: usize,
    /// First failure observed, if any.
    pub error: Option<MachineError>,
}

impl Drained {
    pub fn merge(&mut self, other: Drained) {
        self.processed += other.processed;
        self.record(other.error);
    }

    pub fn record(&mut self, error: Option<MachineError>) {
        if self.error.is_none() {
            self.error = error;
        }
    }

    pub fn into_result(self) -> Result<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.processed),
        }
    }
}

/// Sending half of a mailbox, tagged with the actor id.
pub struct Address<E> {
    id: Arc<str>,
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for Address<E> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            tx: self.tx.clone(),
        }
    }
}

impl<E> fmt::Debug for Address<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address").field("id", &self.id).finish()
    }
}

impl<E: fmt::Debug> Address<E> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enqueue `event`. Returns `false` when the mailbox is gone.
    pub fn send(&self, event: E) -> bool {
        tracing::trace!(to = %self.id, ?event, "send");
        if self.tx.send(event).is_err() {
            tracing::trace!(to = %self.id, "mailbox closed, event dropped");
            return false;
        }
        true
    }
}

/// An actor together with its mailbox.
pub struct Mailbox<A: Actor> {
    id: Arc<str>,
    actor: A,
    tx: mpsc::UnboundedSender<A::Event>,
    rx: mpsc::UnboundedReceiver<A::Event>,
}

impl<A: Actor> Mailbox<A> {
    pub fn new(id: impl Into<Arc<str>>, actor: A) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            id: id.into(),
            actor,
            tx,
            rx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> Address<A::Event> {
        Address {
            id: Arc::clone(&self.id),
            tx: self.tx.clone(),
        }
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    /// Handle queued events and run children until nothing moves.
    ///
    /// A failing event is logged and recorded; later events still run.
    pub fn drain(&mut self, outbox: &mut Vec<A::Output>) -> Drained {
        let mut drained = Drained::default();
        loop {
            let before = drained.processed;
            while let Ok(event) = self.rx.try_recv() {
                tracing::trace!(actor = %self.id, ?event, "handle");
                drained.processed += 1;
                if let Err(err) = self.actor.handle(event, outbox) {
                    tracing::error!(actor = %self.id, "{err}");
                    drained.record(Some(err));
                }
            }
            drained.merge(self.actor.run_children(outbox));
            if drained.processed == before {
                return drained;
            }
        }
    }
}

/// Children keyed by name, drained in insertion order.
pub struct ActorRegistry<A: Actor> {
    order: Vec<String>,
    actors: HashMap<String, Mailbox<A>>,
}

impl<A: Actor> Default for ActorRegistry<A> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            actors: HashMap::new(),
        }
    }
}

impl<A: Actor> ActorRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `actor` under `key`. Re-spawning a key replaces the actor
    /// in place.
    pub fn spawn(&mut self, key: String, id: impl Into<Arc<str>>, actor: A) -> Address<A::Event> {
        let mailbox = Mailbox::new(id, actor);
        let address = mailbox.address();
        tracing::debug!(actor = %mailbox.id(), "spawned");
        if self.actors.insert(key.clone(), mailbox).is_none() {
            self.order.push(key);
        }
        address
    }

    pub fn contains(&self, key: &str) -> bool {
        self.actors.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&A> {
        self.actors.get(key).map(Mailbox::actor)
    }

    pub fn address(&self, key: &str) -> Option<Address<A::Event>> {
        self.actors.get(key).map(Mailbox::address)
    }

    /// Enqueue `event` for `key`. Unknown keys are a no-op returning `false`.
    pub fn send(&self, key: &str, event: A::Event) -> bool {
        match self.actors.get(key) {
            Some(mailbox) => mailbox.address().send(event),
            None => {
                tracing::trace!(key, ?event, "no such actor, event dropped");
                false
            }
        }
    }

    /// Keys in spawn order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Actor ids in spawn order.
    pub fn ids(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|key| self.actors.get(key))
            .map(|mailbox| mailbox.id().to_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn drain(&mut self, outbox: &mut Vec<A::Output>) -> Drained {
        let mut drained = Drained::default();
        for key in &self.order {
            if let Some(mailbox) = self.actors.get_mut(key) {
                drained.merge(mailbox.drain(outbox));
            }
        }
        drained
    }
}
