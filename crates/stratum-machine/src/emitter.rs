//! Event emission channel to the embedding environment.

use tokio::sync::mpsc;

use crate::actor::Actor;
use crate::error::Result;
use crate::events::Notification;

/// Forwards notifications to whoever holds the receiving end.
#[derive(Debug)]
pub struct EmitterActor {
    tx: mpsc::UnboundedSender<Notification>,
}

impl EmitterActor {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Actor for EmitterActor {
    type Event = Notification;
    type Output = ();

    fn handle(&mut self, event: Notification, _outbox: &mut Vec<()>) -> Result<()> {
        if let Err(mpsc::error::SendError(event)) = self.tx.send(event) {
            tracing::trace!(?event, "no listener, notification dropped");
        }
        Ok(())
    }
}
