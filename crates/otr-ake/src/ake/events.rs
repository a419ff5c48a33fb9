use otr_crypto::Ssid;
use tracing::{debug, trace, warn};

use crate::{AkeError, MessageKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Initiator,
    Responder,
}

/// Notifications about the handshake's progress. Never carry secret material.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AkeEvent {
    Started { role: Role },
    /// An incoming D-H Commit replaced the attempt in progress
    Restarted,
    Completed { ssid: Ssid },
    Aborted { error: AkeError },
    Ignored { message: MessageKind },
    /// A message whose type byte is not part of the handshake, left for other layers
    Unrecognized { type_byte: u8 },
}

pub trait EventSink {
    fn handle(&mut self, event: AkeEvent);
}

impl<F: FnMut(AkeEvent)> EventSink for F {
    fn handle(&mut self, event: AkeEvent) {
        self(event)
    }
}

/// Forwards every event to `tracing`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogEvents;

impl EventSink for LogEvents {
    fn handle(&mut self, event: AkeEvent) {
        match event {
            AkeEvent::Started { role } => debug!(?role, "AKE started"),
            AkeEvent::Restarted => debug!("AKE restarted by incoming D-H Commit"),
            AkeEvent::Completed { ssid } => debug!(%ssid, "AKE completed"),
            AkeEvent::Aborted { error } => warn!(%error, "AKE aborted"),
            AkeEvent::Ignored { message } => trace!(%message, "message ignored"),
            AkeEvent::Unrecognized { type_byte } => {
                trace!(type_byte, "not a handshake message")
            }
        }
    }
}
