use otr_crypto::RandomSource;
use tracing::{debug, trace, warn};

use crate::{
    AkeConfig, AkeContext, AkeError, AkeEvent, AkeOutcome, ConfigError, EventSink, IdentityKey,
    KeyReceipt, LogEvents, MessageError, MessageHeader, MessageKind, Role,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AuthState {
    #[default]
    None,
    AwaitingDhKey,
    AwaitingRevealSig,
    AwaitingSig,
    Authenticated,
}

/// Drives one side of the handshake: feeds incoming messages to the current
/// attempt and returns the reply, if any, to send back.
pub struct Ake<'k, K: IdentityKey, R: RandomSource, E: EventSink = LogEvents> {
    config: AkeConfig,
    header: MessageHeader,
    our_key: &'k K,
    rng: R,
    events: E,
    state: AuthState,
    context: Option<AkeContext<'k, K>>,
    last_reveal_sig: Option<Vec<u8>>,
    outcome: Option<AkeOutcome<K::Public>>,
}

impl<'k, K: IdentityKey, R: RandomSource> Ake<'k, K, R, LogEvents> {
    pub fn new(config: AkeConfig, our_key: &'k K, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            header: MessageHeader::from_config(&config),
            config,
            our_key,
            rng,
            events: LogEvents,
            state: AuthState::None,
            context: None,
            last_reveal_sig: None,
            outcome: None,
        })
    }
}

impl<'k, K: IdentityKey, R: RandomSource, E: EventSink> Ake<'k, K, R, E> {
    pub fn with_events<S: EventSink>(self, events: S) -> Ake<'k, K, R, S> {
        Ake {
            config: self.config,
            header: self.header,
            our_key: self.our_key,
            rng: self.rng,
            events,
            state: self.state,
            context: self.context,
            last_reveal_sig: self.last_reveal_sig,
            outcome: self.outcome,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn config(&self) -> &AkeConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// The session output, available once after reaching `Authenticated`.
    pub fn take_outcome(&mut self) -> Option<AkeOutcome<K::Public>> {
        self.outcome.take()
    }

    /// Drops the attempt in progress, wiping all of its secrets.
    pub fn abort(&mut self) {
        if self.context.take().is_some() {
            debug!(state = ?self.state, "AKE attempt dropped");
        }
        self.last_reveal_sig = None;
        self.state = AuthState::None;
    }

    /// Starts a fresh attempt as initiator and returns the D-H Commit to send.
    pub fn initiate(&mut self) -> Result<Vec<u8>, AkeError> {
        self.abort();
        self.outcome = None;
        let mut context = AkeContext::new(&self.config, self.our_key);
        let commit = match context.dh_commit_message(&mut self.rng) {
            Ok(commit) => commit,
            Err(error) => return Err(self.fail(error)),
        };
        self.context = Some(context);
        self.transition(AuthState::AwaitingDhKey);
        self.events.handle(AkeEvent::Started {
            role: Role::Initiator,
        });
        Ok(commit)
    }

    /// Processes one incoming handshake message. Any error aborts the attempt
    /// in progress, a completed session is left as it is. Messages of other
    /// types pass through untouched.
    pub fn receive(&mut self, msg: &[u8]) -> Result<Option<Vec<u8>>, AkeError> {
        let kind = match self.header.peek_kind(msg) {
            Ok(kind) => kind,
            Err(MessageError::UnknownType(type_byte)) => {
                self.events.handle(AkeEvent::Unrecognized { type_byte });
                return Ok(None);
            }
            Err(error) => return Err(self.fail(error.into())),
        };
        self.dispatch(kind, msg).map_err(|error| self.fail(error))
    }

    fn in_flight(&self) -> bool {
        self.context.is_some()
            || matches!(
                self.state,
                AuthState::AwaitingDhKey | AuthState::AwaitingRevealSig | AuthState::AwaitingSig
            )
    }

    fn dispatch(&mut self, kind: MessageKind, msg: &[u8]) -> Result<Option<Vec<u8>>, AkeError> {
        match (self.state, kind) {
            (AuthState::None, MessageKind::DhCommit) => self.respond_to_commit(msg, false),
            (AuthState::Authenticated | AuthState::AwaitingSig, MessageKind::DhCommit) => {
                self.respond_to_commit(msg, true)
            }
            (AuthState::AwaitingDhKey, MessageKind::DhCommit) => self.resolve_commit_race(msg),
            (AuthState::AwaitingDhKey, MessageKind::DhKey) => self.reveal(msg),
            (AuthState::AwaitingRevealSig, MessageKind::DhCommit) => self.replace_commitment(msg),
            (AuthState::AwaitingRevealSig, MessageKind::RevealSignature) => {
                let context = self.context.as_mut().ok_or(AkeError::CommitmentMissing)?;
                context.process_reveal_sig(msg)?;
                let sig = context.sig_message(&mut self.rng)?;
                self.complete()?;
                Ok(Some(sig))
            }
            (AuthState::AwaitingSig, MessageKind::DhKey) => {
                let context = self.context.as_mut().ok_or(AkeError::KeysMissing)?;
                match context.process_dh_key(msg)? {
                    KeyReceipt::Same => {
                        trace!("D-H Key retransmitted, resending Reveal Signature");
                        Ok(self.last_reveal_sig.clone())
                    }
                    KeyReceipt::Stored | KeyReceipt::Different => Ok(self.ignore(kind)),
                }
            }
            (AuthState::AwaitingSig, MessageKind::Signature) => {
                let context = self.context.as_mut().ok_or(AkeError::KeysMissing)?;
                context.process_sig(msg)?;
                self.complete()?;
                Ok(None)
            }
            _ => Ok(self.ignore(kind)),
        }
    }

    /// Begins a new attempt as responder, replacing whatever was in progress.
    fn respond_to_commit(&mut self, msg: &[u8], restarted: bool) -> Result<Option<Vec<u8>>, AkeError> {
        let mut context = AkeContext::new(&self.config, self.our_key);
        context.process_dh_commit(msg)?;
        let key = context.dh_key_message(&mut self.rng)?;

        self.context = Some(context);
        self.last_reveal_sig = None;
        self.transition(AuthState::AwaitingRevealSig);
        self.events.handle(match restarted {
            true => AkeEvent::Restarted,
            false => AkeEvent::Started {
                role: Role::Responder,
            },
        });
        Ok(Some(key))
    }

    /// Both sides sent a D-H Commit. The larger `hashed_gx` keeps its role as
    /// initiator, the other side becomes the responder.
    fn resolve_commit_race(&mut self, msg: &[u8]) -> Result<Option<Vec<u8>>, AkeError> {
        let mut theirs = AkeContext::new(&self.config, self.our_key);
        theirs.process_dh_commit(msg)?;

        let ours = self.context.as_ref().ok_or(AkeError::CommitmentMissing)?;
        let (our_hash, their_hash) = match (ours.hashed_gx(), theirs.hashed_gx()) {
            (Some(ours), Some(theirs)) => (ours, theirs),
            _ => Err(AkeError::CommitmentMissing)?,
        };

        if our_hash > their_hash {
            debug!("won D-H Commit race, resending ours");
            let commit = ours.serialize_dh_commit()?;
            self.events.handle(AkeEvent::Ignored {
                message: MessageKind::DhCommit,
            });
            return Ok(Some(commit));
        }

        debug!("lost D-H Commit race, answering theirs");
        let key = theirs.dh_key_message(&mut self.rng)?;
        self.context = Some(theirs);
        self.transition(AuthState::AwaitingRevealSig);
        self.events.handle(AkeEvent::Restarted);
        Ok(Some(key))
    }

    /// A new D-H Commit while waiting for Reveal Signature: keep our `g^y`,
    /// adopt the new commitment and resend our D-H Key.
    fn replace_commitment(&mut self, msg: &[u8]) -> Result<Option<Vec<u8>>, AkeError> {
        let previous = self.context.take().ok_or(AkeError::LocalEphemeralMissing)?;
        let mut context = AkeContext::continue_from(previous);
        context.process_dh_commit(msg)?;
        let key = context.serialize_dh_key()?;
        self.context = Some(context);
        self.events.handle(AkeEvent::Restarted);
        Ok(Some(key))
    }

    fn reveal(&mut self, msg: &[u8]) -> Result<Option<Vec<u8>>, AkeError> {
        let context = self.context.as_mut().ok_or(AkeError::LocalEphemeralMissing)?;
        context.process_dh_key(msg)?;
        let reveal = context.reveal_sig_message(&mut self.rng)?;
        self.last_reveal_sig = Some(reveal.clone());
        self.transition(AuthState::AwaitingSig);
        Ok(Some(reveal))
    }

    fn complete(&mut self) -> Result<(), AkeError> {
        let context = self.context.take().ok_or(AkeError::HandshakeIncomplete)?;
        let outcome = context.finish()?;
        let ssid = outcome.ssid;
        self.outcome = Some(outcome);
        self.last_reveal_sig = None;
        self.transition(AuthState::Authenticated);
        self.events.handle(AkeEvent::Completed { ssid });
        Ok(())
    }

    fn ignore(&mut self, message: MessageKind) -> Option<Vec<u8>> {
        trace!(state = ?self.state, %message, "ignoring message");
        self.events.handle(AkeEvent::Ignored { message });
        None
    }

    fn transition(&mut self, next: AuthState) {
        debug!(from = ?self.state, to = ?next, "auth state");
        self.state = next;
    }

    fn fail(&mut self, error: AkeError) -> AkeError {
        if !self.in_flight() {
            warn!(state = ?self.state, %error, "rejected handshake message");
            return error;
        }
        warn!(state = ?self.state, %error, "AKE attempt aborted");
        self.abort();
        self.events.handle(AkeEvent::Aborted {
            error: error.clone(),
        });
        error
    }
}
