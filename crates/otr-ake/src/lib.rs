// OTR authenticated key exchange: D-H Commit, D-H Key, Reveal Signature, Signature.

/// Bytes of the AES key `r` that hides `g^x` in the D-H Commit.
pub const R_SIZE: usize = 16;
/// SHA-256 of `MPI(g^x)`.
pub const HASHED_GX_SIZE: usize = 32;
/// Instance tags below this value are reserved in protocol v3.
pub const MIN_VALID_INSTANCE_TAG: u32 = 0x100;

mod ake;
mod messages;

pub use ake::{
    ake_context::{AkeContext, AkeOutcome, KeyReceipt},
    ake_error::AkeError,
    auth_state::{Ake, AuthState},
    config::{AkeConfig, ConfigError},
    events::{AkeEvent, EventSink, LogEvents, Role},
    identity::{Ed25519Identity, Ed25519Public, IdentityKey, PublicIdentity, ED25519_KEY_TYPE},
};
pub use messages::{
    dh_commit::DhCommit,
    dh_key::DhKey,
    header::{MessageHeader, ProtocolVersion},
    message_error::MessageError,
    reveal_sig::RevealSig,
    sig::Sig,
    AkeMessage, MessageKind,
};
