use otr_crypto::BigUint;
use otr_crypto::{
    append_data, append_mpi, append_word, check_public_value, ct_eq, derive_ake_keys, encode_mpi,
    extract_mpi, extract_word, hmac_sha256, hmac_sha256_160, sha256, stream_apply,
    stream_encrypt, AkeKeys, DhKeyPair, RandomSource, SecretExponent, Ssid, TRUNCATED_MAC_SIZE,
};
use otr_vault::{DynamicSecret, FixedSecret, SecureAccess, SecureRef};
use tracing::debug;

use crate::{
    AkeConfig, AkeError, DhCommit, DhKey, IdentityKey, MessageHeader, MessageKind,
    PublicIdentity, RevealSig, Sig, HASHED_GX_SIZE, R_SIZE,
};

/// Result of handing a D-H Key message to the context.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyReceipt {
    /// First `g^y` of this attempt, now stored
    Stored,
    /// Matches the stored `g^y`
    Same,
    /// Differs from the stored `g^y`, which is kept
    Different,
}

impl KeyReceipt {
    pub fn is_same(&self) -> bool {
        matches!(self, KeyReceipt::Same)
    }
}

/// What a completed handshake hands to the data-message layer.
#[derive(Debug)]
pub struct AkeOutcome<P: PublicIdentity> {
    pub ssid: Ssid,
    /// MPI encoding of `g^xy mod p`
    pub shared_secret: DynamicSecret,
    pub their_key: P,
    pub their_key_id: u32,
    pub our_key_id: u32,
}

/// State of a single handshake attempt. Every field is filled in at most once
/// and secrets are dropped as soon as they have served their purpose.
pub struct AkeContext<'k, K: IdentityKey> {
    header: MessageHeader,
    our_key: &'k K,
    our_key_id: u32,
    secret_exponent: Option<SecretExponent>,
    our_public_value: Option<BigUint>,
    their_public_value: Option<BigUint>,
    r: Option<FixedSecret<R_SIZE>>,
    encrypted_gx: Option<Vec<u8>>,
    hashed_gx: Option<[u8; HASHED_GX_SIZE]>,
    their_key: Option<K::Public>,
    their_key_id: Option<u32>,
    ssid: Option<Ssid>,
    reveal_key: Option<AkeKeys>,
    sig_key: Option<AkeKeys>,
    shared_secret: Option<DynamicSecret>,
}

impl<'k, K: IdentityKey> AkeContext<'k, K> {
    pub fn new(config: &AkeConfig, our_key: &'k K) -> Self {
        Self {
            header: MessageHeader::from_config(config),
            our_key,
            our_key_id: config.key_id,
            secret_exponent: None,
            our_public_value: None,
            their_public_value: None,
            r: None,
            encrypted_gx: None,
            hashed_gx: None,
            their_key: None,
            their_key_id: None,
            ssid: None,
            reveal_key: None,
            sig_key: None,
            shared_secret: None,
        }
    }

    /// Starts a new attempt that keeps only our ephemeral key pair, used when a
    /// fresh D-H Commit arrives while we wait for its Reveal Signature.
    pub fn continue_from(previous: AkeContext<'k, K>) -> Self {
        let AkeContext {
            header,
            our_key,
            our_key_id,
            secret_exponent,
            our_public_value,
            ..
        } = previous;
        Self {
            header,
            our_key,
            our_key_id,
            secret_exponent,
            our_public_value,
            their_public_value: None,
            r: None,
            encrypted_gx: None,
            hashed_gx: None,
            their_key: None,
            their_key_id: None,
            ssid: None,
            reveal_key: None,
            sig_key: None,
            shared_secret: None,
        }
    }

    pub fn our_public_value(&self) -> Option<&BigUint> {
        self.our_public_value.as_ref()
    }

    pub fn their_public_value(&self) -> Option<&BigUint> {
        self.their_public_value.as_ref()
    }

    pub fn hashed_gx(&self) -> Option<&[u8; HASHED_GX_SIZE]> {
        self.hashed_gx.as_ref()
    }

    pub fn ssid(&self) -> Option<Ssid> {
        self.ssid
    }

    fn set_ephemeral<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<(), AkeError> {
        let (secret, public) = DhKeyPair::generate(rng)?.into_parts();
        self.secret_exponent = Some(secret);
        self.our_public_value = Some(public);
        Ok(())
    }

    /// Bob ---- D-H Commit ----> Alice
    pub fn dh_commit_message<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<u8>, AkeError> {
        self.set_ephemeral(rng)?;
        let r = FixedSecret::<R_SIZE>::random("ake.r", rng)?;

        let gx = match &self.our_public_value {
            Some(gx) => SecureRef::new(encode_mpi(gx)),
            None => Err(AkeError::LocalEphemeralMissing)?,
        };
        self.encrypted_gx = Some(r.with(|key| stream_encrypt(key, &gx)));
        self.hashed_gx = Some(sha256(&[gx.as_slice()]));
        self.r = Some(r);

        self.serialize_dh_commit()
    }

    /// Re-encodes our commitment without drawing new randomness.
    pub fn serialize_dh_commit(&self) -> Result<Vec<u8>, AkeError> {
        match (&self.encrypted_gx, &self.hashed_gx) {
            (Some(encrypted_gx), Some(hashed_gx)) => Ok(self.header.encode(&DhCommit {
                encrypted_gx: encrypted_gx.clone(),
                hashed_gx: *hashed_gx,
            })),
            _ => Err(AkeError::CommitmentMissing),
        }
    }

    /// Alice -- D-H Key -------> Bob
    pub fn dh_key_message<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<u8>, AkeError> {
        self.set_ephemeral(rng)?;
        self.serialize_dh_key()
    }

    pub fn serialize_dh_key(&self) -> Result<Vec<u8>, AkeError> {
        match &self.our_public_value {
            Some(gy) => Ok(self.header.encode(&DhKey::new(gy.clone()))),
            None => Err(AkeError::LocalEphemeralMissing),
        }
    }

    pub fn process_dh_commit(&mut self, msg: &[u8]) -> Result<(), AkeError> {
        let commit = self
            .header
            .decode::<DhCommit>(msg)
            .map_err(AkeError::malformed(MessageKind::DhCommit))?;
        self.encrypted_gx = Some(commit.encrypted_gx);
        self.hashed_gx = Some(commit.hashed_gx);
        Ok(())
    }

    /// Stores the first valid `g^y`. Later ones are only compared against it.
    pub fn process_dh_key(&mut self, msg: &[u8]) -> Result<KeyReceipt, AkeError> {
        let DhKey { gy } = self
            .header
            .decode::<DhKey>(msg)
            .map_err(AkeError::malformed(MessageKind::DhKey))?;
        check_public_value(&gy).map_err(|_| AkeError::RangeViolation {
            message: MessageKind::DhKey,
        })?;

        match &self.their_public_value {
            Some(stored) if *stored == gy => Ok(KeyReceipt::Same),
            Some(_) => Ok(KeyReceipt::Different),
            None => {
                self.their_public_value = Some(gy);
                Ok(KeyReceipt::Stored)
            }
        }
    }

    /// Bob ---- Reveal Signature ----> Alice
    pub fn reveal_sig_message<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<u8>, AkeError> {
        let r = self.r.take().ok_or(AkeError::CommitmentMissing)?;
        self.compute_shared_secret()?;

        let keys = self.reveal_key.take().ok_or(AkeError::KeysMissing)?;
        let encrypted_sig = self.encrypted_signature(rng, &keys)?;
        let mac_sig = mac_encrypted_sig(&keys, &encrypted_sig)?;

        Ok(self.header.encode(&RevealSig {
            r: r.copy(),
            encrypted_sig,
            mac_sig,
        }))
    }

    /// Alice -- Signature -----------> Bob
    pub fn sig_message<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<u8>, AkeError> {
        let keys = self.sig_key.take().ok_or(AkeError::KeysMissing)?;
        let encrypted_sig = self.encrypted_signature(rng, &keys)?;
        let mac_sig = mac_encrypted_sig(&keys, &encrypted_sig)?;

        Ok(self.header.encode(&Sig {
            encrypted_sig,
            mac_sig,
        }))
    }

    /// Opens the commitment with the revealed `r`, then checks the initiator's signature.
    pub fn process_reveal_sig(&mut self, msg: &[u8]) -> Result<(), AkeError> {
        const KIND: MessageKind = MessageKind::RevealSignature;
        let reveal = self.header.decode::<RevealSig>(msg).map_err(AkeError::malformed(KIND))?;

        let (encrypted_gx, hashed_gx) = match (&self.encrypted_gx, &self.hashed_gx) {
            (Some(encrypted_gx), Some(hashed_gx)) => (encrypted_gx, hashed_gx),
            _ => Err(AkeError::CommitmentMissing)?,
        };

        let r = FixedSecret::new(reveal.r, "ake.r");
        let mut decrypted_gx = SecureRef::new(encrypted_gx.clone());
        r.with(|key| stream_apply(key, &mut decrypted_gx));

        if !ct_eq(&sha256(&[decrypted_gx.as_slice()]), hashed_gx) {
            Err(AkeError::CommitmentMismatch)?
        }
        let gx = match extract_mpi(&decrypted_gx) {
            Ok((gx, rest)) if rest.is_empty() => gx,
            _ => Err(AkeError::CorruptEncryptedPayload { message: KIND })?,
        };
        check_public_value(&gx).map_err(|_| AkeError::RangeViolation { message: KIND })?;
        self.their_public_value = Some(gx);

        self.compute_shared_secret()?;
        let keys = self.reveal_key.take().ok_or(AkeError::KeysMissing)?;
        self.verify_encrypted_sig(KIND, &reveal.encrypted_sig, &reveal.mac_sig, &keys)
    }

    pub fn process_sig(&mut self, msg: &[u8]) -> Result<(), AkeError> {
        const KIND: MessageKind = MessageKind::Signature;
        let sig = self.header.decode::<Sig>(msg).map_err(AkeError::malformed(KIND))?;

        let keys = self.sig_key.take().ok_or(AkeError::KeysMissing)?;
        self.verify_encrypted_sig(KIND, &sig.encrypted_sig, &sig.mac_sig, &keys)
    }

    /// Consumes the context once the peer has been authenticated.
    pub fn finish(mut self) -> Result<AkeOutcome<K::Public>, AkeError> {
        match (
            self.ssid,
            self.shared_secret.take(),
            self.their_key.take(),
            self.their_key_id,
        ) {
            (Some(ssid), Some(shared_secret), Some(their_key), Some(their_key_id)) => {
                Ok(AkeOutcome {
                    ssid,
                    shared_secret,
                    their_key,
                    their_key_id,
                    our_key_id: self.our_key_id,
                })
            }
            _ => Err(AkeError::HandshakeIncomplete),
        }
    }

    /// Computes `g^xy`, derives both key bundles and drops our exponent.
    fn compute_shared_secret(&mut self) -> Result<(), AkeError> {
        let their_public = self
            .their_public_value
            .as_ref()
            .ok_or(AkeError::RemoteEphemeralMissing)?;
        let exponent = self
            .secret_exponent
            .take()
            .ok_or(AkeError::LocalEphemeralMissing)?;

        let secret = exponent.shared_secret(their_public);
        drop(exponent);

        let (ssid, reveal_key, sig_key) = derive_ake_keys(&secret);
        debug!(%ssid, "derived AKE keys");
        self.ssid = Some(ssid);
        self.reveal_key = Some(reveal_key);
        self.sig_key = Some(sig_key);
        self.shared_secret = Some(DynamicSecret::new(encode_mpi(&secret), "ake.shared_secret"));
        Ok(())
    }

    /// `MPI(first) || MPI(second) || pub || WORD key_id`
    fn verify_data(
        first: &BigUint,
        second: &BigUint,
        public: &impl PublicIdentity,
        key_id: u32,
    ) -> Vec<u8> {
        let mut out = append_mpi(append_mpi(Vec::new(), first), second);
        out.extend_from_slice(&public.serialize());
        append_word(out, key_id)
    }

    /// `AES-CTR_c(pub || WORD key_id || sig(HMAC(m1, verify_data)))`
    fn encrypted_signature<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        keys: &AkeKeys,
    ) -> Result<Vec<u8>, AkeError> {
        let (ours, theirs) = match (&self.our_public_value, &self.their_public_value) {
            (Some(ours), Some(theirs)) => (ours, theirs),
            (None, _) => Err(AkeError::LocalEphemeralMissing)?,
            (_, None) => Err(AkeError::RemoteEphemeralMissing)?,
        };
        let public = self.our_key.public();

        let verify_data = Self::verify_data(ours, theirs, &public, self.our_key_id);
        let mb = SecureRef::new(hmac_sha256(keys.m1(), &verify_data)?);
        let sig = self.our_key.sign(rng, &*mb)?;

        let mut xb = public.serialize();
        xb = append_word(xb, self.our_key_id);
        xb.extend_from_slice(&sig);
        stream_apply(keys.c(), &mut xb);
        Ok(xb)
    }

    fn verify_encrypted_sig(
        &mut self,
        message: MessageKind,
        encrypted_sig: &[u8],
        their_mac: &[u8; TRUNCATED_MAC_SIZE],
        keys: &AkeKeys,
    ) -> Result<(), AkeError> {
        let our_mac = mac_encrypted_sig(keys, encrypted_sig)?;
        if !ct_eq(&our_mac, their_mac) {
            Err(AkeError::AuthenticationFailure { message })?
        }

        let mut decrypted = SecureRef::new(encrypted_sig.to_vec());
        stream_apply(keys.c(), &mut decrypted);

        let corrupt = AkeError::CorruptEncryptedPayload { message };
        let (their_key, rest) = K::Public::parse(&decrypted).ok_or(corrupt.clone())?;
        let (their_key_id, sig) = extract_word(rest).map_err(|_| corrupt.clone())?;

        let (theirs, ours) = match (&self.their_public_value, &self.our_public_value) {
            (Some(theirs), Some(ours)) => (theirs, ours),
            (None, _) => Err(AkeError::RemoteEphemeralMissing)?,
            (_, None) => Err(AkeError::LocalEphemeralMissing)?,
        };
        let verify_data = Self::verify_data(theirs, ours, &their_key, their_key_id);
        let mb = SecureRef::new(hmac_sha256(keys.m1(), &verify_data)?);

        let rest = their_key
            .verify(&*mb, sig)
            .ok_or(AkeError::AuthenticationFailure { message })?;
        if !rest.is_empty() {
            Err(corrupt)?
        }

        debug!(
            %message,
            their_key_id,
            fingerprint = %FingerprintHex(&their_key.fingerprint()),
            "peer authenticated"
        );
        self.their_key = Some(their_key);
        self.their_key_id = Some(their_key_id);
        Ok(())
    }
}

/// `HMAC-SHA256(m2, DATA(encrypted_sig))`, truncated to 160 bits.
fn mac_encrypted_sig(
    keys: &AkeKeys,
    encrypted_sig: &[u8],
) -> Result<[u8; TRUNCATED_MAC_SIZE], AkeError> {
    Ok(hmac_sha256_160(keys.m2(), &append_data(Vec::new(), encrypted_sig))?)
}

struct FingerprintHex<'a>(&'a [u8]);

impl std::fmt::Display for FingerprintHex<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ed25519Identity, ProtocolVersion};
    use otr_crypto::{SeededRandom, PRIME};

    fn identity(seed: u8) -> Ed25519Identity {
        Ed25519Identity::generate(&mut SeededRandom::from_seed([seed; 32])).unwrap()
    }

    struct Pair<'k> {
        bob: AkeContext<'k, Ed25519Identity>,
        alice: AkeContext<'k, Ed25519Identity>,
        rng: SeededRandom,
    }

    /// Runs Commit and Key, leaving Bob ready to send Reveal Signature.
    fn after_key<'k>(bob_key: &'k Ed25519Identity, alice_key: &'k Ed25519Identity) -> Pair<'k> {
        let mut rng = SeededRandom::from_seed([42; 32]);
        let bob_config = AkeConfig {
            key_id: 1,
            ..AkeConfig::default()
        };
        let mut bob = AkeContext::new(&bob_config, bob_key);
        let mut alice = AkeContext::new(&AkeConfig::default(), alice_key);

        let commit = bob.dh_commit_message(&mut rng).unwrap();
        alice.process_dh_commit(&commit).unwrap();
        let key = alice.dh_key_message(&mut rng).unwrap();
        assert_eq!(bob.process_dh_key(&key).unwrap(), KeyReceipt::Stored);
        Pair { bob, alice, rng }
    }

    #[test]
    fn four_messages_agree() {
        let (bob_key, alice_key) = (identity(1), identity(2));
        let Pair {
            mut bob,
            mut alice,
            mut rng,
        } = after_key(&bob_key, &alice_key);

        let reveal = bob.reveal_sig_message(&mut rng).unwrap();
        alice.process_reveal_sig(&reveal).unwrap();
        assert_eq!(alice.sig_key, bob.sig_key);
        let rederive = |side: &AkeContext<'_, Ed25519Identity>| {
            let secret = side.shared_secret.as_ref().unwrap();
            secret.with(|bytes| derive_ake_keys(&extract_mpi(bytes).unwrap().0))
        };
        let (bob_ssid, bob_reveal, bob_sig) = rederive(&bob);
        let (alice_ssid, alice_reveal, alice_sig) = rederive(&alice);
        assert_eq!(bob_ssid, alice_ssid);
        assert_eq!(bob.ssid(), Some(bob_ssid));
        assert_eq!(bob_reveal, alice_reveal);
        assert_eq!(bob_sig, alice_sig);
        assert_ne!(bob_reveal, bob_sig);
        let sig = alice.sig_message(&mut rng).unwrap();
        bob.process_sig(&sig).unwrap();

        // bundles are single use
        assert!(bob.reveal_key.is_none() && bob.sig_key.is_none());
        assert!(alice.reveal_key.is_none() && alice.sig_key.is_none());
        assert!(bob.secret_exponent.is_none() && alice.secret_exponent.is_none());

        let bob_out = bob.finish().unwrap();
        let alice_out = alice.finish().unwrap();
        assert_eq!(bob_out.ssid, alice_out.ssid);
        assert_eq!(bob_out.shared_secret, alice_out.shared_secret);
        assert_eq!(bob_out.their_key, alice_key.public());
        assert_eq!(alice_out.their_key, bob_key.public());
        assert_eq!(alice_out.their_key_id, 1);
        assert_eq!(bob_out.their_key_id, 0);
        assert_eq!(bob_out.our_key_id, 1);
    }

    #[test]
    fn second_key_never_overwrites() {
        let (bob_key, alice_key) = (identity(1), identity(2));
        let Pair {
            mut bob,
            alice,
            mut rng,
        } = after_key(&bob_key, &alice_key);
        let stored = bob.their_public_value().cloned();

        let same = alice.serialize_dh_key().unwrap();
        assert!(bob.process_dh_key(&same).unwrap().is_same());

        let mut carol = AkeContext::new(&AkeConfig::default(), &alice_key);
        let other = carol.dh_key_message(&mut rng).unwrap();
        assert_eq!(bob.process_dh_key(&other).unwrap(), KeyReceipt::Different);
        assert_eq!(bob.their_public_value().cloned(), stored);
    }

    #[test]
    fn out_of_range_gy() {
        let bob_key = identity(1);
        let header = MessageHeader::new(ProtocolVersion::V3, 0x100, 0);
        for gy in [BigUint::from(1u32), &*PRIME - 1u32, BigUint::from(0u32)] {
            let mut bob = AkeContext::new(&AkeConfig::default(), &bob_key);
            let msg = header.encode(&DhKey::new(gy));
            assert_eq!(
                bob.process_dh_key(&msg),
                Err(AkeError::RangeViolation {
                    message: MessageKind::DhKey
                })
            );
            assert!(bob.their_public_value().is_none());
        }
    }

    #[test]
    fn flipped_mac_key_fails_authentication() {
        let (bob_key, alice_key) = (identity(1), identity(2));
        let Pair {
            mut bob,
            mut alice,
            mut rng,
        } = after_key(&bob_key, &alice_key);

        bob.compute_shared_secret().unwrap();
        let keys = bob.reveal_key.take().unwrap();
        let mut m2 = *keys.m2();
        m2[0] ^= 0x01;
        bob.reveal_key = Some(AkeKeys::new(*keys.c(), *keys.m1(), m2));
        drop(keys);

        let r = bob.r.take().unwrap();
        let keys = bob.reveal_key.take().unwrap();
        let encrypted_sig = bob.encrypted_signature(&mut rng, &keys).unwrap();
        let mac_sig = mac_encrypted_sig(&keys, &encrypted_sig).unwrap();
        let reveal = bob.header.encode(&RevealSig {
            r: r.copy(),
            encrypted_sig,
            mac_sig,
        });

        assert_eq!(
            alice.process_reveal_sig(&reveal),
            Err(AkeError::AuthenticationFailure {
                message: MessageKind::RevealSignature
            })
        );
    }

    /// Rewrites Bob's signature plaintext, then encrypts and MACs it properly.
    fn edited_reveal(
        bob: &mut AkeContext<'_, Ed25519Identity>,
        rng: &mut SeededRandom,
        edit: impl FnOnce(&mut Vec<u8>),
    ) -> Vec<u8> {
        bob.compute_shared_secret().unwrap();
        let r = bob.r.take().unwrap();
        let keys = bob.reveal_key.take().unwrap();
        let mut xb = bob.encrypted_signature(rng, &keys).unwrap();
        stream_apply(keys.c(), &mut xb);
        edit(&mut xb);
        stream_apply(keys.c(), &mut xb);
        let mac_sig = mac_encrypted_sig(&keys, &xb).unwrap();
        bob.header.encode(&RevealSig {
            r: r.copy(),
            encrypted_sig: xb,
            mac_sig,
        })
    }

    #[test]
    fn unreadable_signature_payload() {
        let (bob_key, alice_key) = (identity(1), identity(2));
        let edits: [fn(&mut Vec<u8>); 3] = [
            |xb| xb.push(0),
            |xb| xb[1] = 0x00,
            |xb| xb.truncate(36),
        ];
        for edit in edits {
            let Pair {
                mut bob,
                mut alice,
                mut rng,
            } = after_key(&bob_key, &alice_key);
            let reveal = edited_reveal(&mut bob, &mut rng, edit);
            assert_eq!(
                alice.process_reveal_sig(&reveal),
                Err(AkeError::CorruptEncryptedPayload {
                    message: MessageKind::RevealSignature
                })
            );
            assert!(alice.their_key.is_none());
        }
    }

    /// A D-H Commit over an arbitrary payload and the Reveal Signature opening it.
    fn committed(payload: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let header = MessageHeader::from_config(&AkeConfig::default());
        let r = [7; R_SIZE];
        let commit = header.encode(&DhCommit {
            encrypted_gx: stream_encrypt(&r, payload),
            hashed_gx: sha256(&[payload]),
        });
        let reveal = header.encode(&RevealSig {
            r,
            encrypted_sig: Vec::new(),
            mac_sig: [0; TRUNCATED_MAC_SIZE],
        });
        (commit, reveal)
    }

    fn open(payload: &[u8]) -> Result<(), AkeError> {
        let alice_key = identity(2);
        let mut alice = AkeContext::new(&AkeConfig::default(), &alice_key);
        let (commit, reveal) = committed(payload);
        alice.process_dh_commit(&commit).unwrap();
        let result = alice.process_reveal_sig(&reveal);
        assert!(alice.their_public_value().is_none());
        result
    }

    #[test]
    fn committed_gx_must_be_one_mpi() {
        let corrupt = Err(AkeError::CorruptEncryptedPayload {
            message: MessageKind::RevealSignature,
        });
        let mut trailing = encode_mpi(&BigUint::from(5u32));
        trailing.push(0);
        assert_eq!(open(&trailing), corrupt);

        let mut truncated = encode_mpi(&BigUint::from(0x0102_0304u32));
        truncated.truncate(6);
        assert_eq!(open(&truncated), corrupt);
    }

    #[test]
    fn committed_gx_out_of_range() {
        for gx in [BigUint::from(1u32), &*PRIME - 1u32] {
            assert_eq!(
                open(&encode_mpi(&gx)),
                Err(AkeError::RangeViolation {
                    message: MessageKind::RevealSignature
                })
            );
        }
    }

    #[test]
    fn preconditions() {
        let bob_key = identity(1);
        let mut rng = SeededRandom::from_seed([0; 32]);
        let mut bob = AkeContext::new(&AkeConfig::default(), &bob_key);
        assert_eq!(bob.serialize_dh_commit(), Err(AkeError::CommitmentMissing));
        assert_eq!(bob.serialize_dh_key(), Err(AkeError::LocalEphemeralMissing));
        assert_eq!(bob.sig_message(&mut rng), Err(AkeError::KeysMissing));

        bob.dh_commit_message(&mut rng).unwrap();
        assert_eq!(
            bob.reveal_sig_message(&mut rng),
            Err(AkeError::RemoteEphemeralMissing)
        );
        assert!(matches!(bob.finish(), Err(AkeError::HandshakeIncomplete)));
    }

    #[test]
    fn commit_retransmission_is_stable() {
        let bob_key = identity(1);
        let mut rng = SeededRandom::from_seed([0; 32]);
        let mut bob = AkeContext::new(&AkeConfig::default(), &bob_key);
        let commit = bob.dh_commit_message(&mut rng).unwrap();
        assert_eq!(bob.serialize_dh_commit().unwrap(), commit);

        let hashed = *bob.hashed_gx().unwrap();
        let gx = encode_mpi(bob.our_public_value().unwrap());
        assert_eq!(hashed, sha256(&[&gx[..]]));
    }

    #[test]
    fn continue_from_keeps_only_our_ephemeral() {
        let (bob_key, alice_key) = (identity(1), identity(2));
        let Pair { alice, mut rng, .. } = after_key(&bob_key, &alice_key);
        let gy = alice.our_public_value().cloned();

        let alice = AkeContext::continue_from(alice);
        assert_eq!(alice.our_public_value().cloned(), gy);
        assert!(alice.hashed_gx().is_none());
        assert!(alice.serialize_dh_key().is_ok());

        let mut other = AkeContext::new(&AkeConfig::default(), &bob_key);
        other.dh_commit_message(&mut rng).unwrap();
        assert!(other.hashed_gx().is_some());
    }
}
