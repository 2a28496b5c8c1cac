//! Passphrase-keyed AES-256-CBC wrapper producing base64 envelopes.
//!
//! ## Known weaknesses
//!
//! These are inherited from the existing stored-secret format and are kept so
//! that rows written by earlier versions still decrypt:
//!
//! - **Fixed IV.** The IV comes from configuration (`AES__IV`) and is reused
//!   for every message encrypted in a process. Two secrets sharing a prefix
//!   under the same passphrase produce ciphertexts sharing a prefix.
//! - **Weak key derivation.** The key is the passphrase repeated and truncated
//!   to 32 bytes. There is no salt and no work factor.
//! - **No integrity tag.** A wrong passphrase is only noticed when the PKCS#7
//!   padding happens to be invalid. Otherwise decryption "succeeds" and
//!   returns garbage (invalid UTF-8 replaced by U+FFFD), which callers will
//!   happily write to disk.
//!
//! Moving to a random per-message IV or an AEAD mode changes the envelope
//! format and needs a migration of every existing `secrets` row.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::error::{NovaError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES block (and CBC IV) length in bytes.
pub const IV_LEN: usize = 16;

/// Derive the 32-byte key by repeating the passphrase bytes and truncating.
pub fn derive_key(passphrase: &str) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if passphrase.is_empty() {
        return Err(NovaError::validation("Passphrase cannot be empty"));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    for (slot, byte) in key.iter_mut().zip(passphrase.as_bytes().iter().cycle()) {
        *slot = *byte;
    }
    Ok(key)
}

/// Parse an IV from configuration: either 16 raw characters or 32 hex digits.
pub fn parse_iv(raw: &str) -> Result<[u8; IV_LEN]> {
    let bytes = if raw.len() == IV_LEN * 2 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(raw).map_err(|e| NovaError::config(format!("AES__IV is not valid hex: {}", e)))?
    } else {
        raw.as_bytes().to_vec()
    };

    bytes.try_into().map_err(|b: Vec<u8>| {
        NovaError::config(format!(
            "AES__IV must be {} bytes (or {} hex digits), got {} bytes",
            IV_LEN,
            IV_LEN * 2,
            b.len()
        ))
    })
}

/// Symmetric cipher bound to the process-wide IV.
#[derive(Clone)]
pub struct Cipher {
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("iv", &"[REDACTED]").finish()
    }
}

impl Cipher {
    pub fn new(iv: [u8; IV_LEN]) -> Self {
        Self { iv }
    }

    /// Encrypt `plaintext` under a key derived from `passphrase`.
    /// Returns the base64 envelope.
    pub fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String> {
        let key = derive_key(passphrase)?;
        let encryptor = Aes256CbcEnc::new_from_slices(&key[..], &self.iv)
            .map_err(|e| NovaError::encryption(e.to_string()))?;

        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt a base64 envelope under a key derived from `passphrase`.
    ///
    /// Fails with [`NovaError::Decode`] when the envelope is not base64, is not
    /// a whole number of blocks, or its padding is invalid. A wrong passphrase
    /// that happens to leave valid padding is *not* detected: the returned
    /// string is garbage, with invalid UTF-8 replaced by U+FFFD.
    pub fn decrypt(&self, envelope: &str, passphrase: &str) -> Result<String> {
        let key = derive_key(passphrase)?;
        let ciphertext = STANDARD.decode(envelope.trim())?;

        if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
            return Err(NovaError::decode(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                IV_LEN
            )));
        }

        let decryptor = Aes256CbcDec::new_from_slices(&key[..], &self.iv)
            .map_err(|e| NovaError::encryption(e.to_string()))?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| NovaError::decode("invalid padding (wrong passphrase?)"))?;

        Ok(String::from_utf8_lossy(&plaintext).into_owned())
    }
}

/// How a candidate passphrase is validated before any secret is touched.
#[derive(Clone)]
pub enum PassphraseCheck {
    /// Exact comparison against a configured passphrase (`NOVA_PASSPHRASE`).
    Plain(String),
    /// The configured envelope (`AES__ENCRYPTED_KEY`) must decrypt, under the
    /// candidate, to the candidate itself.
    Envelope(String),
}

impl std::fmt::Debug for PassphraseCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassphraseCheck::Plain(_) => f.write_str("Plain([REDACTED])"),
            PassphraseCheck::Envelope(_) => f.write_str("Envelope([REDACTED])"),
        }
    }
}

impl PassphraseCheck {
    /// True if `candidate` is the configured passphrase.
    pub fn verify(&self, cipher: &Cipher, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match self {
            PassphraseCheck::Plain(expected) => expected == candidate,
            PassphraseCheck::Envelope(envelope) => cipher
                .decrypt(envelope, candidate)
                .map(|decrypted| decrypted == candidate)
                .unwrap_or(false),
        }
    }
}
