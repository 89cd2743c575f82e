//! Chain-context capability: fresh change addresses and transaction hashes.
//!
//! The engine needs *some* source of identifiers that never repeat. Whether
//! they come from HD key derivation or from a counter is none of its
//! business, so the capability is a trait with the address and hash types
//! fixed by each implementation.

use std::fmt;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{CHANGE_ADDRESS_DOMAIN, CHANGE_ADDRESS_HRP, TX_HASH_DOMAIN};

/// Source of fresh identifiers.
///
/// Every call must return a value never returned before by the same
/// context.
pub trait ChainContext {
    /// Address type of outputs in this chain.
    type Address: Clone + Ord + fmt::Debug;

    /// Transaction identifier type in this chain.
    type Hash: Clone + Ord + fmt::Debug;

    /// A change address nobody has used yet.
    fn fresh_change_address(&mut self) -> Self::Address;

    /// A transaction hash nobody has used yet.
    fn fresh_hash(&mut self) -> Self::Hash;
}

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// A 32-byte transaction hash, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = hex::decode(s).map_err(|e| format!("invalid hex: {e}"))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))?;
        Ok(Self(digest))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TxHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Encodes a 32-byte payload as a Bech32 address under
/// [`CHANGE_ADDRESS_HRP`].
pub fn encode_address(payload: &[u8; 32]) -> String {
    let hrp = Hrp::parse(CHANGE_ADDRESS_HRP).expect("static HRP is valid");
    bech32::encode::<Bech32>(hrp, payload).expect("encoding a 32-byte payload should never fail")
}

fn domain_hash(domain: &[u8], counter: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain);
    hasher.update(&counter.to_le_bytes());
    *hasher.finalize().as_bytes()
}

// ---------------------------------------------------------------------------
// CounterContext
// ---------------------------------------------------------------------------

/// Deterministic chain context backed by two counters.
///
/// Hashes are `BLAKE3(TX_HASH_DOMAIN || n)`; change addresses are the Bech32
/// encoding of `BLAKE3(CHANGE_ADDRESS_DOMAIN || n)`. Counters only go up, so
/// nothing repeats.
#[derive(Debug, Clone, Default)]
pub struct CounterContext {
    next_address: u64,
    next_hash: u64,
}

impl CounterContext {
    /// A context whose counters start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of change addresses handed out so far.
    pub fn addresses_issued(&self) -> u64 {
        self.next_address
    }

    /// Number of hashes handed out so far.
    pub fn hashes_issued(&self) -> u64 {
        self.next_hash
    }
}

impl ChainContext for CounterContext {
    type Address = String;
    type Hash = TxHash;

    fn fresh_change_address(&mut self) -> String {
        let payload = domain_hash(CHANGE_ADDRESS_DOMAIN, self.next_address);
        self.next_address += 1;
        encode_address(&payload)
    }

    fn fresh_hash(&mut self) -> TxHash {
        let digest = domain_hash(TX_HASH_DOMAIN, self.next_hash);
        self.next_hash += 1;
        TxHash(digest)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn hashes_never_repeat() {
        let mut ctx = CounterContext::new();
        let hashes: HashSet<TxHash> = (0..1_000).map(|_| ctx.fresh_hash()).collect();
        assert_eq!(hashes.len(), 1_000);
        assert_eq!(ctx.hashes_issued(), 1_000);
    }

    #[test]
    fn addresses_never_repeat_and_carry_hrp() {
        let mut ctx = CounterContext::new();
        let addresses: HashSet<String> = (0..100).map(|_| ctx.fresh_change_address()).collect();
        assert_eq!(addresses.len(), 100);
        assert!(addresses.iter().all(|a| a.starts_with("dnova1")));
    }

    #[test]
    fn contexts_are_deterministic() {
        let mut a = CounterContext::new();
        let mut b = CounterContext::new();
        assert_eq!(a.fresh_hash(), b.fresh_hash());
        assert_eq!(a.fresh_change_address(), b.fresh_change_address());
    }

    #[test]
    fn address_payload_roundtrips_through_bech32() {
        let payload = [7u8; 32];
        let address = encode_address(&payload);
        let (hrp, data) = bech32::decode(&address).expect("valid bech32");
        assert_eq!(hrp.as_str(), CHANGE_ADDRESS_HRP);
        assert_eq!(data, payload.to_vec());
    }

    #[test]
    fn tx_hash_hex_roundtrip() {
        let hash = CounterContext::new().fresh_hash();
        assert_eq!(TxHash::from_hex(&hash.to_hex()), Ok(hash));
        assert!(TxHash::from_hex("abcd").is_err());
        assert!(TxHash::from_hex("zz").is_err());
    }

    #[test]
    fn tx_hash_serializes_as_hex_string() {
        let hash = TxHash([0xAB; 32]);
        let json = serde_json::to_string(&hash).expect("serialize");
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: TxHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, hash);
    }
}
