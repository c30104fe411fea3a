//! The seed → sub-seed → private key → public key chain.
//!
//! Each stage is a pure one-way function. Sub-seed and private key use the
//! same hash primitive under different domain tags, so the two spaces never
//! overlap even though the primitive is shared.
//!
//! Nothing here caches. Every call recomputes from its input, and every
//! intermediate secret drops (and is wiped) before the function returns
//! unless the caller explicitly asked for it.

use tracing::trace;

use super::hash::HashFunction;
use super::keys::{PrivateKey, PublicKey, Seed, SubSeed};
use super::signatures::{SignatureError, SignatureScheme};
use crate::config::{PRIVATE_KEY_DOMAIN, SUBSEED_DOMAIN};

/// Expand a seed into its sub-seed.
pub fn derive_sub_seed<H: HashFunction + ?Sized>(seed: &Seed, hasher: &H) -> SubSeed {
    trace!(hash = hasher.name(), "deriving sub-seed");
    SubSeed::from_bytes(hasher.hash_with_domain(SUBSEED_DOMAIN, seed.as_bytes()))
}

/// Expand a sub-seed into a private key.
pub fn derive_private_key<H: HashFunction + ?Sized>(sub_seed: &SubSeed, hasher: &H) -> PrivateKey {
    trace!(hash = hasher.name(), "deriving private key");
    PrivateKey::from_bytes(hasher.hash_with_domain(PRIVATE_KEY_DOMAIN, sub_seed.as_bytes()))
}

/// Run the signature scheme's public key generation.
pub fn derive_public_key<S: SignatureScheme + ?Sized>(
    private_key: &PrivateKey,
    scheme: &S,
) -> Result<PublicKey, SignatureError> {
    scheme.derive_public_key(private_key)
}

/// Seed straight to private key. The sub-seed never leaves this function.
pub fn private_key_from_seed<H: HashFunction + ?Sized>(seed: &Seed, hasher: &H) -> PrivateKey {
    let sub_seed = derive_sub_seed(seed, hasher);
    derive_private_key(&sub_seed, hasher)
}

/// Seed straight to public key. No secret outlives the call.
pub fn public_key_from_seed<S, H>(
    seed: &Seed,
    scheme: &S,
    hasher: &H,
) -> Result<PublicKey, SignatureError>
where
    S: SignatureScheme + ?Sized,
    H: HashFunction + ?Sized,
{
    let private_key = private_key_from_seed(seed, hasher);
    derive_public_key(&private_key, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::{Blake3Hasher, Sha256Hasher};
    use crate::crypto::signatures::Ed25519Scheme;

    fn seed() -> Seed {
        Seed::from_text("jvhbyzjinlyutyuhsweuxiwootqoevjqwqmdhjeohrytxjxidpbcfyg").unwrap()
    }

    #[test]
    fn sub_seed_is_pure() {
        let a = derive_sub_seed(&seed(), &Blake3Hasher);
        let b = derive_sub_seed(&seed(), &Blake3Hasher);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn sub_seed_and_private_key_spaces_differ() {
        // Feeding the same 32 bytes to both stages must not give the same
        // answer; the domain tags keep them apart.
        let sub = derive_sub_seed(&seed(), &Blake3Hasher);
        let as_seed = Seed::from_bytes(sub.as_bytes()).unwrap();
        let via_sub_stage = derive_sub_seed(&as_seed, &Blake3Hasher);
        let via_key_stage = derive_private_key(&sub, &Blake3Hasher);
        assert_ne!(via_sub_stage.as_bytes(), via_key_stage.as_bytes());
    }

    #[test]
    fn private_key_differs_from_sub_seed() {
        let sub = derive_sub_seed(&seed(), &Blake3Hasher);
        let pk = derive_private_key(&sub, &Blake3Hasher);
        assert_ne!(sub.as_bytes(), pk.as_bytes());
    }

    #[test]
    fn different_seeds_different_keys() {
        let other = Seed::from_text(&"a".repeat(55)).unwrap();
        let a = public_key_from_seed(&seed(), &Ed25519Scheme, &Blake3Hasher).unwrap();
        let b = public_key_from_seed(&other, &Ed25519Scheme, &Blake3Hasher).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_choice_changes_keys() {
        let a = public_key_from_seed(&seed(), &Ed25519Scheme, &Blake3Hasher).unwrap();
        let b = public_key_from_seed(&seed(), &Ed25519Scheme, &Sha256Hasher).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn chain_matches_stepwise_derivation() {
        let sub = derive_sub_seed(&seed(), &Blake3Hasher);
        let sk = derive_private_key(&sub, &Blake3Hasher);
        let stepwise = derive_public_key(&sk, &Ed25519Scheme).unwrap();
        let direct = public_key_from_seed(&seed(), &Ed25519Scheme, &Blake3Hasher).unwrap();
        assert_eq!(stepwise, direct);
    }
}
