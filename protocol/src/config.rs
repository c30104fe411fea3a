//! # Protocol Configuration & Constants
//!
//! Every magic number in the codec lives here. If you're hardcoding a byte
//! offset somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values mirror the ledger's binary layout. The ledger does not
//! negotiate: a single off-by-one here and every transaction we emit is
//! rejected without a word of explanation.

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Length of every key-like value: sub-seeds, private keys, public keys.
pub const KEY_LENGTH: usize = 32;

/// Signature length in bytes. Always 64.
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length produced by every supported hash function.
pub const DIGEST_LENGTH: usize = 32;

/// Number of characters in a canonical text seed.
pub const TEXT_SEED_LENGTH: usize = 55;

/// Domain tag for seed → sub-seed expansion.
pub const SUBSEED_DOMAIN: &str = "qbridge subseed v1";

/// Domain tag for sub-seed → private key expansion. Must differ from
/// [`SUBSEED_DOMAIN`] so the two key spaces can never collide.
pub const PRIVATE_KEY_DOMAIN: &str = "qbridge private key v1";

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Total identity length: 56 body letters plus 4 checksum letters.
pub const IDENTITY_LENGTH: usize = 60;

/// Letters used to encode one 8-byte public key fragment.
/// 26^14 > 2^64, so fourteen base-26 digits always suffice.
pub const IDENTITY_FRAGMENT_LETTERS: usize = 14;

/// Letters used to encode the checksum.
pub const IDENTITY_CHECKSUM_LETTERS: usize = 4;

/// The checksum keeps the low 18 bits of the public key hash (26^4 > 2^18).
pub const IDENTITY_CHECKSUM_MASK: u32 = 0x3FFFF;

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Byte offset of the 32-byte source public key.
pub const TX_SOURCE_OFFSET: usize = 0;

/// Byte offset of the 32-byte destination public key.
pub const TX_DESTINATION_OFFSET: usize = 32;

/// Byte offset of the little-endian u64 amount.
pub const TX_AMOUNT_OFFSET: usize = 64;

/// Byte offset of the little-endian u32 tick.
pub const TX_TICK_OFFSET: usize = 72;

/// Byte offset of the little-endian u16 input type.
pub const TX_INPUT_TYPE_OFFSET: usize = 76;

/// Byte offset of the little-endian u16 input size.
pub const TX_INPUT_SIZE_OFFSET: usize = 78;

/// Fixed header length. Payload starts right after.
pub const TX_HEADER_LENGTH: usize = 80;

/// Largest payload the header can describe.
pub const TX_MAX_INPUT_SIZE: usize = u16::MAX as usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_offsets_are_contiguous() {
        assert_eq!(TX_DESTINATION_OFFSET, TX_SOURCE_OFFSET + KEY_LENGTH);
        assert_eq!(TX_AMOUNT_OFFSET, TX_DESTINATION_OFFSET + KEY_LENGTH);
        assert_eq!(TX_TICK_OFFSET, TX_AMOUNT_OFFSET + 8);
        assert_eq!(TX_INPUT_TYPE_OFFSET, TX_TICK_OFFSET + 4);
        assert_eq!(TX_INPUT_SIZE_OFFSET, TX_INPUT_TYPE_OFFSET + 2);
        assert_eq!(TX_HEADER_LENGTH, TX_INPUT_SIZE_OFFSET + 2);
    }

    #[test]
    fn identity_length_adds_up() {
        assert_eq!(
            IDENTITY_LENGTH,
            4 * IDENTITY_FRAGMENT_LETTERS + IDENTITY_CHECKSUM_LETTERS
        );
    }

    #[test]
    fn fragment_letters_cover_u64() {
        // 26^14 must exceed u64::MAX or some keys would not round-trip.
        let capacity = (0..IDENTITY_FRAGMENT_LETTERS).fold(1u128, |acc, _| acc * 26);
        assert!(capacity > u64::MAX as u128);
    }

    #[test]
    fn checksum_letters_cover_mask() {
        assert!(26u32.pow(IDENTITY_CHECKSUM_LETTERS as u32) > IDENTITY_CHECKSUM_MASK);
    }

    #[test]
    fn derivation_domains_are_distinct() {
        assert_ne!(SUBSEED_DOMAIN, PRIVATE_KEY_DOMAIN);
    }
}
