use crate::{hash, xor_assign, Hash};

/// Mask Generation Function 1 from RFC8017 Appendix B.2.1
///
/// XORs the mask of `dest.len()` bytes directly into `dest` instead of
/// materializing it, concatenating Hash(seed || counter) blocks with the
/// counter encoded as 4 big-endian bytes and the final block truncated
pub(crate) fn mgf1_xor(dest: &mut [u8], seed: &[u8], hash: Hash) {
    let hash_len = hash::hash_len(hash);

    // the engine never requests more than a padded block of mask, far below
    // the RFC8017 limit of 2**32 hash blocks
    debug_assert!(dest.len() / hash_len <= u32::max_value() as usize);

    // reuse one seed || counter input, rewriting the trailing 4 bytes
    let seed_len = seed.len();
    let mut input = seed.to_vec();
    input.extend_from_slice([0_u8; 4].as_ref());

    let mut counter = 0_u32;
    let mut offset = 0_usize;
    while offset < dest.len() {
        input[seed_len..].copy_from_slice(counter.to_be_bytes().as_ref());
        xor_assign(&mut dest[offset..], &hash::digest(&input, hash));

        offset += hash_len;
        counter += 1;
    }
}
