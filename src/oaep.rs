use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};

use crate::{constant_compare, eq_zero_mask, mask, Error, Hash};

/// OAEP encode a message according to RFC8017 7.1.1 Steps 2
///
/// EM = 0x00 || maskedSeed || maskedDB, with DB = lHash || PS || 0x01 || M.
/// DB is masked first under the fresh seed, then the seed is masked under
/// the already-masked DB; both masks are XORed in place into the output
/// block. Caller has hashed the label and checked the message length.
pub(crate) fn pad<R: RngCore + CryptoRng>(
    data: &[u8],
    padded_size: usize,
    lhash: &[u8],
    mgf_hash: Hash,
    rng: &mut R,
) -> Vec<u8> {
    let hash_len = lhash.len();

    let mut res: Vec<u8> = Vec::with_capacity(padded_size);
    res.resize(padded_size, 0);

    let (head, db) = res.split_at_mut(1 + hash_len);
    let seed = &mut head[1..];

    // 7.1.1 Steps 2.b-2.c DB = lHash || PS || 0x01 || M
    db[..hash_len].copy_from_slice(lhash);
    let sep = db.len() - data.len() - 1;
    db[sep] = 0x01;
    db[sep + 1..].copy_from_slice(data);

    // 7.1.1 Steps 2.d Generate a random octet string seed of length hLen
    rng.fill_bytes(seed);

    // 7.1.1 Steps 2.e-2.f maskedDB = DB \xor MGF(seed, len(DB))
    mask::mgf1_xor(db, seed, mgf_hash);

    // 7.1.1 Steps 2.g-2.h maskedSeed = seed \xor MGF(maskedDB, hLen)
    mask::mgf1_xor(seed, db, mgf_hash);

    res
}

/// OAEP decode an encoded block according to RFC8017 7.1.2 Steps 3
///
/// Reverses the masking order symmetrically: unmask the seed under the
/// masked DB, then unmask DB under the recovered seed.
///
/// Care has been taken to not allow an attacker to distinguish, via timing
/// or error type, what decoding errors occurred, if any: the label-hash
/// compare is constant-time, the delimiter scan runs the full DB length,
/// and every failure is the single `BadPadding` value.
///
/// Caller has checked the block is exactly the padded size.
pub(crate) fn unpad(block: &[u8], lhash: &[u8], mgf_hash: Hash) -> Result<Vec<u8>, Error> {
    let hash_len = lhash.len();

    let mut buf = block.to_vec();
    let (head, db) = buf.split_at_mut(1 + hash_len);
    let y = head[0];
    let seed = &mut head[1..];

    // 7.1.2 Steps 3.c-3.d seed = maskedSeed \xor MGF(maskedDB, hLen)
    mask::mgf1_xor(seed, db, mgf_hash);

    // 7.1.2 Steps 3.e-3.f DB = maskedDB \xor MGF(seed, len(maskedDB))
    mask::mgf1_xor(db, seed, mgf_hash);

    // 7.1.2 Steps 3.g DB = lHash' || PS || 0x01 || M
    let mut err = y;
    err |= constant_compare(&db[..hash_len], lhash);

    // the first non-zero byte after lHash' must be the 0x01 delimiter;
    // scan the whole region without branching on byte values
    let mut seen = 0_u8; // 0xff once a non-zero byte has been passed
    let mut sep = 0_usize;
    for (i, &b) in db[hash_len..].iter().enumerate() {
        let non_zero = !eq_zero_mask(b);
        let first = non_zero & !seen;
        sep |= i * ((first & 1) as usize);
        err |= first & (b ^ 0x01);
        seen |= non_zero;
    }
    // delimiter never found
    err |= !seen;

    let res = db[hash_len + sep + 1..].to_vec();

    // unmasked seed and plaintext scratch do not outlive the call
    seed.fill(0);
    db.fill(0);

    if err == 0 {
        Ok(res)
    } else {
        Err(Error::BadPadding)
    }
}
