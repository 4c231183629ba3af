use alloc::vec::Vec;

use rand::{CryptoRng, Rng, RngCore};

use crate::{eq_zero_mask, Error, BLOCK_TYPE_1};

const ERR_BIT_SHIFT: usize = core::mem::size_of::<usize>() * 8 - 1;

/// Encode a block type 1 message according to RFC8017 9.2 / PKCS#1 v1.5
///
/// EM = 0x00 || 0x01 || PS || 0x00 || M, with PS all 0xff bytes
///
/// Deterministic, intended for signatures. Caller has checked the message
/// length against the engine maximum.
pub(crate) fn pad_block_type1(data: &[u8], padded_size: usize) -> Vec<u8> {
    let mut res: Vec<u8> = Vec::with_capacity(padded_size);
    res.resize(padded_size, 0xff);

    res[0] = 0x00;
    res[1] = 0x01;

    let sep = padded_size - data.len() - 1;
    res[sep] = 0x00;
    res[sep + 1..].copy_from_slice(data);

    res
}

/// Encode a block type 2 message according to RFC8017 7.2.1 / PKCS#1 v1.5
///
/// EM = 0x00 || 0x02 || PS || 0x00 || M, with PS random non-zero bytes so
/// the terminating zero is unambiguous. Zero bytes from the random source
/// are resampled.
pub(crate) fn pad_block_type2<R: RngCore + CryptoRng>(
    data: &[u8],
    padded_size: usize,
    rng: &mut R,
) -> Vec<u8> {
    let mut res: Vec<u8> = Vec::with_capacity(padded_size);
    res.resize(padded_size, 0);

    res[1] = 0x02;

    let sep = padded_size - data.len() - 1;
    rng.fill_bytes(&mut res[2..sep]);
    for b in res[2..sep].iter_mut() {
        while *b == 0 {
            *b = rng.gen();
        }
    }

    res[sep + 1..].copy_from_slice(data);

    res
}

/// Decode a PKCS#1 v1.5 block of either type according to RFC8017 7.2.2
///
/// Every structural failure collapses to the single `BadPadding` value, and
/// the body scan never branches on a secret byte: the separator position,
/// the type 1 filler check, and the oversize-result check are all folded
/// into one error accumulator over a single fixed-length pass.
///
/// Caller has checked the block is exactly the padded size.
pub(crate) fn unpad(block: &[u8], block_type: u8, max_data_size: usize) -> Result<Vec<u8>, Error> {
    let mut err = block[0] | (block[1] ^ block_type);

    // type 1 filler bytes must be 0xff; type 2 filler only needs to be
    // non-zero, which finding the separator already establishes
    let check_ff = if block_type == BLOCK_TYPE_1 { 0xff } else { 0x00 };

    let body = &block[2..];
    let mut seen = 0_u8; // 0xff once the separator has been passed
    let mut sep = 0_usize;
    for (i, &b) in body.iter().enumerate() {
        let is_zero = eq_zero_mask(b);
        let first = is_zero & !seen;
        sep |= i * ((first & 1) as usize);
        err |= check_ff & !seen & !is_zero & (b ^ 0xff);
        seen |= is_zero;
    }
    // no separator found
    err |= !seen;

    // a result longer than the maximum means fewer than 8 filler bytes;
    // fold the check in through the subtraction sign bit
    let data_len = body.len() - sep - 1;
    err |= (max_data_size.wrapping_sub(data_len) >> ERR_BIT_SHIFT) as u8;

    if err == 0 {
        Ok(body[sep + 1..].to_vec())
    } else {
        Err(Error::BadPadding)
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use crate::BLOCK_TYPE_2;

    use super::*;

    const MSG: &[u8; 3] = &[0x41, 0x42, 0x43];

    #[test]
    fn check_block_type1_layout() {
        let em = pad_block_type1(MSG.as_ref(), 128);

        assert_eq!(em.len(), 128);
        assert_eq!(em[..2], [0x00, 0x01]);
        for &b in em[2..124].iter() {
            assert_eq!(b, 0xff);
        }
        assert_eq!(em[124], 0x00);
        assert_eq!(em[125..], MSG[..]);
    }

    #[test]
    fn check_block_type1_deterministic() {
        let em = pad_block_type1(MSG.as_ref(), 128);
        let em2 = pad_block_type1(MSG.as_ref(), 128);
        assert_eq!(em, em2);
    }

    #[test]
    fn check_block_type2_layout() {
        let mut rng = thread_rng();
        let em = pad_block_type2(MSG.as_ref(), 128, &mut rng);

        assert_eq!(em.len(), 128);
        assert_eq!(em[..2], [0x00, 0x02]);
        for &b in em[2..124].iter() {
            assert_ne!(b, 0x00);
        }
        assert_eq!(em[124], 0x00);
        assert_eq!(em[125..], MSG[..]);

        let data = unpad(&em, BLOCK_TYPE_2, 117).unwrap();
        assert_eq!(data[..], MSG[..]);
    }

    #[test]
    fn check_block_type2_probabilistic() {
        let mut rng = thread_rng();
        let em = pad_block_type2(MSG.as_ref(), 128, &mut rng);
        let em2 = pad_block_type2(MSG.as_ref(), 128, &mut rng);
        // 123 random filler bytes colliding is beyond unlikely
        assert_ne!(em, em2);
    }

    #[test]
    fn check_round_trip_empty_and_max() {
        let mut rng = thread_rng();

        for &len in [0_usize, 1, 117].iter() {
            let msg = alloc::vec![0x7e_u8; len];

            let em = pad_block_type1(&msg, 128);
            assert_eq!(unpad(&em, BLOCK_TYPE_1, 117).unwrap(), msg);

            let em = pad_block_type2(&msg, 128, &mut rng);
            assert_eq!(unpad(&em, BLOCK_TYPE_2, 117).unwrap(), msg);
        }
    }

    #[test]
    fn check_bad_leading_byte() {
        let mut em = pad_block_type1(MSG.as_ref(), 128);
        em[0] = 0x01;
        assert_eq!(unpad(&em, BLOCK_TYPE_1, 117).unwrap_err(), Error::BadPadding);
    }

    #[test]
    fn check_wrong_block_type_marker() {
        let em = pad_block_type1(MSG.as_ref(), 128);
        // a type 1 block fed to a type 2 decoder must not validate
        assert_eq!(unpad(&em, BLOCK_TYPE_2, 117).unwrap_err(), Error::BadPadding);
    }

    #[test]
    fn check_non_ff_filler_rejected() {
        let mut em = pad_block_type1(MSG.as_ref(), 128);
        em[10] = 0xfe;
        assert_eq!(unpad(&em, BLOCK_TYPE_1, 117).unwrap_err(), Error::BadPadding);
    }

    #[test]
    fn check_missing_separator() {
        let mut em: Vec<u8> = Vec::with_capacity(128);
        em.resize(128, 0xff);
        em[0] = 0x00;
        em[1] = 0x01;
        assert_eq!(unpad(&em, BLOCK_TYPE_1, 117).unwrap_err(), Error::BadPadding);
    }

    #[test]
    fn check_short_filler_rejected() {
        // separator directly after the marker implies a 125-byte result,
        // over the 117-byte maximum
        let mut em: Vec<u8> = Vec::with_capacity(128);
        em.resize(128, 0xaa);
        em[0] = 0x00;
        em[1] = 0x02;
        em[2] = 0x00;
        assert_eq!(unpad(&em, BLOCK_TYPE_2, 117).unwrap_err(), Error::BadPadding);
    }
}
