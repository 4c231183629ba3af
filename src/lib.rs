#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use rand::{thread_rng, CryptoRng, RngCore};

mod hash;
mod mask;
mod oaep;
mod pkcs1v1_5;

/// Minimum padded block size in bytes (512-bit modulus)
pub const MIN_PADDED_SIZE: usize = 64;

/// PKCS#1 v1.5 block type 1 marker byte
pub(crate) const BLOCK_TYPE_1: u8 = 0x01;

/// PKCS#1 v1.5 block type 2 marker byte
pub(crate) const BLOCK_TYPE_2: u8 = 0x02;

/// Padding errors
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// Padded size too small for the requested mode and digest combination
    InvalidKeySize,
    /// Input to `pad` exceeds the maximum data size for the mode
    DataTooLong,
    /// Input to `unpad` is not exactly the padded size
    InvalidPaddedLength,
    /// Structural validation of a padded block failed
    ///
    /// Every content-validation failure collapses to this one value, so an
    /// observer cannot distinguish which check failed
    BadPadding,
}

/// Hash function to use for the OAEP label hash and MGF1
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hash {
    /// SHA1: too weak for modern use, here for backwards compatibility. See RFC8017 9.2 Notes for details
    Sha1,
    /// SHA2-224
    Sha224,
    /// SHA2-256
    Sha256,
    /// SHA2-384
    Sha384,
    /// SHA2-512
    Sha512,
}

/// Padding family applied by an engine instance
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaddingMode {
    /// Pass blocks through unchanged (caller performs any sizing)
    None,
    /// PKCS#1 v1.5 block type 1: deterministic 0xff filler, for signing
    BlockType1,
    /// PKCS#1 v1.5 block type 2: random non-zero filler, for encryption
    BlockType2,
    /// Optimal Asymmetric Encryption Padding with MGF1 (RFC8017 7.1)
    Oaep,
}

/// Padding engine for a fixed (mode, padded size, digest) configuration
///
/// Converts variable-length plaintext into modulus-sized blocks before the
/// RSA primitive, and validates/strips the structure after it.
///
/// An instance is immutable after construction, but `pad`/`unpad` calls on
/// one instance must not be interleaved from two threads without external
/// synchronization.
#[derive(Debug)]
pub struct Padding {
    mode: PaddingMode,
    padded_size: usize,
    max_data_size: usize,
    /// MGF1 digest, possibly different from the label digest
    mgf_hash: Hash,
    /// Precomputed hash of the OAEP label (empty outside OAEP mode)
    lhash: Vec<u8>,
}

impl Padding {
    /// Create an engine with default digests: SHA-1 for both the OAEP label
    /// hash and MGF1, and the empty label
    pub fn new(mode: PaddingMode, padded_size: usize) -> Result<Self, Error> {
        Self::with_digest(mode, padded_size, Hash::Sha1, Hash::Sha1, None)
    }

    /// Create an engine with explicit label and MGF1 digests (only OAEP uses
    /// them; other modes ignore the digest choice and label)
    ///
    /// Returns `InvalidKeySize` when `padded_size` is below 64 bytes, or when
    /// an OAEP block cannot hold even a one-byte message under the chosen
    /// label digest
    pub fn with_digest(
        mode: PaddingMode,
        padded_size: usize,
        hash: Hash,
        mgf_hash: Hash,
        label: Option<&[u8]>,
    ) -> Result<Self, Error> {
        if padded_size < MIN_PADDED_SIZE {
            return Err(Error::InvalidKeySize);
        }

        let (max_data_size, lhash) = match mode {
            PaddingMode::None => (padded_size, Vec::new()),
            // 3 bytes of structure plus at least 8 filler bytes
            PaddingMode::BlockType1 | PaddingMode::BlockType2 => (padded_size - 11, Vec::new()),
            PaddingMode::Oaep => {
                let hash_len = hash::hash_len(hash);
                if padded_size < 2 * hash_len + 3 {
                    return Err(Error::InvalidKeySize);
                }
                let lhash = hash::digest(label.unwrap_or(&[]), hash);
                (padded_size - 2 * hash_len - 2, lhash)
            }
        };

        Ok(Self {
            mode,
            padded_size,
            max_data_size,
            mgf_hash,
            lhash,
        })
    }

    /// Padded block size in bytes (the RSA modulus byte length)
    pub fn padded_size(&self) -> usize {
        self.padded_size
    }

    /// Largest plaintext this engine accepts
    pub fn max_data_size(&self) -> usize {
        self.max_data_size
    }

    /// Pad a plaintext into a block of `padded_size` bytes (mode `None`
    /// returns the input unchanged)
    ///
    /// Block type 2 filler and the OAEP seed are drawn from `thread_rng`
    pub fn pad(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        self.pad_with_rng(data, &mut thread_rng())
    }

    /// Pad a plaintext using a caller-provided random source
    pub fn pad_with_rng<R: RngCore + CryptoRng>(
        &self,
        data: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>, Error> {
        if data.len() > self.max_data_size {
            return Err(Error::DataTooLong);
        }

        match self.mode {
            PaddingMode::None => Ok(data.to_vec()),
            PaddingMode::BlockType1 => Ok(pkcs1v1_5::pad_block_type1(data, self.padded_size)),
            PaddingMode::BlockType2 => Ok(pkcs1v1_5::pad_block_type2(data, self.padded_size, rng)),
            PaddingMode::Oaep => Ok(oaep::pad(
                data,
                self.padded_size,
                &self.lhash,
                self.mgf_hash,
                rng,
            )),
        }
    }

    /// Validate a padded block and recover the plaintext
    ///
    /// The length precondition is reported as `InvalidPaddedLength` (the
    /// block length is public); every content failure is the single
    /// `BadPadding`
    pub fn unpad(&self, block: &[u8]) -> Result<Vec<u8>, Error> {
        if block.len() != self.padded_size {
            return Err(Error::InvalidPaddedLength);
        }

        match self.mode {
            PaddingMode::None => Ok(block.to_vec()),
            PaddingMode::BlockType1 => pkcs1v1_5::unpad(block, BLOCK_TYPE_1, self.max_data_size),
            PaddingMode::BlockType2 => pkcs1v1_5::unpad(block, BLOCK_TYPE_2, self.max_data_size),
            PaddingMode::Oaep => oaep::unpad(block, &self.lhash, self.mgf_hash),
        }
    }
}

/// Bitwise exlusive-OR of two byte slices, assigning result to left byte slice
///
/// If slices are unequal length, the shortest length of bytes is combined
#[inline(always)]
pub fn xor_assign(el: &mut [u8], ar: &[u8]) {
    let el_len = el.len();
    let ar_len = ar.len();
    let len = if el_len < ar_len { el_len } else { ar_len };

    for (e, &r) in el[..len].iter_mut().zip(ar[..len].iter()) {
        *e ^= r;
    }
}

/// Constant-time compare two byte slices
///
/// If slices are unequal length, the shortest length of bytes is compared
#[inline(always)]
pub fn constant_compare(el: &[u8], ar: &[u8]) -> u8 {
    let mut res = 0;
    let len = if el.len() > ar.len() {
        ar.len()
    } else {
        el.len()
    };
    for (e, a) in el[..len].iter().zip(ar[..len].iter()) {
        res |= e ^ a;
    }
    res
}

/// 0xff when the byte is zero, 0x00 otherwise, without a data-dependent branch
#[inline(always)]
pub(crate) fn eq_zero_mask(b: u8) -> u8 {
    ((((b as u32).wrapping_sub(1)) >> 31) as u8).wrapping_neg()
}
