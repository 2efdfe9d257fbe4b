// wallet-core/src/crypto/primitives.rs
//
// Primitive Adapter - thin wrappers over RustCrypto hashes, HMAC, PBKDF2,
// CRC32 and the OS random source. Nothing above this module touches the
// underlying crates directly.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, Rng, RngCore};
use sha2::{Digest, Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// SHA-256 digest.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// HMAC-SHA256(key, msg); `None` only if the key is rejected.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> Option<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(msg);
    Some(mac.finalize().into_bytes().into())
}

/// HMAC-SHA512(key, msg); `None` only if the key is rejected.
pub fn hmac_sha512(key: &[u8], msg: &[u8]) -> Option<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).ok()?;
    mac.update(msg);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Some(out)
}

/// PBKDF2-HMAC-SHA512 producing `out_len` bytes.
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], iterations: u32, out_len: usize) -> Vec<u8> {
    let mut out = vec![0u8; out_len];
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut out);
    out
}

/// PBKDF2-HMAC-SHA256 producing `out_len` bytes.
pub fn pbkdf2_hmac_sha256(password: &[u8], salt: &[u8], iterations: u32, out_len: usize) -> Vec<u8> {
    let mut out = vec![0u8; out_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

/// CRC-32 (IEEE) checksum.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// `n` bytes from the OS CSPRNG.
pub fn secure_random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Big-endian integer with exactly `bits` significant bits.
///
/// Occupies `ceil(bits / 8)` bytes; the unused high bits of the first byte are
/// cleared and the most significant bit is forced on, so the bit length is
/// exact rather than merely bounded.
pub fn secure_random_bits(bits: usize) -> Vec<u8> {
    if bits == 0 {
        return Vec::new();
    }
    let mut buf = secure_random_bytes(bits.div_ceil(8));
    let excess = buf.len() * 8 - bits;
    buf[0] &= 0xFF >> excess;
    buf[0] |= 0x80 >> excess;
    buf
}

/// Random `u16` from the OS CSPRNG, masked with `mask`.
pub fn secure_random_u16(mask: u16) -> u16 {
    OsRng.gen::<u16>() & mask
}
