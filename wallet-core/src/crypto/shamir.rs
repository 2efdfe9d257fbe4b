// wallet-core/src/crypto/shamir.rs
//
// Shamir secret sharing over GF(256), byte-wise, as used by SLIP-0039.
//
// Field: x^8 + x^4 + x^3 + x + 1 (0x11B), generator 3. Points at x = 254 and
// x = 255 hold the digest share and the secret; real shares use x < 16.

use crate::crypto::primitives::{hmac_sha256, secure_random_bytes};
use crate::error::{MnemonicError, WalletResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub(crate) const DIGEST_INDEX: u8 = 254;
pub(crate) const SECRET_INDEX: u8 = 255;
pub(crate) const DIGEST_LEN: usize = 4;

const fn field_tables() -> ([u8; 255], [u8; 256]) {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut poly: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = poly as u8;
        log[poly as usize] = i as u8;
        // poly * (x + 1)
        poly ^= poly << 1;
        if poly & 0x100 != 0 {
            poly ^= 0x11B;
        }
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 255], [u8; 256]) = field_tables();
const EXP: [u8; 255] = TABLES.0;
const LOG: [u8; 256] = TABLES.1;

/// One share: `y` is the polynomial evaluated at `x`, byte by byte.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Point {
    #[zeroize(skip)]
    pub x: u8,
    pub y: Vec<u8>,
}

impl Point {
    pub fn new(x: u8, y: Vec<u8>) -> Self {
        Self { x, y }
    }
}

/// Lagrange interpolation of `points` at `x`.
///
/// `points` must be non-empty with distinct `x` and equal-length `y`.
pub(crate) fn interpolate(points: &[Point], x: u8) -> Vec<u8> {
    if let Some(point) = points.iter().find(|p| p.x == x) {
        return point.y.clone();
    }

    let len = points.first().map_or(0, |p| p.y.len());
    let mut out = vec![0u8; len];
    for (i, point) in points.iter().enumerate() {
        let (log_num, log_den) = points
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold((0u32, 0u32), |(num, den), (_, other)| {
                (
                    num + u32::from(LOG[usize::from(x ^ other.x)]),
                    den + u32::from(LOG[usize::from(point.x ^ other.x)]),
                )
            });
        let log_basis = (log_num + 255 * points.len() as u32 - log_den) % 255;

        for (acc, &y) in out.iter_mut().zip(point.y.iter()) {
            if y != 0 {
                *acc ^= EXP[((u32::from(LOG[usize::from(y)]) + log_basis) % 255) as usize];
            }
        }
    }
    out
}

fn digest(random_part: &[u8], secret: &[u8]) -> WalletResult<[u8; DIGEST_LEN]> {
    let mac = hmac_sha256(random_part, secret).ok_or(MnemonicError::ChecksumMismatch)?;
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&mac[..DIGEST_LEN]);
    Ok(out)
}

/// Splits `secret` into `count` shares, any `threshold` of which recover it.
///
/// With `threshold` 1 every share is the secret itself. Otherwise the
/// polynomial passes through `threshold - 2` random points, the digest point
/// and the secret point.
pub(crate) fn split(threshold: u8, count: u8, secret: &[u8]) -> WalletResult<Vec<Point>> {
    if threshold == 0 || threshold > count {
        return Err(MnemonicError::InvalidGroupSpec(format!("{}-of-{}", threshold, count)).into());
    }
    if threshold == 1 {
        return Ok((0..count).map(|x| Point::new(x, secret.to_vec())).collect());
    }
    if secret.len() < DIGEST_LEN {
        return Err(MnemonicError::InvalidGroupSpec(format!("{}-byte secret is too short to split", secret.len())).into());
    }

    let random_count = threshold - 2;
    let mut base: Vec<Point> = (0..random_count)
        .map(|x| Point::new(x, secure_random_bytes(secret.len())))
        .collect();

    let mut random_part = secure_random_bytes(secret.len() - DIGEST_LEN);
    let mut digest_value = digest(&random_part, secret)?.to_vec();
    digest_value.extend_from_slice(&random_part);
    random_part.zeroize();
    base.push(Point::new(DIGEST_INDEX, digest_value));
    base.push(Point::new(SECRET_INDEX, secret.to_vec()));

    let mut shares: Vec<Point> = base[..usize::from(random_count)].to_vec();
    shares.extend((random_count..count).map(|x| Point::new(x, interpolate(&base, x))));
    Ok(shares)
}

/// Recovers the secret from exactly `threshold` shares and checks the digest.
pub(crate) fn recover(threshold: u8, points: &[Point]) -> WalletResult<Vec<u8>> {
    if threshold == 1 {
        return points
            .first()
            .map(|p| p.y.clone())
            .ok_or_else(|| MnemonicError::InvalidShareSet("no shares to recover from".to_string()).into());
    }

    let mut secret = interpolate(points, SECRET_INDEX);
    let mut digest_share = interpolate(points, DIGEST_INDEX);
    let verified = digest_share.len() >= DIGEST_LEN && {
        let (given, random_part) = digest_share.split_at(DIGEST_LEN);
        digest(random_part, &secret)? == given
    };
    digest_share.zeroize();

    if !verified {
        secret.zeroize();
        return Err(MnemonicError::ChecksumMismatch.into());
    }
    Ok(secret)
}
