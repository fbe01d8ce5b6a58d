//! # Curve25519 Arithmetic
//!
//! The chain signs with a KCDSA-style scheme over Curve25519 and publishes
//! only the Montgomery u-coordinate of each public key. `x25519-dalek` covers
//! the u-only ladder (key derivation, ECDH, the signing nonce point);
//! verification needs real point addition, which we do on the Edwards form
//! with `curve25519-dalek`.
//!
//! ## The sign problem
//!
//! A u-coordinate names two points, `P` and `-P`. The chain resolves the
//! ambiguity by always meaning the point whose Montgomery v-coordinate is
//! even, and by using the basepoint `G = (9, v)` with even `v`, which is
//! the negation of the standard Ed25519 basepoint. Signing keys are
//! adjusted at derivation time so that the verifier's choice is always the
//! right one.
//!
//! Converting between "even Montgomery v" and "Edwards x sign bit" needs a
//! square root and a division in GF(2^255 - 19). dalek keeps its field
//! element private, so the few operations required run on an `ark-ff`
//! prime field instead.

use ark_ff::fields::{Fp256, MontBackend, MontConfig};
use ark_ff::{BigInteger, Field, MontFp, PrimeField, Zero};
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::Scalar;
use x25519_dalek::X25519_BASEPOINT_BYTES;

use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};

#[derive(MontConfig)]
#[modulus = "57896044618658097711785492504343953926634992332820282019728792003956564819949"]
#[generator = "2"]
pub struct FieldConfig;

/// An element of GF(2^255 - 19).
pub type FieldElement = Fp256<MontBackend<FieldConfig, 4>>;

/// Montgomery curve coefficient `A` in `v^2 = u^3 + A u^2 + u`.
const MONTGOMERY_A: FieldElement = MontFp!("486662");

/// `sqrt(-(A + 2))`, the scale in the birational map `x = c * u / v`.
const EDWARDS_X_SCALE: FieldElement =
    MontFp!("51042569399160536130206135233146329284152202253034631822681833788666877215207");

/// Standard Curve25519 scalar clamping: clear the cofactor bits, clear the
/// top bit, set bit 254.
pub fn clamp(mut bytes: [u8; PRIVATE_KEY_LENGTH]) -> [u8; PRIVATE_KEY_LENGTH] {
    bytes[0] &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
    bytes
}

/// u-coordinate of `scalar * G`.
pub fn base_multiply(scalar: &[u8; PRIVATE_KEY_LENGTH]) -> [u8; PUBLIC_KEY_LENGTH] {
    x25519_dalek::x25519(*scalar, X25519_BASEPOINT_BYTES)
}

/// Raw X25519 shared point between a private scalar and a peer's key.
pub fn shared_point(
    private_key: &[u8; PRIVATE_KEY_LENGTH],
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> [u8; PUBLIC_KEY_LENGTH] {
    x25519_dalek::x25519(*private_key, *public_key)
}

/// Derive the scalar the signer multiplies by: `(±k)^-1 mod l`, with the
/// sign picked so that `±k * G` has an even Montgomery v-coordinate.
pub fn signing_scalar(private_key: &[u8; PRIVATE_KEY_LENGTH]) -> Scalar {
    let k = Scalar::from_bytes_mod_order(*private_key);
    let point = -EdwardsPoint::mul_base(&k);
    let adjusted = if has_even_v(&point) { k } else { -k };
    adjusted.invert()
}

/// Lift a published u-coordinate to the Edwards point the chain means by
/// it. `None` for non-canonical encodings and u-values not on the curve.
pub fn lift_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> Option<EdwardsPoint> {
    let u = decode_canonical(public_key)?;
    let sign = edwards_sign_for_even_v(u)?;
    MontgomeryPoint(*public_key).to_edwards(sign)
}

/// u-coordinate of `v * a + h * G`.
pub fn double_multiply(v: &Scalar, a: &EdwardsPoint, h: &Scalar) -> [u8; PUBLIC_KEY_LENGTH] {
    // G is the negated Ed25519 basepoint.
    EdwardsPoint::vartime_double_scalar_mul_basepoint(v, a, &-h)
        .to_montgomery()
        .to_bytes()
}

fn has_even_v(point: &EdwardsPoint) -> bool {
    let u = FieldElement::from_le_bytes_mod_order(point.to_montgomery().as_bytes());
    let sign = point.compress().as_bytes()[31] >> 7;
    edwards_sign_for_even_v(u) == Some(sign)
}

/// Edwards x sign bit of the point over `u` whose Montgomery v is even.
fn edwards_sign_for_even_v(u: FieldElement) -> Option<u8> {
    let u2 = u.square();
    let rhs = u2 * u + MONTGOMERY_A * u2 + u;
    let mut v = rhs.sqrt()?;
    if v.is_zero() {
        return None;
    }
    if is_odd(&v) {
        v = -v;
    }
    let x = EDWARDS_X_SCALE * u * v.inverse()?;
    Some(u8::from(is_odd(&x)))
}

fn decode_canonical(bytes: &[u8; 32]) -> Option<FieldElement> {
    let element = FieldElement::from_le_bytes_mod_order(bytes);
    (element.into_bigint().to_bytes_le() == bytes.as_slice()).then_some(element)
}

fn is_odd(element: &FieldElement) -> bool {
    element.into_bigint().is_odd()
}
