//! GF(2^k) field arithmetic.
//!
//! An element is a residue of GF(2)[x] modulo an irreducible polynomial of
//! degree `k`, stored as the k-bit remainder with the reduction polynomial
//! carried alongside. The field is picked per element at runtime, so two
//! elements interoperate only when their `(size, modulus)` parameters match;
//! mixing fields is a caller bug and asserts.
//!
//! The free `p*` functions at the bottom operate on bit-encoded GF(2)[x]
//! polynomials directly (bit i = coefficient of x^i). They back the element
//! operations here and the parameter search in `fieldgen`.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use crate::core::FieldError;

/// An element of GF(2^k).
///
/// `value` is always in reduced form (`value < 2^size`). Equality and hashing
/// cover the field parameters as well as the value, so elements of different
/// fields never compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Gf2k {
    size: u32,
    modulus: u64,
    value: u64,
}

impl Gf2k {
    /// Builds an element from a bit-encoded polynomial, reducing it modulo
    /// the field's reduction polynomial.
    ///
    /// `modulus` must have degree exactly `size`; widths from 1 to 63 bits
    /// are representable.
    pub fn new(value: u64, size: u32, modulus: u64) -> Self {
        assert!((1..=63).contains(&size), "field width {size} out of range");
        assert!(
            pdeg(modulus as u128) == size as i32,
            "reduction polynomial {modulus:#x} does not have degree {size}"
        );
        Gf2k {
            size,
            modulus,
            value: pmod(value as u128, modulus),
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    fn assert_same_field(&self, rhs: &Self) {
        assert!(
            self.size == rhs.size && self.modulus == rhs.modulus,
            "mixed fields: GF(2^{})/{:#x} vs GF(2^{})/{:#x}",
            self.size,
            self.modulus,
            rhs.size,
            rhs.modulus
        );
    }

    /// Raises the element to an integer power by square-and-multiply.
    ///
    /// For a nonzero base the exponent acts modulo the group order 2^k - 1;
    /// `0^0 = 1` and `0^e = 0` otherwise.
    ///
    /// # Performance
    /// - At most k squarings and k multiplies after the exponent folds.
    ///
    /// # Failure Modes
    /// - None; every base and exponent is closed under the domain.
    pub fn pow(&self, exponent: u64) -> Self {
        let one = Gf2k { value: 1, ..*self };
        if self.value == 0 {
            return if exponent == 0 {
                one
            } else {
                Gf2k { value: 0, ..*self }
            };
        }
        let order = (1u64 << self.size) - 1;
        let mut e = exponent % order;
        if e == 0 {
            return one;
        }
        let mut base = *self;
        let mut acc = one;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            e >>= 1;
        }
        acc
    }

    /// Multiplicative inverse by the extended Euclidean algorithm over
    /// GF(2)[x].
    ///
    /// # Performance
    /// - O(k) division steps, each a shift-XOR cascade; no table lookups.
    ///
    /// # Failure Modes
    /// - `NotInvertible` when the element shares a factor with the
    ///   reduction polynomial; with an irreducible modulus that means the
    ///   element is zero.
    pub fn inv(&self) -> Result<Self, FieldError> {
        let (g, s, _) = pexteuc(self.value, self.modulus);
        if g != 1 {
            return Err(FieldError::NotInvertible);
        }
        Ok(Gf2k { value: s, ..*self })
    }

    /// Field division `self * rhs^-1`.
    pub fn checked_div(self, rhs: Self) -> Result<Self, FieldError> {
        self.assert_same_field(&rhs);
        Ok(self * rhs.inv()?)
    }
}

/// GF(2^k) addition is coefficient-wise XOR; no reduction needed.
#[allow(clippy::suspicious_arithmetic_impl)]
impl Add for Gf2k {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.assert_same_field(&rhs);
        Gf2k {
            value: self.value ^ rhs.value,
            ..self
        }
    }
}

impl AddAssign for Gf2k {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Subtraction coincides with addition in characteristic 2.
#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Gf2k {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl SubAssign for Gf2k {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Carry-less schoolbook product followed by modular reduction.
impl Mul for Gf2k {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.assert_same_field(&rhs);
        Gf2k {
            value: pmod(pmul(self.value, rhs.value), self.modulus),
            ..self
        }
    }
}

impl MulAssign for Gf2k {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Gf2k {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.value)
    }
}

/// Degree of a bit-encoded GF(2)[x] polynomial; -1 for the zero polynomial.
#[inline]
pub(crate) fn pdeg(a: u128) -> i32 {
    127 - a.leading_zeros() as i32
}

/// Carry-less product of two bit-encoded polynomials.
pub(crate) fn pmul(a: u64, b: u64) -> u128 {
    let b = b as u128;
    let mut a = a;
    let mut acc = 0u128;
    let mut shift = 0;
    while a != 0 {
        if a & 1 == 1 {
            acc ^= b << shift;
        }
        a >>= 1;
        shift += 1;
    }
    acc
}

/// Carry-less product of wide operands; the caller keeps the true degree
/// below 128 bits.
fn pmul_wide(a: u128, b: u128) -> u128 {
    let mut a = a;
    let mut acc = 0u128;
    let mut shift = 0;
    while a != 0 {
        if a & 1 == 1 {
            acc ^= b << shift;
        }
        a >>= 1;
        shift += 1;
    }
    acc
}

/// Quotient and remainder of bit-encoded polynomial division.
pub(crate) fn pdivmod(a: u128, b: u128) -> (u128, u128) {
    assert!(b != 0, "polynomial division by zero");
    let db = pdeg(b);
    let mut q = 0u128;
    let mut r = a;
    while pdeg(r) >= db {
        let shift = (pdeg(r) - db) as u32;
        q ^= 1u128 << shift;
        r ^= b << shift;
    }
    (q, r)
}

/// Remainder of `a` modulo `m`.
#[inline]
pub(crate) fn pmod(a: u128, m: u64) -> u64 {
    pdivmod(a, m as u128).1 as u64
}

/// Greatest common divisor of two bit-encoded polynomials.
pub(crate) fn pgcd(a: u64, b: u64) -> u64 {
    let (mut r0, mut r1) = (a as u128, b as u128);
    while r1 != 0 {
        let r = pdivmod(r0, r1).1;
        r0 = r1;
        r1 = r;
    }
    r0 as u64
}

/// Extended Euclid over GF(2)[x]: returns `(g, s, t)` with
/// `s*a ^ t*b = g` as carry-less products.
pub(crate) fn pexteuc(a: u64, b: u64) -> (u64, u64, u64) {
    let (mut r0, mut r1) = (a as u128, b as u128);
    let (mut s0, mut s1) = (1u128, 0u128);
    let (mut t0, mut t1) = (0u128, 1u128);
    while r1 != 0 {
        let (q, r) = pdivmod(r0, r1);
        r0 = r1;
        r1 = r;
        let s = s0 ^ pmul_wide(q, s1);
        s0 = s1;
        s1 = s;
        let t = t0 ^ pmul_wide(q, t1);
        t0 = t1;
        t1 = t;
    }
    (r0 as u64, s0 as u64, t0 as u64)
}
