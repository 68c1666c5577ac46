//! Dense polynomials over an abstract coefficient ring.
//!
//! A polynomial is a little-endian coefficient vector (index 0 holds the
//! constant term) in canonical form: trailing zeros are stripped and the zero
//! polynomial is exactly one zero coefficient, never an empty vector. The
//! coefficient type is anything implementing [`Ring`]; the protocol uses
//! GF(2^k) coefficients, and `ModInt` covers the integers-mod-m case.
//!
//! Ring parameters travel with the values, so the identities are built from
//! an existing element (`zero_like`, `one_like`) rather than from thin air;
//! a GF(2^k) zero is meaningless without its field.

extern crate alloc;
use alloc::{vec, vec::Vec};

use core::fmt;
use core::ops::{Add, Mul, Sub};

use crate::core::gf2k::Gf2k;
use crate::mpc::MathError;

/// Coefficient contract for [`Polynomial`].
pub trait Ring:
    Copy + PartialEq + fmt::Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    /// The additive identity carrying the same ring parameters as `self`.
    fn zero_like(&self) -> Self;

    /// The multiplicative identity carrying the same ring parameters as
    /// `self`.
    fn one_like(&self) -> Self;

    /// The multiplicative inverse, where one exists.
    fn invert(&self) -> Result<Self, MathError>;

    fn is_zero(&self) -> bool {
        *self == self.zero_like()
    }
}

impl Ring for Gf2k {
    fn zero_like(&self) -> Self {
        Gf2k::new(0, self.size(), self.modulus())
    }

    fn one_like(&self) -> Self {
        Gf2k::new(1, self.size(), self.modulus())
    }

    fn invert(&self) -> Result<Self, MathError> {
        self.inv().map_err(|_| MathError::NotInvertible)
    }

    fn is_zero(&self) -> bool {
        self.value() == 0
    }
}

/// The residue ring of integers modulo `m`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModInt {
    value: u64,
    modulus: u64,
}

impl ModInt {
    pub fn new(value: u64, modulus: u64) -> Self {
        assert!(modulus > 1, "modulus {modulus} too small");
        ModInt {
            value: value % modulus,
            modulus,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    fn assert_same_ring(&self, rhs: &Self) {
        assert!(
            self.modulus == rhs.modulus,
            "mixed moduli: {} vs {}",
            self.modulus,
            rhs.modulus
        );
    }
}

impl Add for ModInt {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.assert_same_ring(&rhs);
        let m = self.modulus as u128;
        ModInt {
            value: ((self.value as u128 + rhs.value as u128) % m) as u64,
            ..self
        }
    }
}

impl Sub for ModInt {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.assert_same_ring(&rhs);
        let m = self.modulus as u128;
        ModInt {
            value: ((self.value as u128 + m - rhs.value as u128) % m) as u64,
            ..self
        }
    }
}

impl Mul for ModInt {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.assert_same_ring(&rhs);
        let m = self.modulus as u128;
        ModInt {
            value: ((self.value as u128 * rhs.value as u128) % m) as u64,
            ..self
        }
    }
}

impl Ring for ModInt {
    fn zero_like(&self) -> Self {
        ModInt {
            value: 0,
            ..*self
        }
    }

    fn one_like(&self) -> Self {
        ModInt {
            value: 1 % self.modulus,
            ..*self
        }
    }

    fn invert(&self) -> Result<Self, MathError> {
        let (g, s) = iexteuc(self.value as i128, self.modulus as i128);
        if g != 1 {
            return Err(MathError::NotInvertible);
        }
        let m = self.modulus as i128;
        Ok(ModInt {
            value: (s.rem_euclid(m)) as u64,
            ..*self
        })
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }
}

/// Integer extended Euclid: returns `(gcd, s)` with `s*a = gcd (mod b)`.
fn iexteuc(a: i128, b: i128) -> (i128, i128) {
    let (mut r0, mut r1) = (a, b);
    let (mut s0, mut s1) = (1i128, 0i128);
    while r1 != 0 {
        let q = r0 / r1;
        let r = r0 - q * r1;
        r0 = r1;
        r1 = r;
        let s = s0 - q * s1;
        s0 = s1;
        s1 = s;
    }
    (r0, s0)
}

/// A dense polynomial with coefficients in `R`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<R: Ring> {
    coeffs: Vec<R>,
}

impl<R: Ring> Polynomial<R> {
    /// Builds a polynomial from little-endian coefficients, canonicalizing
    /// by stripping trailing zeros.
    ///
    /// At least one coefficient is required; the zero polynomial is `[0]`.
    pub fn new(coeffs: Vec<R>) -> Self {
        assert!(!coeffs.is_empty(), "a polynomial needs a coefficient");
        let mut coeffs = coeffs;
        while coeffs.len() > 1 && coeffs.last().map_or(false, |c| c.is_zero()) {
            coeffs.pop();
        }
        Polynomial { coeffs }
    }

    /// The zero polynomial in the same ring as `like`.
    pub fn zero(like: &R) -> Self {
        Polynomial {
            coeffs: vec![like.zero_like()],
        }
    }

    /// The degree-0 polynomial with value `c`.
    pub fn constant(c: R) -> Self {
        Polynomial { coeffs: vec![c] }
    }

    pub fn coeffs(&self) -> &[R] {
        &self.coeffs
    }

    /// Index of the leading coefficient. The zero polynomial reports 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    fn leading(&self) -> R {
        *self.coeffs.last().unwrap()
    }

    /// Evaluates at `x` by Horner's rule.
    pub fn eval(&self, x: R) -> R {
        let mut acc = self.leading();
        for &c in self.coeffs.iter().rev().skip(1) {
            acc = acc * x + c;
        }
        acc
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: R) -> Self {
        Polynomial::new(self.coeffs.iter().map(|&a| a * c).collect())
    }

    /// Divides every coefficient by the ring element `c`.
    pub fn scale_div(&self, c: R) -> Result<Self, MathError> {
        Ok(self.scale(c.invert()?))
    }

    /// Quotient and remainder of synthetic long division.
    ///
    /// Dividing by a degree-0 polynomial hands back `(self / b0, 0)`; the
    /// divisor must not be the zero polynomial.
    pub fn divmod(&self, rhs: &Self) -> Result<(Self, Self), MathError> {
        assert!(!rhs.is_zero(), "polynomial division by zero");
        let zero = self.coeffs[0].zero_like();
        let d = rhs.degree();
        if d == 0 {
            return Ok((self.scale_div(rhs.coeffs[0])?, Polynomial::zero(&zero)));
        }
        let lead_inv = rhs.leading().invert()?;
        let mut q = Polynomial::zero(&zero);
        let mut r = self.clone();
        while !r.is_zero() && r.degree() >= d {
            let shift = r.degree() - d;
            let mut step = vec![zero; shift + 1];
            step[shift] = r.leading() * lead_inv;
            let step = Polynomial::new(step);
            q = &q + &step;
            r = &r - &(&step * rhs);
        }
        Ok((q, r))
    }
}

impl<R: Ring> Add for &Polynomial<R> {
    type Output = Polynomial<R>;

    fn add(self, rhs: &Polynomial<R>) -> Polynomial<R> {
        let zero = self.coeffs[0].zero_like();
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coeffs.get(i).copied().unwrap_or(zero);
            let b = rhs.coeffs.get(i).copied().unwrap_or(zero);
            out.push(a + b);
        }
        Polynomial::new(out)
    }
}

impl<R: Ring> Sub for &Polynomial<R> {
    type Output = Polynomial<R>;

    fn sub(self, rhs: &Polynomial<R>) -> Polynomial<R> {
        let zero = self.coeffs[0].zero_like();
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coeffs.get(i).copied().unwrap_or(zero);
            let b = rhs.coeffs.get(i).copied().unwrap_or(zero);
            out.push(a - b);
        }
        Polynomial::new(out)
    }
}

impl<R: Ring> Mul for &Polynomial<R> {
    type Output = Polynomial<R>;

    fn mul(self, rhs: &Polynomial<R>) -> Polynomial<R> {
        let zero = self.coeffs[0].zero_like();
        let mut out = vec![zero; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                out[i + j] = out[i + j] + a * b;
            }
        }
        Polynomial::new(out)
    }
}

/// Remainder-sequence extended GCD.
///
/// Produces the triples `(r_i, s_i, t_i)` with `r_i = a*s_i + b*t_i`,
/// starting from `(a, 1, 0)` and `(b, 0, 1)` and dividing until the last
/// remainder has degree at most `stop` or vanishes. The full sequence is
/// returned; decoders pick the triple they need off the tail.
pub fn egcd<R: Ring>(
    a: &Polynomial<R>,
    b: &Polynomial<R>,
    stop: usize,
) -> Result<Vec<(Polynomial<R>, Polynomial<R>, Polynomial<R>)>, MathError> {
    let zero = Polynomial::zero(&a.coeffs()[0]);
    let one = Polynomial::constant(a.coeffs()[0].one_like());
    let mut seq = vec![(a.clone(), one.clone(), zero.clone()), (b.clone(), zero, one)];
    loop {
        let (r1, s1, t1) = seq[seq.len() - 1].clone();
        if r1.is_zero() || r1.degree() <= stop {
            break;
        }
        let (r0, s0, t0) = seq[seq.len() - 2].clone();
        let (q, r) = r0.divmod(&r1)?;
        let s = &s0 - &(&q * &s1);
        let t = &t0 - &(&q * &t1);
        seq.push((r, s, t));
    }
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(v: u64) -> Gf2k {
        Gf2k::new(v, 8, 0x11D)
    }

    fn gf_poly(coeffs: &[u64]) -> Polynomial<Gf2k> {
        Polynomial::new(coeffs.iter().map(|&v| fe(v)).collect())
    }

    fn zp(coeffs: &[u64]) -> Polynomial<ModInt> {
        Polynomial::new(coeffs.iter().map(|&v| ModInt::new(v, 97)).collect())
    }

    #[test]
    fn canonical_form() {
        let p = gf_poly(&[1, 2, 0, 0]);
        assert_eq!(p.degree(), 1);
        assert_eq!(p.coeffs().len(), 2);

        let z = gf_poly(&[0, 0, 0]);
        assert!(z.is_zero());
        assert_eq!(z.degree(), 0);
        assert_eq!(z.coeffs(), &[fe(0)]);
    }

    #[test]
    #[should_panic(expected = "needs a coefficient")]
    fn empty_coefficients_panic() {
        let _ = Polynomial::<Gf2k>::new(Vec::new());
    }

    #[test]
    fn horner_matches_naive() {
        let p = gf_poly(&[7, 3, 5, 1]);
        for x in [0u64, 1, 2, 0x53, 0xFF] {
            let x = fe(x);
            let mut naive = fe(0);
            let mut xi = fe(1);
            for &c in p.coeffs() {
                naive += c * xi;
                xi *= x;
            }
            assert_eq!(p.eval(x), naive);
        }
    }

    #[test]
    fn addition_pads_the_short_side() {
        let p = zp(&[1, 2]);
        let q = zp(&[5, 0, 7]);
        assert_eq!(&p + &q, zp(&[6, 2, 7]));
        assert_eq!(&q - &p, zp(&[4, 95, 7]));
        // adding the negation cancels down to the zero polynomial
        assert!((&p - &p).is_zero());
    }

    #[test]
    fn schoolbook_product() {
        // (x + 1)(x + 2) = x^2 + 3x + 2 mod 97
        assert_eq!(&zp(&[1, 1]) * &zp(&[2, 1]), zp(&[2, 3, 1]));
        // in characteristic 2: (x + 1)^2 = x^2 + 1
        assert_eq!(&gf_poly(&[1, 1]) * &gf_poly(&[1, 1]), gf_poly(&[1, 0, 1]));
    }

    #[test]
    fn divmod_reconstructs_dividend() {
        let cases: &[(&[u64], &[u64])] = &[
            (&[7, 3, 5, 1, 0xA6], &[2, 1]),
            (&[1, 0, 0, 0, 0, 1], &[3, 5, 7]),
            (&[0xFF, 0x11], &[9, 0, 0, 1]),
            (&[4], &[5]),
        ];
        for &(a, b) in cases {
            let (a, b) = (gf_poly(a), gf_poly(b));
            let (q, r) = a.divmod(&b).unwrap();
            assert!(r.is_zero() || r.degree() < b.degree());
            assert_eq!(&(&q * &b) + &r, a);
        }
    }

    #[test]
    fn divmod_by_constant_scales() {
        let p = zp(&[10, 20, 30]);
        let (q, r) = p.divmod(&zp(&[2])).unwrap();
        assert!(r.is_zero());
        assert_eq!(q, zp(&[5, 10, 15]));
    }

    #[test]
    fn modint_inverse() {
        for v in 1u64..97 {
            let inv = ModInt::new(v, 97).invert().unwrap();
            assert_eq!(ModInt::new(v, 97) * inv, ModInt::new(1, 97));
        }
        assert_eq!(ModInt::new(0, 97).invert(), Err(MathError::NotInvertible));
        // composite modulus: 6 shares a factor with 10
        assert_eq!(ModInt::new(6, 10).invert(), Err(MathError::NotInvertible));
        assert_eq!(
            ModInt::new(3, 10).invert().unwrap(),
            ModInt::new(7, 10)
        );
    }

    #[test]
    fn egcd_triples_satisfy_bezout() {
        let a = gf_poly(&[7, 0, 1, 0, 0, 1]);
        let b = gf_poly(&[3, 1, 0xC2, 1]);
        let seq = egcd(&a, &b, 0).unwrap();
        assert!(seq.len() >= 2);
        for (r, s, t) in &seq {
            let lhs = &(&a * s) + &(&b * t);
            assert_eq!(&lhs, r);
        }
        let last = &seq[seq.len() - 1].0;
        assert!(last.is_zero() || last.degree() == 0);
    }

    #[test]
    fn egcd_honors_the_stop_degree() {
        let a = gf_poly(&[1, 2, 3, 4, 5, 6, 1]);
        let b = gf_poly(&[9, 8, 7, 6, 1]);
        let seq = egcd(&a, &b, 2).unwrap();
        let last = &seq[seq.len() - 1].0;
        assert!(last.is_zero() || last.degree() <= 2);
        // the one before must still be above the stop line
        let prev = &seq[seq.len() - 2].0;
        assert!(prev.degree() > 2);
    }
}
