//! ElGamal encryption in the multiplicative group of GF(2^k).
//!
//! The cipher works in the cyclic group generated by `g` in GF(2^k)*, of
//! order 2^k - 1. A keypair is `(Y, x)` with `Y = g^x`; a ciphertext is the
//! pair `(g^r, m * Y^r)` for an ephemeral `r`. Nothing here is constant-time;
//! the construction targets public verifiability, not side-channel hygiene.
//!
//! Plaintexts are field elements. A zero plaintext encrypts to a zero second
//! component and back again, but it carries no mask, so callers keep their
//! messages nonzero.

extern crate alloc;

use core::fmt;

use zeroize::Zeroize;

use crate::core::gf2k::Gf2k;
use crate::core::CipherError;
use crate::entropy::RandomSource;

/// One ElGamal key, usable for encryption always and for decryption when the
/// secret exponent is present.
pub struct ElGamal {
    size: u32,
    generator: Gf2k,
    public_key: Gf2k,
    secret_key: Option<u64>,
}

impl ElGamal {
    /// Generates a fresh keypair over the group spanned by `generator`.
    pub fn generate<R: RandomSource + ?Sized>(generator: Gf2k, size: u32, rng: &mut R) -> Self {
        let secret = rng.random_below(1u64 << size);
        Self::from_secret(generator, size, secret)
    }

    /// Rebuilds a full keypair from a known secret exponent.
    ///
    /// The public key is rederived as `g^x`, which is what makes revealed
    /// secret keys checkable against previously published public keys.
    pub fn from_secret(generator: Gf2k, size: u32, secret: u64) -> Self {
        let public_key = generator.pow(secret);
        ElGamal {
            size,
            generator,
            public_key,
            secret_key: Some(secret),
        }
    }

    /// Wraps a peer's published key for encryption only.
    pub fn from_public(generator: Gf2k, size: u32, public_key: Gf2k) -> Self {
        ElGamal {
            size,
            generator,
            public_key,
            secret_key: None,
        }
    }

    pub fn public_key(&self) -> Gf2k {
        self.public_key
    }

    pub fn secret_key(&self) -> Option<u64> {
        self.secret_key
    }

    /// Encrypts a field element under this key.
    ///
    /// The message must live in the same field as the key.
    pub fn encrypt<R: RandomSource + ?Sized>(&self, message: Gf2k, rng: &mut R) -> (Gf2k, Gf2k) {
        let r = rng.random_below(1u64 << self.size);
        let c1 = self.generator.pow(r);
        let c2 = message * self.public_key.pow(r);
        (c1, c2)
    }

    /// Recovers the message as `c2 / c1^x`.
    pub fn decrypt(&self, ciphertext: (Gf2k, Gf2k)) -> Result<Gf2k, CipherError> {
        let secret = self.secret_key.ok_or(CipherError::NoSecretKey)?;
        let shared = ciphertext.0.pow(secret);
        ciphertext
            .1
            .checked_div(shared)
            .map_err(|_| CipherError::DegenerateCiphertext)
    }
}

impl fmt::Debug for ElGamal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElGamal")
            .field("size", &self.size)
            .field("generator", &self.generator)
            .field("public_key", &self.public_key)
            .field("secret_key", &self.secret_key.map(|_| "***SENSITIVE***"))
            .finish()
    }
}

impl Drop for ElGamal {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out a scripted value per draw, then falls back to counting.
    struct FixedSource {
        values: &'static [u64],
        next: usize,
    }

    impl FixedSource {
        fn new(values: &'static [u64]) -> Self {
            FixedSource { values, next: 0 }
        }
    }

    impl RandomSource for FixedSource {
        fn random_below(&mut self, upper: u64) -> u64 {
            let v = self.values.get(self.next).copied().unwrap_or(self.next as u64);
            self.next += 1;
            v % upper
        }
    }

    const MOD32: u64 = 0x199740c05;
    const GEN32: u64 = 0xdd9345ba;

    #[test]
    fn wide_field_round_trip() {
        let g = Gf2k::new(GEN32, 32, MOD32);
        let key = ElGamal::from_secret(g, 32, 0x12345678);
        let m = Gf2k::new(0xDEADBEEF, 32, MOD32);

        let mut rng = FixedSource::new(&[0xCAFEBABE]);
        let (c1, c2) = key.encrypt(m, &mut rng);

        assert_eq!(c1, g.pow(0xCAFEBABE));
        assert_eq!(c2, m * key.public_key().pow(0xCAFEBABE));
        assert_eq!(key.decrypt((c1, c2)).unwrap(), m);
    }

    #[test]
    fn round_trip_sweep() {
        let g = Gf2k::new(0x2c, 8, 0x11B);
        let mut rng = FixedSource::new(&[0x5A]);
        let key = ElGamal::generate(g, 8, &mut rng);
        for v in 1u64..=255 {
            let m = Gf2k::new(v, 8, 0x11B);
            let ct = key.encrypt(m, &mut rng);
            assert_eq!(key.decrypt(ct).unwrap(), m, "message {v:#x}");
        }
    }

    #[test]
    fn public_handle_cannot_decrypt() {
        let g = Gf2k::new(GEN32, 32, MOD32);
        let key = ElGamal::from_secret(g, 32, 0x1111);
        let receiver = ElGamal::from_public(g, 32, key.public_key());

        let mut rng = FixedSource::new(&[]);
        let ct = receiver.encrypt(Gf2k::new(0xBEEF, 32, MOD32), &mut rng);
        assert_eq!(receiver.decrypt(ct), Err(CipherError::NoSecretKey));
        assert_eq!(key.decrypt(ct).unwrap(), Gf2k::new(0xBEEF, 32, MOD32));
    }

    #[test]
    fn rederived_key_matches_generated() {
        let g = Gf2k::new(GEN32, 32, MOD32);
        let mut rng = FixedSource::new(&[0x5eed]);
        let key = ElGamal::generate(g, 32, &mut rng);
        let again = ElGamal::from_secret(g, 32, key.secret_key().unwrap());
        assert_eq!(again.public_key(), key.public_key());
    }

    #[test]
    fn zero_ephemeral_key_is_degenerate() {
        let g = Gf2k::new(GEN32, 32, MOD32);
        let key = ElGamal::from_secret(g, 32, 0x42);
        let zero = Gf2k::new(0, 32, MOD32);
        assert_eq!(
            key.decrypt((zero, Gf2k::new(1, 32, MOD32))),
            Err(CipherError::DegenerateCiphertext)
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let g = Gf2k::new(GEN32, 32, MOD32);
        let key = ElGamal::from_secret(g, 32, 0x5eC2e7);
        let rendered = alloc::format!("{key:?}");
        assert!(rendered.contains("***SENSITIVE***"));
        assert!(!rendered.contains("5ec2e7"));
    }
}
