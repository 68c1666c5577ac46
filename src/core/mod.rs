//! Field arithmetic layer.
//!
//! Everything above this module computes in GF(2^k): the element type itself
//! (`gf2k`), the search for field parameters (`fieldgen`), the precomputed
//! parameter tables (`moduli`), and the ElGamal cipher operating in the
//! field's multiplicative group (`elgamal`).

pub mod elgamal;
pub mod fieldgen;
pub mod gf2k;
pub mod moduli;

/// Errors for GF(2^k) arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The element shares a nontrivial factor with the reduction polynomial
    /// and has no multiplicative inverse. Zero always lands here.
    NotInvertible,
}

/// Errors for the ElGamal cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// Decryption was requested on a public-key-only handle.
    NoSecretKey,
    /// The ciphertext's ephemeral key is not a group element.
    DegenerateCiphertext,
}
