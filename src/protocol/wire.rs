//! Wire-format records exchanged between parties.
//!
//! Every field is a raw integer: values are `k`-bit, moduli `k+1`-bit. The
//! embedding owns transport and serializes big-endian; with the `serde`
//! feature the records also derive `Serialize`/`Deserialize`.

/// A published ElGamal public key, together with the field it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicKeyTriple {
    /// Irreducible reduction polynomial defining the field.
    pub modulus: u64,
    /// Generator of the multiplicative group.
    pub generator: u64,
    /// `generator^x` for the holder's secret `x`.
    pub public_key: u64,
}

/// An ElGamal ciphertext `(g^r, m * Y^r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ciphertext {
    pub c1: u64,
    pub c2: u64,
}
