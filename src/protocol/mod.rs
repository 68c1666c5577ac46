//! Coin-flipping protocol layer.
//!
//! A run produces a public random bitstring that no coalition of at most
//! half the parties can bias or predict. Each party walks the same three
//! phases: publish ElGamal keys, deal an encrypted Shamir sharing of a
//! random polynomial, then jointly decrypt and sum the honest dealers'
//! polynomials. Message transport between parties is the embedding's job;
//! this layer consumes collected vectors and matrices.

pub mod party;
pub mod wire;

/// Errors surfaced to the protocol embedding.
///
/// These mark caller bugs, not peer misbehavior; misbehaving peers end up in
/// the per-dealer warning vector instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The operation does not match the party's current phase.
    InvalidState,
    /// A supplied vector or matrix row has the wrong length.
    DimensionMismatch,
}

/// Per-dealer verdict recorded during reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// The dealer withheld material the reconstruction needed.
    Aborted,
    /// The dealer published a key reveal or a sharing that fails
    /// verification.
    Malicious,
}

/// Lifecycle of one protocol run; transitions are strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no keys yet.
    Fresh,
    /// Keypairs generated and published.
    Keyed,
    /// Shares dealt and published.
    Shared,
    /// Randomness extracted; the party is spent.
    Reconstructed,
}
