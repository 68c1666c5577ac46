//! Coin-flipping party driver.
//!
//! One [`CoinFlip`] value is one party in one run. The phases:
//!
//! 1. [`generate_keys`](CoinFlip::generate_keys) makes `n` independent
//!    ElGamal keypairs, each in its own freshly chosen field, and publishes
//!    the public triples. Peer `i` encrypts to this party under keypair `i`,
//!    so no two dealers share a channel.
//! 2. [`share`](CoinFlip::share) draws a random polynomial of degree exactly
//!    `t = n/2`, evaluates it at the points `t+1, ..., t+n`, and publishes
//!    the evaluations encrypted one per peer. The points `0, ..., t-1` stay
//!    unevaluated; they are where the joint randomness is read off later.
//! 3. [`reconstruct`](CoinFlip::reconstruct) consumes everything the parties
//!    published, now including revealed secret keys, verifies each reveal
//!    against the published public key, decrypts the share matrix,
//!    interpolates every dealer's polynomial, and sums the honest ones. The
//!    sum evaluated at `0, ..., t-1` is the public randomness.
//!
//! Reconstruction runs on revealed keys, so anyone holding the transcript
//! can replay it; a fresh `Fresh`-phase observer may call `reconstruct`
//! directly. Misbehaving parties are flagged in `warnings` and their dealt
//! polynomials dropped; the run itself never aborts over a bad peer.

extern crate alloc;
use alloc::{vec, vec::Vec};

use zeroize::{Zeroize, Zeroizing};

use crate::core::elgamal::ElGamal;
use crate::core::fieldgen::{find_generator, find_irreducible, randomize_generator};
use crate::core::gf2k::Gf2k;
use crate::core::moduli;
use crate::entropy::RandomSource;
use crate::mpc::interpolate::interpolate;
use crate::mpc::polynomial::Polynomial;
use crate::protocol::wire::{Ciphertext, PublicKeyTriple};
use crate::protocol::{Phase, ProtocolError, Warning};

/// Draws field parameters and an ElGamal keypair for one peer slot.
///
/// With `hardcode` set and a precomputed table available for `size`, the
/// reduction polynomial and base generator come from the table and the
/// generator is re-randomized to `g^s` for a random `s` coprime to the group
/// order. Otherwise both parameters are searched from scratch.
pub fn gen_key<R: RandomSource + ?Sized>(
    size: u32,
    rng: &mut R,
    hardcode: bool,
) -> (u64, Gf2k, ElGamal) {
    let (modulus, generator) = match moduli::table_for(size) {
        Some(table) if hardcode => {
            let (m, g) = table[rng.random_below(table.len() as u64) as usize];
            (m, randomize_generator(Gf2k::new(g, size, m), rng))
        }
        _ => {
            let m = find_irreducible(size, rng);
            let g = find_generator(size, m, rng);
            (m, Gf2k::new(g, size, m))
        }
    };
    let key = ElGamal::generate(generator, size, rng);
    (modulus, generator, key)
}

/// One party's state across a single protocol run.
///
/// Single-use: after `reconstruct` the party is spent. `n` is the party
/// count, `t = n/2` the corruption bound, `size` the field width `k`; the
/// run emits `t * ceil(k/8)` bytes of randomness.
pub struct CoinFlip<R: RandomSource> {
    n: usize,
    t: usize,
    size: u32,
    rng: R,
    phase: Phase,
    public_keys: Vec<PublicKeyTriple>,
    private_keys: Vec<u64>,
    poly_mod: Option<u64>,
    gf_poly: Option<Polynomial<Gf2k>>,
    deal: Vec<Gf2k>,
    enc_deal: Vec<Ciphertext>,
    summed_poly: Option<Polynomial<Gf2k>>,
    warnings: Vec<Option<Warning>>,
}

impl<R: RandomSource> CoinFlip<R> {
    pub fn new(n: usize, size: u32, rng: R) -> Self {
        assert!(n >= 2, "a coin flip needs at least two parties");
        assert!((2..=63).contains(&size), "field width {size} out of range");
        CoinFlip {
            n,
            t: n / 2,
            size,
            rng,
            phase: Phase::Fresh,
            public_keys: Vec::new(),
            private_keys: Vec::new(),
            poly_mod: None,
            gf_poly: None,
            deal: Vec::new(),
            enc_deal: Vec::new(),
            summed_poly: None,
            warnings: vec![None; n],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// The corruption bound `t = n/2`.
    pub fn threshold(&self) -> usize {
        self.t
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Published key triples, one per peer; empty before key generation.
    pub fn public_keys(&self) -> &[PublicKeyTriple] {
        &self.public_keys
    }

    /// Secret exponents matching `public_keys`, disclosed at reconstruction
    /// time by protocol design.
    pub fn private_keys(&self) -> &[u64] {
        &self.private_keys
    }

    /// The sharing polynomial this party dealt, once `share` has run.
    pub fn sharing_polynomial(&self) -> Option<&Polynomial<Gf2k>> {
        self.gf_poly.as_ref()
    }

    /// The field modulus the sharing polynomial was drawn over.
    pub fn poly_mod(&self) -> Option<u64> {
        self.poly_mod
    }

    /// Sum of the honest dealers' polynomials, once `reconstruct` has run.
    pub fn summed_poly(&self) -> Option<&Polynomial<Gf2k>> {
        self.summed_poly.as_ref()
    }

    /// Per-dealer verdicts from reconstruction.
    pub fn warnings(&self) -> &[Option<Warning>] {
        &self.warnings
    }

    /// Generates and publishes `n` ElGamal keypairs, one per peer, each over
    /// its own field.
    pub fn generate_keys(&mut self, hardcode: bool) -> Result<&[PublicKeyTriple], ProtocolError> {
        if self.phase != Phase::Fresh {
            return Err(ProtocolError::InvalidState);
        }
        for _ in 0..self.n {
            let (modulus, generator, key) = gen_key(self.size, &mut self.rng, hardcode);
            self.public_keys.push(PublicKeyTriple {
                modulus,
                generator: generator.value(),
                public_key: key.public_key().value(),
            });
            self.private_keys
                .push(key.secret_key().expect("generated key holds its secret"));
        }
        self.phase = Phase::Keyed;
        log::debug!("generated {} keypairs of width {}", self.n, self.size);
        Ok(&self.public_keys)
    }

    /// Deals this party's sharing polynomial to the peers.
    ///
    /// `shared_public_keys[i]` is the key peer `i` published for this party;
    /// the share destined for peer `i` is encrypted under it. When
    /// `poly_mod` is absent a fresh irreducible polynomial is drawn. Returns
    /// the published ciphertext vector.
    pub fn share(
        &mut self,
        shared_public_keys: &[PublicKeyTriple],
        poly_mod: Option<u64>,
    ) -> Result<Vec<Ciphertext>, ProtocolError> {
        if self.phase != Phase::Keyed {
            return Err(ProtocolError::InvalidState);
        }
        if shared_public_keys.len() != self.n {
            return Err(ProtocolError::DimensionMismatch);
        }
        let poly_mod = poly_mod.unwrap_or_else(|| find_irreducible(self.size, &mut self.rng));

        // Uniform coefficients, except the leading one is redrawn until
        // nonzero so the degree is exactly t.
        let mut raw = Zeroizing::new(vec![0u64; self.t + 1]);
        for c in raw.iter_mut() {
            *c = self.rng.random_below(1u64 << self.size);
        }
        while raw[self.t] == 0 {
            raw[self.t] = self.rng.random_below(1u64 << self.size);
        }
        let poly = Polynomial::new(
            raw.iter()
                .map(|&v| Gf2k::new(v, self.size, poly_mod))
                .collect(),
        );
        self.deal_polynomial(shared_public_keys, poly_mod, poly)
    }

    /// Test hook: deal a chosen polynomial instead of drawing one.
    #[cfg(test)]
    pub(crate) fn share_with_polynomial(
        &mut self,
        shared_public_keys: &[PublicKeyTriple],
        poly_mod: u64,
        poly: Polynomial<Gf2k>,
    ) -> Result<Vec<Ciphertext>, ProtocolError> {
        if self.phase != Phase::Keyed {
            return Err(ProtocolError::InvalidState);
        }
        if shared_public_keys.len() != self.n {
            return Err(ProtocolError::DimensionMismatch);
        }
        self.deal_polynomial(shared_public_keys, poly_mod, poly)
    }

    fn deal_polynomial(
        &mut self,
        shared_public_keys: &[PublicKeyTriple],
        poly_mod: u64,
        poly: Polynomial<Gf2k>,
    ) -> Result<Vec<Ciphertext>, ProtocolError> {
        // Share i belongs to peer i and sits at x = i + t + 1; evaluation
        // never touches 0..t-1, where the aggregate is read.
        self.deal = (0..self.n)
            .map(|i| poly.eval(Gf2k::new((i + self.t + 1) as u64, self.size, poly_mod)))
            .collect();

        self.enc_deal = Vec::with_capacity(self.n);
        for (i, pk) in shared_public_keys.iter().enumerate() {
            let generator = Gf2k::new(pk.generator, self.size, pk.modulus);
            let recipient = ElGamal::from_public(
                generator,
                self.size,
                Gf2k::new(pk.public_key, self.size, pk.modulus),
            );
            // the share value moves into the recipient's field for transport
            let message = Gf2k::new(self.deal[i].value(), self.size, pk.modulus);
            let (c1, c2) = recipient.encrypt(message, &mut self.rng);
            self.enc_deal.push(Ciphertext {
                c1: c1.value(),
                c2: c2.value(),
            });
        }

        self.poly_mod = Some(poly_mod);
        self.gf_poly = Some(poly);
        self.phase = Phase::Shared;
        log::debug!("dealt {} encrypted shares", self.n);
        Ok(self.enc_deal.clone())
    }

    /// Decrypts the collected share matrix, flags misbehaving dealers, and
    /// extracts the public randomness.
    ///
    /// Rows are indexed by party: `enc_shares[d]` is dealer `d`'s published
    /// ciphertext vector, `shared_public_keys[p]` / `shared_secret_keys[p]`
    /// are party `p`'s published and revealed key vectors. A `None` row is a
    /// peer that withheld data. Any party flagged `Aborted` or `Malicious`
    /// contributes nothing to the output.
    ///
    /// Callable from `Shared` (a participant) or `Fresh` (an outside
    /// observer replaying the transcript).
    pub fn reconstruct(
        &mut self,
        enc_shares: &[Option<Vec<Ciphertext>>],
        shared_public_keys: &[Option<Vec<PublicKeyTriple>>],
        shared_secret_keys: &[Option<Vec<u64>>],
        poly_mod: u64,
    ) -> Result<Vec<u8>, ProtocolError> {
        if !matches!(self.phase, Phase::Fresh | Phase::Shared) {
            return Err(ProtocolError::InvalidState);
        }
        if enc_shares.len() != self.n
            || shared_public_keys.len() != self.n
            || shared_secret_keys.len() != self.n
        {
            return Err(ProtocolError::DimensionMismatch);
        }
        for row in enc_shares.iter().flatten() {
            if row.len() != self.n {
                return Err(ProtocolError::DimensionMismatch);
            }
        }
        for row in shared_public_keys.iter().flatten() {
            if row.len() != self.n {
                return Err(ProtocolError::DimensionMismatch);
            }
        }
        for row in shared_secret_keys.iter().flatten() {
            if row.len() != self.n {
                return Err(ProtocolError::DimensionMismatch);
            }
        }

        let mut warnings: Vec<Option<Warning>> = vec![None; self.n];
        for (d, row) in enc_shares.iter().enumerate() {
            if row.is_none() {
                log::warn!("dealer {d} published no shares");
                warnings[d] = Some(Warning::Aborted);
            }
        }

        // Decrypt the matrix one recipient at a time; points gather per
        // dealer. x-coordinates live in the sharing field.
        let mut points: Vec<Vec<(Gf2k, Gf2k)>> = vec![Vec::new(); self.n];
        for p in 0..self.n {
            let (Some(pk_row), Some(sk_row)) = (
                shared_public_keys[p].as_ref(),
                shared_secret_keys[p].as_ref(),
            ) else {
                log::warn!("party {p} withheld its key reveal");
                warnings[p] = Some(Warning::Aborted);
                continue;
            };
            for d in 0..self.n {
                let Some(enc_row) = enc_shares[d].as_ref() else {
                    continue;
                };
                let pk = pk_row[d];
                // a published modulus must be a degree-k polynomial, or the
                // whole triple is junk
                if pk.modulus >> self.size != 1 {
                    log::warn!("party {p} published a malformed modulus for dealer {d}");
                    warnings[p] = Some(Warning::Malicious);
                    continue;
                }
                let generator = Gf2k::new(pk.generator, self.size, pk.modulus);
                let key = ElGamal::from_secret(generator, self.size, sk_row[d]);
                // unique-witness check: the reveal must reproduce the
                // published public key
                if key.public_key().value() != pk.public_key {
                    log::warn!("party {p} revealed a mismatched secret key for dealer {d}");
                    warnings[p] = Some(Warning::Malicious);
                    continue;
                }
                let ct = enc_row[p];
                let c1 = Gf2k::new(ct.c1, self.size, pk.modulus);
                let c2 = Gf2k::new(ct.c2, self.size, pk.modulus);
                let share = match key.decrypt((c1, c2)) {
                    Ok(m) => m,
                    Err(_) => {
                        log::warn!("dealer {d} sent an undecryptable share to party {p}");
                        warnings[d] = Some(Warning::Malicious);
                        continue;
                    }
                };
                let x = Gf2k::new((p + self.t + 1) as u64, self.size, poly_mod);
                let y = Gf2k::new(share.value(), self.size, poly_mod);
                points[d].push((x, y));
            }
        }

        // Interpolate per dealer; anything over degree t is an inflation
        // attempt and the dealer is dropped outright.
        let mut summed = Polynomial::zero(&Gf2k::new(0, self.size, poly_mod));
        for (d, dealer_points) in points.iter().enumerate() {
            if warnings[d].is_some() {
                continue;
            }
            if dealer_points.is_empty() {
                warnings[d] = Some(Warning::Aborted);
                continue;
            }
            let poly = match interpolate(dealer_points) {
                Ok(poly) => poly,
                Err(_) => {
                    log::warn!("dealer {d}'s shares do not interpolate");
                    warnings[d] = Some(Warning::Malicious);
                    continue;
                }
            };
            if poly.degree() > self.t {
                log::warn!(
                    "dealer {d} dealt degree {} against the bound {}",
                    poly.degree(),
                    self.t
                );
                warnings[d] = Some(Warning::Malicious);
                continue;
            }
            summed = &summed + &poly;
        }

        // Read the aggregate at 0..t-1, big-endian, ceil(k/8) bytes each.
        let width = ((self.size + 7) / 8) as usize;
        let mut out = Vec::with_capacity(self.t * width);
        for i in 0..self.t {
            let v = summed
                .eval(Gf2k::new(i as u64, self.size, poly_mod))
                .value();
            out.extend_from_slice(&v.to_be_bytes()[8 - width..]);
        }

        self.summed_poly = Some(summed);
        self.warnings = warnings;
        self.phase = Phase::Reconstructed;
        Ok(out)
    }
}

impl<R: RandomSource> Drop for CoinFlip<R> {
    fn drop(&mut self) {
        self.private_keys.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::RngSource;
    use rand_core::RngCore;

    /// splitmix64; deterministic and seedable from a bare integer.
    struct TestRng(u64);

    impl RngCore for TestRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = self.0;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            z ^ (z >> 31)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let word = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn rng(seed: u64) -> RngSource<TestRng> {
        RngSource(TestRng(seed))
    }

    /// Everything the parties published, keyed the way `reconstruct` wants.
    struct Transcript {
        enc_shares: Vec<Option<Vec<Ciphertext>>>,
        public_keys: Vec<Option<Vec<PublicKeyTriple>>>,
        secret_keys: Vec<Option<Vec<u64>>>,
    }

    type Party = CoinFlip<RngSource<TestRng>>;

    fn keyed_parties(n: usize, size: u32, seed: u64, hardcode: bool) -> Vec<Party> {
        let mut parties: Vec<Party> = (0..n)
            .map(|i| CoinFlip::new(n, size, rng(seed + 1 + i as u64)))
            .collect();
        for party in parties.iter_mut() {
            party.generate_keys(hardcode).unwrap();
        }
        parties
    }

    /// Keys peer `i` published for dealer `d`, across all `i`.
    fn targets_for(parties: &[Party], d: usize) -> Vec<PublicKeyTriple> {
        parties.iter().map(|p| p.public_keys()[d]).collect()
    }

    fn collect_transcript(parties: &[Party], enc: Vec<Option<Vec<Ciphertext>>>) -> Transcript {
        Transcript {
            enc_shares: enc,
            public_keys: parties
                .iter()
                .map(|p| Some(p.public_keys().to_vec()))
                .collect(),
            secret_keys: parties
                .iter()
                .map(|p| Some(p.private_keys().to_vec()))
                .collect(),
        }
    }

    fn run_protocol(n: usize, size: u32, seed: u64, hardcode: bool) -> (Vec<Party>, Transcript, u64) {
        let mut parties = keyed_parties(n, size, seed, hardcode);
        let poly_mod = find_irreducible(size, &mut rng(seed));
        let mut enc = Vec::with_capacity(n);
        for d in 0..n {
            let targets = targets_for(&parties, d);
            enc.push(Some(parties[d].share(&targets, Some(poly_mod)).unwrap()));
        }
        let transcript = collect_transcript(&parties, enc);
        (parties, transcript, poly_mod)
    }

    fn reconstruct_as_observer(
        n: usize,
        size: u32,
        transcript: &Transcript,
        poly_mod: u64,
    ) -> (Party, Vec<u8>) {
        let mut observer = CoinFlip::new(n, size, rng(0xB0B));
        let out = observer
            .reconstruct(
                &transcript.enc_shares,
                &transcript.public_keys,
                &transcript.secret_keys,
                poly_mod,
            )
            .unwrap();
        (observer, out)
    }

    #[test]
    fn honest_four_party_flip() {
        let (parties, transcript, poly_mod) = run_protocol(4, 8, 0, false);
        let (observer, out) = reconstruct_as_observer(4, 8, &transcript, poly_mod);

        assert!(observer.warnings().iter().all(|w| w.is_none()));
        // t * ceil(k/8) = 2 * 1
        assert_eq!(out.len(), 2);

        // the aggregate equals the sum of what the dealers actually drew
        let mut expected = Polynomial::zero(&Gf2k::new(0, 8, poly_mod));
        for party in &parties {
            expected = &expected + party.sharing_polynomial().unwrap();
        }
        assert_eq!(observer.summed_poly().unwrap(), &expected);
        for (i, chunk) in out.iter().enumerate() {
            let v = expected.eval(Gf2k::new(i as u64, 8, poly_mod)).value();
            assert_eq!(*chunk as u64, v);
        }
    }

    #[test]
    fn same_seed_same_bytes() {
        let (_, transcript_a, poly_mod_a) = run_protocol(4, 8, 0, false);
        let (_, out_a) = reconstruct_as_observer(4, 8, &transcript_a, poly_mod_a);

        let (_, transcript_b, poly_mod_b) = run_protocol(4, 8, 0, false);
        let (_, out_b) = reconstruct_as_observer(4, 8, &transcript_b, poly_mod_b);

        assert_eq!(poly_mod_a, poly_mod_b);
        assert_eq!(hex::encode(&out_a), hex::encode(&out_b));

        // a different seed moves the output
        let (_, transcript_c, poly_mod_c) = run_protocol(4, 8, 7, false);
        let (_, out_c) = reconstruct_as_observer(4, 8, &transcript_c, poly_mod_c);
        assert_ne!((poly_mod_a, out_a), (poly_mod_c, out_c));
    }

    #[test]
    fn dealer_order_does_not_move_the_output() {
        let n = 5;
        let (_, transcript, poly_mod) = run_protocol(n, 8, 3, false);
        let (_, out) = reconstruct_as_observer(n, 8, &transcript, poly_mod);

        // relabel dealers by rotation: dealer d takes over dealer (d+1)'s
        // material, and every per-dealer inner vector rotates to match
        let rot = |d: usize| (d + 1) % n;
        let rotated = Transcript {
            enc_shares: (0..n)
                .map(|d| transcript.enc_shares[rot(d)].clone())
                .collect(),
            public_keys: transcript
                .public_keys
                .iter()
                .map(|row| {
                    row.as_ref()
                        .map(|keys| (0..n).map(|d| keys[rot(d)]).collect())
                })
                .collect(),
            secret_keys: transcript
                .secret_keys
                .iter()
                .map(|row| {
                    row.as_ref()
                        .map(|keys| (0..n).map(|d| keys[rot(d)]).collect())
                })
                .collect(),
        };
        let (_, out_rotated) = reconstruct_as_observer(n, 8, &rotated, poly_mod);
        assert_eq!(out, out_rotated);
    }

    #[test]
    fn degree_inflating_dealer_is_flagged() {
        let n = 8;
        let size = 8;
        let mut parties = keyed_parties(n, size, 11, false);
        let poly_mod = find_irreducible(size, &mut rng(11));
        let t = parties[0].threshold();

        let mut enc = Vec::with_capacity(n);
        for d in 0..n {
            let targets = targets_for(&parties, d);
            if d == 0 {
                // one degree too many
                let coeffs = (1..=t as u64 + 2)
                    .map(|v| Gf2k::new(v, size, poly_mod))
                    .collect();
                let poly = Polynomial::new(coeffs);
                assert_eq!(poly.degree(), t + 1);
                enc.push(Some(
                    parties[d]
                        .share_with_polynomial(&targets, poly_mod, poly)
                        .unwrap(),
                ));
            } else {
                enc.push(Some(parties[d].share(&targets, Some(poly_mod)).unwrap()));
            }
        }
        let transcript = collect_transcript(&parties, enc);
        let (observer, out) = reconstruct_as_observer(n, size, &transcript, poly_mod);

        assert_eq!(observer.warnings()[0], Some(Warning::Malicious));
        assert!(observer.warnings()[1..].iter().all(|w| w.is_none()));

        // the honest parties alone fix the output: dropping dealer 0's row
        // entirely must not change a byte
        let mut without_dealer0 = transcript;
        without_dealer0.enc_shares[0] = None;
        let (observer2, out2) = reconstruct_as_observer(n, size, &without_dealer0, poly_mod);
        assert_eq!(observer2.warnings()[0], Some(Warning::Aborted));
        assert_eq!(out, out2);
    }

    #[test]
    fn aborting_party_is_flagged() {
        let n = 6;
        let size = 16;
        let (_, mut transcript, poly_mod) = run_protocol(n, size, 42, true);
        transcript.secret_keys[2] = None;

        let (observer, out) = reconstruct_as_observer(n, size, &transcript, poly_mod);
        assert_eq!(observer.warnings()[2], Some(Warning::Aborted));
        for (d, w) in observer.warnings().iter().enumerate() {
            if d != 2 {
                assert!(w.is_none(), "party {d} wrongly flagged");
            }
        }
        // t * ceil(k/8) = 3 * 2
        assert_eq!(out.len(), 6);

        // deterministic under the seed
        let (_, mut transcript_b, poly_mod_b) = run_protocol(n, size, 42, true);
        transcript_b.secret_keys[2] = None;
        let (_, out_b) = reconstruct_as_observer(n, size, &transcript_b, poly_mod_b);
        assert_eq!(poly_mod, poly_mod_b);
        assert_eq!(out, out_b);
    }

    #[test]
    fn forged_key_reveal_is_malicious() {
        let n = 4;
        let (_, mut transcript, poly_mod) = run_protocol(n, 8, 5, false);
        // party 1 reveals a wrong exponent for dealer 2
        let keys = transcript.secret_keys[1].as_mut().unwrap();
        keys[2] ^= 1;

        let (observer, _) = reconstruct_as_observer(n, 8, &transcript, poly_mod);
        assert_eq!(observer.warnings()[1], Some(Warning::Malicious));
    }

    #[test]
    fn malformed_modulus_is_malicious() {
        let n = 4;
        let (_, mut transcript, poly_mod) = run_protocol(n, 8, 6, false);
        // party 3 publishes a modulus of the wrong degree
        transcript.public_keys[3].as_mut().unwrap()[0].modulus = 0x1234_5678;

        let (observer, _) = reconstruct_as_observer(n, 8, &transcript, poly_mod);
        assert_eq!(observer.warnings()[3], Some(Warning::Malicious));
    }

    #[test]
    fn phases_are_strictly_linear() {
        let mut party: Party = CoinFlip::new(4, 8, rng(1));
        assert_eq!(party.phase(), Phase::Fresh);

        // share before keys
        assert_eq!(
            party.share(&[], None).unwrap_err(),
            ProtocolError::InvalidState
        );

        party.generate_keys(true).unwrap();
        assert_eq!(party.phase(), Phase::Keyed);
        assert_eq!(
            party.generate_keys(true).unwrap_err(),
            ProtocolError::InvalidState
        );

        // a keyed party has not dealt; it may not reconstruct
        assert_eq!(
            party
                .reconstruct(&[], &[], &[], 0x11D)
                .unwrap_err(),
            ProtocolError::InvalidState
        );
    }

    #[test]
    fn dimension_mismatches_are_surfaced() {
        let n = 4;
        let (_parties, transcript, poly_mod) = run_protocol(n, 8, 2, true);

        // short outer vectors
        let mut observer: Party = CoinFlip::new(n, 8, rng(9));
        assert_eq!(
            observer
                .reconstruct(
                    &transcript.enc_shares[..n - 1],
                    &transcript.public_keys,
                    &transcript.secret_keys,
                    poly_mod,
                )
                .unwrap_err(),
            ProtocolError::DimensionMismatch
        );

        // short inner row
        let mut broken = transcript.enc_shares.clone();
        broken[1].as_mut().unwrap().pop();
        assert_eq!(
            observer
                .reconstruct(
                    &broken,
                    &transcript.public_keys,
                    &transcript.secret_keys,
                    poly_mod,
                )
                .unwrap_err(),
            ProtocolError::DimensionMismatch
        );

        // share with a short key vector
        let mut late: Party = CoinFlip::new(n, 8, rng(10));
        late.generate_keys(true).unwrap();
        assert_eq!(
            late.share(&transcript.public_keys[0].as_ref().unwrap()[..2], None)
                .unwrap_err(),
            ProtocolError::DimensionMismatch
        );
    }

    #[test]
    fn hardcoded_parameters_come_from_the_table() {
        let mut source = rng(21);
        let (modulus, generator, _) = gen_key(8, &mut source, true);
        assert!(moduli::MODULI_8.iter().any(|&(m, _)| m == modulus));
        // the randomized generator still spans the whole group
        let one = Gf2k::new(1, 8, modulus);
        assert_eq!(generator.pow(255), one);
        for q in [3u64, 5, 17] {
            assert_ne!(generator.pow(255 / q), one);
        }
    }
}
