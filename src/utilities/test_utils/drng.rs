//! A deterministic random number generator seeded from a label, used to make
//! tests and benchmarks reproducible. It is NOT a replacement for a system
//! randomness source.

use rand_core::{CryptoRng, RngCore, impls};
use sha3::{
    Shake256, Shake256Reader,
    digest::{ExtendableOutput, Update, XofReader},
};

/// SHAKE256 keyed with a seed, read as an endless byte stream.
pub struct DRNG {
    reader: Shake256Reader,
}

impl DRNG {
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut shake = Shake256::default();
        shake.update(seed);
        Self {
            reader: shake.finalize_xof(),
        }
    }
}

impl RngCore for DRNG {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.reader.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for DRNG {}
