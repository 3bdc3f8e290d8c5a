// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Record ID generation.

use ring::rand::{SecureRandom, SystemRandom};

/// IDs stay below 2^53 so they survive a round trip through JSON numbers.
const ID_MASK: u64 = (1 << 53) - 1;

/// Generate a random, non-zero record ID.
pub fn new_record_id(rng: &SystemRandom) -> anyhow::Result<u64> {
    loop {
        let mut bytes = [0u8; 8];
        rng.fill(&mut bytes)
            .map_err(|_| anyhow::anyhow!("System random source unavailable"))?;
        let id = u64::from_le_bytes(bytes) & ID_MASK;
        if id != 0 {
            return Ok(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_fit_json_safe_range() {
        let rng = SystemRandom::new();
        for _ in 0..100 {
            let id = new_record_id(&rng).unwrap();
            assert!(id > 0);
            assert!(id <= ID_MASK);
        }
    }
}
