// Copyright (C) 2020-2024 Andy Kurnia.

// Multisets of tiles as products of per-tile primes. Two racks hold the same
// tiles exactly when their products are equal, in any order.

pub struct PrimeSet {
    primes: Box<[u64]>,
}

impl PrimeSet {
    // one prime per tile, blank included.
    pub fn new(alphabet_len: u8) -> Self {
        let mut primes = Vec::with_capacity(alphabet_len as usize);
        let mut candidate = 2u64;
        while primes.len() < alphabet_len as usize {
            if primes
                .iter()
                .take_while(|&&p| p * p <= candidate)
                .all(|&p| candidate % p != 0)
            {
                primes.push(candidate);
            }
            candidate += 1;
        }
        Self {
            primes: primes.into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn prime(&self, tile: u8) -> u64 {
        self.primes[tile as usize]
    }

    // blank-designated letters count as blanks.
    #[inline(always)]
    pub fn product(&self, tiles: &[u8]) -> u64 {
        tiles.iter().fold(1u64, |acc, &tile| {
            acc * self.prime(if tile & 0x80 != 0 { 0 } else { tile })
        })
    }

    // products[mask] = product of tiles[i] for each bit i in mask.
    pub fn subset_products(&self, tiles: &[u8]) -> Box<[u64]> {
        let mut products = vec![1u64; 1 << tiles.len()];
        let mut b = 1;
        for &tile in tiles {
            let prime = self.prime(tile);
            for mask in b..(b << 1) {
                products[mask] = products[mask - b] * prime;
            }
            b <<= 1;
        }
        products.into_boxed_slice()
    }
}
