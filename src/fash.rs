// Copyright (C) 2020-2024 Andy Kurnia.

// Fast insecure non-cryptographic hash.
// Most keys here are prime products (u64), which get a single multiply.

#[derive(Default)]
pub struct MyHasher(u64);

impl std::hash::Hasher for MyHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(3467) ^ (!b as u64);
        }
    }

    #[inline(always)]
    fn write_u64(&mut self, x: u64) {
        // fibonacci hashing spreads the low bits of small products.
        self.0 = (self.0 ^ x).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    }
}

pub type MyHasherDefault = std::hash::BuildHasherDefault<MyHasher>;
pub type MyHashMap<K, V> = std::collections::HashMap<K, V, MyHasherDefault>;
pub type MyHashSet<T> = std::collections::HashSet<T, MyHasherDefault>;
