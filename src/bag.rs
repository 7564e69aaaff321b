// Copyright (C) 2020-2024 Andy Kurnia.

use super::alphabet;
use rand::prelude::*;

// Tiles are drawn from the end.
pub struct Bag(pub Vec<u8>);

impl Bag {
    pub fn new(alphabet: &alphabet::Alphabet<'_>) -> Bag {
        let mut bag = Vec::with_capacity(alphabet.num_tiles() as usize);
        for tile in 0..alphabet.len() {
            for _ in 0..alphabet.freq(tile) {
                bag.push(tile);
            }
        }
        Bag(bag)
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.0.shuffle(rng);
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Option<u8> {
        self.0.pop()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn replenish(&mut self, rack: &mut Vec<u8>, rack_size: usize) {
        let num_drawn = rack_size.saturating_sub(rack.len()).min(self.0.len());
        rack.extend(self.0.drain(self.0.len() - num_drawn..).rev());
    }

    // Removes tiles from the rack, blanks given as 0x80 | letter.
    // Returns false (rack unchanged) if some tile is missing.
    pub fn use_tiles(rack: &mut Vec<u8>, tiles: impl Iterator<Item = u8>) -> bool {
        let original_len = rack.len();
        let mut kept = std::mem::take(rack);
        let mut removed = Vec::new();
        for tile in tiles {
            let rack_tile = if tile & 0x80 != 0 { 0 } else { tile };
            match kept.iter().position(|&t| t == rack_tile) {
                Some(pos) => removed.push(kept.swap_remove(pos)),
                None => {
                    kept.extend_from_slice(&removed);
                    *rack = kept;
                    debug_assert_eq!(rack.len(), original_len);
                    return false;
                }
            }
        }
        *rack = kept;
        true
    }

    // put back the tiles in random positions. keep the rest of the bag in the same order.
    pub fn put_back(&mut self, rng: &mut impl Rng, tiles: &[u8]) {
        for &tile in tiles {
            let pos = rng.random_range(0..=self.0.len());
            self.0.insert(pos, tile);
        }
    }
}

impl Clone for Bag {
    #[inline(always)]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }

    #[inline(always)]
    fn clone_from(&mut self, source: &Self) {
        self.0.clone_from(&source.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn draws_and_returns_tiles() {
        let alphabet = alphabet::make_english_alphabet();
        let mut bag = Bag::new(&alphabet);
        assert_eq!(bag.len(), 100);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        bag.shuffle(&mut rng);
        let mut rack = Vec::new();
        bag.replenish(&mut rack, 7);
        assert_eq!(rack.len(), 7);
        assert_eq!(bag.len(), 93);
        let exchanged = rack[..3].to_vec();
        assert!(Bag::use_tiles(&mut rack, exchanged.iter().copied()));
        assert_eq!(rack.len(), 4);
        bag.put_back(&mut rng, &exchanged);
        assert_eq!(bag.len(), 96);
        assert!(!Bag::use_tiles(&mut rack, [0x81, 0x81, 0x81, 0x81, 0x81].into_iter()));
        assert_eq!(rack.len(), 4);
    }
}
