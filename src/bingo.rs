// Copyright (C) 2020-2024 Andy Kurnia.

// Words that use every tile of a rack. Each word is read from the gaddag as
// its first letter, the separator, then the rest forward, so every word is
// found exactly once per way of assigning blanks.

use super::{fash, gaddag, prime};

// prime product of the tiles actually played (blanks as blanks) to words.
// a blank word is stored as 0x80 | letter.
pub type BingoMap = fash::MyHashMap<u64, Vec<Box<[u8]>>>;

struct BingoFinder<'a> {
    gaddag: gaddag::Gaddag<'a>,
    tally: Box<[u8]>,
    word: Vec<u8>,
    target_len: usize,
}

impl BingoFinder<'_> {
    fn walk(&mut self, node: i32, out: &mut Vec<Box<[u8]>>) {
        for (letter, edge) in self.gaddag.children(node, !1) {
            if self.tally[letter as usize] > 0 {
                self.tally[letter as usize] -= 1;
                self.place(letter, edge, out);
                self.tally[letter as usize] += 1;
            }
            if self.tally[0] > 0 {
                self.tally[0] -= 1;
                self.place(letter | 0x80, edge, out);
                self.tally[0] += 1;
            }
        }
    }

    fn place(&mut self, tile: u8, edge: i32, out: &mut Vec<Box<[u8]>>) {
        self.word.push(tile);
        if self.word.len() == self.target_len {
            if self.gaddag.completes_word(edge) {
                out.push(self.word.clone().into_boxed_slice());
            }
        } else {
            let next_node = if self.word.len() == 1 {
                self.gaddag
                    .follow(self.gaddag.change_direction(self.gaddag.follow(edge)))
            } else {
                self.gaddag.follow(edge)
            };
            if next_node > 0 {
                self.walk(next_node, out);
            }
        }
        self.word.pop();
    }
}

// rack: tiles with blank = 0. appends every word using all of them.
pub fn find_bingos(
    gaddag: gaddag::Gaddag<'_>,
    rack: &[u8],
    alphabet_len: u8,
    out: &mut Vec<Box<[u8]>>,
) {
    if rack.is_empty() {
        return;
    }
    let mut tally = vec![0u8; alphabet_len as usize].into_boxed_slice();
    for &tile in rack {
        tally[tile as usize] += 1;
    }
    let mut finder = BingoFinder {
        gaddag,
        tally,
        word: Vec::with_capacity(rack.len()),
        target_len: rack.len(),
    };
    finder.walk(gaddag.root(), out);
}

// One descent for many racks. Any prefix whose tiles are not a sub-multiset
// of some rack is cut off.
struct BatchFinder<'a> {
    gaddag: gaddag::Gaddag<'a>,
    primes: &'a prime::PrimeSet,
    subsets: fash::MyHashSet<u64>,
    word: Vec<u8>,
    target_len: usize,
    bingo_map: BingoMap,
}

impl BatchFinder<'_> {
    fn walk(&mut self, node: i32, product: u64) {
        for (letter, edge) in self.gaddag.children(node, !1) {
            self.place(letter, edge, product * self.primes.prime(letter));
            self.place(letter | 0x80, edge, product * self.primes.prime(0));
        }
    }

    fn place(&mut self, tile: u8, edge: i32, product: u64) {
        if !self.subsets.contains(&product) {
            return;
        }
        self.word.push(tile);
        if self.word.len() == self.target_len {
            if self.gaddag.completes_word(edge) {
                self.bingo_map
                    .entry(product)
                    .or_default()
                    .push(self.word.clone().into_boxed_slice());
            }
        } else {
            let next_node = if self.word.len() == 1 {
                self.gaddag
                    .follow(self.gaddag.change_direction(self.gaddag.follow(edge)))
            } else {
                self.gaddag.follow(edge)
            };
            if next_node > 0 {
                self.walk(next_node, product);
            }
        }
        self.word.pop();
    }
}

// Bingos of target_len tiles for every given rack, keyed by rack product.
// A rack found nowhere in the map has none.
pub fn find_bingos_for_racks(
    gaddag: gaddag::Gaddag<'_>,
    primes: &prime::PrimeSet,
    racks: &[Vec<u8>],
    target_len: usize,
) -> BingoMap {
    let mut subsets = fash::MyHashSet::default();
    for rack in racks.iter().filter(|rack| rack.len() == target_len) {
        subsets.extend(primes.subset_products(rack).iter().copied());
    }
    let mut finder = BatchFinder {
        gaddag,
        primes,
        subsets,
        word: Vec::with_capacity(target_len),
        target_len,
        bingo_map: BingoMap::default(),
    };
    if target_len > 0 {
        finder.walk(gaddag.root(), 1);
    }
    finder.bingo_map
}
