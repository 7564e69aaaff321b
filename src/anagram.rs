// Copyright (C) 2020-2024 Andy Kurnia.

// What words a rack can form, summarized per number of tiles played, so that
// spots needing lengths the rack cannot fill are never searched.

use super::{fash, klv, kwg, prime, spot};

// bit n of num_played: some word uses exactly n rack tiles.
// best_leaves[n - 1]: best leave after such a word, NO_EQUITY if none.
#[derive(Clone, Debug)]
pub struct NTileAnagrams {
    pub num_played: u16,
    pub best_leaves: Box<[f32]>,
}

impl NTileAnagrams {
    fn new(rack_len: usize) -> Self {
        Self {
            num_played: 0,
            best_leaves: vec![spot::NO_EQUITY; rack_len.max(1)].into_boxed_slice(),
        }
    }

    #[inline(always)]
    fn record(&mut self, num_played: i8, leave: f32) {
        self.num_played |= 1 << num_played;
        let best_leave = &mut self.best_leaves[num_played as usize - 1];
        *best_leave = best_leave.max(leave);
    }
}

// thru_one has one entry per bit of anahooks, in letter order.
#[derive(Clone, Debug)]
pub struct UsesTiles {
    pub anahooks: u64,
    pub thru_none: NTileAnagrams,
    pub thru_one: Box<[NTileAnagrams]>,
}

impl UsesTiles {
    // anagrams that also play through one board tile of this letter.
    #[inline(always)]
    pub fn through_letter(&self, letter: u8) -> Option<&NTileAnagrams> {
        let bit = 1u64 << letter;
        if self.anahooks & bit == 0 {
            None
        } else {
            Some(&self.thru_one[(self.anahooks & (bit - 1)).count_ones() as usize])
        }
    }
}

#[derive(Clone, Debug)]
pub struct RackAnagrams {
    pub uses_no_blanks: UsesTiles,
    pub must_use_blank: UsesTiles,
}

impl RackAnagrams {
    #[inline(always)]
    pub fn class(&self, use_blank: bool) -> &UsesTiles {
        if use_blank {
            &self.must_use_blank
        } else {
            &self.uses_no_blanks
        }
    }
}

pub trait AnagramIndex {
    // rack is sorted, blank = 0.
    fn look_up(&self, rack: &[u8]) -> Option<&RackAnagrams>;
}

// Racks precomputed in memory, keyed by prime product.
pub struct AnagramMap {
    primes: prime::PrimeSet,
    map: fash::MyHashMap<u64, RackAnagrams>,
}

impl AnagramMap {
    pub fn new(alphabet_len: u8) -> Self {
        Self {
            primes: prime::PrimeSet::new(alphabet_len),
            map: fash::MyHashMap::default(),
        }
    }

    pub fn add_rack(&mut self, kwg: &kwg::Kwg, klv: &klv::Klv, alphabet_len: u8, rack: &[u8]) {
        let product = self.primes.product(rack);
        self.map
            .entry(product)
            .or_insert_with(|| build_rack_anagrams(kwg, klv, alphabet_len, rack));
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl AnagramIndex for AnagramMap {
    fn look_up(&self, rack: &[u8]) -> Option<&RackAnagrams> {
        self.map.get(&self.primes.product(rack))
    }
}

struct AnagramFinder<'a> {
    kwg: &'a kwg::Kwg,
    klv: &'a klv::Klv,
    tally: Box<[u8]>,
    num_played: i8,
    blanks_used: u8,
    through: u8, // 0 = not yet used
    // [uses blank][through letter, 0 = none]
    found: [Box<[NTileAnagrams]>; 2],
}

impl AnagramFinder<'_> {
    fn walk(&mut self, mut p: i32) {
        loop {
            let node = self.kwg[p];
            let tile = node.tile();
            if self.tally[tile as usize] > 0 {
                self.tally[tile as usize] -= 1;
                self.num_played += 1;
                self.visit(p);
                self.num_played -= 1;
                self.tally[tile as usize] += 1;
            }
            if self.tally[0] > 0 {
                self.tally[0] -= 1;
                self.blanks_used += 1;
                self.num_played += 1;
                self.visit(p);
                self.num_played -= 1;
                self.blanks_used -= 1;
                self.tally[0] += 1;
            }
            if self.through == 0 {
                self.through = tile;
                self.visit(p);
                self.through = 0;
            }
            if node.is_end() {
                break;
            }
            p += 1;
        }
    }

    fn visit(&mut self, p: i32) {
        let node = self.kwg[p];
        if node.accepts() && self.num_played > 0 {
            let leave = self.klv.leave_value_from_tally(&self.tally);
            self.found[(self.blanks_used > 0) as usize][self.through as usize]
                .record(self.num_played, leave);
        }
        let has_tiles = self.tally.iter().any(|&count| count > 0);
        if node.arc_index() != 0 && (has_tiles || self.through == 0) {
            self.walk(node.arc_index());
        }
    }
}

fn uses_tiles_from(found: Box<[NTileAnagrams]>) -> UsesTiles {
    let mut found = found.into_vec().into_iter();
    let thru_none = found.next().unwrap_or_else(|| NTileAnagrams::new(1));
    let mut anahooks = 0u64;
    let mut thru_one = Vec::new();
    for (letter, anagrams) in (1..).zip(found) {
        if anagrams.num_played != 0 {
            anahooks |= 1 << letter;
            thru_one.push(anagrams);
        }
    }
    UsesTiles {
        anahooks,
        thru_none,
        thru_one: thru_one.into_boxed_slice(),
    }
}

// Walks the dawg with the rack tiles and at most one extra letter standing
// for a board tile.
pub fn build_rack_anagrams(
    kwg: &kwg::Kwg,
    klv: &klv::Klv,
    alphabet_len: u8,
    rack: &[u8],
) -> RackAnagrams {
    assert!(rack.len() < 16);
    let make_found = || {
        (0..alphabet_len)
            .map(|_| NTileAnagrams::new(rack.len()))
            .collect::<Box<_>>()
    };
    let mut tally = vec![0u8; alphabet_len as usize].into_boxed_slice();
    for &tile in rack {
        tally[tile as usize] += 1;
    }
    let mut finder = AnagramFinder {
        kwg,
        klv,
        tally,
        num_played: 0,
        blanks_used: 0,
        through: 0,
        found: [make_found(), make_found()],
    };
    let root = kwg[0].arc_index();
    if root != 0 && !rack.is_empty() {
        finder.walk(root);
    }
    let [uses_no_blanks, must_use_blank] = finder.found;
    RackAnagrams {
        uses_no_blanks: uses_tiles_from(uses_no_blanks),
        must_use_blank: uses_tiles_from(must_use_blank),
    }
}
