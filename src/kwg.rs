// Copyright (C) 2020-2024 Andy Kurnia.

// A kwg is a flat arena of u32 arcs. Each sibling list is contiguous and
// sorted by tile; the last arc of a list has is_end set. kwg[0] points to the
// dawg root list and kwg[1] points to the gaddag root list.
// Tile 0 inside the gaddag is the direction separator.

#[derive(Clone, Copy)]
pub struct Node(u32);

impl Node {
    #[inline(always)]
    pub fn new(tile: u8, accepts: bool, is_end: bool, arc_index: u32) -> Node {
        debug_assert!(arc_index <= 0x3fffff);
        Node(
            ((tile as u32) << 24)
                | ((accepts as u32) << 23)
                | ((is_end as u32) << 22)
                | (arc_index & 0x3fffff),
        )
    }

    #[inline(always)]
    pub fn tile(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline(always)]
    pub fn accepts(&self) -> bool {
        self.0 & 0x800000 != 0
    }

    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.0 & 0x400000 != 0
    }

    #[inline(always)]
    pub fn arc_index(&self) -> i32 {
        (self.0 & 0x3fffff) as i32
    }

    #[inline(always)]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

pub struct Kwg(pub Box<[Node]>);

pub static EMPTY_KWG_BYTES: &[u8] = b"\x00\x00\x40\x00\x00\x00\x40\x00";

impl std::ops::Index<i32> for Kwg {
    type Output = Node;

    #[inline(always)]
    fn index(&self, i: i32) -> &Node {
        &self.0[i as usize]
    }
}

impl Kwg {
    pub fn from_bytes_alloc(buf: &[u8]) -> Kwg {
        Kwg(buf
            .chunks_exact(4)
            .map(|b| Node(u32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            .collect())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|node| node.to_le_bytes()).collect()
    }

    // returns the arc for tile among the children of arc p, or -1.
    #[inline(always)]
    pub fn seek(&self, mut p: i32, tile: u8) -> i32 {
        if p >= 0 {
            p = self[p].arc_index();
            if p > 0 {
                loop {
                    let node = self[p];
                    if node.tile() == tile {
                        return p;
                    }
                    if node.is_end() {
                        return -1;
                    }
                    p += 1;
                }
            }
        }
        -1 // intentionally return 0 as -1
    }

    // dawg lookup.
    pub fn accepts(&self, word: &[u8]) -> bool {
        let mut p = 0;
        for &tile in word {
            p = self.seek(p, tile & 0x7f);
            if p <= 0 {
                return false;
            }
        }
        p > 0 && self[p].accepts()
    }

    fn count_words_at(&self, word_counts: &mut [u32], p: i32) -> u32 {
        let pu = p as usize;
        if pu >= word_counts.len() {
            return 0;
        }
        if word_counts[pu] == !0 {
            panic!("cycle in kwg at {}", p);
        }
        if word_counts[pu] == 0 {
            word_counts[pu] = !0; // marker
            let node = self[p];
            let below = if node.arc_index() != 0 {
                self.count_words_at(word_counts, node.arc_index())
            } else {
                0
            };
            let beside = if node.is_end() {
                0
            } else {
                self.count_words_at(word_counts, p + 1)
            };
            word_counts[pu] = node.accepts() as u32 + below + beside;
        }
        word_counts[pu]
    }

    // word_counts[p] = words reachable from arc p and its later siblings.
    pub fn count_words_alloc(&self) -> Box<[u32]> {
        let mut word_counts = vec![0u32; self.0.len()];
        for p in (0..word_counts.len()).rev() {
            self.count_words_at(&mut word_counts, p as i32);
        }
        word_counts.into_boxed_slice()
    }

    // lexicographic rank of the word among the words under list p, or !0.
    #[inline(always)]
    pub fn get_word_index_of<I: Iterator<Item = u8>>(
        &self,
        word_counts: &[u32],
        mut p: i32,
        iter: &mut I,
    ) -> u32 {
        let mut idx = 0;
        if let Some(mut tile) = iter.next() {
            while p != 0 {
                let mut node = self[p];
                idx += word_counts[p as usize];
                while node.tile() != tile {
                    if node.is_end() {
                        return !0;
                    }
                    p += 1;
                    node = self[p];
                }
                idx -= word_counts[p as usize];
                match iter.next() {
                    Some(t) => {
                        tile = t;
                    }
                    None => {
                        return idx | ((node.accepts() as i32 - 1) as u32);
                    }
                }
                idx += node.accepts() as u32;
                p = node.arc_index();
            }
        }
        !0
    }
}
