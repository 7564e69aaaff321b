// Copyright (C) 2020-2024 Andy Kurnia.

use super::{build, error, kwg};

// Leave values keyed by the sorted multiset of kept tiles (0 = blank).
// Layout: u32 arc count, kwg arcs, u32 value count, values (f32, or i16/256).
pub struct Klv {
    kwg: kwg::Kwg,
    counts: Box<[u32]>,
    leaves: Box<[f32]>,
}

pub static EMPTY_KLV_BYTES: &[u8] = b"\x01\x00\x00\x00\x00\x00\x40\x00\x00\x00\x00\x00";

#[inline(always)]
fn read_u32(buf: &[u8], r: usize) -> u32 {
    u32::from_le_bytes([buf[r], buf[r + 1], buf[r + 2], buf[r + 3]])
}

impl Klv {
    pub fn from_bytes_alloc(buf: &[u8]) -> Klv {
        let mut r = 0;
        let kwg_bytes_len = read_u32(buf, r) as usize * 4;
        r += 4;
        let kwg = kwg::Kwg::from_bytes_alloc(&buf[r..r + kwg_bytes_len]);
        r += kwg_bytes_len;
        let lv_len = read_u32(buf, r) as usize;
        r += 4;
        let leaves = if buf.len() < 4 * lv_len {
            // klv uses i16
            buf[r..r + 2 * lv_len]
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 * (1.0 / 256.0))
                .collect()
        } else {
            // klv2 uses f32
            buf[r..r + 4 * lv_len]
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        };
        let counts = kwg.count_words_alloc();
        Klv {
            kwg,
            counts,
            leaves,
        }
    }

    // Each leave is a list of tiles in any order. Duplicate leaves keep the
    // last value given.
    pub fn from_leaves(leaves: &[(Vec<u8>, f32)]) -> error::Returns<Klv> {
        let mut sorted = std::collections::BTreeMap::<Box<[u8]>, f32>::new();
        for (tiles, value) in leaves {
            let mut tiles = tiles.clone();
            tiles.sort_unstable();
            sorted.insert(tiles.into_boxed_slice(), *value);
        }
        let words = sorted.keys().cloned().collect::<Vec<_>>();
        let kwg_bytes = if words.is_empty() {
            kwg::EMPTY_KWG_BYTES.to_vec()
        } else {
            build::build(build::BuildFormat::DawgOnly, &words)?
        };
        let mut buf = Vec::with_capacity(8 + kwg_bytes.len() + 4 * sorted.len());
        buf.extend_from_slice(&((kwg_bytes.len() / 4) as u32).to_le_bytes());
        buf.extend_from_slice(&kwg_bytes);
        buf.extend_from_slice(&(sorted.len() as u32).to_le_bytes());
        for value in sorted.values() {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        Ok(Klv::from_bytes_alloc(&buf))
    }

    #[inline(always)]
    pub fn leave(&self, leave_idx: u32) -> f32 {
        self.leaves[leave_idx as usize]
    }

    // tally[t] = number of tile t kept. Unknown leaves are worth 0.
    #[inline(always)]
    pub fn leave_value_from_tally(&self, rack_tally: &[u8]) -> f32 {
        let leave_idx = self.kwg.get_word_index_of(
            &self.counts,
            self.kwg[0].arc_index(),
            &mut (0u8..)
                .zip(rack_tally)
                .flat_map(|(tile, &count)| std::iter::repeat_n(tile, count as usize)),
        );
        if leave_idx == !0 {
            0.0
        } else {
            self.leave(leave_idx)
        }
    }
}
