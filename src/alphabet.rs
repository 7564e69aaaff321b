// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;

// tile 0 is the blank. on the board, 0x80 | tile is a blank played as tile.
pub struct Tile<'a> {
    label: &'a str,
    blank_label: &'a str,
    freq: u8,
    score: i8,
}

const fn tile<'a>(label: &'a str, blank_label: &'a str, freq: u8, score: i8) -> Tile<'a> {
    Tile {
        label,
        blank_label,
        freq,
        score,
    }
}

pub struct StaticAlphabet<'a> {
    tiles: &'a [Tile<'a>],
    num_tiles: u16,
}

pub enum Alphabet<'a> {
    Static(StaticAlphabet<'a>),
}

impl<'a> Alphabet<'a> {
    #[inline(always)]
    pub fn len(&self) -> u8 {
        match self {
            Alphabet::Static(x) => x.tiles.len() as u8,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    fn get(&self, idx: u8) -> &'a Tile<'a> {
        match self {
            Alphabet::Static(x) => &x.tiles[idx as usize],
        }
    }

    #[inline(always)]
    pub fn num_tiles(&self) -> u16 {
        match self {
            Alphabet::Static(x) => x.num_tiles,
        }
    }

    #[inline(always)]
    pub fn from_board(&self, idx: u8) -> Option<&'a str> {
        let c = idx & 0x7f;
        if c == 0 || c >= self.len() {
            None
        } else if idx & 0x80 == 0 {
            Some(self.get(c).label)
        } else {
            Some(self.get(c).blank_label)
        }
    }

    #[inline(always)]
    pub fn from_rack(&self, idx: u8) -> Option<&'a str> {
        if idx >= self.len() {
            None
        } else {
            Some(self.get(idx).label)
        }
    }

    // blanks score as tile 0, whatever letter they stand for.
    #[inline(always)]
    pub fn score(&self, idx: u8) -> i8 {
        if idx & 0x80 != 0 {
            self.get(0).score
        } else {
            self.get(idx).score
        }
    }

    #[inline(always)]
    pub fn freq(&self, idx: u8) -> u8 {
        self.get(idx).freq
    }

    // bit 0 (blank/separator) is never a letter.
    #[inline(always)]
    pub fn every_letter(&self) -> u64 {
        (!0u64 >> (64 - self.len() as u32)) & !1
    }

    pub fn parse_rack(&self, s: &str) -> error::Returns<Vec<u8>> {
        let mut v = Vec::with_capacity(s.len());
        for c in s.chars() {
            let mut buf = [0u8; 4];
            let label: &str = c.encode_utf8(&mut buf);
            match (0..self.len()).find(|&t| self.get(t).label == label) {
                Some(t) => v.push(t),
                None => {
                    return_error!(format!("invalid tile {:?} in rack {:?}", c, s));
                }
            }
        }
        Ok(v)
    }

    // blank labels become 0x80 | tile.
    pub fn parse_word(&self, s: &str) -> error::Returns<Vec<u8>> {
        let mut v = Vec::with_capacity(s.len());
        for c in s.chars() {
            let mut buf = [0u8; 4];
            let label: &str = c.encode_utf8(&mut buf);
            if let Some(t) = (1..self.len()).find(|&t| self.get(t).label == label) {
                v.push(t);
            } else if let Some(t) = (1..self.len()).find(|&t| self.get(t).blank_label == label) {
                v.push(t | 0x80);
            } else {
                return_error!(format!("invalid letter {:?} in word {:?}", c, s));
            }
        }
        Ok(v)
    }

    pub fn fmt_rack(&self, rack: &[u8]) -> String {
        rack.iter().filter_map(|&t| self.from_rack(t)).collect()
    }

    pub fn fmt_word(&self, word: &[u8]) -> String {
        word.iter().filter_map(|&t| self.from_board(t)).collect()
    }
}

static ENGLISH_TILES: &[Tile] = &[
    tile("?", "?", 2, 0),
    tile("A", "a", 9, 1),
    tile("B", "b", 2, 3),
    tile("C", "c", 2, 3),
    tile("D", "d", 4, 2),
    tile("E", "e", 12, 1),
    tile("F", "f", 2, 4),
    tile("G", "g", 3, 2),
    tile("H", "h", 2, 4),
    tile("I", "i", 9, 1),
    tile("J", "j", 1, 8),
    tile("K", "k", 1, 5),
    tile("L", "l", 4, 1),
    tile("M", "m", 2, 3),
    tile("N", "n", 6, 1),
    tile("O", "o", 8, 1),
    tile("P", "p", 2, 3),
    tile("Q", "q", 1, 10),
    tile("R", "r", 6, 1),
    tile("S", "s", 4, 1),
    tile("T", "t", 6, 1),
    tile("U", "u", 4, 1),
    tile("V", "v", 2, 4),
    tile("W", "w", 2, 4),
    tile("X", "x", 1, 8),
    tile("Y", "y", 2, 4),
    tile("Z", "z", 1, 10),
];

pub fn make_english_alphabet<'a>() -> Alphabet<'a> {
    Alphabet::Static(StaticAlphabet {
        tiles: ENGLISH_TILES,
        num_tiles: ENGLISH_TILES.iter().map(|t| t.freq as u16).sum(),
    })
}
