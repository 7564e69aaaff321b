// Copyright (C) 2020-2024 Andy Kurnia.

#![allow(dead_code)]

use spotgen::{alphabet, build, game_config, klv, kwg, movegen};

pub static WORDS: &[&str] = &[
    // twos
    "AA", "AB", "AD", "AE", "AG", "AH", "AI", "AL", "AM", "AN", "AR", "AS", "AT", "AW", "AX",
    "AY", "BA", "BE", "BI", "BO", "BY", "DA", "DE", "DO", "ED", "EF", "EH", "EL", "EM", "EN",
    "ER", "ES", "EX", "FA", "FE", "GO", "HA", "HE", "HI", "HM", "HO", "ID", "IF", "IN", "IS",
    "IT", "JO", "KA", "KI", "LA", "LI", "LO", "MA", "ME", "MI", "MO", "MU", "MY", "NA", "NE",
    "NO", "NU", "OD", "OE", "OF", "OH", "OI", "OM", "ON", "OP", "OR", "OS", "OW", "OX", "OY",
    "PA", "PE", "PI", "QI", "RE", "SH", "SI", "SO", "TA", "TI", "TO", "UH", "UM", "UN", "UP",
    "US", "UT", "WE", "WO", "XI", "XU", "YA", "YE", "YO", "ZA",
    // threes and up
    "ANT", "ANTS", "ARE", "ART", "ARTS", "BAD", "BAT", "BATS", "BED", "CAB", "CABS", "CAD",
    "CAT", "CATS", "COT", "CUT", "DAB", "EAR", "EARS", "EAST", "EATS", "ERA", "ERAS", "FAB",
    "FED", "JAB", "NET", "NETS", "NIT", "NITS", "QAT", "QATS", "RAIN", "RAINS", "RAN", "RAT",
    "RATE", "RATES", "RATS", "SAT", "SATE", "SATIN", "SAINT", "SEA", "SEAT", "SET", "SIN",
    "SIT", "STAIN", "STAR", "STARE", "TAB", "TABS", "TAN", "TANS", "TAR", "TARS", "TEA",
    "TEAR", "TEARS", "TEAS", "TEN", "TENS", "TIN", "TINS", "TRAIN", "TRAINS", "ZAS",
    "RETAIN", "RETAINS", "STAINER", "NASTIER", "RETINAS", "RETSINA", "ANESTRI", "RATINES",
    "STEARIN",
];

pub struct Fixture<'a> {
    pub game_config: game_config::GameConfig<'a>,
    pub kwg: kwg::Kwg,
    pub klv: klv::Klv,
}

impl<'a> Fixture<'a> {
    pub fn new() -> Self {
        let game_config = game_config::make_english_game_config();
        let kwg = make_kwg(game_config.alphabet(), WORDS);
        let klv = make_klv(
            game_config.alphabet(),
            &[
                ("?", 25.0),
                ("S", 8.0),
                ("ES", 10.5),
                ("ER", 4.0),
                ("Q", -7.0),
                ("V", -5.5),
                ("AA", -4.0),
                ("R", 1.5),
            ],
        );
        Self {
            game_config,
            kwg,
            klv,
        }
    }

    pub fn empty_board(&self) -> Vec<u8> {
        vec![0u8; self.game_config.board_layout().dim().area()]
    }

    pub fn rack(&self, s: &str) -> Vec<u8> {
        self.game_config.alphabet().parse_rack(s).unwrap()
    }

    // word uses lowercase for blanks.
    pub fn place(&self, board_tiles: &mut [u8], down: bool, lane: i8, idx: i8, word: &str) {
        let dim = self.game_config.board_layout().dim();
        let strider = dim.lane(down, lane);
        let word = self.game_config.alphabet().parse_word(word).unwrap();
        for (i, &tile) in (idx..).zip(word.iter()) {
            board_tiles[strider.at(i)] = tile;
        }
    }

    pub fn snapshot<'b>(&'b self, board_tiles: &'b [u8]) -> movegen::BoardSnapshot<'b> {
        movegen::BoardSnapshot {
            board_tiles,
            game_config: &self.game_config,
            kwg: &self.kwg,
            klv: &self.klv,
        }
    }

    // unseen tiles for drawing racks.
    pub fn unseen(&self, board_tiles: &[u8]) -> Vec<u8> {
        let alphabet = self.game_config.alphabet();
        let mut tally = (0..alphabet.len())
            .map(|tile| alphabet.freq(tile))
            .collect::<Vec<_>>();
        for &tile in board_tiles.iter().filter(|&&tile| tile != 0) {
            tally[if tile & 0x80 != 0 { 0 } else { tile as usize }] -= 1;
        }
        (0u8..)
            .zip(tally.iter())
            .flat_map(|(tile, &count)| std::iter::repeat_n(tile, count as usize))
            .collect()
    }
}

pub fn make_kwg(alphabet: &alphabet::Alphabet<'_>, words: &[&str]) -> kwg::Kwg {
    let mut machine_words = words
        .iter()
        .map(|word| alphabet.parse_rack(word).unwrap().into_boxed_slice())
        .collect::<Vec<_>>();
    machine_words.sort_unstable();
    machine_words.dedup();
    kwg::Kwg::from_bytes_alloc(&build::build(build::BuildFormat::Gaddawg, &machine_words).unwrap())
}

pub fn make_klv(alphabet: &alphabet::Alphabet<'_>, leaves: &[(&str, f32)]) -> klv::Klv {
    klv::Klv::from_leaves(
        &leaves
            .iter()
            .map(|&(leave, value)| (alphabet.parse_rack(leave).unwrap(), value))
            .collect::<Vec<_>>(),
    )
    .unwrap()
}

// C A T S across row 8 from F, T E A R down column H from 8.
pub fn midgame_board(fixture: &Fixture<'_>) -> Vec<u8> {
    let mut board_tiles = fixture.empty_board();
    fixture.place(&mut board_tiles, false, 7, 5, "CATS");
    fixture.place(&mut board_tiles, true, 7, 8, "EAR");
    board_tiles
}
