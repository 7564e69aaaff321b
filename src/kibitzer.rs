// Copyright (C) 2020-2024 Andy Kurnia.

use super::{error, game_config, klv, kwg, movegen};

// note: only this representation uses -1i8 for blank-as-A (in "board" input
// and "word" response for "action":"play"). everywhere else, use 0x81u8.

// tile numbering follows alphabet order.
// rack: array of numbers. 0 for blank, 1 for A.
// board: 2D array of numbers. 0 for empty, 1 for A, -1 for blank-as-A.
// count: maximum number of moves returned, 1 for just the best.
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct Question {
    pub rack: Vec<u8>,
    #[serde(rename = "board")]
    pub board_tiles: Vec<Vec<i8>>,
    #[serde(rename = "count")]
    pub max_gen: usize,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
#[serde(tag = "action")]
pub enum JsonPlay {
    #[serde(rename = "exchange")]
    Exchange { tiles: Box<[u8]> },
    #[serde(rename = "play")]
    Play {
        down: bool,
        lane: i8,
        idx: i8,
        word: Box<[i8]>,
        score: i16,
    },
}

impl From<&movegen::Play> for JsonPlay {
    #[inline(always)]
    fn from(play: &movegen::Play) -> Self {
        match play {
            // an empty exchange is a pass.
            movegen::Play::Exchange { tiles } => Self::Exchange {
                tiles: tiles.clone(),
            },
            movegen::Play::Place {
                down,
                lane,
                idx,
                word,
                score,
            } => Self::Play {
                down: *down,
                lane: *lane,
                idx: *idx,
                // turn 0x81u8, 0x82u8 into -1i8, -2i8
                word: word
                    .iter()
                    .map(|&x| {
                        if x & 0x80 != 0 {
                            -((x & !0x80) as i8)
                        } else {
                            x as i8
                        }
                    })
                    .collect(),
                score: *score,
            },
        }
    }
}

impl From<&JsonPlay> for movegen::Play {
    #[inline(always)]
    fn from(play: &JsonPlay) -> Self {
        match play {
            JsonPlay::Exchange { tiles } => Self::Exchange {
                tiles: tiles.clone(),
            },
            JsonPlay::Play {
                down,
                lane,
                idx,
                word,
                score,
            } => Self::Place {
                down: *down,
                lane: *lane,
                idx: *idx,
                // turn -1i8, -2i8 into 0x81u8, 0x82u8
                word: word
                    .iter()
                    .map(|&x| if x < 0 { 0x81 + !x as u8 } else { x as u8 })
                    .collect(),
                score: *score,
            },
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct JsonPlayWithEquity {
    pub equity: f32,
    #[serde(flatten)]
    pub play: JsonPlay,
}

impl From<&movegen::ValuedMove> for JsonPlayWithEquity {
    #[inline(always)]
    fn from(play: &movegen::ValuedMove) -> Self {
        Self {
            equity: play.equity,
            play: (&play.play).into(),
        }
    }
}

impl From<&JsonPlayWithEquity> for movegen::ValuedMove {
    #[inline(always)]
    fn from(play: &JsonPlayWithEquity) -> Self {
        Self {
            equity: play.equity,
            play: (&play.play).into(),
        }
    }
}

// Checks a question against the tile distribution and keeps what the
// generator needs: the board in 0x81u8 form and the unseen tiles.
pub struct Kibitzer {
    pub available_tally: Vec<u8>,
    pub board_tiles: Vec<u8>,
}

impl Kibitzer {
    pub fn new() -> Self {
        Self {
            available_tally: Vec::new(),
            board_tiles: Vec::new(),
        }
    }

    fn take_tile(&mut self, game_config: &game_config::GameConfig<'_>, tile: u8) -> error::Returns<()> {
        if self.available_tally[tile as usize] > 0 {
            self.available_tally[tile as usize] -= 1;
            Ok(())
        } else {
            return_error!(format!(
                "too many tile {} (bag contains only {})",
                tile,
                game_config.alphabet().freq(tile),
            ));
        }
    }

    pub fn prepare(
        &mut self,
        game_config: &game_config::GameConfig<'_>,
        rack: &[u8],
        signed_board_tiles: &[Vec<i8>],
    ) -> error::Returns<()> {
        let alphabet = game_config.alphabet();
        let alphabet_len_without_blank = alphabet.len() - 1;

        self.available_tally.clear();
        self.available_tally
            .extend((0..alphabet.len()).map(|tile| alphabet.freq(tile)));

        if rack.len() > game_config.rack_size() as usize {
            return_error!(format!(
                "rack has {} tiles, rack size is {}",
                rack.len(),
                game_config.rack_size()
            ));
        }
        for &tile in rack {
            if tile > alphabet_len_without_blank {
                return_error!(format!(
                    "rack has invalid tile {}, alphabet size is {}",
                    tile, alphabet_len_without_blank
                ));
            }
            self.take_tile(game_config, tile)?;
        }

        let expected_dim = game_config.board_layout().dim();
        if signed_board_tiles.len() != expected_dim.rows as usize {
            return_error!(format!(
                "board: need {} rows, found {} rows",
                expected_dim.rows,
                signed_board_tiles.len()
            ));
        }
        for (row_num, row) in (0..).zip(signed_board_tiles.iter()) {
            if row.len() != expected_dim.cols as usize {
                return_error!(format!(
                    "board row {} (0-based): need {} cols, found {} cols",
                    row_num,
                    expected_dim.cols,
                    row.len()
                ));
            }
        }
        self.board_tiles.clear();
        self.board_tiles.reserve(expected_dim.area());
        for (row_num, row) in (0..).zip(signed_board_tiles.iter()) {
            for (col_num, &signed_tile) in (0..).zip(row) {
                if signed_tile == 0 {
                    self.board_tiles.push(0);
                } else if signed_tile > 0 && signed_tile as u8 <= alphabet_len_without_blank {
                    let tile = signed_tile as u8;
                    self.board_tiles.push(tile);
                    self.take_tile(game_config, tile)?;
                } else if signed_tile < 0 && (!signed_tile as u8) < alphabet_len_without_blank {
                    // turn -1i8, -2i8 into 0x81u8, 0x82u8
                    self.board_tiles.push(0x81 + !signed_tile as u8);
                    self.take_tile(game_config, 0)?;
                } else {
                    return_error!(format!(
                        "board row {} col {} (0-based): invalid tile {}, alphabet size is {}",
                        row_num, col_num, signed_tile, alphabet_len_without_blank
                    ));
                }
            }
        }

        Ok(())
    }

    // unseen tiles minus the opponent's rack.
    pub fn tiles_in_bag(&self, game_config: &game_config::GameConfig<'_>) -> usize {
        self.available_tally
            .iter()
            .map(|&count| count as usize)
            .sum::<usize>()
            .saturating_sub(game_config.rack_size() as usize)
    }

    // the best max_gen plays for the question, best first.
    pub fn answer(
        &mut self,
        move_generator: &mut movegen::MoveGenerator<'_>,
        game_config: &game_config::GameConfig<'_>,
        kwg: &kwg::Kwg,
        klv: &klv::Klv,
        question: &Question,
    ) -> error::Returns<Vec<JsonPlayWithEquity>> {
        self.prepare(game_config, &question.rack, &question.board_tiles)?;
        let tiles_in_bag = self.tiles_in_bag(game_config);
        let board_snapshot = &movegen::BoardSnapshot {
            board_tiles: &self.board_tiles,
            game_config,
            kwg,
            klv,
        };
        Ok(if question.max_gen == 1 {
            vec![(&move_generator.kibitz(board_snapshot, &question.rack, tiles_in_bag)).into()]
        } else {
            move_generator
                .kibitz_all(board_snapshot, &question.rack, tiles_in_bag)
                .iter()
                .take(question.max_gen)
                .map(|valued_move| valued_move.into())
                .collect()
        })
    }
}

impl Default for Kibitzer {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
