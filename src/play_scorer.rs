// Copyright (C) 2020-2024 Andy Kurnia.

// Scores and checks plays on their own, without the generator's tables.

use super::{error, matrix, movegen};

pub struct PlayScorer {
    rack_tally: Vec<u8>,
    formed_word: Vec<u8>,
}

impl PlayScorer {
    pub fn new() -> Self {
        Self {
            rack_tally: Vec::new(),
            formed_word: Vec::new(),
        }
    }

    fn set_rack_tally(&mut self, alphabet_len: u8, rack: &[u8]) {
        self.rack_tally.clear();
        self.rack_tally.resize(alphabet_len as usize, 0);
        rack.iter()
            .for_each(|&tile| self.rack_tally[tile as usize] += 1);
    }

    // Takes the played tiles out of rack_tally.
    fn use_tiles(&mut self, tiles: impl Iterator<Item = u8>) -> error::Returns<()> {
        for tile in tiles {
            let rack_tile = if tile & 0x80 != 0 { 0 } else { tile };
            match self.rack_tally.get_mut(rack_tile as usize) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    return_error!(format!("tile {} is not on the rack", tile));
                }
            }
        }
        Ok(())
    }

    // Rack tiles, squares, contiguity, connection to the board (or the start
    // square on an empty board), and every word formed in the lexicon.
    pub fn validate(
        &mut self,
        board_snapshot: &movegen::BoardSnapshot<'_>,
        rack: &[u8],
        play: &movegen::Play,
    ) -> error::Returns<()> {
        let game_config = board_snapshot.game_config;
        let alphabet = game_config.alphabet();
        self.set_rack_tally(alphabet.len(), rack);
        match play {
            movegen::Play::Exchange { tiles } => {
                self.use_tiles(tiles.iter().copied())?;
                if tiles.iter().any(|&tile| tile & 0x80 != 0) {
                    return_error!("exchanged tiles must be undesignated".into());
                }
            }
            movegen::Play::Place {
                down,
                lane,
                idx,
                word,
                ..
            } => {
                let board_layout = game_config.board_layout();
                let dim = board_layout.dim();
                let board_tiles = board_snapshot.board_tiles;
                if *lane < 0 || *lane >= dim.num_lanes(*down) {
                    return_error!(format!("lane {} is off the board", lane));
                }
                let strider = dim.lane(*down, *lane);
                let len = strider.len();
                if word.is_empty() || *idx < 0 || *idx as usize + word.len() > len as usize {
                    return_error!(format!("word at {} does not fit the board", idx));
                }
                let end = *idx + word.len() as i8;
                if (*idx > 0 && board_tiles[strider.at(*idx - 1)] != 0)
                    || (end < len && board_tiles[strider.at(end)] != 0)
                {
                    return_error!("word does not include adjacent tiles".into());
                }
                let mut num_played = 0;
                for (i, &tile) in (*idx..).zip(word.iter()) {
                    let board_tile = board_tiles[strider.at(i)];
                    if tile == 0 {
                        if board_tile == 0 {
                            return_error!(format!("nothing to play through at {}", i));
                        }
                    } else {
                        if board_tile != 0 {
                            return_error!(format!("square {} is occupied", i));
                        }
                        if tile & 0x7f == 0 || tile & 0x7f >= alphabet.len() {
                            return_error!(format!("invalid tile {}", tile));
                        }
                        num_played += 1;
                    }
                }
                if num_played == 0 {
                    return_error!("no tiles played".into());
                }
                self.use_tiles(word.iter().copied().filter(|&tile| tile != 0))?;

                // main word
                self.formed_word.clear();
                for (i, &tile) in (*idx..).zip(word.iter()) {
                    self.formed_word.push(if tile == 0 {
                        board_tiles[strider.at(i)]
                    } else {
                        tile
                    });
                }
                let mut is_connected = word.len() > num_played;
                if self.formed_word.len() > 1 {
                    if !board_snapshot.kwg.accepts(&self.formed_word) {
                        return_error!(format!(
                            "{} is not a word",
                            alphabet.fmt_word(&self.formed_word)
                        ));
                    }
                } else if !Self::has_perpendicular_tiles(board_snapshot, *down, *lane, *idx) {
                    return_error!("single tile forms no word".into());
                }

                // perpendicular words
                for (i, &tile) in (*idx..).zip(word.iter()) {
                    if tile == 0 {
                        continue;
                    }
                    if !Self::has_perpendicular_tiles(board_snapshot, *down, *lane, i) {
                        continue;
                    }
                    is_connected = true;
                    let perpendicular_strider = dim.lane(!*down, i);
                    let mut j = *lane;
                    while j > 0 && board_tiles[perpendicular_strider.at(j - 1)] != 0 {
                        j -= 1;
                    }
                    self.formed_word.clear();
                    for j in j..perpendicular_strider.len() {
                        let placed_tile = if j == *lane {
                            tile
                        } else {
                            board_tiles[perpendicular_strider.at(j)]
                        };
                        if placed_tile == 0 {
                            break;
                        }
                        self.formed_word.push(placed_tile);
                    }
                    if !board_snapshot.kwg.accepts(&self.formed_word) {
                        return_error!(format!(
                            "{} is not a word",
                            alphabet.fmt_word(&self.formed_word)
                        ));
                    }
                }

                if board_snapshot.is_empty() {
                    let star = dim.at_row_col(board_layout.star_row(), board_layout.star_col());
                    if !(*idx..end).any(|i| strider.at(i) == star) {
                        return_error!("first play must cover the start square".into());
                    }
                } else if !is_connected {
                    return_error!("play is not connected to the board".into());
                }
            }
        }
        Ok(())
    }

    fn has_perpendicular_tiles(
        board_snapshot: &movegen::BoardSnapshot<'_>,
        down: bool,
        lane: i8,
        i: i8,
    ) -> bool {
        let perpendicular_strider = board_snapshot
            .game_config
            .board_layout()
            .dim()
            .lane(!down, i);
        let board_tiles = board_snapshot.board_tiles;
        (lane > 0 && board_tiles[perpendicular_strider.at(lane - 1)] != 0)
            || (lane + 1 < perpendicular_strider.len()
                && board_tiles[perpendicular_strider.at(lane + 1)] != 0)
    }

    // Assume play is valid.
    pub fn compute_score(
        &mut self,
        board_snapshot: &movegen::BoardSnapshot<'_>,
        play: &movegen::Play,
    ) -> i16 {
        let game_config = board_snapshot.game_config;

        let mut recounted_score = 0;
        match play {
            movegen::Play::Exchange { .. } => {}
            movegen::Play::Place {
                down,
                lane,
                idx,
                word,
                ..
            } => {
                let alphabet = game_config.alphabet();
                let board_layout = game_config.board_layout();
                let premiums = board_layout.premiums();
                let dim = board_layout.dim();
                let strider = dim.lane(*down, *lane);
                let mut num_played = 0;

                {
                    let mut word_multiplier = 1;
                    let mut word_score = 0i16;
                    for (i, &tile) in (*idx..).zip(word.iter()) {
                        let strider_at_i = strider.at(i);
                        let tile_multiplier;
                        let premium = premiums[strider_at_i];
                        let placed_tile = if tile != 0 {
                            num_played += 1;
                            word_multiplier *= premium.word_multiplier as i16;
                            tile_multiplier = premium.tile_multiplier;
                            tile
                        } else {
                            tile_multiplier = 1;
                            board_snapshot.board_tiles[strider_at_i]
                        };
                        word_score += alphabet.score(placed_tile) as i16 * tile_multiplier as i16;
                    }
                    recounted_score += word_score * word_multiplier;
                }

                for (i, &tile) in (*idx..).zip(word.iter()) {
                    if tile == 0 || !Self::has_perpendicular_tiles(board_snapshot, *down, *lane, i) {
                        continue;
                    }
                    let perpendicular_strider = dim.lane(!*down, i);
                    let mut j = *lane;
                    while j > 0 && board_snapshot.board_tiles[perpendicular_strider.at(j - 1)] != 0
                    {
                        j -= 1;
                    }
                    let mut word_multiplier = 1;
                    let mut word_score = 0i16;
                    for j in j..perpendicular_strider.len() {
                        let perpendicular_strider_at_j = perpendicular_strider.at(j);
                        let tile_multiplier;
                        let premium = premiums[perpendicular_strider_at_j];
                        let placed_tile = if j == *lane {
                            word_multiplier *= premium.word_multiplier as i16;
                            tile_multiplier = premium.tile_multiplier;
                            tile
                        } else {
                            tile_multiplier = 1;
                            board_snapshot.board_tiles[perpendicular_strider_at_j]
                        };
                        if placed_tile == 0 {
                            break;
                        }
                        word_score += alphabet.score(placed_tile) as i16 * tile_multiplier as i16;
                    }
                    recounted_score += word_score * word_multiplier;
                }
                recounted_score += game_config.num_played_bonus(num_played);
            }
        };

        recounted_score
    }

    // Score plus the value of the tiles kept. Playing out the whole rack
    // keeps nothing and adds no leave.
    pub fn compute_equity(
        &mut self,
        board_snapshot: &movegen::BoardSnapshot<'_>,
        rack: &[u8],
        play: &movegen::Play,
    ) -> error::Returns<f32> {
        let alphabet_len = board_snapshot.game_config.alphabet().len();
        self.set_rack_tally(alphabet_len, rack);
        let score = match play {
            movegen::Play::Exchange { tiles } => {
                self.use_tiles(tiles.iter().copied())?;
                0
            }
            movegen::Play::Place { word, .. } => {
                self.use_tiles(word.iter().copied().filter(|&tile| tile != 0))?;
                self.compute_score(board_snapshot, play)
            }
        };
        let mut equity = score as f32;
        if self.rack_tally.iter().any(|&count| count != 0) {
            equity += board_snapshot
                .klv
                .leave_value_from_tally(&self.rack_tally);
        }
        Ok(equity)
    }
}

impl Default for PlayScorer {
    fn default() -> Self {
        Self::new()
    }
}

// Puts the tiles of a placement on the board. Exchanges leave it unchanged.
pub fn apply_play(board_tiles: &mut [u8], dim: matrix::Dim, play: &movegen::Play) {
    if let movegen::Play::Place {
        down,
        lane,
        idx,
        word,
        ..
    } = play
    {
        let strider = dim.lane(*down, *lane);
        for (i, &tile) in (*idx..).zip(word.iter()) {
            if tile != 0 {
                board_tiles[strider.at(i)] = tile;
            }
        }
    }
}
