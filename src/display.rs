// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, board_layout, movegen};

#[inline(always)]
pub fn empty_label(board_layout: &board_layout::BoardLayout, row: i8, col: i8) -> &'static str {
    if row == board_layout.star_row() && col == board_layout.star_col() {
        return "*";
    }
    let premium = board_layout.premium_at(row, col);
    match (premium.word_multiplier, premium.tile_multiplier) {
        (3, _) => "=",
        (2, _) => "-",
        (_, 3) => "\"",
        (_, 2) => "\'",
        _ => " ",
    }
}

#[inline(always)]
pub fn board_label<'a>(
    alphabet: &'a alphabet::Alphabet<'a>,
    board_layout: &board_layout::BoardLayout,
    board_tiles: &'a [u8],
    row: i8,
    col: i8,
) -> &'a str {
    alphabet
        .from_board(board_tiles[board_layout.dim().at_row_col(row, col)])
        .unwrap_or_else(|| empty_label(board_layout, row, col))
}

pub fn print_board<'a>(
    alphabet: &'a alphabet::Alphabet<'a>,
    board_layout: &board_layout::BoardLayout,
    board_tiles: &[u8],
) {
    let dim = board_layout.dim();
    let print_cols = || {
        print!("  ");
        for c in 0..dim.cols {
            print!(" {}", ((c as u8) + 0x61) as char);
        }
        println!();
    };
    let print_edge = || {
        print!("  +");
        for _ in 1..dim.cols {
            print!("--");
        }
        println!("-+");
    };
    print_cols();
    print_edge();
    for r in 0..dim.rows {
        print!("{:2}|", r + 1);
        for c in 0..dim.cols {
            if c > 0 {
                print!(" ")
            }
            print!("{}", board_label(alphabet, board_layout, board_tiles, r, c));
        }
        println!("|{}", r + 1);
    }
    print_edge();
    print_cols();
}

// "8H WORD 20" across, "H8 WORD 20" down, "(AB)" for tiles played through,
// lowercase for blanks, "- ABC" for an exchange, "-" for a pass.
pub struct WriteablePlay<'a> {
    board_snapshot: &'a movegen::BoardSnapshot<'a>,
    play: &'a movegen::Play,
}

impl std::fmt::Display for WriteablePlay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alphabet = self.board_snapshot.game_config.alphabet();
        match self.play {
            movegen::Play::Exchange { tiles } => {
                if tiles.is_empty() {
                    write!(f, "-")?;
                } else {
                    write!(f, "- {}", alphabet.fmt_rack(tiles))?;
                }
            }
            movegen::Play::Place {
                down,
                lane,
                idx,
                word,
                score,
            } => {
                if *down {
                    write!(f, "{}{} ", (*lane as u8 + 0x41) as char, idx + 1)?;
                } else {
                    write!(f, "{}{} ", lane + 1, (*idx as u8 + 0x41) as char)?;
                }
                let strider = self
                    .board_snapshot
                    .game_config
                    .board_layout()
                    .dim()
                    .lane(*down, *lane);
                let mut inside = false;
                for (i, &tile) in (*idx..).zip(word.iter()) {
                    if tile == 0 {
                        if !inside {
                            write!(f, "(")?;
                            inside = true;
                        }
                        let board_tile = self.board_snapshot.board_tiles[strider.at(i)];
                        write!(f, "{}", alphabet.from_board(board_tile).unwrap_or("?"))?;
                    } else {
                        if inside {
                            write!(f, ")")?;
                            inside = false;
                        }
                        write!(f, "{}", alphabet.from_board(tile).unwrap_or("?"))?;
                    }
                }
                if inside {
                    write!(f, ")")?;
                }
                write!(f, " {}", score)?;
            }
        }
        Ok(())
    }
}

#[inline(always)]
pub fn fmt_play<'a>(
    board_snapshot: &'a movegen::BoardSnapshot<'a>,
    play: &'a movegen::Play,
) -> WriteablePlay<'a> {
    WriteablePlay {
        board_snapshot,
        play,
    }
}
