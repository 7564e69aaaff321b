// Copyright (C) 2020-2024 Andy Kurnia.

use super::{gaddag, matrix, movegen};

// What the perpendicular word allows on one empty square.
// touches: some tile is adjacent in the perpendicular direction.
// letters: letters that form a valid perpendicular word (only when touches).
// score: face value of the perpendicular tiles times the square's word
// multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hook {
    pub touches: bool,
    pub letters: u64,
    pub score: i16,
}

pub struct HookTable {
    dim: matrix::Dim,
    for_across_plays: Box<[Hook]>, // from the column through each square
    for_down_plays: Box<[Hook]>,   // from the row through each square
}

impl HookTable {
    pub fn new(dim: matrix::Dim) -> Self {
        Self {
            dim,
            for_across_plays: vec![Hook::default(); dim.area()].into_boxed_slice(),
            for_down_plays: vec![Hook::default(); dim.area()].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn get(&self, down: bool, row: i8, col: i8) -> Hook {
        let idx = self.dim.at_row_col(row, col);
        if down {
            self.for_down_plays[idx]
        } else {
            self.for_across_plays[idx]
        }
    }

    // square is a row-major board index.
    #[inline(always)]
    pub fn at(&self, down: bool, square: usize) -> Hook {
        if down {
            self.for_down_plays[square]
        } else {
            self.for_across_plays[square]
        }
    }

    pub fn compute(&mut self, board_snapshot: &movegen::BoardSnapshot<'_>) {
        let dim = board_snapshot.game_config.board_layout().dim();
        if dim != self.dim {
            *self = Self::new(dim);
        }
        let gaddag = gaddag::Gaddag::new(board_snapshot.kwg);
        for col in 0..dim.cols {
            compute_lane(
                board_snapshot,
                gaddag,
                dim.down(col),
                &mut self.for_across_plays,
            );
        }
        for row in 0..dim.rows {
            compute_lane(
                board_snapshot,
                gaddag,
                dim.across(row),
                &mut self.for_down_plays,
            );
        }
    }
}

// fills hooks for every square of a lane perpendicular to the plays.
fn compute_lane(
    board_snapshot: &movegen::BoardSnapshot<'_>,
    gaddag: gaddag::Gaddag<'_>,
    strider: matrix::Strider,
    hooks: &mut [Hook],
) {
    let board_tiles = board_snapshot.board_tiles;
    let alphabet = board_snapshot.game_config.alphabet();
    let premiums = board_snapshot.game_config.board_layout().premiums();
    let every_letter = alphabet.every_letter();
    let len = strider.len();
    let letter_at = |i: i8| board_tiles[strider.at(i)] & 0x7f;

    for i in 0..len {
        let here = strider.at(i);
        hooks[here] = Hook {
            touches: false,
            letters: every_letter,
            score: 0,
        };
        if board_tiles[here] != 0 {
            continue;
        }
        let mut start = i;
        while start > 0 && board_tiles[strider.at(start - 1)] != 0 {
            start -= 1;
        }
        let mut end = i + 1;
        while end < len && board_tiles[strider.at(end)] != 0 {
            end += 1;
        }
        let has_before = start < i;
        let has_after = i + 1 < end;
        if !has_before && !has_after {
            continue;
        }

        let face_value = (start..i)
            .chain(i + 1..end)
            .map(|j| alphabet.score(board_tiles[strider.at(j)]) as i16)
            .sum::<i16>();

        // the tiles before, read forward: first letter, change direction, rest.
        let before_node = if has_before {
            let mut node = gaddag.follow_letter(gaddag.root(), letter_at(start));
            node = gaddag.follow(gaddag.change_direction(node));
            for j in start + 1..i {
                node = gaddag.follow_letter(node, letter_at(j));
            }
            node
        } else {
            0
        };
        // the tiles after, read backward from the far end.
        let after_node = if has_after {
            let mut node = gaddag.root();
            for j in (i + 1..end).rev() {
                node = gaddag.follow_letter(node, letter_at(j));
            }
            node
        } else {
            0
        };

        let letters = if !has_after {
            gaddag.word_completers(before_node)
        } else if !has_before {
            gaddag.word_completers(after_node)
        } else if before_node > 0 && after_node > 0 {
            let mut bits = 0u64;
            let restriction = gaddag.shared_children(before_node, after_node);
            for (letter, edge) in gaddag.children(before_node, restriction) {
                let mut node = gaddag.follow(edge);
                let mut last_edge = -1;
                for j in i + 1..end {
                    last_edge = gaddag.child(node, letter_at(j));
                    if last_edge <= 0 {
                        break;
                    }
                    node = gaddag.follow(last_edge);
                }
                if gaddag.completes_word(last_edge) {
                    bits |= 1 << letter;
                }
            }
            bits
        } else {
            0
        };

        hooks[here] = Hook {
            touches: true,
            letters,
            score: face_value * premiums[here].word_multiplier as i16,
        };
    }
}
