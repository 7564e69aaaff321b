// Copyright (C) 2020-2024 Andy Kurnia.

// A spot is a family of placements sharing one anchor square and one
// direction. Each spot carries an upper bound on the equity of anything that
// can be played there, so the search can visit spots best-first and skip the
// rest.

use super::{anagram, gaddag, hooks, movegen};

// lanes, racks and length tables fit in this many entries.
pub const MAX_LANE_LEN: usize = 32;

pub const NO_EQUITY: f32 = -9999.0;

#[derive(Clone, Copy, Debug)]
pub struct WorthChecking {
    pub could_be_best: bool,
    pub max_equity: f32,
}

impl Default for WorthChecking {
    #[inline(always)]
    fn default() -> Self {
        Self {
            could_be_best: false,
            max_equity: NO_EQUITY,
        }
    }
}

// Squares are counted from the anchor. For a hook spot the anchor is the
// first square played ahead. For a through spot the anchor is the first tile
// of the first run played through, and real_positions maps logical positions
// (anchor + ahead, anchor - behind) to lane indexes.
#[derive(Clone, Debug)]
pub struct Spot {
    pub down: bool,
    pub lane: i8,
    pub anchor: i8,
    pub use_blank: bool,
    pub can_make_any_word: bool,
    pub num_tiles_through: i8,
    pub through_score: i16,
    pub max_equity: f32,
    pub max_tiles_behind: i8,
    pub min_tiles_ahead: i8,
    pub max_tiles_ahead: i8,
    pub min_played: i8,
    pub max_played: i8,
    pub worth_checking: [WorthChecking; MAX_LANE_LEN],        // by num played
    pub worth_checking_behind: [WorthChecking; MAX_LANE_LEN], // by num behind
    pub longest_viable: i8,
    pub hindmost_viable: i8, // -1 if nothing behind is viable
    pub anchor_node: i32,
    pub real_positions: [i8; MAX_LANE_LEN],
}

impl Spot {
    pub fn new(down: bool, lane: i8, anchor: i8, anchor_node: i32) -> Self {
        Self {
            down,
            lane,
            anchor,
            use_blank: false,
            can_make_any_word: false,
            num_tiles_through: 0,
            through_score: 0,
            max_equity: NO_EQUITY,
            max_tiles_behind: 0,
            min_tiles_ahead: 0,
            max_tiles_ahead: 0,
            min_played: 0,
            max_played: 0,
            worth_checking: [WorthChecking::default(); MAX_LANE_LEN],
            worth_checking_behind: [WorthChecking::default(); MAX_LANE_LEN],
            longest_viable: 0,
            hindmost_viable: -1,
            anchor_node,
            real_positions: [0; MAX_LANE_LEN],
        }
    }

    #[inline(always)]
    pub fn viable_at_length(&self, num_played: i8) -> bool {
        self.worth_checking[num_played as usize].could_be_best
    }

    #[inline(always)]
    pub fn viable_with_behind(&self, behind: i8) -> bool {
        self.worth_checking_behind[behind as usize].could_be_best
    }
}

// A maximal run of occupied squares in a lane. node is reached from the
// gaddag root by its letters right to left (0 if no word contains the run).
struct Through {
    start: i8,
    end: i8,
    score: i16,
    node: i32,
}

// What spot finding and scoring read. Nothing here changes while spots are
// being built.
pub struct SpotEnv<'a> {
    pub board_snapshot: &'a movegen::BoardSnapshot<'a>,
    pub gaddag: gaddag::Gaddag<'a>,
    pub hooks: &'a hooks::HookTable,
    pub rack: &'a movegen::RackState,
    pub rack_tiles: &'a [u8],
    pub rack_anagrams: Option<&'a anagram::RackAnagrams>,
    pub best_leaves: &'a [f32], // by num played
}

impl SpotEnv<'_> {
    #[inline(always)]
    fn full_rack(&self) -> i8 {
        self.board_snapshot.game_config.rack_size()
    }

    // the first play goes across through the start square.
    pub fn find_empty_board_spots(&self, spots: &mut Vec<Spot>) {
        let num_tiles = self.rack.num_tiles;
        if num_tiles == 0 {
            return;
        }
        let board_layout = self.board_snapshot.game_config.board_layout();
        let dim = board_layout.dim();
        let star_col = board_layout.star_col();
        let mut spot = Spot::new(false, board_layout.star_row(), star_col, self.gaddag.root());
        spot.max_tiles_behind = (num_tiles - 1).min(star_col);
        spot.min_tiles_ahead = 1;
        spot.max_tiles_ahead = num_tiles.min(dim.cols - star_col);
        spot.longest_viable = num_tiles;
        spot.hindmost_viable = spot.max_tiles_behind;
        spot.min_played = 2;
        spot.max_played = num_tiles.min(spot.max_tiles_ahead + spot.max_tiles_behind);
        self.add_scored_spots(spot, spots);
    }

    pub fn find_spots(&self, spots: &mut Vec<Spot>) {
        if self.rack.num_tiles == 0 {
            return;
        }
        let dim = self.board_snapshot.game_config.board_layout().dim();
        for down in [false, true] {
            for lane in 0..dim.num_lanes(down) {
                self.find_hook_spots_in_lane(down, lane, spots);
                self.find_through_spots_in_lane(down, lane, spots);
            }
        }
    }

    // Spots anchored at an empty square with a perpendicular neighbor. The
    // anchor is the first such square of the play, so squares behind it are
    // neither hooked nor next to a tile in the lane.
    fn find_hook_spots_in_lane(&self, down: bool, lane: i8, spots: &mut Vec<Spot>) {
        let board_tiles = self.board_snapshot.board_tiles;
        let strider = self.board_snapshot.game_config.board_layout().dim().lane(down, lane);
        let len = strider.len();
        let num_tiles = self.rack.num_tiles;
        let rack_bits_or_blank = if self.rack.blank_on_rack() {
            self.board_snapshot.game_config.alphabet().every_letter()
        } else {
            self.rack.rack_bits
        };
        let mut start = 0;
        let mut idx = 0;
        while idx < len {
            let square = strider.at(idx);
            if board_tiles[square] != 0 {
                while idx < len && board_tiles[strider.at(idx)] != 0 {
                    idx += 1;
                }
                // the square after a run extends it, through spots cover that.
                start = idx + 1;
                idx += 1;
                continue;
            }
            let hook = self.hooks.at(down, square);
            if hook.touches {
                let rack_hooks = hook.letters & rack_bits_or_blank;
                if rack_hooks != 0 {
                    let mut spot = Spot::new(down, lane, idx, self.gaddag.root());
                    spot.max_tiles_behind = (num_tiles - 1).min(idx - start);
                    spot.min_tiles_ahead = 1;
                    spot.max_tiles_ahead = num_tiles.min(len - idx);
                    // stop short of the square before the next run.
                    if let Some(reach) = (idx + 1..=(len - 1).min(idx + spot.max_tiles_ahead))
                        .find(|&reach| board_tiles[strider.at(reach)] != 0)
                    {
                        spot.max_tiles_ahead = reach - idx - 1;
                    }
                    if spot.max_tiles_ahead >= 1 {
                        spot.longest_viable = num_tiles;
                        spot.hindmost_viable = spot.max_tiles_behind;
                        spot.min_played = 2;
                        spot.max_played =
                            num_tiles.min(spot.max_tiles_ahead + spot.max_tiles_behind);
                        self.restrict_spot_using_hooks(&mut spot, rack_bits_or_blank, rack_hooks);
                        self.add_scored_spots(spot, spots);
                    }
                }
                start = idx + 1;
            }
            idx += 1;
        }
    }

    // letters still available after the anchor takes its hook letter, when
    // the anchor can only be one letter.
    fn other_rack_bits(&self, rack_bits: u64, rack_hooks: u64) -> u64 {
        if rack_hooks.count_ones() != 1 {
            return rack_bits;
        }
        let only_hook = rack_hooks.trailing_zeros() as u8;
        match self.rack.counts[only_hook as usize] {
            0 => {
                // the anchor takes a blank.
                if self.rack.counts[0] > 1 {
                    rack_bits
                } else {
                    self.rack.rack_bits
                }
            }
            1 => {
                if self.rack.blank_on_rack() {
                    rack_bits
                } else {
                    rack_bits & !(1 << only_hook)
                }
            }
            _ => rack_bits,
        }
    }

    // plays cannot continue past a hooked square nothing on the rack fits.
    fn restrict_spot_using_hooks(&self, spot: &mut Spot, rack_bits: u64, rack_hooks: u64) {
        let rack_bits = self.other_rack_bits(rack_bits, rack_hooks);
        let strider = self
            .board_snapshot
            .game_config
            .board_layout()
            .dim()
            .lane(spot.down, spot.lane);
        for ahead in 1..spot.max_tiles_ahead {
            let hook = self.hooks.at(spot.down, strider.at(spot.anchor + ahead));
            if hook.touches && hook.letters & rack_bits == 0 {
                spot.max_tiles_ahead = ahead;
                return;
            }
        }
    }

    // Spots through runs i..=j of a lane, anchored at run i. Squares between
    // the runs must all be filled.
    fn find_through_spots_in_lane(&self, down: bool, lane: i8, spots: &mut Vec<Spot>) {
        let board_tiles = self.board_snapshot.board_tiles;
        let alphabet = self.board_snapshot.game_config.alphabet();
        let strider = self.board_snapshot.game_config.board_layout().dim().lane(down, lane);
        let len = strider.len();
        let num_tiles = self.rack.num_tiles;

        let mut throughs = Vec::new();
        let mut idx = 0;
        while idx < len {
            if board_tiles[strider.at(idx)] == 0 {
                idx += 1;
                continue;
            }
            let start = idx;
            let mut score = 0i16;
            while idx < len && board_tiles[strider.at(idx)] != 0 {
                score += alphabet.score(board_tiles[strider.at(idx)]) as i16;
                idx += 1;
            }
            let end = idx - 1;
            let mut node = self.gaddag.root();
            for j in (start..=end).rev() {
                node = self.gaddag.follow_letter(node, board_tiles[strider.at(j)] & 0x7f);
                if node == 0 {
                    break;
                }
            }
            throughs.push(Through {
                start,
                end,
                score,
                node,
            });
        }

        for (i, anchor_through) in throughs.iter().enumerate() {
            if anchor_through.node == 0 {
                continue;
            }
            let mut spot = Spot::new(down, lane, anchor_through.start, anchor_through.node);
            spot.max_tiles_behind = if i == 0 {
                anchor_through.start
            } else {
                // keep one empty square after the previous run.
                anchor_through.start - throughs[i - 1].end - 2
            }
            .min(num_tiles);
            for behind in 1..=spot.max_tiles_behind {
                let pos = spot.anchor - behind;
                spot.real_positions[pos as usize] = pos;
            }
            spot.min_tiles_ahead = 0;
            spot.max_tiles_ahead = 0;
            spot.longest_viable = num_tiles;
            spot.hindmost_viable = spot.max_tiles_behind;
            for j in i..throughs.len() {
                let through = &throughs[j];
                let next_through = throughs.get(j + 1);
                spot.through_score += through.score;
                spot.num_tiles_through += through.end - through.start + 1;
                let old_max_tiles_ahead = spot.max_tiles_ahead;
                spot.max_tiles_ahead += match next_through {
                    None => len - 1 - through.end,
                    Some(next_through) => next_through.start - through.end - 2,
                };
                spot.max_tiles_ahead = spot.max_tiles_ahead.min(num_tiles);
                spot.min_played = 1;
                spot.max_played = num_tiles.min(spot.max_tiles_ahead + spot.max_tiles_behind);
                for new_ahead in 1..=spot.max_tiles_ahead - old_max_tiles_ahead {
                    spot.real_positions[(spot.anchor + old_max_tiles_ahead + new_ahead) as usize] =
                        through.end + new_ahead;
                }
                self.add_scored_spots(spot.clone(), spots);
                if let Some(next_through) = next_through {
                    // to reach the next run, fill everything up to it.
                    spot.max_tiles_ahead += 1;
                    spot.min_tiles_ahead = spot.max_tiles_ahead;
                    if spot.min_tiles_ahead > num_tiles {
                        break;
                    }
                    spot.real_positions[(spot.anchor + spot.max_tiles_ahead) as usize] =
                        next_through.start - 1;
                    spot.max_tiles_behind = spot.max_tiles_behind.min(num_tiles - spot.min_tiles_ahead);
                }
            }
        }
    }

    // Splits a spot by whether a blank must be played and whether all tiles
    // are played, scores each part, keeps those where some word may fit.
    pub fn add_scored_spots(&self, mut spot: Spot, spots: &mut Vec<Spot>) {
        let full_rack = self.full_rack();
        if self.rack.blank_on_rack() {
            if spot.max_played == full_rack && spot.min_played < full_rack {
                let mut blank_bingos = spot.clone();
                blank_bingos.use_blank = true;
                if spot.num_tiles_through <= 1 {
                    blank_bingos.min_played = full_rack;
                }
                self.push_scored(blank_bingos, spots);
                if spot.num_tiles_through <= 1 {
                    let mut blank_nonbingos = spot.clone();
                    blank_nonbingos.use_blank = true;
                    blank_nonbingos.max_played = full_rack - 1;
                    self.push_scored(blank_nonbingos, spots);
                }
                spot.max_played = full_rack - 1;
                self.push_scored(spot, spots);
            } else if spot.min_played == full_rack {
                spot.use_blank = true;
                self.push_scored(spot, spots);
            } else {
                let mut blank = spot.clone();
                blank.use_blank = true;
                self.push_scored(blank, spots);
                self.push_scored(spot, spots);
            }
        } else if spot.max_played == full_rack && spot.min_played < full_rack {
            if spot.num_tiles_through <= 1 {
                let mut bingos = spot.clone();
                bingos.min_played = full_rack;
                self.push_scored(bingos, spots);
                spot.max_played = full_rack - 1;
            }
            self.push_scored(spot, spots);
        } else {
            self.push_scored(spot, spots);
        }
    }

    #[inline(always)]
    fn push_scored(&self, mut spot: Spot, spots: &mut Vec<Spot>) {
        self.score_spot(&mut spot);
        if spot.can_make_any_word {
            spots.push(spot);
        }
    }
}
