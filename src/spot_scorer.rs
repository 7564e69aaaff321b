// Copyright (C) 2020-2024 Andy Kurnia.

use super::spot::{self, NO_EQUITY, Spot, SpotEnv, WorthChecking};

impl SpotEnv<'_> {
    // whether some word of num_played rack tiles may be played. only racks
    // with an anagram entry can say no.
    pub fn could_make_word(&self, spot: &Spot, num_played: i8) -> bool {
        let Some(rack_anagrams) = self.rack_anagrams else {
            return true;
        };
        let uses_tiles = rack_anagrams.class(spot.use_blank);
        let num_played_bits = match spot.num_tiles_through {
            0 => uses_tiles.thru_none.num_played,
            1 => match uses_tiles.through_letter(self.through_letter(spot)) {
                Some(anagrams) => anagrams.num_played,
                None => return false,
            },
            _ => return true,
        };
        num_played_bits & (1 << num_played) != 0
    }

    // an upper bound on the leave after playing num_played tiles.
    pub fn best_leave(&self, spot: &Spot, num_played: i8) -> f32 {
        if let Some(rack_anagrams) = self.rack_anagrams {
            let uses_tiles = rack_anagrams.class(spot.use_blank);
            match spot.num_tiles_through {
                0 => return uses_tiles.thru_none.best_leaves[num_played as usize - 1],
                1 => {
                    return match uses_tiles.through_letter(self.through_letter(spot)) {
                        Some(anagrams) => anagrams.best_leaves[num_played as usize - 1],
                        None => NO_EQUITY,
                    };
                }
                _ => {}
            }
        }
        self.best_leaves[num_played as usize]
    }

    #[inline(always)]
    fn through_letter(&self, spot: &Spot) -> u8 {
        let strider = self
            .board_snapshot
            .game_config
            .board_layout()
            .dim()
            .lane(spot.down, spot.lane);
        self.board_snapshot.board_tiles[strider.at(spot.anchor)] & 0x7f
    }

    // Fills worth_checking, worth_checking_behind and max_equity with upper
    // bounds, pairing the best tiles with the best squares for every length
    // and every split of the tiles around the anchor.
    pub fn score_spot(&self, spot: &mut Spot) {
        if spot.num_tiles_through <= 1 {
            match (spot.min_played..=spot.max_played)
                .rev()
                .find(|&num_played| self.could_make_word(spot, num_played))
            {
                Some(num_played) => spot.max_played = num_played,
                None => return,
            }
        }
        spot.worth_checking = [WorthChecking::default(); spot::MAX_LANE_LEN];
        spot.worth_checking_behind = [WorthChecking::default(); spot::MAX_LANE_LEN];
        spot.can_make_any_word = false;
        spot.max_equity = NO_EQUITY;

        let game_config = self.board_snapshot.game_config;
        let alphabet = game_config.alphabet();
        let premiums = game_config.board_layout().premiums();
        let strider = game_config.board_layout().dim().lane(spot.down, spot.lane);

        let mut tile_scores = self
            .rack_tiles
            .iter()
            .map(|&tile| alphabet.score(tile) as i16)
            .collect::<Vec<_>>();
        tile_scores.sort_unstable_by(|a, b| b.cmp(a));
        let blank_score = alphabet.score(0) as i16;
        // the blank that must be played is scored on its own.
        if spot.use_blank {
            if let Some(idx) = tile_scores.iter().rposition(|&score| score == blank_score) {
                tile_scores.remove(idx);
            }
        }

        // squares in lane order, behind squares first.
        let max_behind = spot.max_tiles_behind;
        let num_squares = (max_behind + spot.max_tiles_ahead) as usize;
        let mut word_multipliers = [0i16; spot::MAX_LANE_LEN];
        let mut tile_multipliers = [0i16; spot::MAX_LANE_LEN];
        let mut hook_multipliers = [0i16; spot::MAX_LANE_LEN];
        let mut hook_scores = [0i16; spot::MAX_LANE_LEN];
        for (i, logical) in (1..=max_behind)
            .rev()
            .map(|behind| spot.anchor - behind)
            .chain((1..=spot.max_tiles_ahead).map(|ahead| {
                if spot.num_tiles_through > 0 {
                    spot.real_positions[(spot.anchor + ahead) as usize]
                } else {
                    spot.anchor + ahead - 1
                }
            }))
            .enumerate()
        {
            let square = strider.at(logical);
            let premium = premiums[square];
            let hook = self.hooks.at(spot.down, square);
            word_multipliers[i] = premium.word_multiplier as i16;
            tile_multipliers[i] = premium.tile_multiplier as i16;
            if hook.touches {
                hook_multipliers[i] =
                    premium.tile_multiplier as i16 * premium.word_multiplier as i16;
                hook_scores[i] = hook.score;
            }
        }
        debug_assert!(num_squares <= spot::MAX_LANE_LEN);

        let mut multipliers = Vec::with_capacity(num_squares);
        let mut scores = Vec::with_capacity(num_squares);
        for ahead in spot.min_tiles_ahead..=spot.max_tiles_ahead {
            let min_behind = (spot.min_played - ahead).max(0);
            let max_behind_here = max_behind.min(spot.max_played - ahead);
            for behind in min_behind..=max_behind_here {
                let num_played = ahead + behind;
                if num_played == 0 || (num_played == 1 && spot.num_tiles_through == 0) {
                    continue;
                }
                if !self.could_make_word(spot, num_played) {
                    continue;
                }
                let played_squares = (max_behind - behind) as usize..(max_behind + ahead) as usize;
                let word_multiplier = played_squares
                    .clone()
                    .map(|i| word_multipliers[i])
                    .product::<i16>();
                multipliers.clear();
                multipliers.extend(
                    played_squares
                        .clone()
                        .map(|i| tile_multipliers[i] * word_multiplier + hook_multipliers[i]),
                );
                multipliers.sort_unstable_by(|a, b| b.cmp(a));
                scores.clear();
                let num_natural = (num_played - spot.use_blank as i8) as usize;
                scores.extend(tile_scores.iter().take(num_natural).copied());
                if spot.use_blank {
                    scores.push(blank_score);
                    scores.sort_unstable_by(|a, b| b.cmp(a));
                }
                let played_score = multipliers
                    .iter()
                    .zip(scores.iter())
                    .map(|(&multiplier, &score)| multiplier * score)
                    .sum::<i16>();
                let hook_score = played_squares.map(|i| hook_scores[i]).sum::<i16>();
                let score = spot.through_score * word_multiplier
                    + played_score
                    + hook_score
                    + game_config.num_played_bonus(num_played);
                let mut equity = score as f32;
                if num_played < self.rack.num_tiles {
                    equity += self.best_leave(spot, num_played);
                }

                spot.can_make_any_word = true;
                let by_length = &mut spot.worth_checking[num_played as usize];
                by_length.could_be_best = true;
                by_length.max_equity = by_length.max_equity.max(equity);
                let by_behind = &mut spot.worth_checking_behind[behind as usize];
                by_behind.could_be_best = true;
                by_behind.max_equity = by_behind.max_equity.max(equity);
                spot.max_equity = spot.max_equity.max(equity);
            }
        }
    }
}
