// Copyright (C) 2020-2024 Andy Kurnia.

use super::{anagram, bingo, exchange, gaddag, game_config, hooks, klv, kwg, matrix, prime, spot};

// Equities closer than this are ties.
pub const EQUITY_EPSILON: f32 = 1e-4;

pub struct BoardSnapshot<'a> {
    pub board_tiles: &'a [u8],
    pub game_config: &'a game_config::GameConfig<'a>,
    pub kwg: &'a kwg::Kwg,
    pub klv: &'a klv::Klv,
}

impl BoardSnapshot<'_> {
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.board_tiles.iter().all(|&tile| tile == 0)
    }
}

// across plays: down=false, lane=row, idx=col (0-based).
// down plays: down=true, lane=col, idx=row (0-based).
// word: 0 for play-through, 1 for A, 0x81 for blank-as-A.
// an exchange of no tiles is a pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Play {
    Exchange {
        tiles: Box<[u8]>,
    },
    Place {
        down: bool,
        lane: i8,
        idx: i8,
        word: Box<[u8]>,
        score: i16,
    },
}

impl Play {
    #[inline(always)]
    pub fn is_pass(&self) -> bool {
        matches!(self, Play::Exchange { tiles } if tiles.is_empty())
    }

    // tiles leaving the rack.
    pub fn num_played(&self) -> usize {
        match self {
            Play::Exchange { tiles } => tiles.len(),
            Play::Place { word, .. } => word.iter().filter(|&&tile| tile != 0).count(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ValuedMove {
    pub equity: f32,
    pub play: Play,
}

// Picks among equally good plays. This is the only state shared across
// generator calls; concurrent callers each get a distinct ticket.
pub struct Tiebreaker(std::sync::atomic::AtomicUsize);

impl Tiebreaker {
    pub const fn new() -> Self {
        Self(std::sync::atomic::AtomicUsize::new(0))
    }

    #[inline(always)]
    pub fn next(&self) -> usize {
        self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    }
}

impl Default for Tiebreaker {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

pub static TIEBREAKER: Tiebreaker = Tiebreaker::new();

// The rack being searched. counts[0] is the number of blanks, rack_bits has
// bit L set while a natural L remains.
pub struct RackState {
    pub counts: Box<[u8]>,
    pub rack_bits: u64,
    pub num_tiles: i8,
    pub num_blanks: u8,
}

impl RackState {
    pub fn new() -> Self {
        Self {
            counts: Box::new([]),
            rack_bits: 0,
            num_tiles: 0,
            num_blanks: 0,
        }
    }

    pub fn reset(&mut self, alphabet_len: u8, rack: &[u8]) {
        if self.counts.len() != alphabet_len as usize {
            self.counts = vec![0u8; alphabet_len as usize].into_boxed_slice();
        } else {
            self.counts.iter_mut().for_each(|count| *count = 0);
        }
        self.rack_bits = 0;
        for &tile in rack {
            self.counts[tile as usize] += 1;
            if tile != 0 {
                self.rack_bits |= 1 << tile;
            }
        }
        self.num_tiles = rack.len() as i8;
        self.num_blanks = self.counts.first().copied().unwrap_or(0);
    }

    #[inline(always)]
    pub fn use_letter(&mut self, letter: u8) {
        let count = &mut self.counts[letter as usize];
        assert!(*count > 0);
        *count -= 1;
        if *count == 0 {
            self.rack_bits &= !(1 << letter);
        }
    }

    #[inline(always)]
    pub fn unuse_letter(&mut self, letter: u8) {
        self.counts[letter as usize] += 1;
        self.rack_bits |= 1 << letter;
    }

    #[inline(always)]
    pub fn use_blank(&mut self) {
        assert!(self.counts[0] > 0);
        self.counts[0] -= 1;
    }

    #[inline(always)]
    pub fn unuse_blank(&mut self) {
        self.counts[0] += 1;
    }

    #[inline(always)]
    pub fn blank_on_rack(&self) -> bool {
        self.counts[0] > 0
    }

    #[inline(always)]
    pub fn blank_was_played(&self) -> bool {
        self.counts[0] < self.num_blanks
    }

    #[inline(always)]
    pub fn leave_value(&self, klv: &klv::Klv) -> f32 {
        klv.leave_value_from_tally(&self.counts)
    }
}

impl Default for RackState {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

// Per-spot context for the search.
struct Env<'a> {
    board_snapshot: &'a BoardSnapshot<'a>,
    gaddag: gaddag::Gaddag<'a>,
    strider: matrix::Strider,
    full_rack: i8,
    spot: &'a mut spot::Spot,
    // -1 while extending behind the anchor, 1 after changing direction.
    velocity: i8,
}

impl Env<'_> {
    #[inline(always)]
    fn tile_at(&self, idx: i8) -> u8 {
        self.board_snapshot.board_tiles[self.strider.at(idx)]
    }

    // extends edge over the board tiles that follow real, which must be
    // played through when moving forward.
    fn follow_to_real_child(&self, mut real: i8, mut edge: i32) -> i32 {
        loop {
            real += 1;
            if real >= self.strider.len() {
                return edge;
            }
            let tile = self.tile_at(real);
            if tile == 0 {
                return edge;
            }
            edge = self.gaddag.child(self.gaddag.follow(edge), tile & 0x7f);
            if edge <= 0 {
                return -1;
            }
        }
    }
}

// logical position (index into placed) and real lane index of the square at
// delta from the anchor.
#[inline(always)]
fn square_at(spot: &spot::Spot, delta: i8) -> (i8, i8) {
    let pos = spot.anchor + delta;
    if spot.num_tiles_through > 0 {
        (pos, spot.real_positions[pos as usize])
    } else {
        (pos, pos)
    }
}

pub struct MoveGenerator<'a> {
    anagram_index: Option<&'a dyn anagram::AnagramIndex>,
    bingo_map: Option<&'a bingo::BingoMap>,
    tiebreaker: &'a Tiebreaker,
    rack_anagrams: Option<&'a anagram::RackAnagrams>,
    rack: RackState,
    rack_tiles: Vec<u8>,
    best_leaves: Vec<f32>,
    hooks: hooks::HookTable,
    bingos: Vec<Box<[u8]>>,
    placed: Box<[u8]>,
    main_word_score: i16,
    hook_score: i16,
    just_best: bool,
    pub plays: Vec<ValuedMove>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new() -> Self {
        Self {
            anagram_index: None,
            bingo_map: None,
            tiebreaker: &TIEBREAKER,
            rack_anagrams: None,
            rack: RackState::new(),
            rack_tiles: Vec::new(),
            best_leaves: Vec::new(),
            hooks: hooks::HookTable::new(matrix::Dim::default()),
            bingos: Vec::new(),
            placed: vec![0u8; spot::MAX_LANE_LEN].into_boxed_slice(),
            main_word_score: 0,
            hook_score: 0,
            just_best: true,
            plays: Vec::new(),
        }
    }

    pub fn with_anagram_index(mut self, anagram_index: &'a dyn anagram::AnagramIndex) -> Self {
        self.anagram_index = Some(anagram_index);
        self
    }

    pub fn with_bingo_map(mut self, bingo_map: &'a bingo::BingoMap) -> Self {
        self.bingo_map = Some(bingo_map);
        self
    }

    pub fn with_tiebreaker(mut self, tiebreaker: &'a Tiebreaker) -> Self {
        self.tiebreaker = tiebreaker;
        self
    }

    // rack counts after the last call, for checking that the search put
    // every tile back.
    pub fn rack_counts(&self) -> &[u8] {
        &self.rack.counts
    }

    // one of the best plays. ties are broken by the tiebreaker.
    pub fn kibitz(
        &mut self,
        board_snapshot: &BoardSnapshot<'_>,
        rack: &[u8],
        tiles_in_bag: usize,
    ) -> ValuedMove {
        self.just_best = true;
        self.find_static_plays(board_snapshot, rack, tiles_in_bag);
        // the pass is always there.
        let idx = self.tiebreaker.next() % self.plays.len();
        self.plays[idx].clone()
    }

    // every legal play, best first.
    pub fn kibitz_all(
        &mut self,
        board_snapshot: &BoardSnapshot<'_>,
        rack: &[u8],
        tiles_in_bag: usize,
    ) -> &[ValuedMove] {
        self.just_best = false;
        self.find_static_plays(board_snapshot, rack, tiles_in_bag);
        self.plays.sort_by(|a, b| b.equity.total_cmp(&a.equity));
        &self.plays
    }

    fn find_static_plays(
        &mut self,
        board_snapshot: &BoardSnapshot<'_>,
        rack: &[u8],
        tiles_in_bag: usize,
    ) {
        let game_config = board_snapshot.game_config;
        let alphabet = game_config.alphabet();
        let dim = game_config.board_layout().dim();
        let full_rack = game_config.rack_size();
        assert!(dim.rows as usize <= spot::MAX_LANE_LEN);
        assert!(dim.cols as usize <= spot::MAX_LANE_LEN);
        assert!(rack.len() <= full_rack as usize);
        let klv = board_snapshot.klv;
        let gaddag = gaddag::Gaddag::new(board_snapshot.kwg);

        self.plays.clear();
        self.rack_tiles.clear();
        self.rack_tiles.extend_from_slice(rack);
        self.rack_tiles.sort_unstable();
        self.rack.reset(alphabet.len(), &self.rack_tiles);
        let primes = prime::PrimeSet::new(alphabet.len());
        let product = primes.product(&self.rack_tiles);
        let anagram_index = self.anagram_index;
        self.rack_anagrams = anagram_index.and_then(|index| index.look_up(&self.rack_tiles));

        self.bingos.clear();
        if self.rack.num_tiles == full_rack && self.could_have_bingos(full_rack) {
            match self.bingo_map.and_then(|bingo_map| bingo_map.get(&product)) {
                Some(bingos) => self.bingos.extend_from_slice(bingos),
                None => {
                    bingo::find_bingos(gaddag, &self.rack_tiles, alphabet.len(), &mut self.bingos)
                }
            }
        }

        self.plays.push(ValuedMove {
            equity: self.rack.leave_value(klv),
            play: Play::Exchange {
                tiles: Box::new([]),
            },
        });

        let can_exchange = tiles_in_bag >= game_config.exchange_tile_limit().max(1) as usize;
        let just_best = self.just_best;
        let mut best_exchange = None::<ValuedMove>;
        {
            let plays = &mut self.plays;
            exchange::evaluate_exchanges(
                klv,
                &primes,
                &self.rack_tiles,
                alphabet.len(),
                &mut self.best_leaves,
                |tiles, leave| {
                    if !can_exchange {
                        return;
                    }
                    let valued_move = ValuedMove {
                        equity: leave,
                        play: Play::Exchange {
                            tiles: tiles.into(),
                        },
                    };
                    if !just_best {
                        plays.push(valued_move);
                    } else if best_exchange
                        .as_ref()
                        .is_none_or(|best| best.equity < leave)
                    {
                        best_exchange = Some(valued_move);
                    }
                },
            );
        }
        if let Some(valued_move) = best_exchange {
            if self.clearly_better(valued_move.equity) {
                self.plays.clear();
                self.plays.push(valued_move);
            } else if self.best_enough(valued_move.equity) {
                self.plays.push(valued_move);
            }
        }

        self.hooks.compute(board_snapshot);

        let mut spots = Vec::new();
        {
            let spot_env = spot::SpotEnv {
                board_snapshot,
                gaddag,
                hooks: &self.hooks,
                rack: &self.rack,
                rack_tiles: &self.rack_tiles,
                rack_anagrams: self.rack_anagrams,
                best_leaves: &self.best_leaves,
            };
            if board_snapshot.is_empty() {
                spot_env.find_empty_board_spots(&mut spots);
            } else {
                spot_env.find_spots(&mut spots);
            }
        }
        spots.sort_unstable_by(|a, b| {
            b.max_equity
                .total_cmp(&a.max_equity)
                .then(a.use_blank.cmp(&b.use_blank))
        });

        for spot in spots.iter_mut() {
            self.restrict_spot(spot);
            if self.just_best && !self.best_enough(spot.max_equity) {
                continue;
            }
            let mut env = Env {
                board_snapshot,
                gaddag,
                strider: dim.lane(spot.down, spot.lane),
                full_rack,
                spot,
                velocity: -1,
            };
            self.find_moves_at(&mut env);
        }
    }

    fn could_have_bingos(&self, full_rack: i8) -> bool {
        self.rack_anagrams.is_none_or(|rack_anagrams| {
            rack_anagrams
                .class(self.rack.blank_on_rack())
                .thru_none
                .num_played
                & (1 << full_rack)
                != 0
        })
    }

    #[inline(always)]
    fn best_enough(&self, equity: f32) -> bool {
        self.plays[0].equity <= equity + EQUITY_EPSILON
    }

    #[inline(always)]
    fn clearly_better(&self, equity: f32) -> bool {
        self.plays[0].equity + EQUITY_EPSILON <= equity
    }

    // drops lengths and behind counts that can no longer reach the best.
    fn restrict_spot(&self, spot: &mut spot::Spot) {
        if !self.just_best {
            return;
        }
        let mut longest_viable = 0;
        for len in 1..=spot.longest_viable {
            let worth_checking = &mut spot.worth_checking[len as usize];
            if worth_checking.could_be_best && self.best_enough(worth_checking.max_equity) {
                longest_viable = len;
            } else {
                worth_checking.could_be_best = false;
            }
        }
        spot.longest_viable = longest_viable;
        let mut hindmost_viable = -1;
        for behind in 0..=spot.hindmost_viable {
            let worth_checking = &mut spot.worth_checking_behind[behind as usize];
            if worth_checking.could_be_best && self.best_enough(worth_checking.max_equity) {
                hindmost_viable = behind;
            } else {
                worth_checking.could_be_best = false;
            }
        }
        spot.hindmost_viable = hindmost_viable;
    }

    fn find_moves_at(&mut self, env: &mut Env<'_>) {
        self.main_word_score = env.spot.through_score;
        self.hook_score = 0;
        let ahead = (env.spot.num_tiles_through == 0) as i8;
        let anchor_node = env.spot.anchor_node;
        if env.spot.min_played == env.full_rack && env.spot.num_tiles_through == 0 {
            self.fit_bingos(env);
        } else if env.spot.use_blank {
            self.find_blank_required(env, 0, ahead, 0, 1, anchor_node);
        } else {
            self.find_blankless(env, 0, ahead, 0, 1, anchor_node);
        }
    }

    fn find_more_blankless(
        &mut self,
        env: &mut Env<'_>,
        delta: i8,
        ahead: i8,
        behind: i8,
        word_multiplier: i16,
        node: i32,
    ) {
        if env.velocity < 0 {
            if behind < env.spot.max_tiles_behind && behind < env.spot.hindmost_viable {
                self.find_blankless(env, delta - 1, ahead, behind + 1, word_multiplier, node);
            }
            if ahead >= env.spot.max_tiles_ahead || !env.spot.viable_with_behind(behind) {
                return;
            }
            let node = env.gaddag.follow(env.gaddag.change_direction(node));
            if node > 0 {
                env.velocity = 1;
                self.find_blankless(env, 1, ahead + 1, behind, word_multiplier, node);
                env.velocity = -1;
            }
        } else if ahead < env.spot.max_tiles_ahead {
            self.find_blankless(env, delta + 1, ahead + 1, behind, word_multiplier, node);
        }
    }

    fn find_more_blank_required(
        &mut self,
        env: &mut Env<'_>,
        delta: i8,
        ahead: i8,
        behind: i8,
        word_multiplier: i16,
        node: i32,
    ) {
        if env.velocity < 0 {
            if behind < env.spot.max_tiles_behind && behind < env.spot.hindmost_viable {
                self.find_blank_required(env, delta - 1, ahead, behind + 1, word_multiplier, node);
            }
            if ahead >= env.spot.max_tiles_ahead || !env.spot.viable_with_behind(behind) {
                return;
            }
            let node = env.gaddag.follow(env.gaddag.change_direction(node));
            if node > 0 {
                env.velocity = 1;
                self.find_blank_required(env, 1, ahead + 1, behind, word_multiplier, node);
                env.velocity = -1;
            }
        } else if ahead < env.spot.max_tiles_ahead {
            self.find_blank_required(env, delta + 1, ahead + 1, behind, word_multiplier, node);
        }
    }

    // continue after a tile at delta, with or without a blank left to spend.
    fn find_more(
        &mut self,
        env: &mut Env<'_>,
        delta: i8,
        ahead: i8,
        behind: i8,
        word_multiplier: i16,
        node: i32,
    ) {
        if self.rack.blank_on_rack() {
            self.find_more_blank_required(env, delta, ahead, behind, word_multiplier, node);
        } else {
            self.find_more_blankless(env, delta, ahead, behind, word_multiplier, node);
        }
    }

    fn find_blankless(
        &mut self,
        env: &mut Env<'_>,
        delta: i8,
        ahead: i8,
        behind: i8,
        word_multiplier: i16,
        node: i32,
    ) {
        let num_tiles_through = env.spot.num_tiles_through;
        if num_tiles_through > 0 && delta == 0 {
            self.find_more_blankless(env, delta, ahead, behind, word_multiplier, node);
            return;
        }

        let (pos, real) = square_at(env.spot, delta);
        let num_played = ahead + behind;
        let square = env.strider.at(real);
        let hook = self.hooks.at(env.spot.down, square);
        let mut possible_letters = self.rack.rack_bits;
        if hook.touches {
            possible_letters &= hook.letters;
            if possible_letters == 0 {
                return;
            }
            self.hook_score += hook.score;
        }
        let alphabet = env.board_snapshot.game_config.alphabet();
        let premium = env.board_snapshot.game_config.board_layout().premiums()[square];
        let new_word_multiplier = word_multiplier * premium.word_multiplier as i16;
        let letter_multiplier = premium.tile_multiplier as i16;
        let hook_multiplier = if hook.touches {
            letter_multiplier * premium.word_multiplier as i16
        } else {
            0
        };

        for (letter, mut edge) in env.gaddag.children(node, possible_letters) {
            if env.velocity > 0 && num_tiles_through > 0 {
                edge = env.follow_to_real_child(real, edge);
                if edge <= 0 {
                    continue;
                }
            }
            let letter_score = alphabet.score(letter) as i16;
            let tile_main_score = letter_score * letter_multiplier;
            let tile_hook_score = letter_score * hook_multiplier;
            self.placed[pos as usize] = letter;
            self.main_word_score += tile_main_score;
            self.hook_score += tile_hook_score;
            self.rack.use_letter(letter);
            if env.spot.viable_at_length(num_played)
                && ahead >= env.spot.min_tiles_ahead
                && env.gaddag.completes_word(edge)
                && self.maybe_record(env, new_word_multiplier, behind, num_played)
            {
                self.restrict_spot(env.spot);
            }
            if num_played < env.spot.longest_viable {
                let next_node = env.gaddag.follow(edge);
                if next_node > 0 {
                    self.find_more_blankless(
                        env,
                        delta,
                        ahead,
                        behind,
                        new_word_multiplier,
                        next_node,
                    );
                }
            }
            self.hook_score -= tile_hook_score;
            self.main_word_score -= tile_main_score;
            self.rack.unuse_letter(letter);
            if num_played > env.spot.longest_viable {
                break;
            }
        }

        self.hook_score -= hook.score;
    }

    // like find_blankless, but no word is recorded unless a blank is in it.
    fn find_blank_required(
        &mut self,
        env: &mut Env<'_>,
        delta: i8,
        ahead: i8,
        behind: i8,
        word_multiplier: i16,
        node: i32,
    ) {
        let num_tiles_through = env.spot.num_tiles_through;
        if num_tiles_through > 0 && delta == 0 {
            self.find_more_blank_required(env, delta, ahead, behind, word_multiplier, node);
            return;
        }

        let (pos, real) = square_at(env.spot, delta);
        let num_played = ahead + behind;
        let square = env.strider.at(real);
        let hook = self.hooks.at(env.spot.down, square);
        let alphabet = env.board_snapshot.game_config.alphabet();
        let premium = env.board_snapshot.game_config.board_layout().premiums()[square];
        let new_word_multiplier = word_multiplier * premium.word_multiplier as i16;
        let letter_multiplier = premium.tile_multiplier as i16;
        let hook_multiplier = if hook.touches {
            letter_multiplier * premium.word_multiplier as i16
        } else {
            0
        };
        let mut possible_letters = alphabet.every_letter();
        if hook.touches {
            possible_letters &= hook.letters;
            if possible_letters == 0 {
                return;
            }
            self.hook_score += hook.score;
        }

        // the blank, as every letter it can be here.
        let blank_score = alphabet.score(0) as i16;
        let blank_main_score = blank_score * letter_multiplier;
        let blank_hook_score = blank_score * hook_multiplier;
        self.main_word_score += blank_main_score;
        self.hook_score += blank_hook_score;
        self.rack.use_blank();
        for (letter, mut edge) in env.gaddag.children(node, possible_letters) {
            if env.velocity > 0 && num_tiles_through > 0 {
                edge = env.follow_to_real_child(real, edge);
                if edge <= 0 {
                    continue;
                }
            }
            self.placed[pos as usize] = letter | 0x80;
            if env.spot.viable_at_length(num_played)
                && ahead >= env.spot.min_tiles_ahead
                && env.gaddag.completes_word(edge)
                && self.maybe_record(env, new_word_multiplier, behind, num_played)
            {
                self.restrict_spot(env.spot);
            }
            if num_played < env.spot.longest_viable {
                let next_node = env.gaddag.follow(edge);
                if next_node > 0 {
                    self.find_more(env, delta, ahead, behind, new_word_multiplier, next_node);
                }
            }
        }
        self.rack.unuse_blank();
        self.hook_score -= blank_hook_score;
        self.main_word_score -= blank_main_score;

        // a natural tile here only helps if a blank goes elsewhere.
        if self.rack.rack_bits == 0
            || (!self.rack.blank_was_played() && num_played >= env.spot.longest_viable)
        {
            self.hook_score -= hook.score;
            return;
        }
        possible_letters = self.rack.rack_bits;
        if hook.touches {
            possible_letters &= hook.letters;
            if possible_letters == 0 {
                self.hook_score -= hook.score;
                return;
            }
        }
        for (letter, mut edge) in env.gaddag.children(node, possible_letters) {
            if env.velocity > 0 && num_tiles_through > 0 {
                edge = env.follow_to_real_child(real, edge);
                if edge <= 0 {
                    continue;
                }
            }
            let letter_score = alphabet.score(letter) as i16;
            let tile_main_score = letter_score * letter_multiplier;
            let tile_hook_score = letter_score * hook_multiplier;
            self.placed[pos as usize] = letter;
            self.main_word_score += tile_main_score;
            self.hook_score += tile_hook_score;
            self.rack.use_letter(letter);
            if self.rack.blank_was_played()
                && env.spot.viable_at_length(num_played)
                && ahead >= env.spot.min_tiles_ahead
                && env.gaddag.completes_word(edge)
                && self.maybe_record(env, new_word_multiplier, behind, num_played)
            {
                self.restrict_spot(env.spot);
            }
            if num_played < env.spot.longest_viable {
                let next_node = env.gaddag.follow(edge);
                if next_node > 0 {
                    self.find_more(env, delta, ahead, behind, new_word_multiplier, next_node);
                }
            }
            self.hook_score -= tile_hook_score;
            self.main_word_score -= tile_main_score;
            self.rack.unuse_letter(letter);
            if num_played > env.spot.longest_viable {
                break;
            }
        }

        self.hook_score -= hook.score;
    }

    // returns true if the play became the new clear best.
    fn maybe_record(
        &mut self,
        env: &Env<'_>,
        word_multiplier: i16,
        behind: i8,
        num_played: i8,
    ) -> bool {
        let spot = &*env.spot;
        let game_config = env.board_snapshot.game_config;
        let score = self.main_word_score * word_multiplier
            + self.hook_score
            + game_config.num_played_bonus(num_played);
        let mut equity = score as f32;
        if num_played < self.rack.num_tiles {
            equity += self.rack.leave_value(env.board_snapshot.klv);
        }
        debug_assert!(
            equity <= spot.max_equity + 2.0 * EQUITY_EPSILON,
            "equity {} above spot bound {}",
            equity,
            spot.max_equity
        );
        if self.just_best && !self.best_enough(equity) {
            return false;
        }

        let start = spot.anchor - behind;
        let word_len = num_played + spot.num_tiles_through;
        let mut word = Vec::with_capacity(word_len as usize);
        let mut pos = start;
        for real in start..start + word_len {
            if pos == spot.anchor && spot.num_tiles_through > 0 {
                pos += 1;
            }
            if env.tile_at(real) == 0 {
                word.push(self.placed[pos as usize]);
                pos += 1;
            } else {
                word.push(0);
            }
        }

        // a lone tile with neighbors both ways is kept as the across play.
        if spot.down && num_played == 1 {
            if let Some(offset) = word.iter().position(|&tile| tile != 0) {
                let square = env.strider.at(start + offset as i8);
                if self.hooks.at(true, square).touches {
                    return false;
                }
            }
        }

        let was_clearly_better = self.just_best && self.clearly_better(equity);
        if was_clearly_better {
            self.plays.clear();
        }
        self.plays.push(ValuedMove {
            equity,
            play: Play::Place {
                down: spot.down,
                lane: spot.lane,
                idx: start,
                word: word.into_boxed_slice(),
                score,
            },
        });
        was_clearly_better
    }

    // squares anchor-behind to anchor+ahead-1 of a spot without through tiles.
    fn word_multiplier_and_hooks(&mut self, env: &Env<'_>, ahead: i8, behind: i8) -> i16 {
        let premiums = env.board_snapshot.game_config.board_layout().premiums();
        let mut word_multiplier = 1;
        self.hook_score = 0;
        for idx in env.spot.anchor - behind..env.spot.anchor + ahead {
            let square = env.strider.at(idx);
            let hook = self.hooks.at(env.spot.down, square);
            if hook.touches {
                self.hook_score += hook.score;
            }
            word_multiplier *= premiums[square].word_multiplier as i16;
        }
        word_multiplier
    }

    // places word at anchor-behind if every hooked square accepts its letter.
    fn fits(&mut self, env: &Env<'_>, word: &[u8], behind: i8, word_hook_score: &mut i16) -> bool {
        let start = env.spot.anchor - behind;
        for (idx, &tile) in (start..).zip(word) {
            let hook = self.hooks.at(env.spot.down, env.strider.at(idx));
            if hook.touches && hook.letters & (1 << (tile & 0x7f)) == 0 {
                return false;
            }
        }
        let game_config = env.board_snapshot.game_config;
        let alphabet = game_config.alphabet();
        let premiums = game_config.board_layout().premiums();
        self.main_word_score = 0;
        for (idx, &tile) in (start..).zip(word) {
            let square = env.strider.at(idx);
            let premium = premiums[square];
            let tile_score = alphabet.score(tile) as i16;
            self.placed[idx as usize] = tile;
            self.main_word_score += tile_score * premium.tile_multiplier as i16;
            if self.hooks.at(env.spot.down, square).touches {
                *word_hook_score +=
                    tile_score * premium.tile_multiplier as i16 * premium.word_multiplier as i16;
            }
        }
        true
    }

    fn fit_bingos(&mut self, env: &mut Env<'_>) {
        if self.bingos.is_empty() {
            return;
        }
        let bingos = std::mem::take(&mut self.bingos);
        let full_rack = env.full_rack;
        for ahead in env.spot.min_tiles_ahead..=env.spot.max_tiles_ahead {
            let behind = full_rack - ahead;
            if behind < 0 || behind > env.spot.max_tiles_behind {
                continue;
            }
            let word_multiplier = self.word_multiplier_and_hooks(env, ahead, behind);
            for bingo in &bingos {
                let mut word_hook_score = 0;
                if !self.fits(env, bingo, behind, &mut word_hook_score) {
                    continue;
                }
                self.hook_score += word_hook_score;
                if self.maybe_record(env, word_multiplier, behind, full_rack) {
                    self.restrict_spot(env.spot);
                }
                self.hook_score -= word_hook_score;
            }
        }
        self.bingos = bingos;
    }
}

impl Default for MoveGenerator<'_> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
