// Copyright (C) 2020-2024 Andy Kurnia.

mod common;

use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use spotgen::{
    anagram, bingo, display, gaddag, kibitzer, movegen, play_scorer, prime,
};

fn tally_of(alphabet_len: u8, rack: &[u8]) -> Vec<u8> {
    let mut tally = vec![0u8; alphabet_len as usize];
    for &tile in rack {
        tally[tile as usize] += 1;
    }
    tally
}

// (formatted play, equity) for every play, in a stable order.
fn summarize(
    board_snapshot: &movegen::BoardSnapshot<'_>,
    plays: &[movegen::ValuedMove],
) -> Vec<(String, i32)> {
    let mut summary = plays
        .iter()
        .map(|valued_move| {
            (
                display::fmt_play(board_snapshot, &valued_move.play).to_string(),
                (valued_move.equity * 1000.0).round() as i32,
            )
        })
        .collect::<Vec<_>>();
    summary.sort();
    summary
}

// Generates every play, checks each one independently, and checks that the
// best-only search agrees with the exhaustive one.
fn check_position(
    fixture: &common::Fixture<'_>,
    board_tiles: &[u8],
    rack: &[u8],
    tiles_in_bag: usize,
) -> Vec<movegen::ValuedMove> {
    let board_snapshot = fixture.snapshot(board_tiles);
    let alphabet_len = fixture.game_config.alphabet().len();
    let mut move_generator = movegen::MoveGenerator::new();
    let plays = move_generator
        .kibitz_all(&board_snapshot, rack, tiles_in_bag)
        .to_vec();
    assert_eq!(
        move_generator.rack_counts(),
        &tally_of(alphabet_len, rack)[..],
        "search must put every tile back"
    );
    assert!(!plays.is_empty(), "the pass is always there");
    assert!(
        plays.windows(2).all(|w| w[0].equity >= w[1].equity),
        "plays must be sorted by equity"
    );

    let mut play_scorer = play_scorer::PlayScorer::new();
    let mut seen = std::collections::HashSet::new();
    for valued_move in &plays {
        let label = display::fmt_play(&board_snapshot, &valued_move.play).to_string();
        assert!(seen.insert(label.clone()), "{} generated twice", label);
        if let Err(err) = play_scorer.validate(&board_snapshot, rack, &valued_move.play) {
            panic!("{} is not legal: {}", label, err);
        }
        if let movegen::Play::Place { score, .. } = &valued_move.play {
            assert_eq!(
                play_scorer.compute_score(&board_snapshot, &valued_move.play),
                *score,
                "{} is scored wrong",
                label
            );
        }
        let equity = play_scorer
            .compute_equity(&board_snapshot, rack, &valued_move.play)
            .unwrap();
        assert!(
            (equity - valued_move.equity).abs() < 1e-3,
            "{} has equity {} but rescores to {}",
            label,
            valued_move.equity,
            equity
        );
    }

    let best = move_generator.kibitz(&board_snapshot, rack, tiles_in_bag);
    assert!(
        (best.equity - plays[0].equity).abs() < 1e-3,
        "best search found {} ({}), exhaustive found {} ({})",
        display::fmt_play(&board_snapshot, &best.play),
        best.equity,
        display::fmt_play(&board_snapshot, &plays[0].play),
        plays[0].equity
    );
    assert_eq!(
        move_generator.rack_counts(),
        &tally_of(alphabet_len, rack)[..],
        "best search must put every tile back"
    );
    plays
}

/// First play: across through the start square, never a single tile.
#[test]
fn empty_board_plays_cover_the_start_square() {
    let fixture = common::Fixture::new();
    let board_tiles = fixture.empty_board();
    let rack = fixture.rack("ABCDEFG");
    let plays = check_position(&fixture, &board_tiles, &rack, 80);
    let mut num_twos = 0;
    for valued_move in &plays {
        if let movegen::Play::Place {
            down,
            lane,
            idx,
            word,
            ..
        } = &valued_move.play
        {
            assert!(!down, "empty board plays are across");
            assert_eq!(*lane, 7);
            assert!(*idx <= 7 && 7 < *idx + word.len() as i8, "must cover the start square");
            assert!(valued_move.play.num_played() >= 2, "no one-tile first play");
            if word.len() == 2 {
                num_twos += 1;
            }
        }
    }
    assert!(num_twos > 0, "AB, BA, FE and friends fit");
}

/// A blank completes a seven-letter word and earns the bonus.
#[test]
fn blank_bingo_gets_the_bonus() {
    let fixture = common::Fixture::new();
    let board_tiles = fixture.empty_board();
    let rack = fixture.rack("?AEINRT");
    let plays = check_position(&fixture, &board_tiles, &rack, 80);
    let bingos = plays
        .iter()
        .filter(|valued_move| valued_move.play.num_played() == 7)
        .collect::<Vec<_>>();
    assert!(!bingos.is_empty(), "STAINER and its anagrams fit");
    for valued_move in &bingos {
        let movegen::Play::Place { word, score, .. } = &valued_move.play else {
            panic!("a bingo is a placement");
        };
        assert!(word.iter().any(|&tile| tile & 0x80 != 0), "the blank is in it");
        assert!(*score >= 62, "six 1-point tiles doubled plus 50, got {}", score);
    }
    assert_eq!(plays[0].play.num_played(), 7, "nothing beats a bingo here");
}

/// A bingo also fits through existing tiles and hooks.
#[test]
fn midgame_positions() {
    let fixture = common::Fixture::new();
    let board_tiles = common::midgame_board(&fixture);
    for rack in ["?AEINRT", "AEINRST", "SSTTAAE", "QIZAJOB", "VVWWUUU", "?"] {
        check_position(&fixture, &board_tiles, &fixture.rack(rack), 60);
    }
    // no exchanges near the end.
    let plays = check_position(&fixture, &board_tiles, &fixture.rack("EARS"), 0);
    assert!(plays.iter().all(|valued_move| match &valued_move.play {
        movegen::Play::Exchange { tiles } => tiles.is_empty(),
        _ => true,
    }));
}

/// Each kept multiset is offered once, valued by its leave.
#[test]
fn exchanges_are_distinct_and_valued_by_leave() {
    let fixture = common::Fixture::new();
    let board_tiles = common::midgame_board(&fixture);
    let rack = fixture.rack("AABBCCD");
    let plays = check_position(&fixture, &board_tiles, &rack, 50);
    let exchanges = plays
        .iter()
        .filter_map(|valued_move| match &valued_move.play {
            movegen::Play::Exchange { tiles } if !tiles.is_empty() => {
                Some((tiles.clone(), valued_move.equity))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    // 3 * 3 * 3 * 2 kept multisets, minus keeping everything.
    assert_eq!(exchanges.len(), 53);
    let passes = plays.iter().filter(|valued_move| valued_move.play.is_pass()).count();
    assert_eq!(passes, 1);
    let keep_aa = exchanges
        .iter()
        .find(|(tiles, _)| tiles[..] == fixture.rack("BBCCD")[..])
        .expect("exchange BBCCD");
    assert_eq!(keep_aa.1, -4.0);

    // too few tiles in the bag to exchange.
    let plays = check_position(&fixture, &board_tiles, &rack, 3);
    assert!(!plays.iter().any(|valued_move| matches!(
        &valued_move.play,
        movegen::Play::Exchange { tiles } if !tiles.is_empty()
    )));
}

/// Anagram tables only prune, so the plays are the same with or without.
#[test]
fn anagram_index_changes_nothing() {
    let fixture = common::Fixture::new();
    let alphabet_len = fixture.game_config.alphabet().len();
    let board_tiles = common::midgame_board(&fixture);
    let board_snapshot = fixture.snapshot(&board_tiles);
    let racks = ["?AEINRT", "AEINRST", "QIZAJOB", "CDEFGAB"];
    let mut anagram_map = anagram::AnagramMap::new(alphabet_len);
    for rack in racks {
        anagram_map.add_rack(&fixture.kwg, &fixture.klv, alphabet_len, &fixture.rack(rack));
    }
    assert_eq!(anagram_map.len(), racks.len());
    let mut plain = movegen::MoveGenerator::new();
    let mut indexed = movegen::MoveGenerator::new().with_anagram_index(&anagram_map);
    for rack in racks {
        let rack = fixture.rack(rack);
        let expected = summarize(&board_snapshot, plain.kibitz_all(&board_snapshot, &rack, 50));
        let actual = summarize(&board_snapshot, indexed.kibitz_all(&board_snapshot, &rack, 50));
        assert_eq!(expected, actual);
        let best = indexed.kibitz(&board_snapshot, &rack, 50);
        let expected_best = plain.kibitz(&board_snapshot, &rack, 50);
        assert!((best.equity - expected_best.equity).abs() < 1e-3);
    }
}

/// Bingos found for many racks at once match the ones found one by one.
#[test]
fn batch_bingos_match_single_racks() {
    let fixture = common::Fixture::new();
    let alphabet_len = fixture.game_config.alphabet().len();
    let gaddag = gaddag::Gaddag::new(&fixture.kwg);
    let primes = prime::PrimeSet::new(alphabet_len);
    let racks = ["AEINRST", "?AEINRT", "?AEINST", "??AEINR", "QIZAJOB"]
        .iter()
        .map(|rack| fixture.rack(rack))
        .collect::<Vec<_>>();
    let bingo_map = bingo::find_bingos_for_racks(gaddag, &primes, &racks, 7);
    for rack in &racks {
        let mut single = Vec::new();
        bingo::find_bingos(gaddag, rack, alphabet_len, &mut single);
        single.sort();
        let mut batch = bingo_map
            .get(&primes.product(rack))
            .cloned()
            .unwrap_or_default();
        batch.sort();
        assert_eq!(single, batch, "rack {:?}", rack);
    }
    let mut natural = Vec::new();
    bingo::find_bingos(gaddag, &fixture.rack("AEINRST"), alphabet_len, &mut natural);
    assert_eq!(natural.len(), 8, "eight anagrams of AEINRST");
    let mut none = Vec::new();
    bingo::find_bingos(gaddag, &fixture.rack("QIZAJOB"), alphabet_len, &mut none);
    assert!(none.is_empty());

    // and the generator finds the same plays with the map.
    let board_tiles = common::midgame_board(&fixture);
    let board_snapshot = fixture.snapshot(&board_tiles);
    let mut plain = movegen::MoveGenerator::new();
    let mut mapped = movegen::MoveGenerator::new().with_bingo_map(&bingo_map);
    for rack in &racks {
        let expected = summarize(&board_snapshot, plain.kibitz_all(&board_snapshot, rack, 50));
        let actual = summarize(&board_snapshot, mapped.kibitz_all(&board_snapshot, rack, 50));
        assert_eq!(expected, actual);
    }
}

/// Racks drawn with a fixed seed, on an empty and a played board.
#[test]
fn seeded_random_racks() {
    let fixture = common::Fixture::new();
    let rack_size = fixture.game_config.rack_size() as usize;
    for board_tiles in [fixture.empty_board(), common::midgame_board(&fixture)] {
        let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
        let mut unseen = fixture.unseen(&board_tiles);
        for _ in 0..12 {
            unseen.shuffle(&mut rng);
            let rack = unseen[..rack_size].to_vec();
            check_position(&fixture, &board_tiles, &rack, unseen.len() - rack_size);
        }
    }
}

/// A short game where every chosen play is legal when it is made.
#[test]
fn self_play_stays_legal() {
    let fixture = common::Fixture::new();
    let dim = fixture.game_config.board_layout().dim();
    let rack_size = fixture.game_config.rack_size() as usize;
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut bag = spotgen::bag::Bag::new(fixture.game_config.alphabet());
    bag.shuffle(&mut rng);
    let mut board_tiles = fixture.empty_board();
    let mut rack = Vec::new();
    let mut move_generator = movegen::MoveGenerator::new();
    let mut play_scorer = play_scorer::PlayScorer::new();
    for _ in 0..10 {
        bag.replenish(&mut rack, rack_size);
        let board_snapshot = fixture.snapshot(&board_tiles);
        let valued_move = move_generator.kibitz(&board_snapshot, &rack, bag.len());
        play_scorer
            .validate(&board_snapshot, &rack, &valued_move.play)
            .unwrap();
        match &valued_move.play {
            movegen::Play::Exchange { tiles } => {
                assert!(spotgen::bag::Bag::use_tiles(&mut rack, tiles.iter().copied()));
                bag.put_back(&mut rng, tiles);
            }
            movegen::Play::Place { word, .. } => {
                assert!(spotgen::bag::Bag::use_tiles(
                    &mut rack,
                    word.iter().copied().filter(|&tile| tile != 0)
                ));
                play_scorer::apply_play(&mut board_tiles, dim, &valued_move.play);
            }
        }
    }
}

/// Questions come in as JSON and plays go out as JSON.
#[test]
fn kibitzer_answers_json() {
    let fixture = common::Fixture::new();
    let board_tiles = common::midgame_board(&fixture);
    let dim = fixture.game_config.board_layout().dim();
    let signed_board = (0..dim.rows)
        .map(|row| {
            (0..dim.cols)
                .map(|col| board_tiles[dim.at_row_col(row, col)] as i8)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let question = kibitzer::Question {
        rack: fixture.rack("?AEINRT"),
        board_tiles: signed_board,
        max_gen: 5,
    };
    let question: kibitzer::Question =
        serde_json::from_str(&serde_json::to_string(&question).unwrap()).unwrap();

    let mut kibitzer = kibitzer::Kibitzer::new();
    let mut move_generator = movegen::MoveGenerator::new();
    let answers = kibitzer
        .answer(
            &mut move_generator,
            &fixture.game_config,
            &fixture.kwg,
            &fixture.klv,
            &question,
        )
        .unwrap();
    assert_eq!(answers.len(), 5);
    assert!(answers.windows(2).all(|w| w[0].equity >= w[1].equity));
    // 100 tiles, 7 on the board, 7 on this rack, 7 on the other.
    assert_eq!(kibitzer.tiles_in_bag(&fixture.game_config), 79);
    let json = serde_json::to_string(&answers).unwrap();
    assert!(json.contains("\"action\":\"play\""), "{}", json);

    let best = kibitzer
        .answer(
            &mut move_generator,
            &fixture.game_config,
            &fixture.kwg,
            &fixture.klv,
            &kibitzer::Question { max_gen: 1, ..question },
        )
        .unwrap();
    assert_eq!(best.len(), 1);
    assert!((best[0].equity - answers[0].equity).abs() < 1e-3);
}

/// Blanks are negative in JSON and 0x80 | letter everywhere else.
#[test]
fn json_blank_convention() {
    let json_play = kibitzer::JsonPlay::Play {
        down: true,
        lane: 7,
        idx: 3,
        word: Box::new([3, -1, 0, 19]),
        score: 9,
    };
    let play = movegen::Play::from(&json_play);
    assert_eq!(
        play,
        movegen::Play::Place {
            down: true,
            lane: 7,
            idx: 3,
            word: Box::new([3, 0x81, 0, 19]),
            score: 9,
        }
    );
    assert_eq!(kibitzer::JsonPlay::from(&play), json_play);
    let json = serde_json::to_string(&kibitzer::JsonPlay::from(&movegen::Play::Exchange {
        tiles: Box::new([]),
    }))
    .unwrap();
    assert_eq!(json, r#"{"action":"exchange","tiles":[]}"#);
}

/// Questions that do not match the tile distribution are refused.
#[test]
fn kibitzer_rejects_bad_questions() {
    let fixture = common::Fixture::new();
    let mut kibitzer = kibitzer::Kibitzer::new();
    let empty_rows = vec![vec![0i8; 15]; 15];
    assert!(kibitzer.prepare(&fixture.game_config, &[26, 26], &empty_rows).is_err(), "one Z only");
    assert!(kibitzer.prepare(&fixture.game_config, &[27], &empty_rows).is_err(), "no tile 27");
    assert!(
        kibitzer.prepare(&fixture.game_config, &[1], &empty_rows[..14]).is_err(),
        "14 rows"
    );
    let mut three_blanks = empty_rows.clone();
    three_blanks[7][6] = -1;
    three_blanks[7][7] = -2;
    three_blanks[7][8] = -3;
    assert!(kibitzer.prepare(&fixture.game_config, &[], &three_blanks).is_err(), "two blanks only");
    assert!(kibitzer.prepare(&fixture.game_config, &[1, 0], &empty_rows).is_ok());
    assert_eq!(kibitzer.tiles_in_bag(&fixture.game_config), 91);
}

/// Moves print the way players write them.
#[test]
fn plays_are_formatted() {
    let fixture = common::Fixture::new();
    let board_tiles = common::midgame_board(&fixture);
    let board_snapshot = fixture.snapshot(&board_tiles);
    let fmt = |play: &movegen::Play| display::fmt_play(&board_snapshot, play).to_string();
    assert_eq!(
        fmt(&movegen::Play::Place {
            down: true,
            lane: 7,
            idx: 7,
            word: Box::new([0, 0, 0, 0, 19]),
            score: 5,
        }),
        "H8 (TEAR)S 5"
    );
    assert_eq!(
        fmt(&movegen::Play::Place {
            down: false,
            lane: 8,
            idx: 6,
            word: fixture.game_config.alphabet().parse_word("aE").unwrap().into(),
            score: 3,
        }),
        "9G aE 3"
    );
    assert_eq!(fmt(&movegen::Play::Exchange { tiles: Box::new([]) }), "-");
    assert_eq!(
        fmt(&movegen::Play::Exchange {
            tiles: fixture.rack("?Q").into()
        }),
        "- ?Q"
    );
}

/// Equally good plays take turns being the answer.
#[test]
fn tiebreaker_rotates_ties() {
    let fixture = common::Fixture::new();
    let board_tiles = fixture.empty_board();
    let board_snapshot = fixture.snapshot(&board_tiles);
    let rack = fixture.rack("AB");
    let tiebreaker = movegen::Tiebreaker::new();
    let mut move_generator = movegen::MoveGenerator::new().with_tiebreaker(&tiebreaker);
    // AB and BA, each at 8G and 8H, all worth 8.
    let mut seen = std::collections::HashSet::new();
    for _ in 0..4 {
        let valued_move = move_generator.kibitz(&board_snapshot, &rack, 0);
        assert_eq!(valued_move.equity, 8.0);
        seen.insert(display::fmt_play(&board_snapshot, &valued_move.play).to_string());
    }
    assert_eq!(seen.len(), 4, "{:?}", seen);
}
