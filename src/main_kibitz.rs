// Copyright (C) 2020-2024 Andy Kurnia.

use rand::prelude::*;
use spotgen::{
    bag, build, display, error, game_config, kibitzer, klv, kwg, movegen, play_scorer,
};

// a .kwg file as is, anything else as a word list with one word per line.
fn read_lexicon(game_config: &game_config::GameConfig<'_>, path: &str) -> error::Returns<kwg::Kwg> {
    if path.ends_with(".kwg") {
        return Ok(kwg::Kwg::from_bytes_alloc(&std::fs::read(path)?));
    }
    let alphabet = game_config.alphabet();
    let mut machine_words = Vec::<Box<[u8]>>::new();
    for s in std::fs::read_to_string(path)?.lines() {
        let s = s.trim();
        if s.is_empty() {
            continue;
        }
        machine_words.push(alphabet.parse_rack(&s.to_uppercase())?.into());
    }
    machine_words.sort_unstable();
    machine_words.dedup();
    Ok(kwg::Kwg::from_bytes_alloc(&build::build(
        build::BuildFormat::Gaddawg,
        &machine_words,
    )?))
}

// a .csv file of "leave,value" lines, or a .klv file.
fn read_leaves(
    game_config: &game_config::GameConfig<'_>,
    path: Option<&String>,
) -> error::Returns<klv::Klv> {
    let Some(path) = path else {
        return Ok(klv::Klv::from_bytes_alloc(klv::EMPTY_KLV_BYTES));
    };
    if !path.ends_with(".csv") {
        return Ok(klv::Klv::from_bytes_alloc(&std::fs::read(path)?));
    }
    let alphabet = game_config.alphabet();
    let mut leaves = Vec::new();
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for result in csv_reader.records() {
        let record = result?;
        leaves.push((alphabet.parse_rack(&record[0])?, record[1].parse::<f32>()?));
    }
    klv::Klv::from_leaves(&leaves)
}

fn answer_question(
    game_config: &game_config::GameConfig<'_>,
    kwg: &kwg::Kwg,
    klv: &klv::Klv,
) -> error::Returns<()> {
    let data = std::io::read_to_string(std::io::stdin())?;
    let question = serde_json::from_str::<kibitzer::Question>(&data)?;
    let mut kibitzer = kibitzer::Kibitzer::new();
    let mut move_generator = movegen::MoveGenerator::new();
    let t0 = std::time::Instant::now();
    let plays = kibitzer.answer(&mut move_generator, game_config, kwg, klv, &question)?;
    eprintln!("took {} ms", t0.elapsed().as_millis());
    println!("{}", serde_json::to_string(&plays)?);
    Ok(())
}

fn autoplay(
    game_config: &game_config::GameConfig<'_>,
    kwg: &kwg::Kwg,
    klv: &klv::Klv,
    seed: u64,
) -> error::Returns<()> {
    let alphabet = game_config.alphabet();
    let board_layout = game_config.board_layout();
    let dim = board_layout.dim();
    let rack_size = game_config.rack_size() as usize;
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
    let mut bag = bag::Bag::new(alphabet);
    bag.shuffle(&mut rng);
    let mut racks = [Vec::new(), Vec::new()];
    for rack in racks.iter_mut() {
        bag.replenish(rack, rack_size);
    }
    let mut board_tiles = vec![0u8; dim.area()];
    let mut scores = [0i32; 2];
    let mut move_generator = movegen::MoveGenerator::new();
    let mut play_scorer = play_scorer::PlayScorer::new();
    let mut zero_turns = 0;
    let mut turn = 0;
    println!("seed {}", seed);

    loop {
        display::print_board(alphabet, board_layout, &board_tiles);
        println!(
            "player 1: {}, player 2: {}, turn: player {}",
            scores[0],
            scores[1],
            turn + 1
        );
        let rack = &mut racks[turn];
        println!("rack: {}", alphabet.fmt_rack(rack));

        let board_snapshot = &movegen::BoardSnapshot {
            board_tiles: &board_tiles,
            game_config,
            kwg,
            klv,
        };
        let t0 = std::time::Instant::now();
        let valued_move = move_generator.kibitz(board_snapshot, rack, bag.len());
        let elapsed = t0.elapsed();
        println!(
            "making top move: {} (equity {}, took {:?})",
            display::fmt_play(board_snapshot, &valued_move.play),
            valued_move.equity,
            elapsed
        );
        play_scorer.validate(board_snapshot, rack, &valued_move.play)?;

        match &valued_move.play {
            movegen::Play::Exchange { tiles } => {
                if !bag::Bag::use_tiles(rack, tiles.iter().copied()) {
                    spotgen::return_error!(format!("cannot exchange {:?}", tiles));
                }
                bag.replenish(rack, rack_size);
                bag.put_back(&mut rng, tiles);
                zero_turns += 1;
            }
            movegen::Play::Place { word, score, .. } => {
                if !bag::Bag::use_tiles(rack, word.iter().copied().filter(|&tile| tile != 0)) {
                    spotgen::return_error!(format!("cannot play {:?}", word));
                }
                play_scorer::apply_play(&mut board_tiles, dim, &valued_move.play);
                scores[turn] += *score as i32;
                if *score != 0 {
                    zero_turns = 0;
                }
                bag.replenish(rack, rack_size);
            }
        }
        println!();

        if rack.is_empty() {
            let other_rack = &racks[1 - turn];
            let other_worth = other_rack
                .iter()
                .map(|&tile| alphabet.score(tile) as i32)
                .sum::<i32>();
            scores[turn] += 2 * other_worth;
            println!(
                "player {} went out, gaining {} from {}",
                turn + 1,
                2 * other_worth,
                alphabet.fmt_rack(other_rack)
            );
            break;
        }
        if zero_turns >= 6 {
            for (player_idx, rack) in racks.iter().enumerate() {
                scores[player_idx] -= rack
                    .iter()
                    .map(|&tile| alphabet.score(tile) as i32)
                    .sum::<i32>();
            }
            println!("six scoreless turns");
            break;
        }
        turn = 1 - turn;
    }

    display::print_board(alphabet, board_layout, &board_tiles);
    println!("final scores: player 1: {}, player 2: {}", scores[0], scores[1]);
    Ok(())
}

fn main() -> error::Returns<()> {
    let args = std::env::args().collect::<Vec<_>>();
    let game_config = game_config::make_english_game_config();
    match args.get(1).map(String::as_str) {
        Some("question") if args.len() >= 3 => {
            let kwg = read_lexicon(&game_config, &args[2])?;
            let klv = read_leaves(&game_config, args.get(3))?;
            answer_question(&game_config, &kwg, &klv)
        }
        Some("autoplay") if args.len() >= 3 => {
            let kwg = read_lexicon(&game_config, &args[2])?;
            let klv = read_leaves(&game_config, args.get(3))?;
            let seed = match args.get(4) {
                Some(seed) => seed.parse()?,
                None => rand::rng().random(),
            };
            autoplay(&game_config, &kwg, &klv, seed)
        }
        _ => {
            println!(
                "args:
  question LEXICON [LEAVES]
    read a JSON question from stdin, print the plays as JSON.
  autoplay LEXICON [LEAVES] [SEED]
    play a game against itself.
LEXICON is a .kwg file or a word list, LEAVES is a .klv file or a .csv of leave,value."
            );
            Ok(())
        }
    }
}
