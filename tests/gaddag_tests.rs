// Copyright (C) 2020-2024 Andy Kurnia.

mod common;

use spotgen::{alphabet, build, gaddag, klv, kwg, prime};

fn letters(alphabet: &alphabet::Alphabet<'_>, mask: u64) -> String {
    (1..alphabet.len())
        .filter(|&tile| mask & (1 << tile) != 0)
        .filter_map(|tile| alphabet.from_rack(tile))
        .collect()
}

/// Every gaddag path starts with a last letter or a reversed prefix.
#[test]
fn root_children_and_completers() {
    let alphabet = alphabet::make_english_alphabet();
    let kwg = common::make_kwg(&alphabet, &["AB", "ABC", "CAB"]);
    let gaddag = gaddag::Gaddag::new(&kwg);
    let root = gaddag.root();
    assert_eq!(letters(&alphabet, gaddag.children_mask(root)), "ABC");
    assert_eq!(gaddag.num_children(root), 3);

    // A, change direction: letters after a leading A.
    let after_a = gaddag.follow(gaddag.change_direction(gaddag.follow_letter(root, 1)));
    assert!(after_a > 0, "A@ must exist");
    assert_eq!(letters(&alphabet, gaddag.word_completers(after_a)), "B");

    // B read backward: letters before a final B.
    let before_b = gaddag.follow_letter(root, 2);
    assert_eq!(letters(&alphabet, gaddag.word_completers(before_b)), "A");

    assert!(gaddag.has_child(root, 3));
    assert!(!gaddag.has_child(root, 4), "no word has D");
    assert_eq!(gaddag.follow_letter(root, 4), 0);
    assert_eq!(gaddag.child(0, 1), -1, "no children of a dead node");
}

/// The dawg half answers whole-word lookups.
#[test]
fn dawg_lookup() {
    let fixture = common::Fixture::new();
    let alphabet = fixture.game_config.alphabet();
    let gaddag = gaddag::Gaddag::new(&fixture.kwg);
    for word in ["CAT", "STAINER", "QI", "ZA"] {
        assert!(
            gaddag.accepts_word(&alphabet.parse_rack(word).unwrap()),
            "{} should be a word",
            word
        );
    }
    for word in ["CA", "TAC", "STAINE", "Q"] {
        assert!(
            !gaddag.accepts_word(&alphabet.parse_rack(word).unwrap()),
            "{} should not be a word",
            word
        );
    }
    // blanks are looked up by the letter they stand for.
    assert!(fixture.kwg.accepts(&alphabet.parse_word("CaT").unwrap()));
}

/// Reading a word from any split point reaches an accepting arc.
#[test]
fn every_split_spells_the_word() {
    let fixture = common::Fixture::new();
    let alphabet = fixture.game_config.alphabet();
    let gaddag = gaddag::Gaddag::new(&fixture.kwg);
    for word in ["RETAINS", "CATS", "QAT"] {
        let word = alphabet.parse_rack(word).unwrap();
        for split in 1..=word.len() {
            // word[..split] backward, then the rest forward.
            let mut node = gaddag.root();
            let mut edge = -1;
            for &tile in word[..split].iter().rev() {
                edge = gaddag.child(node, tile);
                node = gaddag.follow(edge);
            }
            if split < word.len() {
                node = gaddag.follow(gaddag.change_direction(node));
                for &tile in &word[split..] {
                    edge = gaddag.child(node, tile);
                    node = gaddag.follow(edge);
                }
            }
            assert!(
                gaddag.completes_word(edge),
                "{} split at {} should complete",
                alphabet.fmt_word(&word),
                split
            );
        }
    }
}

/// Words that cannot be laid out are refused.
#[test]
fn build_rejects_bad_words() {
    let empty: Box<[u8]> = Box::new([]);
    assert!(build::build(build::BuildFormat::Gaddawg, &[empty]).is_err());
    let with_separator: Box<[u8]> = Box::new([1, 0, 2]);
    assert!(build::build(build::BuildFormat::Gaddawg, &[with_separator.clone()]).is_err());
    // leave tables use tile 0 for the blank.
    assert!(build::build(build::BuildFormat::DawgOnly, &[with_separator]).is_ok());
    let unsorted: [Box<[u8]>; 2] = [Box::new([2]), Box::new([1])];
    assert!(build::build(build::BuildFormat::DawgOnly, &unsorted).is_err());
    let repeated: [Box<[u8]>; 2] = [Box::new([1]), Box::new([1])];
    assert!(build::build(build::BuildFormat::DawgOnly, &repeated).is_err());
    let kwg = kwg::Kwg::from_bytes_alloc(kwg::EMPTY_KWG_BYTES);
    assert!(!kwg.accepts(&[1]));
}

/// Lists that end alike are stored once.
#[test]
fn build_shares_equal_lists() {
    let alphabet = alphabet::make_english_alphabet();
    let words = ["BAT", "CAT", "RAT"]
        .iter()
        .map(|word| alphabet.parse_rack(word).unwrap().into_boxed_slice())
        .collect::<Vec<_>>();
    let kwg =
        kwg::Kwg::from_bytes_alloc(&build::build(build::BuildFormat::DawgOnly, &words).unwrap());
    // two roots, B C R, then one A and one T shared by all three.
    assert_eq!(kwg.0.len(), 7);
    for word in &words {
        assert!(kwg.accepts(word));
    }
    assert!(!kwg.accepts(&alphabet.parse_rack("BA").unwrap()));
}

// every five-letter string over A to F, in order.
fn all_five_letter_words() -> Vec<Box<[u8]>> {
    (0..6 * 6 * 6 * 6 * 6)
        .map(|n: u32| {
            (0..5)
                .rev()
                .map(|place| (n / 6u32.pow(place) % 6) as u8 + 1)
                .collect::<Box<[u8]>>()
        })
        .collect()
}

/// A big regular word list stays small once minimized.
#[test]
fn build_minimizes_large_lists() {
    let words = all_five_letter_words();
    let dawg =
        kwg::Kwg::from_bytes_alloc(&build::build(build::BuildFormat::DawgOnly, &words).unwrap());
    // one list of six per position.
    assert_eq!(dawg.0.len(), 2 + 5 * 6);

    let kwg =
        kwg::Kwg::from_bytes_alloc(&build::build(build::BuildFormat::Gaddawg, &words).unwrap());
    assert!(kwg.0.len() < 100, "{} nodes", kwg.0.len());
    let gaddag = gaddag::Gaddag::new(&kwg);
    for word in words.iter().step_by(97) {
        assert!(gaddag.accepts_word(word));
        for split in 1..=word.len() {
            let mut node = gaddag.root();
            let mut edge = -1;
            for &tile in word[..split].iter().rev() {
                edge = gaddag.child(node, tile);
                node = gaddag.follow(edge);
            }
            if split < word.len() {
                node = gaddag.follow(gaddag.change_direction(node));
                for &tile in &word[split..] {
                    edge = gaddag.child(node, tile);
                    node = gaddag.follow(edge);
                }
            }
            assert!(gaddag.completes_word(edge), "{:?} split at {}", word, split);
        }
    }
    assert!(!gaddag.accepts_word(&[1, 2, 3, 4]));
    assert!(!gaddag.accepts_word(&[1, 2, 3, 4, 7]));
}

/// Leave values do not depend on tile order, and unknown leaves are 0.
#[test]
fn leave_lookup() {
    let alphabet = alphabet::make_english_alphabet();
    let klv = common::make_klv(&alphabet, &[("SE", 10.5), ("?", 25.0), ("S", 8.0)]);
    let tally_of = |s: &str| {
        let mut tally = vec![0u8; alphabet.len() as usize];
        for tile in alphabet.parse_rack(s).unwrap() {
            tally[tile as usize] += 1;
        }
        tally
    };
    assert_eq!(klv.leave_value_from_tally(&tally_of("ES")), 10.5);
    assert_eq!(klv.leave_value_from_tally(&tally_of("S")), 8.0);
    assert_eq!(klv.leave_value_from_tally(&tally_of("?")), 25.0);
    assert_eq!(klv.leave_value_from_tally(&tally_of("Q")), 0.0);
    assert_eq!(klv.leave_value_from_tally(&tally_of("")), 0.0);
    let empty = klv::Klv::from_bytes_alloc(klv::EMPTY_KLV_BYTES);
    assert_eq!(empty.leave_value_from_tally(&tally_of("ES")), 0.0);
}

/// Equal multisets have equal products, in any order.
#[test]
fn prime_products() {
    let primes = prime::PrimeSet::new(27);
    assert_eq!(primes.prime(0), 2);
    assert_eq!(primes.prime(26), 103);
    assert_eq!(primes.product(&[1, 2, 1]), primes.product(&[2, 1, 1]));
    assert_ne!(primes.product(&[1, 1]), primes.product(&[1, 2]));
    // a blank played as a letter is still a blank.
    assert_eq!(primes.product(&[0x81, 3]), primes.product(&[0, 3]));
    let products = primes.subset_products(&[1, 2, 3]);
    assert_eq!(products.len(), 8);
    assert_eq!(products[0b101], primes.product(&[1, 3]));
    assert_eq!(products[0b111], primes.product(&[1, 2, 3]));
}
