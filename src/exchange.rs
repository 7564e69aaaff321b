// Copyright (C) 2020-2024 Andy Kurnia.

use super::{fash, klv, prime, spot};

// Values every distinct sub-multiset of the rack as a leave.
// best_leaves[n] becomes the best leave after playing n tiles from the rack.
// found is called once per distinct nonempty exchange, with the tiles given
// up (sorted) and the value of the tiles kept.
pub fn evaluate_exchanges(
    klv: &klv::Klv,
    primes: &prime::PrimeSet,
    rack: &[u8],
    alphabet_len: u8,
    best_leaves: &mut Vec<f32>,
    mut found: impl FnMut(&[u8], f32),
) {
    let num_tiles = rack.len();
    best_leaves.clear();
    best_leaves.resize(num_tiles + 1, spot::NO_EQUITY);
    debug_assert!(rack.is_sorted());

    let products = primes.subset_products(rack);
    let full = (1usize << num_tiles) - 1;
    let mut seen = fash::MyHashSet::default();
    let mut tally = vec![0u8; alphabet_len as usize];
    let mut exchanged = Vec::with_capacity(num_tiles);
    for kept in 0..=full {
        if !seen.insert(products[kept]) {
            continue;
        }
        tally.iter_mut().for_each(|count| *count = 0);
        exchanged.clear();
        for (i, &tile) in rack.iter().enumerate() {
            if kept & (1 << i) != 0 {
                tally[tile as usize] += 1;
            } else {
                exchanged.push(tile);
            }
        }
        let leave = klv.leave_value_from_tally(&tally);
        let best_leave = &mut best_leaves[exchanged.len()];
        *best_leave = best_leave.max(leave);
        if kept != full {
            found(&exchanged, leave);
        }
    }
}
