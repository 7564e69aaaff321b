// Copyright (C) 2020-2024 Andy Kurnia.

// Builds kwg bytes from sorted machine words. Sibling lists are interned as
// they are completed, so equal suffixes are stored once and both halves come
// out minimized. In the gaddag, the separator arc of "rev(prefix)@" points at
// the dawg list of prefix.

use super::{error, fash, kwg};

pub enum BuildFormat {
    DawgOnly,
    Gaddawg,
}

// An arc on the current word's path. arc_index is filled in when its list of
// children is interned.
struct PendingArc {
    tile: u8,
    accepts: bool,
    arc_index: u32,
}

// arcs[indexes[k]..] are the children collected so far for the kth tile.
struct PendingPath {
    arcs: Vec<PendingArc>,
    indexes: Vec<usize>,
}

impl PendingPath {
    fn push(&mut self, tile: u8) {
        self.arcs.push(PendingArc {
            tile,
            accepts: false,
            arc_index: 0,
        });
        self.indexes.push(self.arcs.len());
    }

    fn pop(&mut self, interner: &mut ArcInterner) {
        if let Some(start) = self.indexes.pop() {
            let list = interner.intern_list(&self.arcs[start..]);
            self.arcs[start - 1].arc_index = list;
            self.arcs.truncate(start);
        }
    }
}

// Interned arcs. A sibling list is a chain through next_index, so lists that
// end alike share their tails. Index 0 is the sink.
#[derive(Clone, Eq, Hash, PartialEq)]
struct Arc {
    tile: u8,
    accepts: bool,
    arc_index: u32,
    next_index: u32,
}

struct ArcInterner {
    arcs: Vec<Arc>,
    finder: fash::MyHashMap<Arc, u32>,
}

impl ArcInterner {
    fn new() -> Self {
        let sink = Arc {
            tile: 0,
            accepts: false,
            arc_index: 0,
            next_index: 0,
        };
        let mut finder = fash::MyHashMap::default();
        finder.insert(sink.clone(), 0);
        Self {
            arcs: vec![sink],
            finder,
        }
    }

    fn intern_list(&mut self, list: &[PendingArc]) -> u32 {
        let mut next_index = 0;
        for pending_arc in list.iter().rev() {
            let arc = Arc {
                tile: pending_arc.tile,
                accepts: pending_arc.accepts,
                arc_index: pending_arc.arc_index,
                next_index,
            };
            next_index = match self.finder.entry(arc) {
                std::collections::hash_map::Entry::Occupied(entry) => *entry.get(),
                std::collections::hash_map::Entry::Vacant(entry) => {
                    let idx = self.arcs.len() as u32;
                    self.arcs.push(entry.key().clone());
                    *entry.insert(idx)
                }
            };
        }
        next_index
    }

    // the children of prefix in the dawg, None if prefix is not there.
    fn dawg_list_of(&self, dawg_root: u32, prefix: impl Iterator<Item = u8>) -> Option<u32> {
        let mut p = dawg_root;
        for tile in prefix {
            loop {
                if p == 0 {
                    return None;
                }
                let arc = &self.arcs[p as usize];
                if arc.tile == tile {
                    p = arc.arc_index;
                    break;
                }
                p = arc.next_index;
            }
        }
        Some(p)
    }

    // returns the root list. in the gaddag phase a word ending in 0 is
    // rev(prefix)@ and its last arc is linked into the dawg.
    fn add_words(
        &mut self,
        sorted_words: &[Box<[u8]>],
        dawg_root: u32,
        is_gaddag_phase: bool,
    ) -> error::Returns<u32> {
        let mut path = PendingPath {
            arcs: Vec::new(),
            indexes: Vec::new(),
        };
        let mut prev_word: &[u8] = &[];
        for word in sorted_words {
            // one short of prev_word.len() after a separator.
            let prev_len = path.indexes.len();
            let common_len = prev_word
                .iter()
                .zip(word.iter())
                .take(prev_len)
                .take_while(|(a, b)| a == b)
                .count();
            for _ in common_len..prev_len {
                path.pop(self);
            }
            for &tile in &word[common_len..] {
                path.push(tile);
            }
            let last = path.arcs.len() - 1;
            if is_gaddag_phase && word.last() == Some(&0) {
                // the separator has no list of its own.
                path.indexes.pop();
                let prefix = word[..word.len() - 1].iter().rev().copied();
                match self.dawg_list_of(dawg_root, prefix) {
                    Some(list) => path.arcs[last].arc_index = list,
                    None => {
                        return_error!(format!("prefix of {:?} not in dawg", word));
                    }
                }
            } else {
                path.arcs[last].accepts = true;
            }
            prev_word = word;
        }
        while !path.indexes.is_empty() {
            path.pop(self);
        }
        Ok(self.intern_list(&path.arcs))
    }
}

// CARE = ERAC, RAC@, AC@, C@
fn gen_gaddag_strings(machine_words: &[Box<[u8]>]) -> Vec<Box<[u8]>> {
    let mut gaddag_strings = fash::MyHashSet::<Box<[u8]>>::default();
    let mut reversed = Vec::new();
    for word in machine_words {
        reversed.clear();
        reversed.extend(word.iter().rev());
        gaddag_strings.insert(reversed[..].into());
        reversed.push(0);
        for drop_len in 1..word.len() {
            gaddag_strings.insert(reversed[drop_len..].into());
        }
    }
    let mut gaddag_strings = gaddag_strings.into_iter().collect::<Vec<_>>();
    gaddag_strings.sort_unstable();
    gaddag_strings
}

// Lays out every reachable list contiguously, depth first. A list reached
// through a shared tail is written in full for each head that reaches it.
struct Layout<'a> {
    arcs: &'a [Arc],
    prev_index: Vec<u32>,
    destination: Vec<u32>,
    num_written: u32,
}

impl<'a> Layout<'a> {
    fn new(arcs: &'a [Arc]) -> Self {
        let mut prev_index = vec![0u32; arcs.len()];
        for p in (1..arcs.len()).rev() {
            prev_index[arcs[p].next_index as usize] = p as u32;
        }
        // prev_index[0] is never read.
        Self {
            arcs,
            prev_index,
            destination: vec![0u32; arcs.len()],
            // kwg[0] and kwg[1] are the roots.
            num_written: 2,
        }
    }

    fn place(&mut self, mut p: u32) {
        if p == 0 {
            return;
        }
        while self.prev_index[p as usize] != 0 {
            p = self.prev_index[p as usize];
        }
        if self.destination[p as usize] != 0 {
            return;
        }
        // in progress.
        self.destination[p as usize] = !0;
        let head = p;
        let mut len = 0u32;
        loop {
            len += 1;
            let target = self.arcs[p as usize].arc_index;
            self.place(target);
            p = self.arcs[p as usize].next_index;
            if p == 0 {
                break;
            }
        }
        let mut p = head;
        for ofs in 0..len {
            self.destination[p as usize] = self.num_written + ofs;
            p = self.arcs[p as usize].next_index;
        }
        self.num_written += len;
    }

    #[inline(always)]
    fn destination_of(&self, p: u32) -> u32 {
        if p == 0 { 0 } else { self.destination[p as usize] }
    }

    fn nodes(&self, dawg_root: u32, gaddag_root: u32) -> Vec<kwg::Node> {
        let mut nodes = vec![kwg::Node::new(0, false, false, 0); self.num_written as usize];
        nodes[0] = kwg::Node::new(0, false, true, self.destination_of(dawg_root));
        nodes[1] = kwg::Node::new(0, false, true, self.destination_of(gaddag_root));
        for head in 1..self.arcs.len() {
            if self.prev_index[head] != 0 || self.destination[head] == 0 {
                continue;
            }
            let mut p = head;
            let mut dp = self.destination[head] as usize;
            loop {
                let arc = &self.arcs[p];
                nodes[dp] = kwg::Node::new(
                    arc.tile,
                    arc.accepts,
                    arc.next_index == 0,
                    self.destination_of(arc.arc_index),
                );
                if arc.next_index == 0 {
                    break;
                }
                p = arc.next_index as usize;
                dp += 1;
            }
        }
        nodes
    }
}

pub fn build(build_format: BuildFormat, machine_words: &[Box<[u8]>]) -> error::Returns<Vec<u8>> {
    // tile 0 is the blank in leave tables but the separator in a gaddag.
    let separator_is_reserved = matches!(build_format, BuildFormat::Gaddawg);
    for word in machine_words {
        if word.is_empty() {
            return_error!("cannot build with an empty word".into());
        }
        if let Some(&bad) = word
            .iter()
            .find(|&&t| (t == 0 && separator_is_reserved) || t & 0x80 != 0)
        {
            return_error!(format!("invalid tile {} in word {:?}", bad, word));
        }
    }
    if let Some(pair) = machine_words.windows(2).find(|pair| pair[0] >= pair[1]) {
        return_error!(format!(
            "words must be sorted and distinct: {:?} then {:?}",
            pair[0], pair[1]
        ));
    }

    let mut interner = ArcInterner::new();
    let dawg_root = interner.add_words(machine_words, 0, false)?;
    let gaddag_root = match build_format {
        BuildFormat::DawgOnly => 0,
        BuildFormat::Gaddawg => {
            interner.add_words(&gen_gaddag_strings(machine_words), dawg_root, true)?
        }
    };

    let mut layout = Layout::new(&interner.arcs);
    layout.place(dawg_root);
    layout.place(gaddag_root);
    if layout.num_written > 0x400000 {
        // arc indexes have 22 bits.
        return_error!(format!("this format cannot have {} nodes", layout.num_written));
    }
    Ok(kwg::Kwg(layout.nodes(dawg_root, gaddag_root).into_boxed_slice()).to_bytes())
}
