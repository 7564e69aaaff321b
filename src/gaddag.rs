// Copyright (C) 2020-2024 Andy Kurnia.

// Navigation over the gaddag half of a kwg.
//
// A node is the index of the first arc of a sibling list (0 = no node).
// An edge is the index of one arc (<= 0 = no edge).
// A path spells a word as rev(prefix) @ suffix, where @ (tile 0) is the
// direction change; a path with no @ is the whole word reversed.

use super::kwg;

pub const SEPARATOR: u8 = 0;

#[derive(Clone, Copy)]
pub struct Gaddag<'a> {
    kwg: &'a kwg::Kwg,
}

impl<'a> Gaddag<'a> {
    #[inline(always)]
    pub fn new(kwg: &'a kwg::Kwg) -> Self {
        Self { kwg }
    }

    #[inline(always)]
    pub fn kwg(&self) -> &'a kwg::Kwg {
        self.kwg
    }

    #[inline(always)]
    pub fn root(&self) -> i32 {
        self.kwg[1].arc_index()
    }

    #[inline(always)]
    pub fn dawg_root(&self) -> i32 {
        self.kwg[0].arc_index()
    }

    // whole-word lookup in the dawg half.
    #[inline(always)]
    pub fn accepts_word(&self, word: &[u8]) -> bool {
        self.kwg.accepts(word)
    }

    #[inline(always)]
    pub fn child(&self, node: i32, letter: u8) -> i32 {
        if node <= 0 {
            return -1;
        }
        let mut p = node;
        loop {
            let arc = self.kwg[p];
            if arc.tile() == letter {
                return p;
            }
            if arc.is_end() || arc.tile() > letter {
                return -1;
            }
            p += 1;
        }
    }

    #[inline(always)]
    pub fn has_child(&self, node: i32, letter: u8) -> bool {
        self.child(node, letter) > 0
    }

    #[inline(always)]
    pub fn follow(&self, edge: i32) -> i32 {
        if edge <= 0 {
            0
        } else {
            self.kwg[edge].arc_index()
        }
    }

    #[inline(always)]
    pub fn change_direction(&self, node: i32) -> i32 {
        self.child(node, SEPARATOR)
    }

    #[inline(always)]
    pub fn completes_word(&self, edge: i32) -> bool {
        edge > 0 && self.kwg[edge].accepts()
    }

    // child then follow, for walking known letters.
    #[inline(always)]
    pub fn follow_letter(&self, node: i32, letter: u8) -> i32 {
        self.follow(self.child(node, letter))
    }

    // first edge at or after cursor (within the same sibling list) whose
    // letter is >= min_letter and in restriction. resume from the returned
    // edge with next_sibling.
    #[inline(always)]
    pub fn next_child(&self, cursor: i32, min_letter: u8, restriction: u64) -> i32 {
        if cursor <= 0 {
            return -1;
        }
        let mut p = cursor;
        loop {
            let arc = self.kwg[p];
            let tile = arc.tile();
            if tile >= min_letter && restriction & (1 << tile) != 0 {
                return p;
            }
            if arc.is_end() {
                return -1;
            }
            p += 1;
        }
    }

    #[inline(always)]
    pub fn next_sibling(&self, edge: i32) -> i32 {
        if edge <= 0 || self.kwg[edge].is_end() {
            -1
        } else {
            edge + 1
        }
    }

    #[inline(always)]
    pub fn letter(&self, edge: i32) -> u8 {
        self.kwg[edge].tile()
    }

    #[inline(always)]
    pub fn children(&self, node: i32, restriction: u64) -> Children<'a> {
        Children {
            gaddag: *self,
            cursor: node,
            restriction,
        }
    }

    pub fn children_mask(&self, node: i32) -> u64 {
        self.children(node, !1).fold(0, |m, (letter, _)| m | (1 << letter))
    }

    pub fn num_children(&self, node: i32) -> u32 {
        self.children_mask(node).count_ones()
    }

    pub fn shared_children(&self, a: i32, b: i32) -> u64 {
        self.children_mask(a) & self.children_mask(b)
    }

    // letters x such that the edge for x completes a word.
    pub fn word_completers(&self, node: i32) -> u64 {
        self.children(node, !1)
            .filter(|&(_, edge)| self.completes_word(edge))
            .fold(0, |m, (letter, _)| m | (1 << letter))
    }
}

// Children in increasing letter order. The iterator itself is the resume
// point, so callers may recurse between items.
pub struct Children<'a> {
    gaddag: Gaddag<'a>,
    cursor: i32,
    restriction: u64,
}

impl Iterator for Children<'_> {
    type Item = (u8, i32);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.gaddag.next_child(self.cursor, 0, self.restriction);
        if edge <= 0 {
            self.cursor = -1;
            return None;
        }
        self.cursor = self.gaddag.next_sibling(edge);
        Some((self.gaddag.letter(edge), edge))
    }
}
