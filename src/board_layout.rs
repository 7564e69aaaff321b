// Copyright (C) 2020-2024 Andy Kurnia.

use super::matrix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Premium {
    pub word_multiplier: i8,
    pub tile_multiplier: i8,
}

const FVS: Premium = Premium {
    word_multiplier: 1,
    tile_multiplier: 1,
};

pub struct StaticBoardLayout {
    premiums: Box<[Premium]>,
    dim: matrix::Dim,
    star_row: i8,
    star_col: i8,
}

pub enum BoardLayout {
    Static(StaticBoardLayout),
}

impl BoardLayout {
    #[inline(always)]
    pub fn premiums(&self) -> &[Premium] {
        match self {
            BoardLayout::Static(x) => &x.premiums,
        }
    }

    #[inline(always)]
    pub fn dim(&self) -> matrix::Dim {
        match self {
            BoardLayout::Static(x) => x.dim,
        }
    }

    #[inline(always)]
    pub fn star_row(&self) -> i8 {
        match self {
            BoardLayout::Static(x) => x.star_row,
        }
    }

    #[inline(always)]
    pub fn star_col(&self) -> i8 {
        match self {
            BoardLayout::Static(x) => x.star_col,
        }
    }

    #[inline(always)]
    pub fn premium_at(&self, row: i8, col: i8) -> Premium {
        self.premiums()[self.dim().at_row_col(row, col)]
    }
}

// same glyphs as display::empty_label.
// = 3W, - 2W, " 3L, ' 2L, * start square (2W).
fn premium_from_glyph(c: u8) -> Premium {
    match c {
        b'=' => Premium {
            word_multiplier: 3,
            tile_multiplier: 1,
        },
        b'-' | b'*' => Premium {
            word_multiplier: 2,
            tile_multiplier: 1,
        },
        b'"' => Premium {
            word_multiplier: 1,
            tile_multiplier: 3,
        },
        b'\'' => Premium {
            word_multiplier: 1,
            tile_multiplier: 2,
        },
        _ => FVS,
    }
}

fn layout_from_rows(rows: &[&str]) -> BoardLayout {
    let dim = matrix::Dim {
        rows: rows.len() as i8,
        cols: rows[0].len() as i8,
    };
    let mut premiums = Vec::with_capacity(dim.area());
    let mut star = (dim.rows / 2, dim.cols / 2);
    for (r, row) in (0i8..).zip(rows) {
        assert_eq!(row.len(), dim.cols as usize);
        for (c, &glyph) in (0i8..).zip(row.as_bytes()) {
            if glyph == b'*' {
                star = (r, c);
            }
            premiums.push(premium_from_glyph(glyph));
        }
    }
    BoardLayout::Static(StaticBoardLayout {
        premiums: premiums.into_boxed_slice(),
        dim,
        star_row: star.0,
        star_col: star.1,
    })
}

pub fn make_standard_board_layout() -> BoardLayout {
    layout_from_rows(&[
        "=  '   =   '  =",
        " -   \"   \"   - ",
        "  -   ' '   -  ",
        "'  -   '   -  '",
        "    -     -    ",
        " \"   \"   \"   \" ",
        "  '   ' '   '  ",
        "=  '   *   '  =",
        "  '   ' '   '  ",
        " \"   \"   \"   \" ",
        "    -     -    ",
        "'  -   '   -  '",
        "  -   ' '   -  ",
        " -   \"   \"   - ",
        "=  '   =   '  =",
    ])
}
