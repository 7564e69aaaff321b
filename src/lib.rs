// Copyright (C) 2020-2024 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod alphabet;
pub mod anagram;
pub mod bag;
pub mod bingo;
pub mod board_layout;
pub mod build;
pub mod display;
pub mod exchange;
pub mod fash;
pub mod gaddag;
pub mod game_config;
pub mod hooks;
pub mod kibitzer;
pub mod klv;
pub mod kwg;
pub mod matrix;
pub mod movegen;
pub mod play_scorer;
pub mod prime;
pub mod spot;
pub mod spot_scorer;
