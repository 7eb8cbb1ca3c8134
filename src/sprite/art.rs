//! Built-in pixel art

use super::Sprite;
use crate::error::Result;

#[rustfmt::skip]
pub const ALIEN_A: [&str; 8] = [
    "..@.....@..",
    "...@...@...",
    "..@@@@@@@..",
    ".@@.@@@.@@.",
    "@@@@@@@@@@@",
    "@.@@@@@@@.@",
    "@.@.....@.@",
    "...@@.@@...",
];

#[rustfmt::skip]
pub const ALIEN_B: [&str; 8] = [
    "..@.....@..",
    "@..@...@..@",
    "@.@@@@@@@.@",
    "@@@.@@@.@@@",
    "@@@@@@@@@@@",
    ".@@@@@@@@@.",
    "..@.....@..",
    ".@.......@.",
];

#[rustfmt::skip]
pub const PLAYER: [&str; 7] = [
    ".....@.....",
    "....@@@....",
    "....@@@....",
    ".@@@@@@@@@.",
    "@@@@@@@@@@@",
    "@@@@@@@@@@@",
    "@@@@@@@@@@@",
];

/// The two alien animation frames, legs in then legs out
pub fn alien_frames() -> Result<[Sprite; 2]> {
    Ok([Sprite::from_rows(&ALIEN_A)?, Sprite::from_rows(&ALIEN_B)?])
}

pub fn player() -> Result<Sprite> {
    Sprite::from_rows(&PLAYER)
}
