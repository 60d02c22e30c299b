//! Terminal rendering of game snapshots

use std::fmt::Write;

use tilematch_core::{GameBoard, GameSnapshot, Tile, TileColor};

/// One letter per palette colour, '.' for empty cells
fn letter(tile: &Tile) -> char {
    if tile.is_empty() {
        return '.';
    }
    match tile.color() {
        TileColor::Red => 'R',
        TileColor::Orange => 'O',
        TileColor::Yellow => 'Y',
        TileColor::Green => 'G',
        TileColor::Blue => 'B',
        TileColor::Indigo => 'I',
        TileColor::Violet => 'V',
        TileColor::LightGray => '.',
    }
}

/// 24-bit ANSI foreground escape for the tile colour's hex value
fn ansi(color: TileColor) -> String {
    let hex = color.hex().trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    format!("\x1b[38;2;{};{};{}m", channel(0), channel(2), channel(4))
}

/// Board drawn top row first, cells separated by spaces
pub fn render_board(board: &GameBoard, color: bool) -> String {
    let mut out = String::new();
    for y in (1..=board.height() as i32).rev() {
        let mut cells = Vec::with_capacity(board.width() as usize);
        for x in 1..=board.width() as i32 {
            let Ok(tile) = board.tile_at(x, y) else {
                continue;
            };
            let ch = letter(tile);
            if color && !tile.is_empty() {
                cells.push(format!("{}{}\x1b[0m", ansi(tile.color()), ch));
            } else {
                cells.push(ch.to_string());
            }
        }
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    out
}

/// Score line followed by the board
pub fn render_snapshot(snapshot: &GameSnapshot, color: bool) -> String {
    let mut out = format!(
        "score: {}  combo: x{}{}\n",
        snapshot.score.points(),
        snapshot.score.multiplier(),
        if snapshot.game_over { "  GAME OVER" } else { "" }
    );
    out.push_str(&render_board(&snapshot.board, color));
    out
}
