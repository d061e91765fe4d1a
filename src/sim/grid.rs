//! Tile grid parsing and the tile-code table
//!
//! Level text is row-major, one row per line, tokens separated by commas
//! (or whitespace when a row has no commas). A token that does not parse as an
//! integer becomes the empty tile so a malformed level still loads.

use serde::{Deserialize, Serialize};

/// Every tile code that places something in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCode {
    Dirt,
    GrassLeft,
    GrassCenter,
    GrassRight,
    GrassPlatformLeft,
    GrassPlatformCenter,
    GrassPlatformRight,
    PlatformHorizontal,
    PlatformVertical,
    SpikeBall,
    SpikeUp,
    SpikeDown,
    Coin,
    GoalFlag,
}

impl TileCode {
    /// Map a raw grid value to a tile code. Zero and unknown values are empty.
    pub fn from_raw(raw: i32) -> Option<Self> {
        let code = match raw {
            1 => TileCode::Dirt,
            2 => TileCode::GrassLeft,
            3 => TileCode::GrassCenter,
            4 => TileCode::GrassRight,
            5 => TileCode::GrassPlatformLeft,
            6 => TileCode::GrassPlatformCenter,
            7 => TileCode::GrassPlatformRight,
            8 => TileCode::PlatformHorizontal,
            9 => TileCode::PlatformVertical,
            10 => TileCode::SpikeBall,
            11 => TileCode::SpikeUp,
            12 => TileCode::SpikeDown,
            13 => TileCode::Coin,
            14 => TileCode::GoalFlag,
            _ => return None,
        };
        Some(code)
    }
}

/// A parsed level: rows of raw tile values, top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: Vec<Vec<i32>>,
}

impl TileGrid {
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }

    /// Parse level text. Never fails; malformed tokens become 0.
    pub fn parse(text: &str) -> Self {
        let mut malformed = 0usize;
        let rows = text
            .lines()
            .enumerate()
            .map(|(row, line)| {
                let line = line.trim_end_matches('\r');
                let tokens: Vec<&str> = if line.contains(',') {
                    line.split(',').map(str::trim).collect()
                } else if line.trim().is_empty() {
                    vec![""]
                } else {
                    line.split_whitespace().collect()
                };
                tokens
                    .into_iter()
                    .enumerate()
                    .map(|(col, token)| match token.parse::<i32>() {
                        Ok(value) => value,
                        Err(_) => {
                            malformed += 1;
                            log::warn!("Malformed tile token {:?} at row {}, column {}", token, row, col);
                            0
                        }
                    })
                    .collect()
            })
            .collect();

        if malformed > 0 {
            log::warn!("{} malformed tile token(s) replaced with empty tiles", malformed);
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<i32>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Raw value at (column, row); out-of-range cells are empty
    pub fn get(&self, column: usize, row: usize) -> i32 {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Non-empty cells as (column, row, code), row-major
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, TileCode)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter_map(move |(column, &raw)| TileCode::from_raw(raw).map(|code| (column, row, code)))
        })
    }
}
