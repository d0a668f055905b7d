//! Board command - geometry and zones as JSON

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexstar_core::{all_positions, HomeZone, PositionKey, CELL_COUNT};

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Serialize)]
struct CellInfo {
    key: PositionKey,
    q: i8,
    r: i8,
    /// Home zone the cell belongs to, if any
    zone: Option<usize>,
}

#[derive(Serialize)]
struct ZoneInfo {
    index: usize,
    tag: String,
    opposite: usize,
    cells: Vec<PositionKey>,
    /// Most valuable first
    priority: Vec<PositionKey>,
}

#[derive(Serialize)]
struct BoardInfo {
    cell_count: usize,
    cells: Vec<CellInfo>,
    zones: Vec<ZoneInfo>,
}

fn describe_board() -> BoardInfo {
    let cells = all_positions()
        .map(|key| {
            let hex = key.to_hex();
            CellInfo {
                key,
                q: hex.q,
                r: hex.r,
                zone: HomeZone::ALL.iter().find(|z| z.contains(key)).map(HomeZone::index),
            }
        })
        .collect();

    let zones = HomeZone::ALL
        .iter()
        .map(|zone| ZoneInfo {
            index: zone.index(),
            tag: zone.tag(),
            opposite: zone.opposite().index(),
            cells: zone.cells().to_vec(),
            priority: zone.priority_cells().to_vec(),
        })
        .collect();

    BoardInfo {
        cell_count: CELL_COUNT,
        cells,
        zones,
    }
}

pub fn run(args: BoardArgs) -> Result<()> {
    let board = describe_board();
    let json = if args.pretty {
        serde_json::to_string_pretty(&board)?
    } else {
        serde_json::to_string(&board)?
    };
    println!("{}", json);
    Ok(())
}
