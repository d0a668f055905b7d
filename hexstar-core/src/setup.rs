//! Standard starting layouts
//!
//! Which star points are in play depends on the number of players; every
//! active zone starts with ten pieces on its own cells.

use crate::error::SetupError;
use crate::goals::HomeZone;
use crate::snapshot::{ActiveTurn, Piece, Snapshot};

/// Zones in play for a player count, in seating order
pub fn active_zones(player_count: usize) -> Result<Vec<HomeZone>, SetupError> {
    let indices: &[u8] = match player_count {
        2 => &[0, 3],
        3 => &[0, 4, 5],
        4 => &[1, 2, 4, 5],
        6 => &[0, 1, 2, 3, 4, 5],
        n => return Err(SetupError::UnsupportedPlayerCount(n)),
    };
    Ok(indices.iter().filter_map(|&i| HomeZone::new(i)).collect())
}

/// Ten pieces of `zone`, owned by `player`, on their home cells
pub fn zone_pieces(player: &str, zone: HomeZone) -> Vec<Piece> {
    zone.cells()
        .iter()
        .enumerate()
        .map(|(i, &cell)| Piece::new(format!("{}-{}", player, i), player, zone.tag(), Some(cell)))
        .collect()
}

/// Fresh match: pieces at home, first player to move on turn 1
pub fn standard_snapshot<S: AsRef<str>>(players: &[S]) -> Result<Snapshot, SetupError> {
    let zones = active_zones(players.len())?;
    let mut snapshot = Snapshot::default();

    for (player, zone) in players.iter().map(AsRef::as_ref).zip(zones) {
        if snapshot.players.iter().any(|p| p == player) {
            return Err(SetupError::DuplicatePlayer(player.to_string()));
        }
        snapshot.players.push(player.to_string());
        snapshot.pieces.extend(zone_pieces(player, zone));
    }

    snapshot.turn = Some(ActiveTurn {
        number: 1,
        player: snapshot.players[0].clone(),
    });
    Ok(snapshot)
}
