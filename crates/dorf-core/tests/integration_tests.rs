//! Integration tests for the dorf board engine.
//!
//! These tests drive a board through realistic placement sequences and check
//! that statuses, growth, ranking and snapshots stay consistent.

use dorf_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Tile a random mix of the given kinds
fn random_tile(rng: &mut StdRng, kinds: &[EdgeKind]) -> Tile {
    let mut tile = Tile::empty();
    for index in 0..NUM_EDGES {
        tile.set_edge(index, *kinds.choose(rng).unwrap()).unwrap();
    }
    tile
}

/// Assert every cached status matches a fresh derivation
fn assert_statuses_consistent(board: &Board) {
    for (coord, cell) in board.grid().iter() {
        assert_eq!(
            board.derive_status(coord).unwrap(),
            cell.status,
            "cached status at {} is stale",
            coord
        );
    }
}

/// Place a tile and shift the pending coordinates if the board grew
fn place_tracking(board: &mut Board, coord: GridCoord, tile: Tile, pending: &mut [GridCoord]) -> PlacementOutcome {
    let outcome = board.place_tile(coord, tile).unwrap();
    if outcome.enlarged() {
        for coord in pending.iter_mut() {
            *coord = coord.translated(outcome.grown_by);
        }
    }
    outcome
}

#[test]
fn test_grass_ring_perfects_origin() {
    let mut board = Board::new();
    let mut origin = GridCoord::new(3, 3);
    assert_eq!(board.get_status(origin).unwrap(), TileStatus::Good);

    let mut pending: Vec<GridCoord> = origin.neighbors().to_vec();
    for i in 0..pending.len() {
        let coord = pending[i];
        assert_eq!(board.get_status(coord).unwrap(), TileStatus::Valid);
        let outcome = place_tracking(&mut board, coord, Tile::uniform(EdgeKind::Grass), &mut pending);
        if outcome.enlarged() {
            origin = origin.translated(outcome.grown_by);
        }
        assert!(outcome.status.is_occupied());
        assert_ne!(outcome.status, TileStatus::Bad);

        let expected = if i == pending.len() - 1 {
            TileStatus::Perfect
        } else {
            TileStatus::Good
        };
        assert_eq!(board.get_status(origin).unwrap(), expected);
    }

    assert_eq!(board.locations_with_status(TileStatus::Perfect), vec![origin]);
    assert_eq!(board.stats().tiles_placed, 6);
    assert_statuses_consistent(&board);
}

#[test]
fn test_surrounded_tile_becomes_perfect() {
    let mut board = Board::new();
    let origin = GridCoord::new(3, 3);
    let east = origin.neighbor(Direction::East);

    // the ring around the origin, then the rest of the ring around its east neighbor
    let mut pending: Vec<GridCoord> = origin.neighbors().to_vec();
    let east_index = pending.iter().position(|c| *c == east).unwrap();
    for coord in east.neighbors() {
        if coord != origin && !pending.contains(&coord) {
            pending.push(coord);
        }
    }

    for i in 0..pending.len() {
        let coord = pending[i];
        place_tracking(&mut board, coord, Tile::uniform(EdgeKind::Grass), &mut pending);
    }
    assert_eq!(board.get_status(pending[east_index]).unwrap(), TileStatus::Perfect);
    assert_statuses_consistent(&board);
}

#[test]
fn test_river_against_grass_is_rejected() {
    let mut board = Board::new();
    let before = board.snapshot();
    let coord = GridCoord::new(4, 3);

    // edge 0 faces west, towards the all-grass origin
    let mut tile = Tile::uniform(EdgeKind::Water);
    tile.set_edge(Direction::West.index(), EdgeKind::River).unwrap();
    assert!(!board.is_legal_placement(coord, &tile));
    assert!(!board.is_legal_connection(coord, Direction::West, &tile));

    let result = board.place_tile(coord, tile);
    assert_eq!(result, Err(BoardError::IllegalPlacement { coord }));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_placement_on_non_valid_cell_is_rejected() {
    let mut board = Board::new();
    let before = board.snapshot();

    let far = GridCoord::new(6, 6);
    assert_eq!(board.get_status(far).unwrap(), TileStatus::Empty);
    assert_eq!(
        board.place_tile(far, Tile::uniform(EdgeKind::Grass)),
        Err(BoardError::IllegalPlacement { coord: far })
    );

    let occupied = GridCoord::new(3, 3);
    assert_eq!(
        board.place_tile(occupied, Tile::uniform(EdgeKind::Grass)),
        Err(BoardError::IllegalPlacement { coord: occupied })
    );

    let outside = GridCoord::new(8, 2);
    assert_eq!(
        board.place_tile(outside, Tile::uniform(EdgeKind::Grass)),
        Err(BoardError::OutOfBounds { coord: outside })
    );
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_placement_near_border_grows_board() {
    let mut board = Board::new();
    let grass = Tile::uniform(EdgeKind::Grass);

    let first = board.place_tile(GridCoord::new(2, 3), grass).unwrap();
    assert!(!first.enlarged());
    assert_eq!(board.size(), 8);
    let before = board.clone();

    let second = board.place_tile(GridCoord::new(1, 3), grass).unwrap();
    assert!(second.enlarged());
    assert_eq!(second.grown_by, 2);
    assert_eq!(second.coord, GridCoord::new(3, 5));
    assert_eq!(board.size(), 12);

    // every old cell moved by the padding, the new tile aside
    for (coord, cell) in before.grid().iter() {
        let moved = coord.translated(2);
        if moved == second.coord {
            continue;
        }
        assert_eq!(board.get_tile(moved).unwrap(), cell.tile);
    }
    assert_eq!(board.get_tile(GridCoord::new(5, 5)).unwrap(), Tile::ORIGIN);
    assert_eq!(board.get_tile(GridCoord::new(4, 5)).unwrap(), grass);

    // the padding is untouched
    for (coord, cell) in board.grid().iter() {
        let in_padding = coord.x < 2 || coord.y < 2 || coord.x >= 10 || coord.y >= 10;
        if in_padding {
            assert!(cell.tile.is_empty(), "padding cell {} has a tile", coord);
            let touches = coord.neighbors().iter().any(|n| !board.grid().is_empty_at(*n));
            assert!(!touches || cell.status == TileStatus::Valid);
        }
    }
    assert_statuses_consistent(&board);
}

#[test]
fn test_remove_status_depends_on_neighbors() {
    let mut board = Board::new();
    let grass = Tile::uniform(EdgeKind::Grass);
    board.place_tile(GridCoord::new(4, 3), grass).unwrap();
    board.place_tile(GridCoord::new(5, 3), grass).unwrap();

    // removing the middle tile leaves neighbors on both sides
    assert_eq!(board.remove_tile(GridCoord::new(4, 3)).unwrap(), TileStatus::Valid);

    // with the origin gone the far tile stands alone
    assert_eq!(board.remove_tile(GridCoord::new(3, 3)).unwrap(), TileStatus::Empty);
    assert_eq!(board.get_status(GridCoord::new(5, 3)).unwrap(), TileStatus::Good);
    assert_eq!(board.get_status(GridCoord::new(4, 3)).unwrap(), TileStatus::Valid);
    assert_statuses_consistent(&board);
}

#[test]
fn test_hint_threshold_then_fallback() {
    let board = Board::new();
    let tile = Tile::new([
        EdgeKind::Grass,
        EdgeKind::Water,
        EdgeKind::Trees,
        EdgeKind::Trees,
        EdgeKind::Crops,
        EdgeKind::House,
    ]);

    let strict = board.get_hint(&tile, None, Some(100.0));
    assert!(strict.is_empty());

    let relaxed = board.get_hint(&tile, Some(5), None);
    let legal = board.legal_placements(&tile).len();
    assert!(legal > 0);
    assert_eq!(relaxed.len(), legal.min(5));

    let ranked = board.rank_all_placements(&tile);
    assert_eq!(relaxed.placements[..], ranked[..relaxed.len()]);
}

#[test]
fn test_random_play_keeps_board_consistent() {
    let mut rng = StdRng::seed_from_u64(2024);
    let kinds = [
        EdgeKind::Grass,
        EdgeKind::Trees,
        EdgeKind::House,
        EdgeKind::Crops,
        EdgeKind::Water,
        EdgeKind::River,
        EdgeKind::Train,
        EdgeKind::Station,
    ];
    let mut board = Board::new();

    for _ in 0..60 {
        let tile = random_tile(&mut rng, &kinds);
        let ranked = board.rank_all_placements(&tile);
        assert!(ranked.windows(2).all(|w| w[0].score() >= w[1].score()));

        let legal = board.legal_placements(&tile);
        assert_eq!(ranked.len(), legal.len());
        for k in [1, 3, 10] {
            assert_eq!(board.get_hint(&tile, Some(k), None).len(), k.min(legal.len()));
        }

        if legal.is_empty() {
            continue;
        }
        let choice = legal[rng.gen_range(0..legal.len())];
        let outcome = board.place_tile(choice.coord, choice.tile).unwrap();
        assert!(outcome.status.is_occupied());
        assert_eq!(board.get_tile(outcome.coord).unwrap(), choice.tile);

        // occasionally take a tile back out
        if rng.gen_bool(0.15) {
            let status = board.remove_tile(outcome.coord).unwrap();
            let touches = outcome
                .coord
                .neighbors()
                .iter()
                .any(|n| !board.grid().is_empty_at(*n));
            let expected = if touches { TileStatus::Valid } else { TileStatus::Empty };
            assert_eq!(status, expected);
        }
        assert_statuses_consistent(&board);
    }
}

#[test]
fn test_snapshot_restore_round_trip() {
    let mut board = Board::new();
    board.place_tile(GridCoord::new(4, 3), Tile::uniform(EdgeKind::Water)).unwrap();
    let snapshot = board.snapshot();

    board.place_tile(GridCoord::new(2, 3), Tile::uniform(EdgeKind::Trees)).unwrap();
    assert_ne!(board.snapshot(), snapshot);

    board.restore(snapshot.clone()).unwrap();
    assert_eq!(board.snapshot(), snapshot);
    assert_statuses_consistent(&board);
}

#[test]
fn test_malformed_snapshot_is_rejected() {
    let mut board = Board::new();
    let before = board.clone();

    let mut short = board.snapshot();
    short.cells.truncate(10);
    assert!(matches!(board.restore(short), Err(BoardError::InvariantViolation(_))));

    let tiny = GridSnapshot {
        size: 2,
        cells: vec![Cell::default(); 4],
    };
    assert!(matches!(board.restore(tiny), Err(BoardError::InvariantViolation(_))));
    assert_eq!(board, before);
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let mut board = Board::new();
    board.place_tile(GridCoord::new(3, 4), Tile::uniform(EdgeKind::Station)).unwrap();
    board.save(&path).unwrap();

    let loaded = Board::load(&path).unwrap();
    assert_eq!(loaded.snapshot(), board.snapshot());

    let missing = Board::load(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(BoardError::Persistence(_))));
}
