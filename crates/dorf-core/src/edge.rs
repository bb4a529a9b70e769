//! Terrain edge kinds and the static connection rules between them.
//!
//! Two facing edges of adjacent tiles form a [`Connection`]. A connection is
//! either illegal (the pair may never touch), legal but not good, or good.
//! Both checks are symmetric: `{A, B}` and `{B, A}` are the same connection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terrain carried by one edge of a hex tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EdgeKind {
    /// No terrain, used for cells without a tile
    #[default]
    Empty,
    Grass,
    Trees,
    House,
    Crops,
    Water,
    River,
    Train,
    Station,
}

impl EdgeKind {
    /// Every edge kind, `Empty` first
    pub const ALL: [EdgeKind; 9] = [
        EdgeKind::Empty,
        EdgeKind::Grass,
        EdgeKind::Trees,
        EdgeKind::House,
        EdgeKind::Crops,
        EdgeKind::Water,
        EdgeKind::River,
        EdgeKind::Train,
        EdgeKind::Station,
    ];

    /// Whether this is the `Empty` kind
    pub fn is_empty(&self) -> bool {
        matches!(self, EdgeKind::Empty)
    }

    /// Display name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            EdgeKind::Empty => "Empty",
            EdgeKind::Grass => "Grass",
            EdgeKind::Trees => "Trees",
            EdgeKind::House => "House",
            EdgeKind::Crops => "Crops",
            EdgeKind::Water => "Water",
            EdgeKind::River => "River",
            EdgeKind::Train => "Train",
            EdgeKind::Station => "Station",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pairs that may never face each other.
///
/// Rivers and train tracks only continue into their own kind, water or a station.
const ILLEGAL_CONNECTIONS: [(EdgeKind, EdgeKind); 10] = [
    (EdgeKind::River, EdgeKind::Grass),
    (EdgeKind::River, EdgeKind::Trees),
    (EdgeKind::River, EdgeKind::House),
    (EdgeKind::River, EdgeKind::Crops),
    (EdgeKind::River, EdgeKind::Train),
    (EdgeKind::Train, EdgeKind::Water),
    (EdgeKind::Train, EdgeKind::Grass),
    (EdgeKind::Train, EdgeKind::Trees),
    (EdgeKind::Train, EdgeKind::House),
    (EdgeKind::Train, EdgeKind::Crops),
];

/// Cross-kind pairs that count as good. Identical non-empty kinds are always good.
const GOOD_CONNECTIONS: [(EdgeKind, EdgeKind); 6] = [
    (EdgeKind::River, EdgeKind::Water),
    (EdgeKind::Water, EdgeKind::Grass),
    (EdgeKind::Grass, EdgeKind::Station),
    (EdgeKind::River, EdgeKind::Station),
    (EdgeKind::Water, EdgeKind::Station),
    (EdgeKind::Train, EdgeKind::Station),
];

fn pair_listed(table: &[(EdgeKind, EdgeKind)], a: EdgeKind, b: EdgeKind) -> bool {
    table
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// An unordered pair of facing edges
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Connection {
    pub a: EdgeKind,
    pub b: EdgeKind,
}

impl Connection {
    /// Create a connection between two facing edges
    pub const fn new(a: EdgeKind, b: EdgeKind) -> Self {
        Self { a, b }
    }

    /// False iff the pair is on the forbidden list. Anything touching `Empty` is legal.
    pub fn is_legal(&self) -> bool {
        !pair_listed(&ILLEGAL_CONNECTIONS, self.a, self.b)
    }

    /// True iff both sides are the same non-empty kind, or the pair is a good cross-kind pair
    pub fn is_good(&self) -> bool {
        if self.a.is_empty() || self.b.is_empty() {
            return false;
        }
        self.a == self.b || pair_listed(&GOOD_CONNECTIONS, self.a, self.b)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for Connection {}
