//! Precomputed board geometry.
//!
//! Everything here is built once, on first use, and shared read-only for
//! the rest of the process:
//!
//! - leaper attack masks (knight, king, pawn per color)
//! - a 64 x 64 connection table describing the line, if any, through every
//!   pair of squares
//! - a per-square ray-collision map from "occupancy masked to one ray" to
//!   the first occupied square on that ray, which answers "what would this
//!   square see along this line" with a single lookup
//!
//! Slider attacks are assembled from the collision map, so there is exactly
//! one piece of code that walks rays, and it only runs while building.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Instant;

use chess_core::{Color, Square};

use crate::Bitboard;

/// How two squares are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Not on a common rank, file or diagonal (or the same square).
    None,
    /// Same rank or file: rook and queen lines.
    Straight,
    /// Same diagonal: bishop and queen lines.
    Diagonal,
}

impl RayKind {
    /// Whether a piece of this type attacks along this kind of line.
    #[inline]
    pub const fn is_slid_by(self, piece: chess_core::Piece) -> bool {
        match self {
            RayKind::None => false,
            RayKind::Straight => piece.slides_straight(),
            RayKind::Diagonal => piece.slides_diagonal(),
        }
    }
}

/// (file step, rank step) for the eight ray directions.
/// Indices 0..4 are straight, 4..8 diagonal; `d ^ 1` is the opposite of `d`.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

const STRAIGHT: std::ops::Range<usize> = 0..4;
const DIAGONAL: std::ops::Range<usize> = 4..8;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The line through an ordered pair of squares.
#[derive(Debug, Clone, Copy)]
pub struct Connection {
    pub kind: RayKind,
    /// Square index step from the first square toward the second
    /// (+-1, +-8, +-7 or +-9); zero when unconnected.
    pub step: i8,
    /// From the first square through the second to the board edge,
    /// excluding the first square.
    pub ray: Bitboard,
    /// Squares strictly between the two.
    pub between: Bitboard,
    /// The whole line through both squares, edge to edge.
    pub line: Bitboard,
}

impl Connection {
    const NONE: Connection = Connection {
        kind: RayKind::None,
        step: 0,
        ray: Bitboard::EMPTY,
        between: Bitboard::EMPTY,
        line: Bitboard::EMPTY,
    };
}

/// All precomputed tables.
pub struct Geometry {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    /// Ray to the edge for each square and direction.
    rays: [[Bitboard; 8]; 64],
    connections: Vec<Connection>,
    collisions: Vec<HashMap<u64, Square>>,
}

static GEOMETRY: OnceLock<Geometry> = OnceLock::new();

/// The process-wide tables, built on first call.
pub fn geometry() -> &'static Geometry {
    GEOMETRY.get_or_init(Geometry::build)
}

/// Squares reached by repeatedly stepping `(df, dr)` from `from`, nearest first.
fn walk(from: Square, (df, dr): (i8, i8)) -> Vec<Square> {
    let mut squares = Vec::with_capacity(7);
    let mut current = from;
    while let Some(next) = current.offset(df, dr) {
        squares.push(next);
        current = next;
    }
    squares
}

fn leaper(from: Square, steps: &[(i8, i8)]) -> Bitboard {
    steps
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}

impl Geometry {
    fn build() -> Geometry {
        let started = Instant::now();

        let mut knight = [Bitboard::EMPTY; 64];
        let mut king = [Bitboard::EMPTY; 64];
        let mut pawn = [[Bitboard::EMPTY; 64]; 2];
        let mut rays = [[Bitboard::EMPTY; 8]; 64];

        for sq in Square::ALL {
            let i = sq.index() as usize;
            knight[i] = leaper(sq, &KNIGHT_STEPS);
            king[i] = leaper(sq, &DIRECTIONS);
            pawn[Color::White.index()][i] = leaper(sq, &[(-1, 1), (1, 1)]);
            pawn[Color::Black.index()][i] = leaper(sq, &[(-1, -1), (1, -1)]);
            for (d, &dir) in DIRECTIONS.iter().enumerate() {
                rays[i][d] = walk(sq, dir).into_iter().collect();
            }
        }

        let mut connections = vec![Connection::NONE; 64 * 64];
        let mut collisions = Vec::with_capacity(64);

        for from in Square::ALL {
            let i = from.index() as usize;
            let mut blockers = HashMap::new();

            for (d, &dir) in DIRECTIONS.iter().enumerate() {
                let squares = walk(from, dir);
                let kind = if STRAIGHT.contains(&d) {
                    RayKind::Straight
                } else {
                    RayKind::Diagonal
                };
                let opposite = d ^ 1;
                let line = rays[i][d] | rays[i][opposite] | Bitboard::from_square(from);

                let mut between = Bitboard::EMPTY;
                for &to in &squares {
                    connections[i * 64 + to.index() as usize] = Connection {
                        kind,
                        step: dir.1 * 8 + dir.0,
                        ray: rays[i][d],
                        between,
                        line,
                    };
                    between.set(to);
                }

                // Every occupancy pattern of this ray, mapped to its nearest
                // occupied square. The empty pattern maps to `from` itself.
                for subset in 0u32..(1 << squares.len()) {
                    let mut occupancy = 0u64;
                    let mut nearest = from;
                    for (bit, sq) in squares.iter().enumerate().rev() {
                        if subset & (1 << bit) != 0 {
                            occupancy |= sq.bitboard();
                            nearest = *sq;
                        }
                    }
                    blockers.insert(occupancy, nearest);
                }
            }
            collisions.push(blockers);
        }

        tracing::debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            collision_entries = collisions.iter().map(HashMap::len).sum::<usize>(),
            "built geometry tables"
        );

        Geometry {
            knight,
            king,
            pawn,
            rays,
            connections,
            collisions,
        }
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight[sq.index() as usize]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king[sq.index() as usize]
    }

    /// Squares a pawn of `color` standing on `sq` attacks.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index() as usize]
    }

    #[inline]
    pub fn connection(&self, a: Square, b: Square) -> &Connection {
        &self.connections[a.index() as usize * 64 + b.index() as usize]
    }

    #[inline]
    pub fn kind(&self, a: Square, b: Square) -> RayKind {
        self.connection(a, b).kind
    }

    #[inline]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.connection(a, b).between
    }

    /// Between plus `b` itself: the squares a move can land on to block
    /// a check from `b` on a king at `a`, or capture the checker.
    #[inline]
    pub fn segment(&self, a: Square, b: Square) -> Bitboard {
        self.connection(a, b).between.with(b)
    }

    #[inline]
    pub fn line(&self, a: Square, b: Square) -> Bitboard {
        self.connection(a, b).line
    }

    /// From `a` through `b` to the board edge.
    #[inline]
    pub fn ray(&self, a: Square, b: Square) -> Bitboard {
        self.connection(a, b).ray
    }

    /// First occupied square met walking from `from` along `ray`,
    /// or `from` itself when the ray is clear.
    ///
    /// `ray` must be one of the eight edge rays of `from`.
    #[inline]
    pub fn first_blocker_on(&self, from: Square, ray: Bitboard, occupied: Bitboard) -> Square {
        self.collisions[from.index() as usize][&(occupied & ray).0]
    }

    /// First occupied square walking from `from` toward (and past) `toward`.
    ///
    /// The two squares must share a line.
    #[inline]
    pub fn first_blocker(&self, from: Square, toward: Square, occupied: Bitboard) -> Square {
        self.first_blocker_on(from, self.ray(from, toward), occupied)
    }

    fn slide(
        &self,
        sq: Square,
        occupied: Bitboard,
        directions: std::ops::Range<usize>,
    ) -> Bitboard {
        let rays = &self.rays[sq.index() as usize];
        let mut attacks = Bitboard::EMPTY;
        for d in directions {
            let ray = rays[d];
            let blocker = self.first_blocker_on(sq, ray, occupied);
            attacks |= if blocker == sq {
                ray
            } else {
                self.segment(sq, blocker)
            };
        }
        attacks
    }

    /// Rook-line attacks, including the first blocker in each direction.
    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.slide(sq, occupied, STRAIGHT)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.slide(sq, occupied, DIAGONAL)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.slide(sq, occupied, 0..8)
    }
}
