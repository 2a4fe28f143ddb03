//! Constants for board geometry, the turn schedule, search limits and
//! evaluation weights.
//!
//! The board is a fixed 8x8 grid addressed by `(column, row)`, with the
//! origin in the top-left corner. Rows grow downwards, so "up" means a
//! smaller row index.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). The game is only defined for 8x8.
pub const N: usize = 8;

/// Number of times the playable area shrinks during a game.
pub const MAX_SHRINKS: usize = 2;

/// Corners of the unshrunk board: top-left, bottom-left, bottom-right, top-right.
///
/// This is also the order in which corner eliminations are resolved after a
/// shrink.
pub const INITIAL_CORNERS: [(usize, usize); 4] = [(0, 0), (0, N - 1), (N - 1, N - 1), (N - 1, 0)];

// =============================================================================
// Turn Schedule
// =============================================================================

/// Pieces each side places during the placement phase.
pub const PIECES_PER_SIDE: usize = 12;

/// Total plies in the placement phase (both sides).
pub const PLACEMENT_PLIES: u32 = (2 * PIECES_PER_SIDE) as u32;

/// Movement-phase turns after which the board shrinks.
///
/// The shrink happens once the ply numbered here (counting from 0) has been
/// applied, so the first shrink follows the 128th movement ply.
pub const SHRINK_TURNS: [u32; MAX_SHRINKS] = [127, 191];

// =============================================================================
// Placement Bands
// =============================================================================

/// Rows White may place into (inclusive).
pub const WHITE_PLACE_ROWS: (usize, usize) = (0, 5);

/// Rows Black may place into (inclusive).
pub const BLACK_PLACE_ROWS: (usize, usize) = (2, 7);

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies, for alpha-beta and tree exploration.
pub const SEARCH_DEPTH: usize = 2;

/// Default number of children expanded per node in bounded tree exploration.
pub const TREE_BREADTH: usize = 8;

/// Default node budget for a single search call.
pub const MAX_NODES: usize = 200_000;

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Weight of the piece-count difference.
pub const EVAL_ALPHA: f64 = 10.0;

/// Weight of own pieces already standing on a goal tile.
pub const EVAL_BETA: f64 = 2.0;

/// Weight of the inverse summed distance to the nearest goal tile.
pub const EVAL_GAMMA: f64 = 1.0;

// =============================================================================
// Cell Characters (board textual form)
// =============================================================================

/// Empty square.
pub const CHAR_EMPTY: char = '-';

/// Corner marker.
pub const CHAR_CORNER: char = 'X';

/// White piece.
pub const CHAR_WHITE: char = 'O';

/// Black piece.
pub const CHAR_BLACK: char = '@';

/// Square removed by a shrink.
pub const CHAR_OFF_BOARD: char = '#';
