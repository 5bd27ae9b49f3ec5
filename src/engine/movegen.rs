//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves per piece kind (ignoring pins).
//!   2. Append castling moves.
//!   3. Filter: apply each candidate to a scratch copy of the game and
//!      drop it if the mover's king is attacked afterwards.
//!
//! Attack queries reuse the pseudo-legal generator for the attacking side
//! and never include castling, so they cannot re-enter themselves.

use crate::engine::game::Game;
use crate::engine::types::{Color, Move, PieceKind, Square};

/// Rook rays.
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Bishop rays.
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Queen rays; also the king's single steps.
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
pub fn legal_moves(game: &Game) -> Vec<Move> {
    let us = game.side_to_move();
    let mut candidates = Vec::with_capacity(64);
    pseudo_legal_moves(game, us, &mut candidates);
    castling_moves(game, us, &mut candidates);

    // Filter: after each candidate the mover's own king must be safe.
    candidates.retain(|&mv| {
        let mut trial = game.clone();
        trial.make_move(mv);
        !square_attacked(&trial, trial.king_square(us), !us)
    });
    candidates
}

/// Is `sq` attacked by any piece of color `by`?
///
/// Defined as a destination scan over `by`'s pseudo-legal moves. Castling
/// is never part of the scan; a castling move threatens nothing by itself.
pub fn square_attacked(game: &Game, sq: Square, by: Color) -> bool {
    let mut moves = Vec::with_capacity(64);
    pseudo_legal_moves(game, by, &mut moves);
    moves.iter().any(|mv| mv.to == sq)
}

// =========================================================================
// Pseudo-legal generation (internal)
// =========================================================================

fn pseudo_legal_moves(game: &Game, color: Color, moves: &mut Vec<Move>) {
    for (from, piece) in game.board().occupied() {
        if piece.color != color {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(game, from, color, moves),
            PieceKind::Knight => leaper_moves(game, from, color, &KNIGHT_JUMPS, moves),
            PieceKind::Bishop => slider_moves(game, from, color, &DIAGONALS, moves),
            PieceKind::Rook => slider_moves(game, from, color, &ORTHOGONALS, moves),
            PieceKind::Queen => slider_moves(game, from, color, &ALL_DIRECTIONS, moves),
            PieceKind::King => leaper_moves(game, from, color, &ALL_DIRECTIONS, moves),
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn pawn_moves(game: &Game, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = game.board();
    let dir = color.forward();

    // Pushes: one forward if empty, two from the home row if both are.
    if let Some(one) = from.offset(dir, 0)
        && board.is_empty(one)
    {
        moves.push(Move::new(from, one, board));
        if from.row == color.pawn_home_row()
            && let Some(two) = one.offset(dir, 0)
            && board.is_empty(two)
        {
            moves.push(Move::new(from, two, board));
        }
    }

    // Diagonal captures, including onto the en-passant target square.
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        match board.piece_at(to) {
            Some(p) if p.color != color => moves.push(Move::new(from, to, board)),
            None if game.en_passant_target() == Some(to) => {
                moves.push(Move::en_passant(from, to, board));
            }
            _ => {}
        }
    }
}

// =========================================================================
// Knight and king steps
// =========================================================================

fn leaper_moves(
    game: &Game,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let board = game.board();
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        if board.piece_at(to).is_none_or(|p| p.color != color) {
            moves.push(Move::new(from, to, board));
        }
    }
}

// =========================================================================
// Slider rays (bishop, rook, queen)
// =========================================================================

fn slider_moves(game: &Game, from: Square, color: Color, rays: &[(i8, i8)], moves: &mut Vec<Move>) {
    let board = game.board();
    for &(dr, dc) in rays {
        let mut sq = from;
        while let Some(to) = sq.offset(dr, dc) {
            match board.piece_at(to) {
                None => {
                    moves.push(Move::new(from, to, board));
                    sq = to;
                }
                Some(p) => {
                    if p.color != color {
                        moves.push(Move::new(from, to, board));
                    }
                    break;
                }
            }
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn castling_moves(game: &Game, color: Color, moves: &mut Vec<Move>) {
    let them = !color;
    let king = game.king_square(color);

    // No castling out of check.
    if square_attacked(game, king, them) {
        return;
    }

    let board = game.board();
    let rights = game.castling_rights();

    // Kingside: f and g must be clear and un-attacked.
    if rights.kingside(color)
        && let (Some(f), Some(g)) = (king.offset(0, 1), king.offset(0, 2))
        && board.is_empty(f)
        && board.is_empty(g)
        && !square_attacked(game, f, them)
        && !square_attacked(game, g, them)
    {
        moves.push(Move::castle(king, g, board));
    }

    // Queenside: b, c, d must be clear, c and d un-attacked. The king
    // never crosses b, so b may be covered by the enemy.
    if rights.queenside(color)
        && let (Some(d), Some(c), Some(b)) =
            (king.offset(0, -1), king.offset(0, -2), king.offset(0, -3))
        && board.is_empty(b)
        && board.is_empty(c)
        && board.is_empty(d)
        && !square_attacked(game, c, them)
        && !square_attacked(game, d, them)
    {
        moves.push(Move::castle(king, c, board));
    }
}

// =========================================================================
// Tests
// =========================================================================
