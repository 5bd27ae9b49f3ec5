//! Stateful game controller: one owned value holding a complete game.
//!
//! `Game` owns the board, side to move, cached king squares, the move log,
//! the castling-rights tracker, and the en-passant target. `make_move`
//! applies whatever it is given and `undo_move` reverts exactly one ply;
//! screening candidates is the caller's job — drivers match input against
//! `valid_moves` by square-pair equality and apply the generator's
//! instance, so an unmatched candidate is simply never played.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{
    CastlingRights, ChessError, Color, GameStatus, Move, Piece, PieceKind, Square,
};

// =========================================================================
// Game
// =========================================================================

/// A complete chess game: position, history, and terminal flags.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    white_king: Square,
    black_king: Square,
    /// Applied moves, most recent last.
    move_log: Vec<Move>,
    castling_rights: CastlingRights,
    /// One snapshot per applied ply, plus the initial entry.
    rights_log: Vec<CastlingRights>,
    /// Square a pawn just skipped, if the last move was a double push.
    en_passant: Option<Square>,
    /// Cached terminal flags; recomputed only by [`Game::valid_moves`].
    checkmate: bool,
    stalemate: bool,

    // Metadata for log correlation when a host juggles several games.
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Standard starting position, all castling rights intact.
    pub fn new() -> Self {
        Game {
            board: Board::standard(),
            side_to_move: Color::White,
            white_king: Square::new(7, 4),
            black_king: Square::new(0, 4),
            move_log: Vec::new(),
            castling_rights: CastlingRights::ALL,
            rights_log: vec![CastlingRights::ALL],
            en_passant: None,
            checkmate: false,
            stalemate: false,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Build a game from an arbitrary position.
    ///
    /// Requires exactly one king per side; everything else is taken as
    /// given. Castling rights are trusted as-is: generation gates on
    /// rights, emptiness, and attacks, never on rook placement, so pass
    /// rights consistent with the rooks you placed.
    pub fn from_setup(
        board: Board,
        side_to_move: Color,
        rights: CastlingRights,
        en_passant: Option<Square>,
    ) -> Result<Self, ChessError> {
        let white_king = locate_king(&board, Color::White)?;
        let black_king = locate_king(&board, Color::Black)?;
        Ok(Game {
            board,
            side_to_move,
            white_king,
            black_king,
            move_log: Vec::new(),
            castling_rights: rights,
            rights_log: vec![rights],
            en_passant,
            checkmate: false,
            stalemate: false,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        })
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Square a pawn may be captured en passant on, if any.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// Current castling availability.
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Applied moves, oldest first.
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// Cached location of one side's king.
    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    /// Checkmate flag as of the last [`Game::valid_moves`] call.
    pub fn checkmate(&self) -> bool {
        self.checkmate
    }

    /// Stalemate flag as of the last [`Game::valid_moves`] call.
    pub fn stalemate(&self) -> bool {
        self.stalemate
    }

    /// Derived view of the cached terminal flags.
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate
        } else if self.stalemate {
            GameStatus::Stalemate
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    /// Is the side to move's king attacked right now?
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        movegen::square_attacked(self, self.king_square(us), !us)
    }

    /// Is `sq` attacked by the side not to move?
    pub fn square_under_attack(&self, sq: Square) -> bool {
        movegen::square_attacked(self, sq, !self.side_to_move)
    }

    /// All legal moves for the side to move.
    ///
    /// Also recomputes the terminal flags: an empty list means checkmate
    /// when the king is attacked, stalemate otherwise. A non-empty list
    /// clears both, so undoing out of a mate un-flags it on the next call.
    pub fn valid_moves(&mut self) -> Vec<Move> {
        let moves = movegen::legal_moves(self);
        if moves.is_empty() {
            self.checkmate = self.in_check();
            self.stalemate = !self.checkmate;
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }
        moves
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Apply a move. No legality check is performed: the caller is
    /// expected to pass a move taken from [`Game::valid_moves`].
    pub fn make_move(&mut self, mv: Move) {
        self.board.set(mv.from, None);
        self.board.set(mv.to, mv.moved);
        self.move_log.push(mv);

        if let Some(piece) = mv.moved {
            if piece.kind == PieceKind::King {
                self.set_king_square(piece.color, mv.to);
            }

            if mv.is_promotion {
                self.board
                    .set(mv.to, Some(Piece::new(piece.color, PieceKind::Queen)));
            }

            if mv.is_en_passant {
                // The captured pawn sits beside the origin row.
                self.board.set(Square::new(mv.from.row, mv.to.col), None);
            }

            // A double push leaves the skipped square capturable for one ply.
            self.en_passant = if piece.kind == PieceKind::Pawn
                && mv.from.row.abs_diff(mv.to.row) == 2
            {
                Some(Square::new((mv.from.row + mv.to.row) / 2, mv.from.col))
            } else {
                None
            };
        } else {
            self.en_passant = None;
        }

        self.update_castling_rights(mv);
        self.rights_log.push(self.castling_rights);

        if mv.is_castle {
            self.relocate_castle_rook(mv);
        }

        self.side_to_move = !self.side_to_move;
    }

    /// Revocations triggered by this move. Rights are never re-granted.
    fn update_castling_rights(&mut self, mv: Move) {
        if let Some(p) = mv.moved {
            match p.kind {
                PieceKind::King => self.castling_rights.revoke_both(p.color),
                // Origin row is checked so a promoted rook moving off the
                // last rank doesn't revoke anything.
                PieceKind::Rook if mv.from.row == p.color.back_row() => {
                    if mv.from.col == 0 {
                        self.castling_rights.revoke_queenside(p.color);
                    } else if mv.from.col == 7 {
                        self.castling_rights.revoke_kingside(p.color);
                    }
                }
                _ => {}
            }
        }

        // A rook captured on its home corner also loses that right.
        if let Some(p) = mv.captured
            && p.kind == PieceKind::Rook
            && mv.to.row == p.color.back_row()
        {
            if mv.to.col == 0 {
                self.castling_rights.revoke_queenside(p.color);
            } else if mv.to.col == 7 {
                self.castling_rights.revoke_kingside(p.color);
            }
        }
    }

    /// Hop the rook over the king after a castling king move.
    fn relocate_castle_rook(&mut self, mv: Move) {
        let row = mv.to.row;
        if mv.to.col > mv.from.col {
            // Kingside: corner rook lands on the king's left.
            let corner = Square::new(row, mv.to.col + 1);
            let rook = self.board.piece_at(corner);
            self.board.set(Square::new(row, mv.to.col - 1), rook);
            self.board.set(corner, None);
        } else {
            // Queenside: corner rook lands on the king's right.
            let corner = Square::new(row, mv.to.col - 2);
            let rook = self.board.piece_at(corner);
            self.board.set(Square::new(row, mv.to.col + 1), rook);
            self.board.set(corner, None);
        }
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Revert the last applied move. A no-op returning `None` when the
    /// log is empty.
    ///
    /// En-passant availability is reconstructed heuristically: exact when
    /// the undone move was itself an en-passant capture, cleared when it
    /// was a double push, untouched otherwise. A full unwind back to the
    /// initial position restores the starting state exactly.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;

        self.board.set(mv.from, mv.moved);
        self.board.set(mv.to, mv.captured);
        self.side_to_move = !self.side_to_move;

        if let Some(piece) = mv.moved {
            if piece.kind == PieceKind::King {
                self.set_king_square(piece.color, mv.from);
            }

            if mv.is_en_passant {
                // The pawn fell beside the origin row, not on `to`.
                self.board.set(mv.to, None);
                self.board
                    .set(Square::new(mv.from.row, mv.to.col), mv.captured);
                self.en_passant = Some(mv.to);
            }

            if piece.kind == PieceKind::Pawn && mv.from.row.abs_diff(mv.to.row) == 2 {
                self.en_passant = None;
            }
        }

        self.rights_log.pop();
        if let Some(&rights) = self.rights_log.last() {
            self.castling_rights = rights;
        }

        if mv.is_castle {
            self.undo_castle_rook(mv);
        }

        Some(mv)
    }

    /// Put the rook back in its corner when a castling move is undone.
    fn undo_castle_rook(&mut self, mv: Move) {
        let row = mv.to.row;
        if mv.to.col > mv.from.col {
            let hopped = Square::new(row, mv.to.col - 1);
            let rook = self.board.piece_at(hopped);
            self.board.set(Square::new(row, mv.to.col + 1), rook);
            self.board.set(hopped, None);
        } else {
            let hopped = Square::new(row, mv.to.col + 1);
            let rook = self.board.piece_at(hopped);
            self.board.set(Square::new(row, mv.to.col - 2), rook);
            self.board.set(hopped, None);
        }
    }

    fn set_king_square(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white_king = sq,
            Color::Black => self.black_king = sq,
        }
    }

    // -----------------------------------------------------------------
    // Consistency (debug/test builds)
    // -----------------------------------------------------------------

    /// Verify the cached king squares and log-length invariants.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        assert_eq!(
            self.board.find_king(Color::White),
            Some(self.white_king),
            "white king cache out of sync"
        );
        assert_eq!(
            self.board.find_king(Color::Black),
            Some(self.black_king),
            "black king cache out of sync"
        );
        assert_eq!(
            self.rights_log.len(),
            self.move_log.len() + 1,
            "rights log length mismatch"
        );
        assert_eq!(
            self.rights_log.last().copied(),
            Some(self.castling_rights),
            "rights snapshot mismatch"
        );
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn locate_king(board: &Board, color: Color) -> Result<Square, ChessError> {
    let mut kings = board
        .occupied()
        .filter(|(_, p)| p.color == color && p.kind == PieceKind::King);
    let Some((sq, _)) = kings.next() else {
        return Err(ChessError::InvalidSetup(format!("no {color} king")));
    };
    if kings.next().is_some() {
        return Err(ChessError::InvalidSetup(format!(
            "more than one {color} king"
        )));
    }
    Ok(sq)
}

// =========================================================================
// Tests
// =========================================================================
