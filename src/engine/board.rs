//! 8×8 mailbox board: a plain grid of optional pieces.
//!
//! Row 0 is rank 8 (Black's back rank), row 7 is rank 1; column 0 is the
//! a-file. The grid knows nothing about whose turn it is — side to move,
//! castling rights, and the move log live on [`Game`](crate::engine::Game).

use std::fmt;

use crate::engine::types::{Color, Piece, PieceKind, Square};

/// The piece grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Empty board, no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting position.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.place(Square::new(0, col), Color::Black, kind);
            board.place(Square::new(7, col), Color::White, kind);
        }
        for col in 0..8 {
            board.place(Square::new(1, col), Color::Black, PieceKind::Pawn);
            board.place(Square::new(6, col), Color::White, PieceKind::Pawn);
        }
        board
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    /// Overwrite a square's contents.
    #[inline]
    pub fn set(&mut self, sq: Square, contents: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = contents;
    }

    /// Place a piece on a square.
    #[inline]
    pub fn place(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.set(sq, Some(Piece::new(color, kind)));
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Iterate over every occupied square with its piece, a8 first,
    /// h1 last.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter()
                .copied()
                .enumerate()
                .filter_map(move |(col, cell)| {
                    cell.map(|piece| (Square::new(row as u8, col as u8), piece))
                })
        })
    }

    /// Number of pieces of one color on the board.
    pub fn piece_count(&self, color: Color) -> usize {
        self.occupied().filter(|(_, p)| p.color == color).count()
    }

    /// Locate the king of one color. `None` only on hand-built boards.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    // -----------------------------------------------------------------------
    // Display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render with figurine glyphs instead of letters.
    pub fn unicode_grid(&self) -> String {
        self.render(|p| p.glyph())
    }

    fn render(&self, piece_char: impl Fn(Piece) -> char) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) => piece_char(p),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl fmt::Display for Board {
    /// Letter grid (rank 8 at the top), useful for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(|p| p.to_char()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
