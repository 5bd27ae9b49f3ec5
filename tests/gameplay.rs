//! End-to-end games played through the public API.
//!
//! These walk whole games — scripted mates, a composed stalemate, long
//! histories mixing promotion and castling — and check that the engine's
//! view of the position, the history log, and the terminal flags stay
//! coherent from the first ply to a full unwind.

use chess_core::engine::{
    Board, CastlingRights, Color, Game, GameStatus, Move, Piece, PieceKind, Square,
};

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

/// Apply a scripted sequence, asserting each move is legal as played.
fn play(game: &mut Game, moves: &[&str]) {
    for text in moves {
        let candidate = Move::new(sq(&text[..2]), sq(&text[2..]), game.board());
        let mv = game
            .valid_moves()
            .into_iter()
            .find(|m| *m == candidate)
            .unwrap_or_else(|| panic!("move {text} is not legal here"));
        game.make_move(mv);
    }
}

/// Everything observable that history walks must preserve.
fn state_of(game: &Game) -> (Board, Color, CastlingRights, Option<Square>, usize) {
    (
        game.board().clone(),
        game.side_to_move(),
        game.castling_rights(),
        game.en_passant_target(),
        game.move_log().len(),
    )
}

// =====================================================================
// Mates
// =====================================================================

#[test]
fn fools_mate_then_full_unwind_and_replay() {
    let mut game = Game::new();
    let fresh = state_of(&game);
    let script = ["f2f3", "e7e5", "g2g4", "d8h4"];

    play(&mut game, &script);
    assert!(game.valid_moves().is_empty());
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.side_to_move(), Color::White);

    for _ in 0..script.len() {
        assert!(game.undo_move().is_some());
    }
    assert_eq!(state_of(&game), fresh);
    assert_eq!(game.valid_moves().len(), 20);
    assert_eq!(game.status(), GameStatus::InProgress);

    // The unwound game is fully playable again.
    play(&mut game, &script);
    game.valid_moves();
    assert!(game.checkmate());
}

#[test]
fn back_rank_mate_with_heavy_pieces() {
    let mut board = Board::empty();
    board.place(sq("g8"), Color::Black, PieceKind::King);
    board.place(sq("f7"), Color::Black, PieceKind::Pawn);
    board.place(sq("g7"), Color::Black, PieceKind::Pawn);
    board.place(sq("h7"), Color::Black, PieceKind::Pawn);
    board.place(sq("a1"), Color::White, PieceKind::Rook);
    board.place(sq("g1"), Color::White, PieceKind::King);
    let mut game = Game::from_setup(board, Color::White, CastlingRights::NONE, None).unwrap();

    play(&mut game, &["a1a8"]);
    assert!(game.valid_moves().is_empty());
    assert!(game.checkmate());
    assert_eq!(game.status(), GameStatus::Checkmate);
}

// =====================================================================
// Stalemate
// =====================================================================

/// Sam Loyd's composed shortest stalemate with all pieces still in play.
#[test]
fn loyd_stalemate_in_ten_moves() {
    let mut game = Game::new();
    play(
        &mut game,
        &[
            "e2e3", "a7a5", "d1h5", "a8a6", "h5a5", "h7h5", "a5c7", "a6h6", "h2h4", "f7f6",
            "c7d7", "e8f7", "d7b7", "d8d3", "b7b8", "d3h7", "b8c8", "f7g6", "c8e6",
        ],
    );

    let moves = game.valid_moves();
    assert!(moves.is_empty(), "unexpected moves: {moves:?}");
    assert!(game.stalemate());
    assert!(!game.checkmate());
    assert!(!game.in_check());
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert_eq!(game.move_log().len(), 19);
}

// =====================================================================
// En passant window
// =====================================================================

#[test]
fn en_passant_window_closes_after_one_ply() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "h7h6", "e4e5", "d7d5"]);

    // The capture is on offer now...
    assert_eq!(game.en_passant_target(), Some(sq("d6")));
    assert!(game.valid_moves().iter().any(|m| m.is_en_passant));

    // ...but any other move forfeits it for good.
    play(&mut game, &["a2a3"]);
    assert_eq!(game.en_passant_target(), None);

    play(&mut game, &["h6h5"]);
    let later = game.valid_moves();
    assert!(!later.iter().any(|m| m.is_en_passant));
    // The bypassed pawn is no longer capturable at all.
    assert!(!later.iter().any(|m| m.to == sq("d5")));
}

// =====================================================================
// Long histories
// =====================================================================

#[test]
fn history_walk_with_promotion_and_castling() {
    let mut game = Game::new();
    let fresh = state_of(&game);
    let script = [
        "a2a4", "b7b5", "a4b5", "g8f6", "b5b6", "f6g8", "b6b7", "g8f6", "b7a8", "e7e6",
        "g1f3", "f8e7", "g2g3", "e8g8",
    ];
    play(&mut game, &script);

    // The a-pawn promoted on the corner it captured into.
    assert_eq!(
        game.board().piece_at(sq("a8")),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );
    // Black castled kingside: king g8, corner rook hopped to f8.
    assert_eq!(
        game.board().piece_at(sq("g8")),
        Some(Piece::new(Color::Black, PieceKind::King))
    );
    assert_eq!(
        game.board().piece_at(sq("f8")),
        Some(Piece::new(Color::Black, PieceKind::Rook))
    );
    assert!(game.board().is_empty(sq("h8")));
    assert!(!game.castling_rights().kingside(Color::Black));
    assert!(!game.castling_rights().queenside(Color::Black));
    assert!(game.castling_rights().kingside(Color::White));
    assert!(game.castling_rights().queenside(Color::White));

    for _ in 0..script.len() {
        assert!(game.undo_move().is_some());
    }
    assert_eq!(state_of(&game), fresh);
    assert_eq!(game.board(), &Board::standard());
    assert_eq!(game.valid_moves().len(), 20);
}

#[test]
fn undo_then_different_continuation() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5"]);

    let undone = game.undo_move().unwrap();
    assert_eq!(undone.to, sq("e5"));
    assert_eq!(game.side_to_move(), Color::Black);

    play(&mut game, &["c7c5"]);
    assert!(game.board().is_empty(sq("e5")));
    assert_eq!(
        game.board().piece_at(sq("c5")),
        Some(Piece::new(Color::Black, PieceKind::Pawn))
    );
    assert_eq!(game.move_log().len(), 2);
}

#[test]
fn interleaved_games_stay_independent() {
    let mut ruy = Game::new();
    let mut sicilian = Game::new();
    assert_ne!(ruy.id, sicilian.id);

    play(&mut ruy, &["e2e4"]);
    play(&mut sicilian, &["e2e4"]);
    play(&mut ruy, &["e7e5"]);
    play(&mut sicilian, &["c7c5"]);

    assert!(ruy.board().is_empty(sq("e7")));
    assert!(!sicilian.board().is_empty(sq("e7")));
    assert!(sicilian.board().is_empty(sq("c7")));
    assert_eq!(ruy.move_log().len(), 2);
    assert_eq!(sicilian.move_log().len(), 2);
}
