use std::io::{self, BufRead, Write};

use chess_core::config::AppConfig;
use chess_core::engine::{ChessError, Game, GameStatus, Move, Square};

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let mut game = Game::new();

    tracing::info!(
        "chess-core v{} starting game {}",
        env!("CARGO_PKG_VERSION"),
        game.id
    );

    println!("Enter moves as origin then destination, e.g. e2e4.");
    println!("Commands: moves, board, undo, quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let legal = game.valid_moves();

        print_board(&game, &config);
        if config.show_moves {
            print_moves(&legal);
        }

        // The prompt survives the end of the game so undo can walk back
        // out of a mate; with an empty legal list, no move input matches.
        match game.status() {
            GameStatus::Checkmate => println!("Checkmate, {} wins.", !game.side_to_move()),
            GameStatus::Stalemate => println!("Stalemate, draw."),
            GameStatus::InProgress => {
                if game.in_check() {
                    println!("{} is in check.", game.side_to_move());
                }
            }
        }

        print!("{} to move> ", game.side_to_move());
        if io::stdout().flush().is_err() {
            break;
        }
        let Some(Ok(line)) = lines.next() else {
            break;
        };

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "board" => continue,
            "moves" => {
                print_moves(&legal);
                continue;
            }
            "undo" => {
                match game.undo_move() {
                    Some(mv) => println!("Undid {mv}."),
                    None => println!("Nothing to undo."),
                }
                continue;
            }
            text => match parse_move(text, &game) {
                Ok(candidate) => {
                    // Screen against the legal list; apply the generator's
                    // instance so the capture and special flags are right.
                    if let Some(&mv) = legal.iter().find(|m| **m == candidate) {
                        game.make_move(mv);
                        tracing::info!(game = %game.id, "played {mv}");
                    } else {
                        tracing::warn!(game = %game.id, "rejected illegal move {candidate}");
                        println!("Illegal move: {text}.");
                    }
                }
                Err(e) => {
                    tracing::warn!(game = %game.id, "unparseable input: {e}");
                    println!("{e} (expected e.g. e2e4)");
                }
            },
        }
    }
}

/// Parse "e2e4"-style input into a move candidate for the current board.
fn parse_move(text: &str, game: &Game) -> Result<Move, ChessError> {
    if !text.is_ascii() || text.len() != 4 {
        return Err(ChessError::InvalidSquare(text.to_string()));
    }
    let from = Square::from_algebraic(&text[..2])
        .ok_or_else(|| ChessError::InvalidSquare(text[..2].to_string()))?;
    let to = Square::from_algebraic(&text[2..])
        .ok_or_else(|| ChessError::InvalidSquare(text[2..].to_string()))?;
    Ok(Move::new(from, to, game.board()))
}

fn print_board(game: &Game, config: &AppConfig) {
    if config.unicode_pieces {
        println!("\n{}\n", game.board().unicode_grid());
    } else {
        println!("\n{}\n", game.board());
    }
}

fn print_moves(moves: &[Move]) {
    let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    println!("Legal moves ({}): {}", moves.len(), list.join(" "));
}
