pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::Board;
pub use game::Game;
pub use movegen::{legal_moves, square_attacked};
pub use types::*;
