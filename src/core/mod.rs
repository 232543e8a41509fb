pub mod alphabet;
pub mod calling;
pub mod counting;
pub mod error;
pub mod io;
pub mod normalize;
pub mod projection;
pub mod read;
