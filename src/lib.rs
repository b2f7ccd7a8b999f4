pub mod cli;
pub mod emitter;
pub mod parser;
pub mod table;

pub use cli::*;
pub use emitter::*;
pub use parser::*;
pub use table::*;
