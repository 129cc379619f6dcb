pub mod board;
pub mod config;
pub mod criteria;
pub mod idea;
pub mod session;

pub use board::*;
pub use config::*;
pub use criteria::*;
pub use idea::*;
pub use session::*;
