pub mod constants;
pub mod error;
pub mod field;
pub mod rain;
pub mod session;
pub mod sprite;
pub mod state;

pub use constants::*;
pub use error::*;
pub use rain::*;
pub use session::*;
pub use sprite::*;
pub use state::*;
