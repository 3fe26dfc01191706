//! Value objects - Immutable objects defined by their attributes

mod color;
mod email;
mod money;
mod names;

pub use color::HexColor;
pub use email::Email;
pub use money::Amount;
pub use names::{CategoryName, Description, PlayerName, QuestTitle};
