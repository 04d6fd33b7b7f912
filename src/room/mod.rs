pub mod broadcaster;
mod player;
mod registry;
#[allow(clippy::module_inception)]
mod room;

pub use player::{Player, PlayerId};
pub use registry::RoomRegistry;
pub use room::{GuessReward, Room, DRAWER_REWARD, GUESSER_REWARD};
