mod client;
mod command;
mod error;
mod process;
mod speed;


pub use client::{ClientError, ClientTarget, SpeedBackend, SpeedClient};
pub use command::{CommandBackend, CommandClient, DEFAULT_HELPER_TIMEOUT};
pub use error::ControlError;
pub use process::{ProcessFinder, SystemProcessFinder, find_matching_pid};
pub use speed::{NORMAL_SPEED, SpeedController};
