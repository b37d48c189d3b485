mod team;
mod token;
mod user;

pub use team::{TeamCommands, TeamKeyArgs, TeamMembersArgs};
pub use token::{TokenCommands, TokenDecodeArgs};
pub use user::{UserCommands, UserCredentialArgs, UserFindArgs};
