//! CLI commands implementation

pub mod ask;
pub mod chat;
pub mod init;
pub mod smoke;

pub use ask::*;
pub use chat::*;
pub use init::*;
pub use smoke::*;
