//! Diesel row models for each table, plus conversions to/from
//! `driveloom_core::types`.

mod chunk;
mod conversation;
mod file;
mod folder;
mod job;
mod message;

pub use chunk::{DbChunk, NewDbChunk, UpdateDbChunk};
pub use conversation::DbConversation;
pub use file::{DbFile, NewDbFile, UpdateDbFile};
pub use folder::{DbFolder, NewDbFolder, UpdateDbFolder};
pub use job::{DbIndexingJob, NewDbIndexingJob};
pub use message::{DbMessage, NewDbMessage};
