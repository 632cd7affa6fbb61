//! Database-facing enums and row-trait helpers.

mod enums;
mod utilities;

pub use enums::{DbFileIndexStatus, DbFolderStatus, DbJobStatus, DbMessageRole};
pub use utilities::{HasCreatedAt, HasUpdatedAt};
