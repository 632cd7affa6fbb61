mod chat;
mod register;
mod sync;
mod worker;

pub use chat::run as chat;
pub use register::run as register;
pub use sync::run as sync;
pub use worker::run as worker;
