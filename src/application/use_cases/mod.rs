mod open_session;
mod send_message;

pub use open_session::*;
pub use send_message::*;
