mod chat_message;
mod completion_request;
mod session;
mod transcript;

pub use chat_message::*;
pub use completion_request::*;
pub use session::*;
pub use transcript::*;
