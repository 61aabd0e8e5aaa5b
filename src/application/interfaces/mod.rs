mod completion_client;
mod session_store;

pub use completion_client::*;
pub use session_store::*;
