mod groq_client;
mod in_memory_session_store;
mod mock_completion_client;

pub use groq_client::*;
pub use in_memory_session_store::*;
pub use mock_completion_client::*;
