mod page;
mod server;

pub use page::*;
pub use server::*;
