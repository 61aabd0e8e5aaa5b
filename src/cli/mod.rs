use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the chat page over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the page on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Send a single prompt in a throwaway session and print the reply
    Ask {
        prompt: String,
    },
}

impl Commands {
    /// Socket address for `serve`, `None` for every other command.
    pub fn bind_address(&self) -> Option<String> {
        match self {
            Commands::Serve { port, public } => {
                let host = if *public { "0.0.0.0" } else { "127.0.0.1" };
                Some(format!("{host}:{port}"))
            }
            _ => None,
        }
    }
}
