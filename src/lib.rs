pub mod application;
pub mod cli;
pub mod config;
pub mod connector;
pub mod domain;

pub use application::{
    CompletionClient, OpenSessionUseCase, SendMessageUseCase, SessionStore, SharedSession,
};

pub use cli::Commands;

pub use config::AppConfig;

pub use connector::{
    router, serve, Container, ContainerConfig, GroqClient, InMemorySessionStore,
    MockCompletionClient, MockFailure, Router, ServeHandle,
};

pub use domain::{
    ChatMessage, ChatSession, CompletionRequest, DomainError, Role, Transcript, DEFAULT_MODEL,
    SYSTEM_PROMPT,
};
