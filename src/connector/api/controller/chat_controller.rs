use anyhow::Result;

use crate::ChatSession;

use super::super::Container;

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// One-shot turn in a session that is dropped afterwards.
    pub async fn ask(&self, prompt: String) -> Result<String> {
        let mut session = ChatSession::new();
        let use_case = self.container.send_message_use_case();
        let reply = use_case.execute(&mut session, &prompt).await?;
        Ok(reply.content().to_string())
    }
}
