use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::Command;

/// Boxed future returned by a [`FuncCommand`] closure.
pub type CommandFuture = Pin<Box<dyn Future<Output = Result<String, CommandError>> + Send>>;

type Handler = Arc<dyn Fn(String, Vec<String>) -> CommandFuture + Send + Sync>;

/// Command backed by an async closure taking `(conversation, args)`.
pub struct FuncCommand {
    description: String,
    show_result: bool,
    handler: Handler,
}

impl FuncCommand {
    pub fn new<F, Fut>(description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
    {
        Self {
            description: description.into(),
            show_result: true,
            handler: Arc::new(move |conversation: String, args: Vec<String>| -> CommandFuture {
                Box::pin(handler(conversation, args))
            }),
        }
    }

    pub fn with_show_result(mut self, show_result: bool) -> Self {
        self.show_result = show_result;
        self
    }
}

#[async_trait]
impl Command for FuncCommand {
    fn description(&self) -> &str {
        &self.description
    }

    fn show_result(&self) -> bool {
        self.show_result
    }

    async fn run(&self, conversation: &str, args: &[String]) -> Result<String, CommandError> {
        (self.handler)(conversation.to_string(), args.to_vec()).await
    }
}
