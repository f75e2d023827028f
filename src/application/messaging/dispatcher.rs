//! Command dispatcher - Routes argument vectors to registered commands

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::format::{error_report, PAUSED_MESSAGE};
use crate::application::errors::BotError;
use crate::application::services::{HelpService, RunStateService};
use crate::domain::entities::{Command, CommandRegistry, HELP_TRIGGER};
use crate::domain::traits::{Backend, CommandRunner};

/// Triggers that still run while the bot is paused.
pub const ALWAYS_ALLOWED: [&str; 2] = ["resume", "config"];

/// What a dispatch did before returning.
#[derive(Debug)]
pub enum Dispatch {
    /// Help text was sent.
    Help,
    /// The bot is paused; the refusal was sent and nothing ran.
    Refused,
    /// The command is running in the background. Dropping the handle leaves
    /// it running.
    Spawned(JoinHandle<()>),
}

/// Looks commands up, applies the pause gate and launches them.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    run_state: Arc<RunStateService>,
    backend: Arc<dyn Backend>,
    help: HelpService,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        run_state: Arc<RunStateService>,
        backend: Arc<dyn Backend>,
        help: HelpService,
    ) -> Self {
        Self {
            registry,
            run_state,
            backend,
            help,
        }
    }

    pub fn help_text(&self) -> String {
        self.help.help_text(&self.registry)
    }

    /// Dispatch `args` that arrived on `conversation`.
    ///
    /// Returns as soon as the command is launched; its result is posted back
    /// to `conversation` when it finishes. An unknown trigger with no default
    /// command is an error and nothing is sent.
    pub async fn dispatch(
        &self,
        args: Vec<String>,
        conversation: &str,
    ) -> Result<Dispatch, BotError> {
        let trigger = match args.first() {
            Some(trigger) if trigger != HELP_TRIGGER => trigger.clone(),
            _ => {
                self.backend.send_message(&self.help_text(), conversation).await;
                return Ok(Dispatch::Help);
            }
        };

        let command = self
            .registry
            .resolve(&trigger)
            .ok_or_else(|| BotError::UnrecognizedCommand(args.join(" ")))?;

        if !ALWAYS_ALLOWED.contains(&trigger.as_str()) && self.run_state.is_paused().await {
            tracing::info!("Refusing {:?} while paused", args);
            self.backend.send_message(PAUSED_MESSAGE, conversation).await;
            return Ok(Dispatch::Refused);
        }

        let span = tracing::info_span!("command", job_id = %Uuid::new_v4(), trigger = %trigger);
        let backend = Arc::clone(&self.backend);
        let conversation = conversation.to_string();
        let handle = tokio::spawn(
            run_and_report(command, args, conversation, backend).instrument(span),
        );
        Ok(Dispatch::Spawned(handle))
    }
}

async fn run_and_report(
    command: Arc<dyn Command>,
    args: Vec<String>,
    conversation: String,
    backend: Arc<dyn Backend>,
) {
    tracing::info!("Running {:?}", args);
    match command.run(&conversation, &args).await {
        Ok(output) => {
            tracing::debug!("Output: {}", output);
            if command.show_result() {
                backend.send_message(&output, &conversation).await;
            }
        }
        Err(e) => {
            tracing::warn!("Error running {:?}: {}", args, e);
            backend.send_message(&error_report(&args, &e), &conversation).await;
        }
    }
}

#[async_trait]
impl CommandRunner for Dispatcher {
    async fn run_command(&self, args: Vec<String>, conversation: &str) -> Result<(), BotError> {
        self.dispatch(args, conversation).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::CommandError;
    use crate::domain::entities::{OutgoingMessage, RunState};
    use crate::infrastructure::adapters::channel::{ChannelBackend, ChannelHandle};
    use crate::infrastructure::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records how often it ran and replies with a fixed result.
    struct Spy {
        calls: AtomicUsize,
        result: Result<&'static str, &'static str>,
        show_result: bool,
    }

    impl Spy {
        fn ok(output: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Ok(output),
                show_result: true,
            })
        }

        fn quiet(output: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Ok(output),
                show_result: false,
            })
        }

        fn failing(output: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Err(output),
                show_result: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Command for Spy {
        fn description(&self) -> &str {
            "Spy command"
        }

        fn show_result(&self) -> bool {
            self.show_result
        }

        async fn run(&self, _conversation: &str, _args: &[String]) -> Result<String, CommandError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Ok(out) => Ok(out.to_string()),
                Err(out) => Err(CommandError::failed("exit status: 1", out)),
            }
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        handle: ChannelHandle,
    }

    fn fixture(registry: CommandRegistry, state: RunState) -> Fixture {
        let (backend, handle) = ChannelBackend::new("test", "!opsbot");
        let run_state = Arc::new(RunStateService::new(Arc::new(MemoryStore::new()), state));
        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            run_state,
            Arc::new(backend),
            HelpService::new(),
        );
        Fixture { dispatcher, handle }
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    const RUNNING: RunState = RunState { dry_run: false, paused: false };
    const PAUSED: RunState = RunState { dry_run: false, paused: true };

    async fn finish(dispatch: Dispatch) {
        match dispatch {
            Dispatch::Spawned(handle) => handle.await.unwrap(),
            other => panic!("expected a spawned command, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_show_result_is_sent() {
        let spy = Spy::ok("Tue Oct 20");
        let mut registry = CommandRegistry::new();
        registry.register("date", spy.clone()).unwrap();
        let mut f = fixture(registry, RUNNING);

        finish(f.dispatcher.dispatch(args(&["date"]), "ops").await.unwrap()).await;

        assert_eq!(spy.calls(), 1);
        assert_eq!(f.handle.drain(), vec![OutgoingMessage::new("ops", "Tue Oct 20")]);
    }

    #[tokio::test]
    async fn test_hidden_result_is_not_sent() {
        let spy = Spy::quiet("started");
        let mut registry = CommandRegistry::new();
        registry.register("build", spy.clone()).unwrap();
        let mut f = fixture(registry, RUNNING);

        finish(f.dispatcher.dispatch(args(&["build"]), "ops").await.unwrap()).await;

        assert_eq!(spy.calls(), 1);
        assert!(f.handle.drain().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let spy = Spy::failing("partial log");
        let mut registry = CommandRegistry::new();
        registry.register("build", spy.clone()).unwrap();
        let mut f = fixture(registry, RUNNING);

        finish(f.dispatcher.dispatch(args(&["build", "darwin"]), "ops").await.unwrap()).await;

        assert_eq!(
            f.handle.drain(),
            vec![OutgoingMessage::new(
                "ops",
                "Oops, there was an error in `build darwin`:\n```\npartial log\n```"
            )]
        );
    }

    #[tokio::test]
    async fn test_paused_refuses_and_never_runs() {
        for trigger in ["date", "build", "pause", "toggle-dryrun"] {
            let spy = Spy::ok("ran");
            let mut registry = CommandRegistry::new();
            registry.register(trigger, spy.clone()).unwrap();
            let mut f = fixture(registry, PAUSED);

            let dispatch = f.dispatcher.dispatch(args(&[trigger, "x"]), "ops").await.unwrap();

            assert!(matches!(dispatch, Dispatch::Refused));
            assert_eq!(spy.calls(), 0);
            assert_eq!(f.handle.drain(), vec![OutgoingMessage::new("ops", PAUSED_MESSAGE)]);
        }
    }

    #[tokio::test]
    async fn test_paused_still_allows_resume_and_config() {
        for trigger in ALWAYS_ALLOWED {
            let spy = Spy::ok("ok");
            let mut registry = CommandRegistry::new();
            registry.register(trigger, spy.clone()).unwrap();
            let mut f = fixture(registry, PAUSED);

            finish(f.dispatcher.dispatch(args(&[trigger]), "ops").await.unwrap()).await;

            assert_eq!(spy.calls(), 1);
            assert_eq!(f.handle.drain(), vec![OutgoingMessage::new("ops", "ok")]);
        }
    }

    #[tokio::test]
    async fn test_paused_gates_default_command() {
        let spy = Spy::ok("ran");
        let mut registry = CommandRegistry::new();
        registry.set_default(spy.clone());
        let mut f = fixture(registry, PAUSED);

        let dispatch = f.dispatcher.dispatch(args(&["anything"]), "ops").await.unwrap();

        assert!(matches!(dispatch, Dispatch::Refused));
        assert_eq!(spy.calls(), 0);
        assert_eq!(f.handle.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_is_silent_error() {
        let mut registry = CommandRegistry::new();
        registry.register("date", Spy::ok("x")).unwrap();
        let mut f = fixture(registry, RUNNING);

        let err = f.dispatcher.dispatch(args(&["nope", "a"]), "ops").await.unwrap_err();

        assert!(matches!(err, BotError::UnrecognizedCommand(ref a) if a == "nope a"));
        assert!(f.handle.drain().is_empty());
    }

    #[tokio::test]
    async fn test_default_receives_full_args() {
        struct Echo;

        #[async_trait]
        impl Command for Echo {
            fn description(&self) -> &str {
                "echo"
            }

            fn show_result(&self) -> bool {
                true
            }

            async fn run(
                &self,
                conversation: &str,
                args: &[String],
            ) -> Result<String, CommandError> {
                Ok(format!("{}: {}", conversation, args.join(",")))
            }
        }

        let mut registry = CommandRegistry::new();
        registry.set_default(Arc::new(Echo));
        let mut f = fixture(registry, RUNNING);

        finish(f.dispatcher.dispatch(args(&["release", "promote"]), "ops").await.unwrap()).await;

        assert_eq!(f.handle.drain(), vec![OutgoingMessage::new("ops", "ops: release,promote")]);
    }

    #[tokio::test]
    async fn test_help_and_empty_args_send_help() {
        let mut registry = CommandRegistry::new();
        registry.register("date", Spy::ok("x")).unwrap();
        let mut f = fixture(registry, PAUSED);

        for input in [args(&["help"]), args(&[]), args(&["help", "date"])] {
            let dispatch = f.dispatcher.dispatch(input, "ops").await.unwrap();
            assert!(matches!(dispatch, Dispatch::Help));
        }

        let sent = f.handle.drain();
        assert_eq!(sent.len(), 3);
        for message in sent {
            assert_eq!(message.text, f.dispatcher.help_text());
            assert!(message.text.contains("date\tSpy command"));
        }
    }

    #[tokio::test]
    async fn test_dispatch_returns_before_completion() {
        struct Gate(tokio::sync::Notify);

        #[async_trait]
        impl Command for Gate {
            fn description(&self) -> &str {
                "waits"
            }

            fn show_result(&self) -> bool {
                true
            }

            async fn run(
                &self,
                _conversation: &str,
                _args: &[String],
            ) -> Result<String, CommandError> {
                self.0.notified().await;
                Ok("done".into())
            }
        }

        let gate = Arc::new(Gate(tokio::sync::Notify::new()));
        let mut registry = CommandRegistry::new();
        registry.register("slow", gate.clone()).unwrap();
        let mut f = fixture(registry, RUNNING);

        let dispatch = f.dispatcher.dispatch(args(&["slow"]), "ops").await.unwrap();
        assert!(f.handle.drain().is_empty());

        gate.0.notify_one();
        finish(dispatch).await;
        assert_eq!(f.handle.drain(), vec![OutgoingMessage::new("ops", "done")]);
    }

    #[tokio::test]
    async fn test_runner_discards_handle() {
        let spy = Spy::ok("ok");
        let mut registry = CommandRegistry::new();
        registry.register("date", spy.clone()).unwrap();
        let mut f = fixture(registry, RUNNING);

        f.dispatcher.run_command(args(&["date"]), "ops").await.unwrap();

        let sent = tokio::time::timeout(std::time::Duration::from_secs(5), f.handle.next_message())
            .await
            .unwrap();
        assert_eq!(sent, Some(OutgoingMessage::new("ops", "ok")));
        assert!(f.dispatcher.run_command(args(&["nope"]), "ops").await.is_err());
    }
}
