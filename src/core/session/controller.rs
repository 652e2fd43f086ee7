use crate::core::command::{Command, CommandInterpreter, Outcome};
use crate::core::communication::{Sink, Transport};
use crate::core::events::DeviceEventParser;
use crate::core::session::{poller::Poller, state::ConnectionState};
use crate::domain::config::SessionSettings;
use crate::domain::error::{CrowComError, CrowComResult};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Owns the transport and coordinates the foreground command loop with the
/// background poller.
pub struct SessionController {
    id: Uuid,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn Sink>,
    interpreter: CommandInterpreter,
    parser: Option<DeviceEventParser>,
    settings: SessionSettings,
    state: Arc<watch::Sender<ConnectionState>>,
    background: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl SessionController {
    pub fn new(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn Sink>,
        interpreter: CommandInterpreter,
        parser: DeviceEventParser,
        settings: SessionSettings,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            id: Uuid::new_v4(),
            transport,
            sink,
            interpreter,
            parser: Some(parser),
            settings,
            state: Arc::new(state),
            background: None,
            shutdown: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Read-only view of the connection state for the UI.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.background.is_some()
    }

    /// Open the link for the first time.
    pub async fn connect(&self) -> CrowComResult<()> {
        self.transport.connect().await?;
        self.state.send_replace(ConnectionState::Connected);
        info!("Session {} connected", self.id);
        Ok(())
    }

    /// Execute a script before the interactive loops start.
    pub async fn run_startup_script(&self, path: &Path) -> CrowComResult<()> {
        info!("Running startup script {}", path.display());
        self.transport.execute(path).await
    }

    /// Dispatch an already parsed command, bypassing the operator echo.
    pub async fn dispatch(&self, command: Command) -> CrowComResult<Outcome> {
        self.interpreter
            .dispatch(command, self.transport.as_ref(), self.sink.as_ref())
            .await
    }

    /// Spawn the poller. Fails if it was already started once.
    pub fn start_background(&mut self) -> CrowComResult<()> {
        let parser = self.parser.take().ok_or_else(|| CrowComError::Session {
            message: "background loop was already started".to_string(),
        })?;

        let poller = Poller::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.sink),
            parser,
            self.settings.clone(),
            Arc::clone(&self.state),
        );
        let (shutdown, signal) = oneshot::channel();
        let span = info_span!("poller", session = %self.id);
        self.background = Some(tokio::spawn(poller.run(signal).instrument(span)));
        self.shutdown = Some(shutdown);
        Ok(())
    }

    /// Echo and interpret one operator line.
    ///
    /// Command failures are reported and swallowed; only an explicit quit
    /// ends the session.
    pub async fn handle_line(&self, line: &str) -> Outcome {
        self.sink.show(&format!("\n> {}\n", line));

        match self
            .interpreter
            .interpret(line, self.transport.as_ref(), self.sink.as_ref())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error processing input {:?}: {}", line, e);
                self.sink.show(&format!(" <error: {}>\n", e));
                Outcome::Continue
            }
        }
    }

    /// Run the session until the operator quits or the input source closes.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<String>) -> CrowComResult<()> {
        self.start_background()?;
        let span = info_span!("session", id = %self.id);

        async {
            while let Some(line) = input.recv().await {
                if self.handle_line(&line).await == Outcome::Terminate {
                    info!("Operator quit");
                    break;
                }
            }
        }
        .instrument(span)
        .await;

        self.stop().await;
        Ok(())
    }

    /// Signal the poller, let it flush its partial line and wait until it
    /// is gone.
    pub async fn stop(&mut self) {
        let Some(handle) = self.background.take() else {
            return;
        };

        if let Some(shutdown) = self.shutdown.take() {
            // the receiver is gone only if the poller already ended
            let _ = shutdown.send(());
        }
        match handle.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!("Poller ended abnormally: {}", e),
        }
        info!("Session {} stopped", self.id);
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(handle) = self.background.take() {
            warn!("SessionController dropped without stop - aborting poller");
            handle.abort();
        }
    }
}
