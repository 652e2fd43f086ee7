use crate::cli::args::{Args, Command};
use crate::cli::output::{ConsoleSink, ConsoleWriter, OutputWriter};
use crate::core::command::{self, CommandInterpreter};
use crate::core::communication::{Sink, Transport};
use crate::core::events::{DeviceEventParser, HandlerRegistry};
use crate::core::session::SessionController;
use crate::domain::config::CrowComConfig;
use crate::domain::error::{CrowComError, CrowComResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{list_ports, SerialTransport};
use crate::tui::{capture_handlers, ui::CAPTURE_ROWS, App, AppState, PaneStyle, TextPane, INTRO_TEXT};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Load the configuration the command line points at.
pub fn load_config(args: &Args) -> CrowComResult<CrowComConfig> {
    let config_manager = ConfigManager::new();
    let mut config = match &args.config {
        Some(path) => config_manager.load_config_from_path(path)?,
        None => config_manager.load_config()?,
    };
    if let Some(port) = &args.port {
        config.device.port = Some(port.clone());
    }
    Ok(config)
}

/// Execute CLI command
pub async fn execute_command(args: Args) -> CrowComResult<()> {
    let config = load_config(&args)?;
    let log_path = init_logging(&config.logging, args.verbose)?;
    debug!("Logging to {}", log_path.display());

    match args.command() {
        Command::Repl { script } => run_repl(&config, script.as_deref()).await,
        Command::List { output } => {
            let writer = ConsoleWriter::new(output);
            let ports = list_ports(&config.device)?;
            writer.write_ports(&ports)?;
            Ok(())
        }
        Command::Run { script, listen } => {
            run_once(&config, command::Command::RunScript(script), listen).await
        }
        Command::Upload { script, listen } => {
            run_once(&config, command::Command::UploadScript(script), listen).await
        }
    }
}

fn build_session(config: &CrowComConfig, sink: Arc<dyn Sink>, handlers: HandlerRegistry) -> SessionController {
    let transport: Arc<dyn Transport> = Arc::new(SerialTransport::new(config.device.clone()));
    let parser = DeviceEventParser::new(Arc::clone(&sink), handlers);
    SessionController::new(
        transport,
        sink,
        CommandInterpreter::new(config.scripts.default_path()),
        parser,
        config.session.clone(),
    )
}

/// Interactive console: connect, optionally run a startup script, then hand
/// the terminal to the UI until the operator quits.
pub async fn run_repl(config: &CrowComConfig, script: Option<&Path>) -> CrowComResult<()> {
    let style = PaneStyle::new(config.ui.tab_width);
    let output = TextPane::new(style, config.ui.history_limit).with_text(INTRO_TEXT);
    let captures = [
        TextPane::new(style, CAPTURE_ROWS as usize),
        TextPane::new(style, CAPTURE_ROWS as usize),
    ];

    let mut session = build_session(config, Arc::new(output.clone()), capture_handlers(&captures));
    session.connect().await?;

    if let Some(script) = script {
        if let Err(e) = session.run_startup_script(script).await {
            warn!("Startup script failed: {}", e);
            output.show(&format!(" <error: {}>\n", e));
        }
    }

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let state = AppState::new(output, captures, session.subscribe_state())
        .with_history_limit(config.ui.history_limit);
    let ui = tokio::task::spawn_blocking(move || -> CrowComResult<()> {
        let mut app = App::new(state, input_tx)?;
        app.run()
    });

    // Dropping the receiver is what tells the UI to leave, so the terminal
    // is restored before any session error is reported.
    let session_result = session.run(input_rx).await;
    let ui_result = match ui.await {
        Ok(result) => result,
        Err(e) => Err(CrowComError::Tui(format!("UI thread failed: {}", e))),
    };
    session_result.and(ui_result)
}

/// Send one script, then echo device output to stdout for `listen` seconds.
pub async fn run_once(config: &CrowComConfig, command: command::Command, listen: u64) -> CrowComResult<()> {
    let sink: Arc<dyn Sink> = Arc::new(ConsoleSink);
    let mut session = build_session(config, sink, HandlerRegistry::new());
    session.connect().await?;
    session.start_background()?;

    let result = session.dispatch(command).await;
    if result.is_ok() {
        tokio::time::sleep(Duration::from_secs(listen)).await;
    }
    session.stop().await;
    println!();
    result.map(|_| ())
}
