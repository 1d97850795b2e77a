use clap::Parser;
use oscdbg::monitor::{IngestQueue, Interrupt, Session};
use oscdbg::osc::Receiver;
use oscdbg_tools::tui::{TerminalInput, TerminalRenderer, Tui};
use oscdbg_tools::MonitorOpts;

use std::fs::File;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

fn init_logging(opts: &MonitorOpts) -> Result<(), String> {
    // The terminal belongs to the UI, so without a log file nothing is logged.
    let path = match &opts.log {
        Some(path) => path,
        None => return Ok(()),
    };
    let file = File::create(path).map_err(|e| format!("cannot open log file {:?}: {}", path, e))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&opts.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let opts = MonitorOpts::parse();
    if let Err(e) = init_logging(&opts) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let ingest = Arc::new(IngestQueue::new());
    let mut receiver = Receiver::with_config(ingest.clone(), opts.listener_config());
    if let Err(e) = receiver.initialize() {
        tracing::error!("{}", e);
        eprintln!("Failed to start OSC listener: {}", e);
        return ExitCode::FAILURE;
    }

    let interrupt = Interrupt::new();
    let handler_interrupt = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_interrupt.trigger()) {
        tracing::warn!("cannot install interrupt handler: {}", e);
    }

    let mut session = Session::new(ingest)
        .with_receiver(receiver)
        .with_tick(opts.tick())
        .with_interrupt(interrupt);

    let mut tui = match Tui::setup() {
        Ok(tui) => tui,
        Err(e) => {
            Tui::restore();
            session.shutdown();
            eprintln!("Terminal setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        Tui::restore();
        original_hook(panic_info);
    }));

    let result = session.run(&mut TerminalInput, &mut TerminalRenderer::default());
    tui.teardown();

    match result {
        Ok(()) => {
            println!("Exiting gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
