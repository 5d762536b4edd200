use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use csvgrid::controller::Controller;
use csvgrid::domain::{GridConfig, GridError};
use csvgrid::model::{Model, Status};
use csvgrid::ui::GridUI;

/// A tui based paginated CSV data grid with editable column titles.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// CSV file to load (can also be opened at runtime with 'o')
    file: Option<PathBuf>,

    /// Append tracing output to this file (filtered via RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("Error: {:?}", e);
        return ExitCode::FAILURE;
    }

    let result = run(&cli);
    ratatui::restore();
    match result {
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

// Log to a file instead of stdout, the terminal belongs to ratatui.
fn init_tracing(log_file: Option<&Path>) -> Result<(), GridError> {
    if let Some(path) = log_file {
        let file = File::options().append(true).create(true).open(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false),
            )
            .with(ErrorLayer::default())
            .init();
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), GridError> {
    let cfg = GridConfig::default();
    let mut model = Model::init(&cfg);

    if let Some(file) = &cli.file {
        let path = shellexpand::full(&file.to_string_lossy())
            .map_err(|e| GridError::LoadingFailed(e.to_string()))?
            .into_owned();
        model.load_file(Path::new(&path))?;
    }
    info!("Starting csvgrid!");

    let ui = GridUI::new();
    let controller = Controller::new(&cfg);
    let mut terminal = ratatui::init();

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    Ok(())
}
