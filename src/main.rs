use explainator::config::{load_config, CliArgs, Command};
use explainator::logging::{self, LogTarget};
use explainator::{actions, cli, event, ui, AppState};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tracing::{error, info};

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();
    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    // Editor logs go to a file, subcommands to stderr
    let command = args.command.unwrap_or(Command::Edit);
    let editor = command == Command::Edit;
    let target = if editor {
        LogTarget::File(config.log_file.clone())
    } else {
        LogTarget::Stderr
    };
    logging::init(&config.log_level, &target)?;

    // Load the stored workspace
    let mut app = AppState::open(config)?;
    if !editor {
        return cli::run_command(&command, &mut app, &mut io::stdout().lock());
    }

    info!("starting editor");
    // Setup terminal
    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, &mut app);
    // Restore terminal
    restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        error!(error = %err, "editor stopped");
        eprintln!("Error: {}", err);
    }
    Ok(())
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(action) = event::handle_events(app)? {
            actions::execute_action(action, app)?;
        }
    }
    Ok(())
}
