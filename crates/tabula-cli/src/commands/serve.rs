//! Serve command - expose the tool operations over HTTP.

use colored::Colorize;
use tabula::TabulaConfig;

use super::CommandResult;
use crate::server::{app, state::AppState};

pub fn run(config: TabulaConfig, port: u16) -> CommandResult {
    let tabula = super::open(config)?;
    let tables = tabula.last_report().loaded.len();
    let state = AppState::new(tabula);

    let url = format!("http://localhost:{}/api", port);
    println!();
    println!(
        "{} {}",
        "Serving tools at".cyan().bold(),
        url.white().bold()
    );
    println!("  Tables loaded: {}", tables);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))
}
