use std::io::BufRead;

use anyhow::{Context, Result};
use exhibit::app::Command;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .context("usage: exhibit <gallery.json>")?;

    let app = exhibit::from_config_file(&config_path)
        .with_context(|| format!("failed to load gallery from {}", config_path))?;

    app.start();
    println!("{}", app.describe());
    println!("commands: next, prev, mode <name>, info, stats, quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        let Some(command) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                println!("unknown command '{}'", line.trim());
            }
            continue;
        };

        match app.execute(&command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
