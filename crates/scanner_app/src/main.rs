mod app;
mod config;
mod logging;
mod render;

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    app::run()
}
