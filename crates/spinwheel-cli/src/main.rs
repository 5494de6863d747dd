#![forbid(unsafe_code)]

//! `spinwheel` binary.
//!
//! ```bash
//! cargo run -p spinwheel-cli -- --target 90 --duration 10
//! ```

use spinwheel_cli::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = <Cli as clap::Parser>::parse();
    spinwheel_cli::init_tracing(cli.log_level());
    spinwheel_cli::run(&cli)
}
