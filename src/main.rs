//! doctestr - command-line tool for running documentation examples with
//! JUnit XML output

use clap::Parser;
use doctestr::commands::{Command, RunCommand};
use doctestr::ui::CliUI;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doctestr")]
#[command(
    about = "Run documentation examples and produce JUnit XML output",
    long_about = None
)]
struct Cli {
    /// Modules to gather documentation examples from (dotted names)
    #[arg(required = true)]
    modules: Vec<String>,

    /// Output file to write to
    #[arg(short, long, default_value = "doctest_results.xml")]
    output: PathBuf,

    /// Module root to add to the search path. Multiple allowed.
    #[arg(short, long)]
    root: Vec<PathBuf>,

    /// Don't set exit status on example failure
    #[arg(long)]
    no_status: bool,
}

fn main() {
    let cli = Cli::parse();

    let cmd = RunCommand::new(cli.modules, cli.output, cli.root).with_status(!cli.no_status);

    let mut ui = CliUI::new();
    match cmd.execute(&mut ui) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Error: {}", e);
            std::process::exit(1);
        }
    }
}
