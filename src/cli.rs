use clap::Parser;

use crate::installer::{self, InstallError, Outcome};

/// Root CLI for editable-install
#[derive(Parser)]
#[command(name = "editable-install")]
#[command(version)]
#[command(about = "Install the package next to this executable in editable mode")]
pub struct Cli {
    /// Print the resolved installer command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Dispatch after parse
pub fn run() {
    let cli = Cli::parse();

    match installer::install(cli.dry_run) {
        Ok(Outcome::Installed) => {
            println!("Package installed successfully.");
        }
        Ok(Outcome::DryRun { command }) => {
            println!("Would run: {command}");
        }
        Err(e) => {
            let code = exit_code(&e);
            match e.downcast_ref::<InstallError>() {
                Some(InstallError::ManifestMissing { .. }) => {
                    println!("{e}");
                    println!("Skipping installation.");
                }
                _ => eprintln!("error: {e:#}"),
            }
            std::process::exit(code);
        }
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<InstallError>()
        .map_or(1, InstallError::exit_code)
}
