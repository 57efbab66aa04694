mod cli;
mod config;
mod installer;
mod location;
mod manifest;
mod utils;

fn main() {
    cli::run();
}
