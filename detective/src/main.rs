//! Detective Quest console.
//!
//! Explore the mansion, collect clues and find the most likely suspect.
//!
//! ```bash
//! cargo run -p detective -- --case my_case.json --verbose
//! ```

mod config;
mod console;

use config::{ConsoleConfig, CASE_ENV_VAR};
use console::Console;
use detective_core::Investigation;
use std::io;
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let config = match ConsoleConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Erro: {e}");
            print_help();
            std::process::exit(2);
        }
    };
    if config.show_help {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let case = config.load_case()?;
    let investigation = Investigation::new(&case)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(investigation, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn print_help() {
    println!("Detective Quest");
    println!();
    println!("Uso: detective [OPÇÕES]");
    println!();
    println!("Opções:");
    println!("  -c, --case <CAMINHO>  Carrega a mansão de um arquivo de caso JSON");
    println!("  -v, --verbose         Registra mensagens de depuração em stderr");
    println!("  -h, --help            Mostra esta ajuda");
    println!();
    println!("Ambiente:");
    println!("  {CASE_ENV_VAR}        Arquivo de caso usado quando --case não é informado");
}
