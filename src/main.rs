use clap::Parser;
use turnote::cli::{handle_delete, handle_get, handle_list, handle_serve, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            config,
            bind,
            database,
            log_level,
        } => handle_serve(config, bind, database, log_level),
        Commands::Get { id, database, json } => handle_get(id, database, json),
        Commands::List {
            owner,
            database,
            json,
        } => handle_list(owner, database, json),
        Commands::Delete { id, database } => handle_delete(id, database),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
