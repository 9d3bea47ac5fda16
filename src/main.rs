//! vmount - Operator CLI
//!
//! Validates configuration files and generates password digests for user
//! records.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::BufRead;
use std::process;

use vmount::auth::PasswordDigest;
use vmount::users::UserStore;

#[derive(Parser)]
#[command(name = "vmount", version, about = "Multi-mount virtual filesystem tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration file, reporting users and mounts
    Check {
        /// Path to the configuration file
        #[arg(default_value = "config")]
        config: String,
    },
    /// Generate a salted password digest for a user record
    HashPassword {
        /// Password to digest; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn main() {
    // env_logger picks up the RUST_LOG environment variable
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { config } => run_check(&config),
        Commands::HashPassword { password } => run_hash_password(password),
    }
}

fn run_check(path: &str) {
    info!("Checking configuration at {}", path);

    let store = match UserStore::load(path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut users: Vec<_> = store.users().collect();
    users.sort_by(|a, b| a.username().cmp(b.username()));

    for user in users {
        let state = if user.is_locked() { "locked" } else { "active" };
        println!("{} [{}] {}", user.username(), user.permissions(), state);
        for mount in user.mounts().entries() {
            let health = if mount.unusable { "missing root" } else { "ok" };
            println!("  /{} -> {} [{}]", mount.name, mount.root.display(), health);
        }
    }
    println!("Configuration OK ({} users)", store.len());
}

fn run_hash_password(password: Option<String>) {
    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
                error!("Failed to read password from stdin: {}", e);
                process::exit(1);
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        error!("Password cannot be empty");
        process::exit(1);
    }

    println!("{}", PasswordDigest::generate(&password));
}
