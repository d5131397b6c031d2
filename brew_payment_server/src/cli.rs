use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // BLOCKONOMICS_API_KEY and BBC_CALLBACK_SECRET are left out on purpose
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "BBC_HOST",
        "BBC_PORT",
        "BBC_STORE",
        "BBC_DATABASE_URL",
        "BBC_BLOCKONOMICS_URL",
        "BBC_CALLBACK_URL",
        "BBC_UPSTREAM_TIMEOUT",
        "BBC_CORS_ORIGIN",
        "BBC_STRICT_MONOTONIC",
        "BBC_PUSH_WATCHER",
        "BBC_PUSH_URL",
        "BBC_PUSH_WATCH_TIMEOUT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
