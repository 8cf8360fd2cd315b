//! `hq-render` - print the human-readable values of a daemon snapshot.
//!
//! Usage:
//!   hq-render <session|torrent> [path] < snapshot.json
//!
//! The snapshot is read from stdin: a session record, or a torrent record or
//! list of torrent records. `path` restricts output to one subtree
//! (`units`, `files:0`). Formatter settings come from the TOML file named by
//! `HQ_CONFIG`; logging is controlled by `RUST_LOG`.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use hq_mirror::cli::{load_format, render, usage};
use hq_mirror::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let section = match args.get(1) {
        Some(s) if s != "-h" && s != "--help" => s.clone(),
        _ => {
            eprintln!("{}", usage());
            std::process::exit(1);
        }
    };
    let filter = args.get(2).map(String::as_str);

    let config = std::env::var_os("HQ_CONFIG").map(PathBuf::from);
    let format = match load_format(config.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match render(&Context::transmission(format), &section, filter, buf.trim()) {
        Ok(out) => {
            if let Err(e) = io::stdout().write_all(out.as_bytes()) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
