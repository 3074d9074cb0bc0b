use std::fs::{self, File};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger, writing to `path`.
///
/// The terminal belongs to the game while it runs, so log lines go to a file
/// instead of stderr. When `verbose` is `true` debug messages are kept,
/// otherwise info and above; `RUST_LOG` overrides either.
pub fn init(verbose: bool, path: &Path) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        // No usable log file: drop everything rather than scribble over the screen.
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}
