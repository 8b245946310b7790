/* 📖 # How does the corebox CLI work?

The CLI is a thin shell over corebox_fs with no argument-parsing dependency.
It works on the current directory through a RealPal and reads optional
defaults (encoding, file and directory modes) from `corebox.toml` there.

Exit codes:
- 0: Success
- 1: Usage error or failed operation (message on stderr)
*/

mod command;

use std::env;
use std::process;

use tracing::debug;

use corebox_base::tracing::init_tracing;
use corebox_base::{FilePath, PalHandle, RealPal};
use corebox_fs::{FsDefaults, load_config};

use command::{Command, USAGE, run};

const CONFIG_FILE: &str = "corebox.toml";

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            process::exit(1);
        }
    };

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });
    let pal = PalHandle::new(RealPal::new(current_dir));

    let defaults = match load_config(&pal, &FilePath::from(CONFIG_FILE)) {
        Ok(defaults) => defaults,
        Err(e) if e.is_not_found() => {
            debug!("no {} found, using defaults", CONFIG_FILE);
            FsDefaults::default()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match run(&pal, &defaults, command) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
