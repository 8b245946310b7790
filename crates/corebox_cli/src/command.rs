use tracing::{debug, instrument};

use corebox_base::{CoreboxError, CoreboxResult, FilePath, PalHandle};
use corebox_fs::{
    FsDefaults, ListOptions, base_name, init_file_with_options, list_dir, load, mkdir, save,
};

pub const USAGE: &str = "\
Usage: corebox <command> [args]

Commands:
  load <path>                 print the content of a text file
  save <path> <content>       write content to a file
  init <path> <content>       write content only if the file does not exist
  mkdir <path>                create a directory and its parents
  ls [--dirs|--files] <path>  list directory entries
  basename [--ext] <path>     print the last path segment";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load { path: FilePath },
    Save { path: FilePath, content: String },
    Init { path: FilePath, content: String },
    Mkdir { path: FilePath },
    List { path: FilePath, options: ListOptions },
    BaseName { path: String, keep_extension: bool },
}

impl Command {
    /// Parses the arguments following the program name.
    pub fn parse(args: &[String]) -> CoreboxResult<Command> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| usage_error("missing command"))?;
        let allowed_flags: &[&str] = match name.as_str() {
            "ls" => &["--dirs", "--files"],
            "basename" => &["--ext"],
            _ => &[],
        };
        // Commands without options take every argument literally
        let (flags, positional): (Vec<&str>, Vec<&str>) = rest
            .iter()
            .map(String::as_str)
            .partition(|arg| !allowed_flags.is_empty() && arg.starts_with("--"));
        if let Some(flag) = flags.iter().find(|flag| !allowed_flags.contains(*flag)) {
            return Err(usage_error(&format!("unknown option '{}' for '{}'", flag, name)));
        }
        let has_flag = |flag: &str| flags.iter().any(|given| *given == flag);

        let command = match (name.as_str(), positional.as_slice()) {
            ("load", [path]) => Command::Load {
                path: FilePath::from(*path),
            },
            ("save", [path, content]) => Command::Save {
                path: FilePath::from(*path),
                content: content.to_string(),
            },
            ("init", [path, content]) => Command::Init {
                path: FilePath::from(*path),
                content: content.to_string(),
            },
            ("mkdir", [path]) => Command::Mkdir {
                path: FilePath::from(*path),
            },
            ("ls", [path]) => Command::List {
                path: FilePath::from(*path),
                options: ListOptions {
                    only_directories: has_flag("--dirs"),
                    only_files: has_flag("--files"),
                },
            },
            ("basename", [path]) => Command::BaseName {
                path: path.to_string(),
                keep_extension: has_flag("--ext"),
            },
            ("load" | "save" | "init" | "mkdir" | "ls" | "basename", _) => {
                return Err(usage_error(&format!("wrong number of arguments for '{}'", name)));
            }
            _ => return Err(usage_error(&format!("unknown command '{}'", name))),
        };
        Ok(command)
    }
}

fn usage_error(message: &str) -> Box<CoreboxError> {
    Box::new(CoreboxError::invalid_argument(message))
}

/// Runs a command and returns the lines to print.
#[instrument(skip(pal, defaults))]
pub fn run(pal: &PalHandle, defaults: &FsDefaults, command: Command) -> CoreboxResult<Vec<String>> {
    let output = match command {
        Command::Load { path } => vec![load(pal, &path, defaults.encoding)?],
        Command::Save { path, content } => {
            save(pal, &path, &content, &defaults.write_options())?;
            vec![]
        }
        Command::Init { path, content } => {
            let created =
                init_file_with_options(pal, &path, &defaults.write_options(), || content)?;
            let status = if created { "created" } else { "exists" };
            vec![status.to_string()]
        }
        Command::Mkdir { path } => {
            mkdir(pal, &path, defaults.dir_mode)?;
            vec![]
        }
        Command::List { path, options } => list_dir(pal, &path, options)?
            .into_iter()
            .map(|entry| entry.to_string())
            .collect(),
        Command::BaseName {
            path,
            keep_extension,
        } => vec![base_name(&path, keep_extension)],
    };
    debug!(lines = output.len(), "command finished");
    Ok(output)
}
