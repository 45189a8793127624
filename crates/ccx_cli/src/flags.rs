//! `ccx flags`: print the engine arguments for a source file.

use std::fmt::Write as _;
use std::path::Path;

use ccx_service::{compiler_args, CompilerArgs, FlagOrigin, Language};
use tracing::debug;

use crate::config::resolve_config;
use crate::{Filetype, FlagsArgs, GlobalArgs, OutputFormat};

/// Runs the `ccx flags` command.
pub fn run(args: &FlagsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = match args.cwd {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = resolve_config(global, &cwd)?;
    let language = match args.filetype {
        Some(filetype) => language_of(filetype),
        None => detect_language(&args.file),
    };

    debug!("resolving {} as {language} from {}", args.file.display(), cwd.display());
    let resolved = compiler_args(&args.file, &cwd, language, &config.flags);
    if !global.quiet && resolved.origin == FlagOrigin::Default {
        eprintln!(
            "warning: no build configuration found for {}",
            args.file.display()
        );
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&resolved, global.verbose)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
    }
    Ok(0)
}

fn language_of(filetype: Filetype) -> Language {
    match filetype {
        Filetype::C => Language::C,
        Filetype::Cpp => Language::Cpp,
    }
}

/// Picks the language from the file extension. Headers and unknown
/// extensions are treated as C.
fn detect_language(path: &Path) -> Language {
    match path.extension().and_then(|e| e.to_str()) {
        Some("cc" | "cpp" | "cxx" | "c++" | "hh" | "hpp" | "hxx" | "C") => Language::Cpp,
        _ => Language::C,
    }
}

fn render_text(resolved: &CompilerArgs, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "origin:    {}", resolved.origin);
    let _ = writeln!(out, "directory: {}", resolved.directory.display());
    if verbose {
        let _ = writeln!(out, "fingerprint: {}", resolved.fingerprint());
    }
    for arg in &resolved.args {
        let _ = writeln!(out, "  {arg}");
    }
    out
}
