use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use floyd::{
    errors::errors::Severity, format_diagnostic, parse_with, parser::lookups::GRAMMAR, resolve_across_imports,
    ParseOptions, ParseResult,
};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Error, Debug)]
enum DriverError {
    #[error("Usage: floyd-check <file>...")]
    Usage,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn read_source(path: &Path) -> Result<String, DriverError> {
    read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses the files `result` includes, relative to `directory`. Missing
/// includes are skipped with a warning.
fn parse_imports(result: &ParseResult, directory: &Path, options: &ParseOptions) -> Vec<ParseResult> {
    result
        .imports
        .iter()
        .filter_map(|target| {
            let path = directory.join(target);

            match read_source(&path) {
                Ok(source) => {
                    debug!("Parsing include {}", path.display());
                    Some(parse_with(&source, &GRAMMAR, options))
                }
                Err(error) => {
                    warn!("{}", error);
                    None
                }
            }
        })
        .collect()
}

/// Checks one file and prints its diagnostics. Returns whether any of them
/// is an error.
fn check_file(path: &Path, options: &ParseOptions) -> Result<bool, DriverError> {
    let start = Instant::now();
    let source = read_source(path)?;

    let result = parse_with(&source, &GRAMMAR, options);

    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let imports = parse_imports(&result, directory, options);
    let import_refs: Vec<&ParseResult> = imports.iter().collect();

    let mut diagnostics = result.diagnostics.clone();
    diagnostics.extend(resolve_across_imports(&result, &import_refs, options));
    diagnostics.sort_by_key(|diagnostic| diagnostic.range.start);

    let file = path.to_string_lossy();
    for diagnostic in &diagnostics {
        print!("{}", format_diagnostic(diagnostic, &source, &file));
    }

    info!("Checked {} in {:?}", file, start.elapsed());

    Ok(diagnostics
        .iter()
        .any(|diagnostic| diagnostic.severity == Severity::Error))
}

fn run() -> Result<bool, DriverError> {
    let files: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();

    if files.is_empty() {
        return Err(DriverError::Usage);
    }

    let options = ParseOptions::without_analysis();

    let mut failed = false;
    for file in &files {
        failed |= check_file(file, &options)?;
    }

    Ok(failed)
}

fn main() -> ExitCode {
    match run() {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
