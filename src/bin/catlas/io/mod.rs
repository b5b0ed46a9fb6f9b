use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Standard streams the front end inspects.
#[derive(Debug, Clone, Copy)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    pub fn is_terminal(self) -> bool {
        match self {
            Stream::Stdin => io::stdin().is_terminal(),
            Stream::Stdout => io::stdout().is_terminal(),
            Stream::Stderr => io::stderr().is_terminal(),
        }
    }
}

/// Compound records from `path`, or stdin when it is `None`.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) => Box::new(open_file(p, "input file")?),
        None => Box::new(io::stdin().lock()),
    })
}

/// Opens a side file such as a neighbor map or an ordering.
pub fn open_file(path: &Path, what: &str) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {what}: {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Buffered writer to `path`, or stdout when it is `None`.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Display name of an output destination.
pub fn target_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdout".to_string())
}
