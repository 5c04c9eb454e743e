use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use molset::{DataDir, Molecule};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Returns `true` if stdout is a terminal (interactive).
pub fn stdout_is_tty() -> bool {
    io::stdout().is_terminal()
}

pub enum InputSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputSource::File(r) => r.read(buf),
            InputSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for InputSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputSource::File(r) => r.fill_buf(),
            InputSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputSource::File(r) => r.consume(amt),
            InputSource::Stdin(r) => r.consume(amt),
        }
    }
}

pub fn open_input(path: Option<&Path>) -> Result<InputSource> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open input file: {}", p.display()))?;
            Ok(InputSource::File(BufReader::new(file)))
        }
        None => Ok(InputSource::Stdin(BufReader::new(io::stdin()))),
    }
}

pub enum OutputTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::File(w) => w.write(buf),
            OutputTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::File(w) => w.flush(),
            OutputTarget::Stdout(w) => w.flush(),
        }
    }
}

pub fn create_output(path: Option<&Path>) -> Result<OutputTarget> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(OutputTarget::File(BufWriter::new(file)))
        }
        None => Ok(OutputTarget::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}

/// Maps a command-line input argument to a path.
///
/// `@NAME` names a file inside the configured data directory; anything else
/// is a plain path.
pub fn resolve_path(arg: &str, data_dir: Option<&DataDir>) -> Result<PathBuf> {
    let Some(name) = arg.strip_prefix('@') else {
        return Ok(PathBuf::from(arg));
    };
    let Some(dir) = data_dir else {
        bail!("'{arg}' refers to the data directory, but no data_dir is configured");
    };
    Ok(dir.resolve(name)?)
}

/// Reads every record of an SDF input, or of stdin when `path` is `None`.
pub fn read_molecules(path: Option<&Path>) -> Result<Vec<Molecule>> {
    let label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    let source = open_input(path)?;
    let molecules = molset::io::sdf::read_all(source)
        .with_context(|| format!("Failed to read molecules from {label}"))?;
    tracing::debug!(input = %label, records = molecules.len(), "read SDF input");
    Ok(molecules)
}

pub fn write_molecules<'a, I>(path: Option<&Path>, molecules: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Molecule>,
{
    if path.is_none() && stdout_is_tty() {
        tracing::warn!("writing SDF records to a terminal; use -o to write a file");
    }
    let target = create_output(path)?;
    let written = molset::io::sdf::write_all(target, molecules).context("Failed to write output")?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plain_arguments_are_paths() {
        assert_eq!(
            resolve_path("libs/a.sdf", None).unwrap(),
            PathBuf::from("libs/a.sdf")
        );
    }

    #[test]
    fn at_names_resolve_in_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("approved.sdf"), "").unwrap();
        let data = DataDir::new(dir.path());

        assert_eq!(
            resolve_path("@approved.sdf", Some(&data)).unwrap(),
            dir.path().join("approved.sdf")
        );
        assert!(resolve_path("@missing.sdf", Some(&data)).is_err());
        assert!(resolve_path("@approved.sdf", None).is_err());
    }
}
