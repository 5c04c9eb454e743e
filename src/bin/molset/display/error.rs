use std::io::{self, Write};

use anyhow::Error;

use molset::{DataFileError, KeyError, SetError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_sdf_hints(err);
        collector.collect_set_hints(err);
        collector.collect_data_dir_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_sdf_hints(&mut self, err: &Error) {
        use molset::io::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { line, .. } => {
                self.add(format!("The SDF parser stopped near line {line}"));
                self.add("Only V2000 connection tables are supported");
                self.add("Check that every record ends with a '$$$$' line");
            }

            IoError::Empty => {
                self.add("The input holds no molecule records");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or non-UTF-8 data");
                self.add("Verify the file is a text SDF and not compressed");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer closed the pipe early");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_set_hints(&mut self, err: &Error) {
        if let Some(set_err) = err.downcast_ref::<SetError<KeyError>>() {
            self.mark_typed();
            match set_err {
                SetError::Canonicalize(key_err) => self.collect_key_hints(key_err),
                SetError::KeyNotFound(key) => {
                    self.add(format!("No molecule has the canonical key '{key}'"));
                }
                SetError::IndexOutOfRange { len, .. } => {
                    self.add(format!("The library holds {len} molecules"));
                }
            }
        } else if let Some(key_err) = err.downcast_ref::<KeyError>() {
            self.mark_typed();
            self.collect_key_hints(key_err);
        }
    }

    fn collect_key_hints(&mut self, err: &KeyError) {
        match err {
            KeyError::MissingProperty { property, .. } => {
                self.add(format!("Every record needs a '> <{property}>' data item"));
                self.add("Choose another data item with --key");
                self.add("With --ignore-chirality, --achiral-key selects the stereo-free item");
            }

            KeyError::UnsupportedValue { kind, .. } => {
                self.add(format!("The key data item was read as a {kind}"));
                self.add("Keys must be text or integer identifiers");
            }

            KeyError::Empty { .. } => {
                self.add("The key data item is present but blank");
            }
        }
    }

    fn collect_data_dir_hints(&mut self, err: &Error) {
        let Some(DataFileError::NotFound { dir, .. }) = err.downcast_ref::<DataFileError>() else {
            return;
        };

        self.mark_typed();
        self.add(format!("Files named with @ are looked up in {}", dir.display()));
        self.add("Set data_dir in the --config file to change the directory");
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe data to stdin");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("config") {
            self.add("Check the TOML syntax of the configuration file");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
