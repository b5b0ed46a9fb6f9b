use std::io::{self, Write};

use anyhow::Error;

use super::text::wrap;

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
        for line in wrap(&cause.to_string(), 57) {
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
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self {
            hints: Vec::new(),
            has_typed_hints: false,
        };

        collector.collect_io_hints(err);
        collector.collect_atlas_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        (!collector.hints.is_empty()).then_some(collector.hints)
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use compound_atlas::io::{Document, Error as IoError};

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };
        self.has_typed_hints = true;

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Json { document, source } => {
                if source.is_io() {
                    self.add("Reading or writing the JSON stream failed");
                    return;
                }
                self.add(format!(
                    "The {} document is not valid JSON of the expected shape (line {}, column {})",
                    document,
                    source.line(),
                    source.column()
                ));
                match document {
                    Document::Compounds => {
                        self.add("Expected an array of records with at least a \"name\" field");
                    }
                    Document::NeighborMap => {
                        self.add("Expected {\"name\": [{\"compound\": ..., \"similarity\": ...}]}");
                        self.add("Generate one with 'catlas similarity'");
                    }
                    Document::Ordering => {
                        self.add("Expected a JSON array of compound names");
                    }
                    Document::Analysis | Document::Matrix => {}
                }
            }

            IoError::Record { index, details, .. } => {
                self.add(format!("Record {} (0-based) was rejected: {}", index, details));
                self.add("Fingerprints must be strings of 0 and 1 characters");
            }

            IoError::Engine(_) => {}
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
            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: the output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }
            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_atlas_hints(&mut self, err: &Error) {
        use compound_atlas::AtlasError;

        let atlas_err = err.downcast_ref::<AtlasError>().or_else(|| {
            err.downcast_ref::<compound_atlas::io::Error>()
                .and_then(|e| match e {
                    compound_atlas::io::Error::Engine(inner) => Some(inner),
                    _ => None,
                })
        });
        let Some(atlas_err) = atlas_err else {
            return;
        };
        self.has_typed_hints = true;

        match atlas_err {
            AtlasError::LengthMismatch { left, right } => {
                self.add(format!(
                    "Fingerprints of {} and {} bits cannot be compared",
                    left, right
                ));
                self.add("Regenerate all fingerprints with the same bit length");
            }

            AtlasError::InvalidFingerprint(_) => {
                self.add("Fingerprints must be strings of 0 and 1 characters");
            }

            AtlasError::InvalidClusterCount(_) => {
                self.add("Use -k with a value of at least 1");
                self.add("Or pass --no-clusters to skip clustering");
            }

            AtlasError::UnknownFeature(_) => {
                self.add("Supported features: weight, log_p, log_d, pka, tpsa, potency");
            }

            AtlasError::InvalidSimilarity { source_id, target_id, .. } => {
                self.add(format!(
                    "Check the stored similarity between '{}' and '{}'",
                    source_id, target_id
                ));
                self.add("Similarities must be finite and lie in [0, 1]");
                self.add("With --reconcile strict, both directions must agree");
            }

            AtlasError::DuplicateCompound(id) => {
                self.add(format!("Compound names must be unique; '{}' repeats", id));
                self.add("Check the input records and the --order file");
            }

            AtlasError::UnknownCompound(id) => {
                self.add(format!("'{}' is not in the compound set", id));
            }

            AtlasError::NodeOutOfRange { .. } => {}

            AtlasError::InvalidConfig(msg) => {
                self.add(format!("Adjust the option: {}", msg));
            }

            AtlasError::ParameterParse(_) => {
                self.add("Force parameter file has invalid TOML syntax");
                self.add("Expected tables: [link], [charge], [center], [collision], [cooling]");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Provide input via -i/--input or pipe data to stdin");
            return;
        }
        if msg.contains("no compound records") {
            self.add("Input appears to be empty");
            self.add("Verify the input is a non-empty JSON array");
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
