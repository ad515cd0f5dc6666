//! The line-oriented request loop driven by a supervising merge tool.
//!
//! Protocol: a zero-length flag file is created at startup to signal
//! readiness; then requests arrive as three lines on standard input (source
//! path, encoding name, output path) until a line equal to `end`. Each
//! request parses the source and writes the YAML result tree to the output
//! path; `OK` or `KO` is printed per request. Parse degradation (syntax
//! errors) is still `OK`: only unsupported encodings, I/O failures, and
//! serialization failures are `KO`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::export;
use crate::parse::{parse, ParseError};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("error encoding result: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// Create the zero-length readiness flag file.
pub fn write_flag_file(path: &Path) -> io::Result<()> {
    fs::File::create(path)?;
    Ok(())
}

/// Run the request loop until `end` or end of input.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        let source_path = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if source_path == "end" {
            break;
        }
        let encoding = next_line(&mut lines)?;
        let output_path = next_line(&mut lines)?;

        match handle_request(&source_path, &encoding, &output_path) {
            Ok(()) => writeln!(output, "OK")?,
            Err(err) => {
                warn!("request for {} failed: {}", source_path, err);
                writeln!(output, "KO")?;
            }
        }
        output.flush()?;
    }
    Ok(())
}

fn next_line<B: BufRead>(lines: &mut io::Lines<B>) -> io::Result<String> {
    match lines.next() {
        Some(line) => line,
        None => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "unexpected end of request stream",
        )),
    }
}

fn handle_request(source_path: &str, encoding: &str, output_path: &str) -> Result<(), RequestError> {
    let src = fs::read(source_path)?;
    let file = parse(&src, encoding)?;
    let yaml = serde_yaml::to_string(&export::to_export(&file, source_path))?;
    write_atomic(Path::new(output_path), yaml.as_bytes())?;
    Ok(())
}

/// Atomic file write: tempfile + fsync + rename, so the supervising process
/// never observes a partially written result.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
