//! The three subcommands' implementations: read input, drive the library,
//! write output. Kept separate from [`crate::main`] so `main` stays a thin
//! argument-parsing-and-dispatch shell, the way the teacher's `main.rs`
//! used to stay thin before it grew the `-s`/`-d`/`-a` flag pile this crate
//! replaces with subcommands.

use anyhow::{Context, Result};
use cbor_tree::codec::{decode_tree, encode_tree};
use cbor_tree::error::CborError;
use cbor_tree::json::{encode_json, parse_json, Dialect, Indent};
use cbor_tree::model::DynamicModel;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::diagnostic::diagnostic;

/// Any failure this binary can report: a library-level CBOR error (which
/// carries the [`cbor_tree::error::ErrorKind`] this process exits with) or
/// an ambient I/O/usage failure, reported via `anyhow` like the teacher's
/// `main.rs` already did for file-open failures.
pub enum CliError {
    Cbor(CborError),
    Other(anyhow::Error),
}

impl From<CborError> for CliError {
    fn from(e: CborError) -> Self {
        CliError::Cbor(e)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Other(e)
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Cbor(e) => write!(f, "{e}"),
            CliError::Other(e) => write!(f, "{e:#}"),
        }
    }
}

impl CliError {
    /// The process exit code: the numeric `ErrorKind` value for a library
    /// failure, or 1 for anything else (a usage or I/O error has no
    /// `ErrorKind` to report).
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Cbor(e) => e.kind() as i32,
            CliError::Other(_) => 1,
        }
    }
}

/// Read `input` as raw CBOR bytes: a `0x`-prefixed hex literal given
/// directly on the command line, `-` for stdin, or else a file path.
fn read_cbor_input(input: &str) -> Result<Vec<u8>> {
    if let Some(hex) = input.strip_prefix("0x") {
        return decode_hex(hex).with_context(|| format!("decoding hex literal `{input}`"));
    }
    read_bytes(input)
}

/// Read `input` as UTF-8 text: `-` for stdin, or else a file path.
fn read_text_input(input: &str) -> Result<String> {
    let bytes = read_bytes(input)?;
    String::from_utf8(bytes).with_context(|| format!("reading `{input}` as UTF-8"))
}

fn read_bytes(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("reading from stdin")?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("reading file `{input}`"))
    }
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        anyhow::bail!("hex literal has an odd number of digits");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex digit at offset {i}"))
        })
        .collect()
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => fs::write(path, bytes).with_context(|| format!("writing `{}`", path.display())),
        None => io::stdout().write_all(bytes).context("writing to stdout"),
    }
}

pub fn inspect(input: &str) -> Result<(), CliError> {
    let bytes = read_cbor_input(input)?;
    let mut model = DynamicModel::new_dynamic();
    decode_tree(&mut model, &bytes)?;
    println!("{}", diagnostic(model.root().expect("decode_tree always sets a root")));
    Ok(())
}

pub fn decode(input: &str, packed: bool) -> Result<(), CliError> {
    let bytes = read_cbor_input(input)?;
    let mut model = DynamicModel::new_dynamic();
    decode_tree(&mut model, &bytes)?;
    let indent = if packed { Indent::Compact } else { Indent::Spaces(2) };
    let json = encode_json(model.root().expect("decode_tree always sets a root"), Dialect::Extended, indent)
        .map_err(|kind| CliError::Cbor(CborError::new(0, kind)))?;
    println!("{json}");
    Ok(())
}

pub fn encode(input: &str, output: Option<&Path>) -> Result<(), CliError> {
    let text = read_text_input(input)?;
    let mut model = DynamicModel::new_dynamic();
    parse_json(&mut model, &text, Dialect::Extended)?;
    let mut out = cbor_tree::buffer::VecOutput::new();
    encode_tree(&mut out, model.root().expect("parse_json always sets a root"))
        .map_err(|kind| CliError::Cbor(CborError::new(0, kind)))?;
    write_output(output, out.as_slice())?;
    Ok(())
}
