use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod diagnostic;

#[derive(Parser, Debug)]
#[command(author, version, about = "A command line tool for working with CBOR")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a CBOR message and print it as RFC 8949 diagnostic notation.
    Inspect {
        /// A `0x`-prefixed hex literal, a file path, or `-` for stdin.
        input: String,
    },
    /// Decode a CBOR message to Extended-dialect JSON.
    Decode {
        /// A `0x`-prefixed hex literal, a file path, or `-` for stdin.
        input: String,
        /// Emit compact (no whitespace) JSON instead of two-space-indented.
        #[arg(short, long)]
        packed: bool,
    },
    /// Parse Extended-dialect JSON text back into CBOR bytes.
    Encode {
        /// A file path, or `-` for stdin.
        input: String,
        /// Write the encoded bytes here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match &args.command {
        Command::Inspect { input } => commands::inspect(input),
        Command::Decode { input, packed } => commands::decode(input, *packed),
        Command::Encode { input, output } => commands::encode(input, output.as_deref()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code().clamp(0, 255) as u8)
        }
    }
}
