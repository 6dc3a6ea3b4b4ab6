use clap::{Args, Subcommand};
use std::path::PathBuf;

use pktproto_frame::{CONTROL, LOG, SENSOR};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a payload into a wire frame.
    Encode(EncodeArgs),
    /// Decode frames from a byte stream.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Frame type: sensor, control, log, or a byte value (decimal or 0x hex).
    #[arg(long, short = 't', value_parser = parse_frame_type)]
    pub r#type: u8,
    /// Payload as hex bytes (e.g. "01 02 0A" or "01020A").
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input stream as hex bytes.
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read the raw input stream from file. Reads stdin when neither input is given.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Feed the receiver in chunks of N bytes. Default: whole input at once.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk: Option<u64>,
    /// Initial receive buffer capacity in bytes.
    #[arg(long, value_name = "N", default_value = "256")]
    pub buffer_size: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_frame_type(input: &str) -> Result<u8, String> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "sensor" => return Ok(SENSOR),
        "control" => return Ok(CONTROL),
        "log" => return Ok(LOG),
        _ => {}
    }

    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|_| format!("expected sensor, control, log or a byte value, got '{input}'"))
}

/// Parse hex bytes, ignoring whitespace, commas and `0x` prefixes.
pub(crate) fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let mut digits = String::with_capacity(input.len());
    for token in input.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        digits.push_str(token);
    }

    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "hex input must contain an even number of digits",
        ));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        USAGE,
                        format!("invalid hex byte '{}'", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_type_accepts_names_and_numbers() {
        assert_eq!(parse_frame_type("sensor"), Ok(SENSOR));
        assert_eq!(parse_frame_type("CONTROL"), Ok(CONTROL));
        assert_eq!(parse_frame_type("log"), Ok(LOG));
        assert_eq!(parse_frame_type("7"), Ok(7));
        assert_eq!(parse_frame_type("0xfe"), Ok(0xFE));
        assert!(parse_frame_type("256").is_err());
        assert!(parse_frame_type("motor").is_err());
    }

    #[test]
    fn hex_accepts_common_spellings() {
        assert_eq!(parse_hex("55 AA 01").unwrap(), vec![0x55, 0xAA, 0x01]);
        assert_eq!(parse_hex("55aa01").unwrap(), vec![0x55, 0xAA, 0x01]);
        assert_eq!(parse_hex("0x55, 0xAA").unwrap(), vec![0x55, 0xAA]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(parse_hex("5").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
    }
}
