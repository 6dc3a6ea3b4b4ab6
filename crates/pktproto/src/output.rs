use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pktproto_frame::{type_name, Frame};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    index: usize,
    frame_type: u8,
    type_name: &'a str,
    payload_size: usize,
    payload_hex: String,
    payload: String,
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    frame_type: u8,
    type_name: &'a str,
    payload_size: usize,
    frame_size: usize,
    frame_hex: String,
}

pub fn print_frames(frames: &[Frame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for (index, frame) in frames.iter().enumerate() {
                let out = FrameOutput {
                    index,
                    frame_type: frame.frame_type,
                    type_name: type_name(frame.frame_type),
                    payload_size: frame.payload.len(),
                    payload_hex: to_hex(frame.payload.as_ref()),
                    payload: payload_preview(frame.payload.as_ref()),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TYPE", "SIZE", "PAYLOAD"]);
            for (index, frame) in frames.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    format!("{} ({})", type_name(frame.frame_type), frame.frame_type),
                    frame.payload.len().to_string(),
                    payload_preview(frame.payload.as_ref()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, frame) in frames.iter().enumerate() {
                println!(
                    "#{index} type={} ({}) size={} payload={}",
                    frame.frame_type,
                    type_name(frame.frame_type),
                    frame.payload.len(),
                    to_hex(frame.payload.as_ref())
                );
            }
        }
        OutputFormat::Raw => {
            for frame in frames {
                print_raw(frame.payload.as_ref());
            }
        }
    }
}

pub fn print_encoded(frame_type: u8, payload_size: usize, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                frame_type,
                type_name: type_name(frame_type),
                payload_size,
                frame_size: wire.len(),
                frame_hex: to_hex(wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "PAYLOAD", "FRAME", "BYTES"])
                .add_row(vec![
                    format!("{} ({})", type_name(frame_type), frame_type),
                    payload_size.to_string(),
                    wire.len().to_string(),
                    to_hex(wire),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", to_hex(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Uppercase, space-separated hex.
pub fn to_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => format!("<binary {} bytes>", payload.len()),
    }
}
