use std::fs;
use std::io::Read;

use pktproto_frame::{FrameCollector, FrameReceiver};

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_frames, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args)?;
    let mut receiver = FrameReceiver::new(args.buffer_size, FrameCollector::new())
        .map_err(|err| frame_error("receiver setup failed", err))?;

    let chunk = args
        .chunk
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(input.len())
        .max(1);
    for piece in input.chunks(chunk) {
        let status = receiver.append(piece);
        if status.discarded > 0 {
            tracing::warn!(
                accepted = status.accepted,
                discarded = status.discarded,
                "receiver dropped input"
            );
        }
    }

    let stats = *receiver.stats();
    tracing::debug!(
        frames = stats.frames,
        bytes_accepted = stats.bytes_accepted,
        bytes_discarded = stats.bytes_discarded,
        growths = stats.growths,
        capacity = receiver.capacity(),
        "decode finished"
    );

    let frames = receiver.into_handler().drain();
    if frames.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no frames decoded from {} input bytes", input.len()),
        ));
    }

    print_frames(&frames, format);
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input)
}
