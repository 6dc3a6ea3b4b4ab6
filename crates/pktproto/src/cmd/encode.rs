use std::fs;

use pktproto_frame::{encode_frame, MAX_PAYLOAD_LEN};

use crate::cmd::{parse_hex, EncodeArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    tracing::debug!(
        frame_type = args.r#type,
        payload_len = payload.len(),
        max = MAX_PAYLOAD_LEN,
        "encoding frame"
    );

    let wire = encode_frame(args.r#type, &payload)
        .map_err(|err| frame_error("encode failed", err))?;
    print_encoded(args.r#type, payload.len(), &wire, format);

    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
