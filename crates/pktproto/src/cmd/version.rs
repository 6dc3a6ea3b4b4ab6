use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("pktproto {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: pktproto");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("build_target: {}", env!("PKTPROTO_BUILD_TARGET"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "frame: max_payload={}, overhead={}",
        pktproto_frame::MAX_PAYLOAD_LEN,
        pktproto_frame::FRAME_OVERHEAD
    );
    println!(
        "receiver: initial_capacity={}, max_capacity={}",
        pktproto_frame::DEFAULT_INITIAL_CAPACITY,
        pktproto_frame::DEFAULT_MAX_CAPACITY
    );

    Ok(SUCCESS)
}
