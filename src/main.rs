use std::process::ExitCode;

use cbir::cli::SubCommandExtend;
use cbir::config::{Opts, SubCommand};
use clap::Parser;
use log::debug;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 参数错误时以 1 退出，--help 和 --version 仍然正常退出
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };
    debug!("{:?}", opts);

    let result = match &opts.subcmd {
        SubCommand::Patch(cmd) => cmd.run(&opts),
        SubCommand::Chroma(cmd) => cmd.run(&opts),
        SubCommand::Hsv(cmd) => cmd.run(&opts),
        SubCommand::Regions(cmd) => cmd.run(&opts),
        SubCommand::Texture(cmd) => cmd.run(&opts),
        SubCommand::Embedding(cmd) => cmd.run(&opts),
        SubCommand::Export(cmd) => cmd.run(&opts),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
