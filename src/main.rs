mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // 初始化日志系统
    rutide::logger::init_logger();

    let cli = Cli::parse();
    if cli::run(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
