use std::path::PathBuf;
use std::process::Command;

use clap::Parser;
use rutide::runner::Scheduler;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// 被测解释器的输出路径
const INTERPRETER: &str = "./tide";

/// 构建解释器的外部工具链调用
const BUILD_COMMAND: [&str; 4] = ["ocen", "compiler/main.oc", "-o", INTERPRETER];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug 模式：顺序执行并回显输入，第一个失败立即终止
    #[arg(short, long)]
    pub debug: bool,

    /// 要运行的测试文件/目录（目录递归展开）
    #[arg(default_value = "tests")]
    pub files: Vec<PathBuf>,
}

/// 运行整个测试套件，返回是否全部通过
pub fn run(cli: Cli) -> Result<bool> {
    // 分发前的一次性副作用：构建被测解释器
    build_interpreter();

    let scheduler = Scheduler::new(PathBuf::from(INTERPRETER), cli.debug);
    let summary = scheduler.run(&cli.files)?;
    Ok(summary.all_passed())
}

/// 触发一次解释器构建（不透明的外部协作方）
///
/// 构建失败不单独分类：解释器缺失时后续每次调用都会
/// 启动失败，照常走分类器的非零退出路径。
fn build_interpreter() {
    tracing::info!(command = %BUILD_COMMAND.join(" "), "building interpreter");

    match Command::new(BUILD_COMMAND[0])
        .args(&BUILD_COMMAND[1..])
        .status()
    {
        Ok(status) if !status.success() => {
            tracing::warn!(%status, "interpreter build exited with failure");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "failed to run interpreter build");
        }
    }
}
