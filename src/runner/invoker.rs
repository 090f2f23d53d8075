use crate::runner::types::ExecutionResult;
use std::path::{Path, PathBuf};
use std::process::Command;

/// GC 压力模式开关，强制激进回收以暴露内存管理缺陷
const GC_STRESS_FLAG: &str = "--gc-stress";

/// 以子进程方式调用被测解释器
pub struct Invoker {
    interpreter: PathBuf,
}

impl Invoker {
    pub fn new(interpreter: PathBuf) -> Self {
        Self { interpreter }
    }

    /// 对单个测试文件执行一次解释器调用，同步等待完成
    ///
    /// 每个测试精确产生一个子进程；没有重试，也没有超时。
    /// 启动失败不单独分类：折叠为退出码 -1、stderr 携带系统错误，
    /// 走分类器的非零退出路径。
    pub fn invoke(&self, test_path: &Path) -> ExecutionResult {
        let output = Command::new(&self.interpreter)
            .arg(test_path)
            .arg(GC_STRESS_FLAG)
            .output();

        match output {
            Ok(output) => ExecutionResult::new(
                // 被信号终止时没有退出码，折叠为 -1
                output.status.code().unwrap_or(-1),
                output.stdout,
                output.stderr,
            ),
            Err(e) => {
                tracing::debug!(
                    interpreter = %self.interpreter.display(),
                    error = %e,
                    "failed to spawn interpreter"
                );
                ExecutionResult::new(-1, Vec::new(), e.to_string().into_bytes())
            }
        }
    }
}
