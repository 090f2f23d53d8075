use std::path::PathBuf;

/// 单次解释器调用的原始结果
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// 进程退出码（被信号终止或启动失败时为 -1）
    pub exit_code: i32,

    /// 完整的 stdout 字节流
    pub stdout: Vec<u8>,

    /// 完整的 stderr 字节流
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// stdout 按 lossy UTF-8 解码
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// stderr 按 lossy UTF-8 解码
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// 单个测试的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// 判定结果与其来源测试文件的配对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVerdict {
    /// 测试源文件路径
    pub path: PathBuf,

    /// 判定结果
    pub verdict: Verdict,
}

impl TestVerdict {
    pub fn new(path: PathBuf, verdict: Verdict) -> Self {
        Self { path, verdict }
    }
}

/// 测试套件汇总
///
/// 只由 Reporter 持有和更新；worker 线程通过 channel 传递
/// 不可变的 TestVerdict，不直接接触计数器。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl SuiteSummary {
    pub fn new(total: usize) -> Self {
        Self {
            passed: 0,
            failed: 0,
            total,
        }
    }

    /// 记录一个到达的判定结果
    pub fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail(_) => self.failed += 1,
        }
    }

    /// 已完成的测试数
    pub fn completed(&self) -> usize {
        self.passed + self.failed
    }

    /// 整个套件是否通过
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
