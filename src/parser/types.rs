use std::path::PathBuf;

/// 测试文件声明的预期结果（来自文件头部的 /// 指令）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutcome {
    /// `/// out: <substring>` — 正常退出且输出包含给定子串
    ExitWithOutput(String),

    /// `/// fail: <substring>` — 非零退出且错误信息包含给定子串
    FailWithError(String),

    /// `/// skip` — 静默跳过，不计入统计
    SkipSilently,

    /// 指令缺失或格式错误 — 跳过并打印提示，不计入统计
    SkipReport,
}

impl ExpectedOutcome {
    /// 检查该文件是否应被跳过（两种跳过都不参与调度）
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkipSilently | Self::SkipReport)
    }
}

/// 单个待执行的测试用例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// 测试源文件路径
    pub path: PathBuf,

    /// 解析出的预期结果（只会是 ExitWithOutput 或 FailWithError）
    pub expected: ExpectedOutcome,
}

impl TestCase {
    pub fn new(path: PathBuf, expected: ExpectedOutcome) -> Self {
        Self { path, expected }
    }
}

/// 解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 测试文件无法读取
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;
