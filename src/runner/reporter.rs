use crate::runner::types::{SuiteSummary, TestVerdict, Verdict};
use colored::Colorize;
use std::io::{IsTerminal, Write};

/// ANSI 清除当前整行
const CLEAR_LINE: &str = "\x1b[2K";

/// 消费判定结果流并维护套件汇总
///
/// SuiteSummary 只在这里被修改；worker 线程只通过 channel 送来
/// 不可变的 TestVerdict。交互式终端上重绘单行进度，
/// 非交互输出每个完成一行（追加式，无光标控制）。
pub struct Reporter {
    summary: SuiteSummary,
    /// stdout 是否为终端（决定彩色失败横幅）
    tty: bool,
    /// 是否重绘单行进度（终端且非 debug 模式）
    interactive: bool,
}

impl Reporter {
    pub fn new(total: usize, debug: bool) -> Self {
        let tty = std::io::stdout().is_terminal();
        Self {
            summary: SuiteSummary::new(total),
            tty,
            interactive: tty && !debug,
        }
    }

    /// 测试用构造：显式指定输出模式
    #[cfg(test)]
    fn plain(total: usize) -> Self {
        Self {
            summary: SuiteSummary::new(total),
            tty: false,
            interactive: false,
        }
    }

    /// 记录一个到达的判定并渲染进度
    pub fn record(&mut self, test_verdict: &TestVerdict) {
        self.summary.record(&test_verdict.verdict);

        if self.interactive {
            print!(
                " {}[{}/{}] Running tests, finished {} / {}\r",
                CLEAR_LINE,
                format!("{:3}", self.summary.passed).green(),
                format!("{:3}", self.summary.failed).red(),
                self.summary.completed(),
                self.summary.total
            );
            let _ = std::io::stdout().flush();
        } else {
            println!(
                " Running tests, finished {} / {}",
                self.summary.completed(),
                self.summary.total
            );
        }

        if let Verdict::Fail(message) = &test_verdict.verdict {
            if self.tty {
                // 先清掉进度行，横幅打印完后下一次 record 会重绘
                println!(
                    "{}{}",
                    CLEAR_LINE,
                    format!("[-] Failed {}", test_verdict.path.display()).red()
                );
                println!("  - {}", message);
            } else {
                println!("[-] Failed {}", test_verdict.path.display());
            }
        }
    }

    /// 打印最终汇总并交出 SuiteSummary
    pub fn finish(self) -> SuiteSummary {
        if self.tty {
            println!("{}", CLEAR_LINE);
            println!("Tests passed: {}", self.summary.passed.to_string().green());
            println!("Tests failed: {}", self.summary.failed.to_string().red());
        } else {
            println!(
                "Tests passed: {} / {}",
                self.summary.passed, self.summary.total
            );
        }
        self.summary
    }

    /// 当前汇总（只读）
    pub fn summary(&self) -> &SuiteSummary {
        &self.summary
    }
}
