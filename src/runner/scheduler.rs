use crate::Result;
use crate::parser::{self, ExpectedOutcome, TestCase};
use crate::runner::classifier::classify;
use crate::runner::invoker::Invoker;
use crate::runner::reporter::Reporter;
use crate::runner::types::{SuiteSummary, TestVerdict};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// 测试调度器：发现、过滤、排序、分发
pub struct Scheduler {
    invoker: Invoker,
    debug: bool,
}

impl Scheduler {
    pub fn new(interpreter: PathBuf, debug: bool) -> Self {
        Self {
            invoker: Invoker::new(interpreter),
            debug,
        }
    }

    /// 运行给定路径下的全部测试，返回最终汇总
    ///
    /// 队列在分发开始前构建完毕，之后不再变动。normal 模式用
    /// 阻塞式 worker 线程池乱序完成；debug 模式严格顺序执行，
    /// 第一个失败立即停止分发。
    pub fn run(&self, paths: &[PathBuf]) -> Result<SuiteSummary> {
        let cases = self.collect(paths)?;
        let mut reporter = Reporter::new(cases.len(), self.debug);

        if self.debug {
            self.run_sequential(&cases, &mut reporter);
        } else {
            self.run_parallel(&cases, &mut reporter);
        }

        Ok(reporter.finish())
    }

    /// 枚举候选文件、解析指令、过滤跳过项、按路径排序
    fn collect(&self, paths: &[PathBuf]) -> Result<Vec<TestCase>> {
        let mut files = Vec::new();
        for path in paths {
            list_files(path, &mut files);
        }

        let mut cases = Vec::new();
        for file in files {
            let expected = match parser::parse_file(&file) {
                Ok(expected) => expected,
                Err(e) => {
                    // 读不了的文件当作缺失指令处理，测试运行继续
                    tracing::warn!(error = %e, "unreadable test file");
                    println!("[-] Skipping {}", file.display());
                    continue;
                }
            };

            match expected {
                ExpectedOutcome::SkipSilently => continue,
                ExpectedOutcome::SkipReport => {
                    println!("[-] Skipping {}", file.display());
                    continue;
                }
                _ => cases.push(TestCase::new(file, expected)),
            }
        }

        // 路径排序保证可复现的分发顺序
        cases.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(cases)
    }

    /// debug 模式：单线程顺序执行，回显每个输入，首败即停
    fn run_sequential(&self, cases: &[TestCase], reporter: &mut Reporter) {
        for case in cases {
            println!("{} {:?}", case.path.display(), case.expected);

            let result = self.invoker.invoke(&case.path);
            let verdict = classify(&case.expected, &result);
            let failed = !verdict.is_pass();
            reporter.record(&TestVerdict::new(case.path.clone(), verdict));

            if failed {
                break;
            }
        }
    }

    /// normal 模式：N 个阻塞式 worker 各自认领队列下标，
    /// 判定结果经 mpsc channel 汇入唯一消费者（Reporter）
    fn run_parallel(&self, cases: &[TestCase], reporter: &mut Reporter) {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(cases.len().max(1));
        tracing::debug!(workers, total = cases.len(), "dispatching worker pool");

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<TestVerdict>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let invoker = &self.invoker;
                scope.spawn(move || {
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(case) = cases.get(index) else {
                            break;
                        };
                        let result = invoker.invoke(&case.path);
                        let verdict = classify(&case.expected, &result);
                        if tx.send(TestVerdict::new(case.path.clone(), verdict)).is_err() {
                            break;
                        }
                    }
                });
            }
            // 所有 worker 退出后 channel 关闭，消费循环随之结束
            drop(tx);

            for test_verdict in rx {
                reporter.record(&test_verdict);
            }
        });
    }
}

/// 递归枚举一个根路径下的所有文件；普通文件原样收集
///
/// 不做文件名过滤：是否参与由文件头部的指令决定。
fn list_files(root: &Path, out: &mut Vec<PathBuf>) {
    if root.is_dir() {
        if let Ok(entries) = fs::read_dir(root) {
            for entry in entries.flatten() {
                list_files(&entry.path(), out);
            }
        }
    } else {
        out.push(root.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_collect_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.tide", "/// out: two\n");
        write_file(dir.path(), "a.tide", "/// out: one\n");
        write_file(dir.path(), "skipped.tide", "/// skip\n");
        write_file(dir.path(), "no_directive.tide", "let x = 1\n");

        let scheduler = Scheduler::new(PathBuf::from("tide"), false);
        let cases = scheduler.collect(&[dir.path().to_path_buf()]).unwrap();

        // 两种跳过都不进入队列，剩余用例按路径排序
        assert_eq!(cases.len(), 2);
        assert!(cases[0].path.ends_with("a.tide"));
        assert!(cases[1].path.ends_with("b.tide"));
    }

    #[test]
    fn test_collect_single_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "single.tide", "/// fail: TypeError\n");

        let scheduler = Scheduler::new(PathBuf::from("tide"), false);
        let cases = scheduler.collect(&[path]).unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(
            cases[0].expected,
            ExpectedOutcome::FailWithError("TypeError".to_string())
        );
    }

    #[test]
    fn test_collect_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        write_file(&sub, "deep.tide", "/// out: deep\n");

        let scheduler = Scheduler::new(PathBuf::from("tide"), false);
        let cases = scheduler.collect(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(cases.len(), 1);
        assert!(cases[0].path.ends_with("deep.tide"));
    }

    #[test]
    fn test_collect_missing_path_is_reported_skip() {
        let scheduler = Scheduler::new(PathBuf::from("tide"), false);
        let cases = scheduler
            .collect(&[PathBuf::from("/nonexistent/test.tide")])
            .unwrap();
        assert!(cases.is_empty());
    }
}
