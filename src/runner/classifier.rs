use crate::parser::ExpectedOutcome;
use crate::runner::types::{ExecutionResult, Verdict};
use once_cell::sync::Lazy;
use regex::Regex;

/// GC 插桩统计：分配计数
static GC_ALLOCATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[GC\]\s*Allocated objects: (\d+)").unwrap());

/// GC 插桩统计：释放计数
static GC_FREED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[GC\]\s*Freed objects: (\d+)").unwrap());

/// 把预期结果与一次执行结果比对，产出判定
///
/// 纯函数：不做任何 IO，消息即诊断。skip 变体在调度前已被过滤，
/// 不会到达这里。
pub fn classify(expected: &ExpectedOutcome, result: &ExecutionResult) -> Verdict {
    match expected {
        ExpectedOutcome::FailWithError(expected_error) => classify_failure(expected_error, result),
        ExpectedOutcome::ExitWithOutput(expected_out) => classify_output(expected_out, result),
        ExpectedOutcome::SkipSilently | ExpectedOutcome::SkipReport => {
            unreachable!("skip cases are filtered before dispatch")
        }
    }
}

/// `fail:` 预期 — 解释器应以非零退出，且 stdout 携带预期错误子串
///
/// 注意：只检查 stdout。tide 解释器把 `Error: …` 报告打印到 stdout，
/// stderr 对 `fail:` 预期不可见。
fn classify_failure(expected_error: &str, result: &ExecutionResult) -> Verdict {
    if result.exit_code == 0 {
        return Verdict::Fail("expected compilation failure, but succeeded".to_string());
    }

    let stdout = result.stdout_text();
    let error = stdout.trim();

    if error.contains(expected_error) {
        return Verdict::Pass;
    }

    // 诊断只引用 "Error: " 标记之后的部分（若存在）
    let remaining = match error.split_once("Error: ") {
        Some((_, rest)) => rest,
        None => error,
    };
    Verdict::Fail(format!(
        "did not find expected error message\n  expected: {}\n  got: '{}'",
        expected_error, remaining
    ))
}

/// `out:` 预期 — 解释器应以零退出，归一化后的 stdout 包含预期子串，
/// 且 GC 统计自洽（分配数 == 释放数）
fn classify_output(expected_out: &str, result: &ExecutionResult) -> Verdict {
    if result.exit_code != 0 {
        let stdout = indent(&result.stdout_text());
        let stderr = indent(&result.stderr_text());
        return Verdict::Fail(format!(
            "failed:\n  code: {}\n  stdout: {}\n  stderr: {}",
            result.exit_code, stdout, stderr
        ));
    }

    let output = normalize_whitespace(&result.stdout_text());

    if !output.contains(expected_out) {
        return Verdict::Fail(format!(
            "incorrect output produced\n  expected: {:?}\n  got: {:?}",
            expected_out, output
        ));
    }

    check_gc_stats(&output)
}

/// 校验 GC 插桩输出：每个正常退出的测试都隐式复验
/// 收集器在本次运行里回收了它分配的所有对象
fn check_gc_stats(output: &str) -> Verdict {
    let Some(allocated) = capture_count(&GC_ALLOCATED, output) else {
        return Verdict::Fail("GC stats: allocated objects not found".to_string());
    };
    let Some(freed) = capture_count(&GC_FREED, output) else {
        return Verdict::Fail("GC stats: freed objects not found".to_string());
    };
    if allocated != freed {
        return Verdict::Fail("GC stats: allocated and freed objects do not match".to_string());
    }
    Verdict::Pass
}

fn capture_count(re: &Regex, output: &str) -> Option<u64> {
    re.captures(output)?.get(1)?.as_str().parse().ok()
}

/// 把所有连续空白（含换行）折叠为单个空格并去除首尾空白
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 诊断里的多行输出统一缩进 10 个空格（首行缩进随后被 trim 掉）
fn indent(text: &str) -> String {
    let indented: Vec<String> = text
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("          {}", line)
            }
        })
        .collect();
    indented.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(stdout: &str) -> ExecutionResult {
        ExecutionResult::new(0, stdout.as_bytes().to_vec(), Vec::new())
    }

    fn err(code: i32, stdout: &str, stderr: &str) -> ExecutionResult {
        ExecutionResult::new(code, stdout.as_bytes().to_vec(), stderr.as_bytes().to_vec())
    }

    fn expect_out(s: &str) -> ExpectedOutcome {
        ExpectedOutcome::ExitWithOutput(s.to_string())
    }

    fn expect_fail(s: &str) -> ExpectedOutcome {
        ExpectedOutcome::FailWithError(s.to_string())
    }

    #[test]
    fn test_fail_expectation_matches_stdout_error() {
        let result = err(1, "Error: TypeError: x\n", "");
        assert_eq!(classify(&expect_fail("TypeError"), &result), Verdict::Pass);
    }

    #[test]
    fn test_fail_expectation_zero_exit_is_failure() {
        // 退出码为 0 时无论输出什么都算失败
        let result = ok("Error: TypeError: x\n");
        let verdict = classify(&expect_fail("TypeError"), &result);
        assert_eq!(
            verdict,
            Verdict::Fail("expected compilation failure, but succeeded".to_string())
        );
    }

    #[test]
    fn test_fail_expectation_wrong_message_quotes_after_error_marker() {
        let result = err(1, "Runtime Error: ValueError: bad input\n", "");
        let Verdict::Fail(msg) = classify(&expect_fail("TypeError"), &result) else {
            panic!("expected Fail");
        };
        assert!(msg.contains("did not find expected error message"));
        assert!(msg.contains("expected: TypeError"));
        assert!(msg.contains("got: 'ValueError: bad input'"));
    }

    #[test]
    fn test_fail_expectation_no_error_marker_quotes_everything() {
        let result = err(1, "something exploded\n", "");
        let Verdict::Fail(msg) = classify(&expect_fail("TypeError"), &result) else {
            panic!("expected Fail");
        };
        assert!(msg.contains("got: 'something exploded'"));
    }

    #[test]
    fn test_fail_expectation_ignores_stderr() {
        // fail: 只看 stdout，stderr 上的错误信息不参与匹配
        let result = err(1, "", "Error: TypeError: x\n");
        let verdict = classify(&expect_fail("TypeError"), &result);
        assert!(matches!(verdict, Verdict::Fail(_)));
    }

    #[test]
    fn test_output_expectation_with_consistent_gc_stats() {
        let result = ok("result is   42\n[GC] Allocated objects: 3 [GC] Freed objects: 3");
        assert_eq!(classify(&expect_out("42"), &result), Verdict::Pass);
    }

    #[test]
    fn test_output_expectation_gc_mismatch() {
        let result = ok("result is 42\n[GC] Allocated objects: 3\n[GC] Freed objects: 2\n");
        assert_eq!(
            classify(&expect_out("42"), &result),
            Verdict::Fail("GC stats: allocated and freed objects do not match".to_string())
        );
    }

    #[test]
    fn test_output_expectation_missing_allocated_stat() {
        let result = ok("42\n[GC] Freed objects: 3\n");
        assert_eq!(
            classify(&expect_out("42"), &result),
            Verdict::Fail("GC stats: allocated objects not found".to_string())
        );
    }

    #[test]
    fn test_output_expectation_missing_freed_stat() {
        let result = ok("42\n[GC] Allocated objects: 3\n");
        assert_eq!(
            classify(&expect_out("42"), &result),
            Verdict::Fail("GC stats: freed objects not found".to_string())
        );
    }

    #[test]
    fn test_output_expectation_nonzero_exit_embeds_streams() {
        let result = err(2, "partial output\n", "boom\n");
        let Verdict::Fail(msg) = classify(&expect_out("42"), &result) else {
            panic!("expected Fail");
        };
        assert!(msg.contains("code: 2"));
        assert!(msg.contains("partial output"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_output_expectation_substring_not_found() {
        let result = ok("result is 41\n[GC] Allocated objects: 1\n[GC] Freed objects: 1\n");
        let Verdict::Fail(msg) = classify(&expect_out("result is 42"), &result) else {
            panic!("expected Fail");
        };
        assert!(msg.contains("incorrect output produced"));
        assert!(msg.contains("result is 41"));
    }

    #[test]
    fn test_whitespace_normalization_equivalence() {
        // "a\n\n  b" 与 "a  b" 归一化后匹配同样的子串
        let gc = "[GC] Allocated objects: 0 [GC] Freed objects: 0";
        let messy = ok(&format!("a\n\n  b\n{}", gc));
        let plain = ok(&format!("a  b\n{}", gc));
        assert_eq!(classify(&expect_out("a b"), &messy), Verdict::Pass);
        assert_eq!(classify(&expect_out("a b"), &plain), Verdict::Pass);
    }

    #[test]
    fn test_spawn_failure_takes_nonzero_exit_path() {
        // 进程启动失败折叠为 -1 / 空 stdout，按普通非零退出处理
        let result = err(-1, "", "No such file or directory");
        assert!(matches!(classify(&expect_out("42"), &result), Verdict::Fail(_)));
        // fail: 预期下 stdout 为空，自然匹配不到错误子串
        assert!(matches!(classify(&expect_fail("TypeError"), &result), Verdict::Fail(_)));
    }

    #[test]
    fn test_gc_stats_tag_is_case_sensitive() {
        let result = ok("42\n[gc] Allocated objects: 3\n[gc] Freed objects: 3\n");
        assert_eq!(
            classify(&expect_out("42"), &result),
            Verdict::Fail("GC stats: allocated objects not found".to_string())
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\n  b\t c \r\n"), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }
}
