use crate::parser::types::{ExpectedOutcome, ParseError, ParseResult};
use std::fs;
use std::path::Path;

/// 指令行前缀（固定三字符标记）
pub const DIRECTIVE_MARKER: &str = "///";

/// 主解析函数（统一入口）
///
/// 读取测试文件并扫描头部指令块。文件内容按 lossy UTF-8 解码，
/// 非法字节不会中断整个测试运行。
pub fn parse_file(path: &Path) -> ParseResult<ExpectedOutcome> {
    let bytes = fs::read(path).map_err(|source| ParseError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_content(&content, path))
}

/// 扫描头部以 /// 开头的连续行，返回第一个被识别的指令
///
/// 扫描在第一个非指令行（或文件结尾）停止；之后的内容不影响结果。
/// 第一个被识别的指令生效，后续指令行不再读取。
pub fn parse_content(content: &str, path: &Path) -> ExpectedOutcome {
    for line in content.lines() {
        let Some(rest) = line.strip_prefix(DIRECTIVE_MARKER) else {
            break;
        };
        let rest = rest.trim();

        // 无参数指令
        if rest == "skip" {
            return ExpectedOutcome::SkipSilently;
        }
        if rest.is_empty() {
            continue;
        }

        // 带参数指令：key: value
        let Some((key, value)) = rest.split_once(':') else {
            println!("[-] Invalid parameters in {}: \"{}\"", path.display(), rest);
            break;
        };

        match key.trim() {
            "out" => return ExpectedOutcome::ExitWithOutput(value.trim().to_string()),
            "fail" => return ExpectedOutcome::FailWithError(value.trim().to_string()),
            _ => {
                println!("[-] Invalid parameter in {}: {}", path.display(), rest);
                break;
            }
        }
    }

    ExpectedOutcome::SkipReport
}
