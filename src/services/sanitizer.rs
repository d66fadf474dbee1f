//! 文本清洗 - 业务能力层
//!
//! 只负责把生成模型输出的一段原始文本清洗成"尽量合法"的 JSON 片段，
//! 不做解析，也永远不会失败
//!
//! 清洗步骤按固定顺序执行，每一步都是独立的纯函数：
//! 1. `extract_braced_block` - 截取第一个 `{` 到最后一个 `}` 之间的内容
//! 2. `strip_control_chars` - 去掉控制字符
//! 3. `normalize_escaped_quotes` - `\"` 还原为 `"`（仅当整段都被转义时）
//! 4. `escape_nested_quotes` - 转义字符串内部未转义的引号
//!
//! 第 2 步之后已经是合法 JSON 的片段不再经过第 3、4 步

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// 贪婪匹配：第一个 `{` 到最后一个 `}`
static BRACED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("静态正则"));

/// C0 / DEL / C1 控制字符
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F-\u{9F}]").expect("静态正则"));

/// 清洗一段原始文本
pub fn sanitize(raw: &str) -> String {
    let block = match extract_braced_block(raw) {
        Some(block) => block,
        None => {
            debug!("未找到 {{...}} 结构，原样交给解析器");
            raw
        }
    };

    let text = strip_control_chars(block);
    if is_strict_json(&text) {
        return text;
    }

    let text = if is_fully_escaped(&text) {
        debug!("片段整体被转义，还原引号");
        normalize_escaped_quotes(&text)
    } else {
        text
    };
    escape_nested_quotes(&text)
}

fn is_strict_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// 第一个引号是否被转义，例如 `{\"question\": ...}`
///
/// 这种情况下结构引号本身都带反斜杠，还原是无歧义的
fn is_fully_escaped(text: &str) -> bool {
    let Some(pos) = text.find('"') else {
        return false;
    };
    let backslashes = text[..pos].chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

/// 截取第一个 `{` 到最后一个 `}`（含）之间的内容
///
/// 不存在这样一对括号时返回 None
pub fn extract_braced_block(raw: &str) -> Option<&str> {
    BRACED_BLOCK.find(raw).map(|m| m.as_str())
}

/// 去掉所有控制字符（包括换行和制表符）
pub fn strip_control_chars(text: &str) -> String {
    CONTROL_CHARS.replace_all(text, "").into_owned()
}

/// 将 `\"` 还原为 `"`
///
/// 只处理奇数个连续反斜杠后跟引号的情况，`\\"` 这种已经转义了反斜杠的写法保持不变
pub fn normalize_escaped_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0usize;

    for c in text.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                let keep = if backslashes % 2 == 1 {
                    backslashes - 1
                } else {
                    backslashes
                };
                out.extend(std::iter::repeat('\\').take(keep));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat('\\').take(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.extend(std::iter::repeat('\\').take(backslashes));
    out
}

/// 转义字符串值内部嵌套的引号
///
/// 在字符串内部遇到 `"` 时向后看第一个非空白字符：
/// - `}` `]` 或文本结尾：结束引号
/// - `,` `:`：其后必须紧跟一个 JSON 值的开头才算结束引号，
///   否则像 `"JOIN", exactement` 这样的正文逗号会截断字符串
/// - 其他字符：嵌套引号，转义
pub fn escape_nested_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            i += 1;
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            }
            '"' => {
                if closes_string(&chars[i + 1..]) {
                    in_string = false;
                    out.push('"');
                } else {
                    out.push_str("\\\"");
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    out
}

fn closes_string(rest: &[char]) -> bool {
    let Some(pos) = rest.iter().position(|c| !c.is_whitespace()) else {
        return true;
    };
    match rest[pos] {
        '}' | ']' => true,
        ',' | ':' => starts_value(&rest[pos + 1..]),
        _ => false,
    }
}

/// 下一个非空白字符是否是 JSON 值（或键）的开头
fn starts_value(rest: &[char]) -> bool {
    let Some(pos) = rest.iter().position(|c| !c.is_whitespace()) else {
        return false;
    };
    let rest = &rest[pos..];
    match rest[0] {
        '"' | '{' | '[' | '-' => true,
        c if c.is_ascii_digit() => true,
        't' => is_literal(rest, "true"),
        'f' => is_literal(rest, "false"),
        'n' => is_literal(rest, "null"),
        _ => false,
    }
}

fn is_literal(rest: &[char], literal: &str) -> bool {
    let len = literal.chars().count();
    rest.len() >= len
        && rest[..len].iter().copied().eq(literal.chars())
        && rest.get(len).map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_braced_block_strips_prose() {
        let raw = r#"Voici la question : {"question": "1+1?", "options": {"A": "1"}} Bonne chance !"#;
        assert_eq!(
            extract_braced_block(raw),
            Some(r#"{"question": "1+1?", "options": {"A": "1"}}"#)
        );
    }

    #[test]
    fn test_extract_braced_block_without_pair() {
        assert_eq!(extract_braced_block("pas de json ici"), None);
        assert_eq!(extract_braced_block(r#"{"question": "x""#), None);
        assert_eq!(extract_braced_block("} avant {"), None);
    }

    #[test]
    fn test_sanitize_passes_through_when_no_block() {
        assert_eq!(sanitize("pas de json ici"), "pas de json ici");
    }

    #[test]
    fn test_strip_control_chars() {
        let text = "{\"a\":\u{0007} \"b\n\tc\u{0085}\"}";
        assert_eq!(strip_control_chars(text), "{\"a\": \"bc\"}");
    }

    #[test]
    fn test_strip_control_chars_keeps_accents() {
        assert_eq!(strip_control_chars("réponse où"), "réponse où");
    }

    #[test]
    fn test_normalize_escaped_quotes() {
        assert_eq!(
            normalize_escaped_quotes(r#"{\"question\": \"x\"}"#),
            r#"{"question": "x"}"#
        );
        // 反斜杠本身被转义时保持不变
        assert_eq!(normalize_escaped_quotes(r#""C:\\""#), r#""C:\\""#);
        assert_eq!(normalize_escaped_quotes(r#"a\\\"b"#), r#"a\\"b"#);
        assert_eq!(normalize_escaped_quotes(r"fin\"), r"fin\");
    }

    #[test]
    fn test_escape_nested_quotes() {
        let text = r#"{"question": "Que fait "SELECT *" ?", "correct_answer": "A"}"#;
        assert_eq!(
            escape_nested_quotes(text),
            r#"{"question": "Que fait \"SELECT *\" ?", "correct_answer": "A"}"#
        );
    }

    #[test]
    fn test_escape_nested_quotes_leaves_valid_json_alone() {
        let text = r#"{"a": "x\"y", "b": ["c", "d"], "e": {"f": "g"}}"#;
        assert_eq!(escape_nested_quotes(text), text);
    }

    #[test]
    fn test_escape_nested_quotes_followed_by_prose_comma() {
        let text = r#"{"question": "Que fait "JOIN", exactement ?", "correct_answer": "A"}"#;
        let escaped = escape_nested_quotes(text);
        assert_eq!(
            escaped,
            r#"{"question": "Que fait \"JOIN\", exactement ?", "correct_answer": "A"}"#
        );
        let value: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(value["question"], "Que fait \"JOIN\", exactement ?");
    }

    #[test]
    fn test_escape_nested_quotes_followed_by_prose_colon() {
        let text = r#"{"question": "Le mot "clé": une définition", "correct_answer": "A"}"#;
        let value: serde_json::Value =
            serde_json::from_str(&escape_nested_quotes(text)).unwrap();
        assert_eq!(value["question"], "Le mot \"clé\": une définition");
    }

    #[test]
    fn test_closes_string_lookahead() {
        let chars = |s: &str| s.chars().collect::<Vec<char>>();
        assert!(closes_string(&chars(r#", "b": 1"#)));
        assert!(closes_string(&chars(": null}")));
        assert!(closes_string(&chars(" }")));
        assert!(closes_string(&chars("")));
        assert!(!closes_string(&chars(", exactement")));
        assert!(!closes_string(&chars(", nulle part")));
        assert!(!closes_string(&chars(" ou pas")));
    }

    #[test]
    fn test_valid_block_is_left_untouched() {
        let block = r#"{"question": "Choisir \"INNER\", \"LEFT\" ou \"RIGHT\" ?", "correct_answer": "A"}"#;
        let raw = format!("Voici : {} Fin.", block);
        assert_eq!(sanitize(&raw), block);
    }

    #[test]
    fn test_sanitize_fully_escaped_payload() {
        let raw = r#"{\"question\": \"Que fait GROUP BY ?\", \"correct_answer\": \"B\"}"#;
        let sanitized = sanitize(raw);
        assert_eq!(
            sanitized,
            r#"{"question": "Que fait GROUP BY ?", "correct_answer": "B"}"#
        );
    }

    #[test]
    fn test_sanitize_full_pipeline() {
        let raw = "Réponse:\n{\"question\": \"Le mot-clé \\\"JOIN\\\" sert à ?\",\n \"correct_answer\": \"B\"}\nFin.";
        let sanitized = sanitize(raw);
        assert_eq!(
            sanitized,
            r#"{"question": "Le mot-clé \"JOIN\" sert à ?", "correct_answer": "B"}"#
        );
        let value: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
        assert_eq!(value["question"], "Le mot-clé \"JOIN\" sert à ?");
    }
}
