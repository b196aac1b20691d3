//! Expression-text helpers
//!
//! The lowering manipulates host-language expressions as text. These
//! helpers are identifier-aware (a substitution never touches a partial
//! identifier or the inside of a string literal) and nesting-aware (a
//! "top-level" operator search ignores anything inside parentheses,
//! brackets, braces or literals).

use unicode_ident::{is_xid_continue, is_xid_start};

/// Can `c` start an identifier?
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || is_xid_start(c)
}

/// Can `c` continue an identifier?
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || is_xid_continue(c)
}

/// Is `s` a single bare identifier?
pub fn is_bare_ident(s: &str) -> bool {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_continue),
        _ => false,
    }
}

/// Per-character classification of an expression text
#[derive(Debug, Clone, Copy)]
struct CharInfo {
    ch: char,
    /// Outside any string/char literal
    in_code: bool,
    /// Paren/bracket/brace nesting level (delimiters carry the outer level)
    depth: i32,
}

fn analyze(s: &str) -> Vec<CharInfo> {
    let mut out = Vec::with_capacity(s.len());
    let mut depth = 0i32;
    let mut literal: Option<char> = None;
    let mut escaped = false;
    for ch in s.chars() {
        match literal {
            Some(quote) => {
                out.push(CharInfo { ch, in_code: false, depth });
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    literal = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    literal = Some(ch);
                    out.push(CharInfo { ch, in_code: false, depth });
                }
                '(' | '[' | '{' => {
                    out.push(CharInfo { ch, in_code: true, depth });
                    depth += 1;
                }
                ')' | ']' | '}' => {
                    depth -= 1;
                    out.push(CharInfo { ch, in_code: true, depth });
                }
                _ => out.push(CharInfo { ch, in_code: true, depth }),
            },
        }
    }
    out
}

/// Replace every whole-identifier occurrence of `old` with `new`,
/// skipping string and character literals.
pub fn replace_ident(text: &str, old: &str, new: &str) -> String {
    let info = analyze(text);
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < info.len() {
        let c = info[i];
        if c.in_code && is_ident_start(c.ch) {
            let start = i;
            let mut ident = String::new();
            while i < info.len() && info[i].in_code && is_ident_continue(info[i].ch) {
                ident.push(info[i].ch);
                i += 1;
            }
            // a leading dot means a member name, never a variable
            let after_dot = start > 0 && info[start - 1].in_code && info[start - 1].ch == '.';
            if ident == old && !after_dot {
                out.push_str(new);
            } else {
                out.push_str(&ident);
            }
        } else {
            out.push(c.ch);
            i += 1;
        }
    }
    out
}

/// Does `text` mention `name` as a whole identifier (outside literals)?
pub fn contains_ident(text: &str, name: &str) -> bool {
    // cheap probe first; the precise answer reuses the substitution walk
    text.contains(name) && replace_ident(text, name, "\u{0}") != text
}

/// Is there an occurrence of `op` at nesting depth 0, outside literals?
pub fn has_top_level(s: &str, op: &str) -> bool {
    find_top_level(s, op).is_some()
}

/// Find the first occurrence of `op` at nesting depth 0, outside literals.
pub fn find_top_level(s: &str, op: &str) -> Option<usize> {
    let info = analyze(s);
    let op_chars: Vec<char> = op.chars().collect();
    let chars: Vec<char> = info.iter().map(|c| c.ch).collect();
    'outer: for i in 0..info.len() {
        if !info[i].in_code || info[i].depth != 0 {
            continue;
        }
        if i + op_chars.len() > chars.len() {
            break;
        }
        for (k, oc) in op_chars.iter().enumerate() {
            if chars[i + k] != *oc || !info[i + k].in_code || info[i + k].depth != 0 {
                continue 'outer;
            }
        }
        // byte offset of the match
        let byte = s.char_indices().nth(i).map(|(b, _)| b)?;
        return Some(byte);
    }
    None
}

/// Strip one layer of redundant outer parentheses, if the whole
/// expression is wrapped by a matching pair.
pub fn strip_outer_parens(s: &str) -> &str {
    let t = s.trim();
    if !t.starts_with('(') || !t.ends_with(')') {
        return t;
    }
    let info = analyze(t);
    // the opening paren must close only at the very end
    for (i, c) in info.iter().enumerate() {
        if c.in_code && c.ch == ')' && c.depth == 0 && i != info.len() - 1 {
            return t;
        }
    }
    t[1..t.len() - 1].trim()
}

/// A "simple" operand binds tighter than any binary operator: a bare
/// identifier, literal, call or member chain. Anything with a top-level
/// binary operator or whitespace needs parentheses when negated.
pub fn is_simple_operand(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    let info = analyze(t);
    for c in &info {
        if !c.in_code || c.depth != 0 {
            continue;
        }
        if c.ch.is_whitespace() {
            return false;
        }
        if matches!(c.ch, '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '&' | '|' | '?' | ':' | '!') {
            return false;
        }
    }
    true
}

/// Logical negation of a boolean expression text.
pub fn negate_expr(s: &str) -> String {
    let t = strip_outer_parens(s);
    if t == "true" {
        return "false".into();
    }
    if t == "false" {
        return "true".into();
    }
    if let Some(rest) = t.strip_prefix('!') {
        let rest = rest.trim_start();
        if is_simple_operand(rest) || (rest.starts_with('(') && strip_outer_parens(rest) != rest) {
            return rest.to_string();
        }
    }
    if is_simple_operand(t) {
        return format!("!{t}");
    }
    // a single comparison flips without extra parentheses
    for (op, flipped) in [("==", "!="), ("!=", "=="), ("<=", ">"), (">=", "<"), ("<", ">="), (">", "<=")] {
        if let Some(at) = find_top_level(t, op) {
            let (lhs, rhs) = (&t[..at], &t[at + op.len()..]);
            let comparison_only = !has_top_level(t, "&&")
                && !has_top_level(t, "||")
                && !has_top_level(rhs, "==")
                && !has_top_level(rhs, "!=")
                && !has_top_level(rhs, "<")
                && !has_top_level(rhs, ">");
            if comparison_only {
                return format!("{} {} {}", lhs.trim(), flipped, rhs.trim());
            }
            break;
        }
    }
    format!("!({t})")
}

/// Conjunction of two condition texts, parenthesizing a disjunctive
/// operand so precedence is preserved.
pub fn and_join(a: &str, b: &str) -> String {
    let wrap = |s: &str| {
        if has_top_level(s, "||") {
            format!("({s})")
        } else {
            s.to_string()
        }
    };
    format!("{} && {}", wrap(a.trim()), wrap(b.trim()))
}

/// Disjunction of two condition texts.
pub fn or_join(a: &str, b: &str) -> String {
    format!("{} || {}", a.trim(), b.trim())
}

/// Byte offset of a plain assignment `=` at depth 0, outside literals —
/// never part of `==`, `!=`, `<=`, `>=` or a compound assignment.
pub fn find_assign_op(s: &str) -> Option<usize> {
    let info = analyze(s);
    let chars: Vec<char> = info.iter().map(|c| c.ch).collect();
    for i in 0..chars.len() {
        if chars[i] != '=' || !info[i].in_code || info[i].depth != 0 {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        if matches!(prev, Some('!' | '<' | '>' | '=' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^')) {
            continue;
        }
        if next == Some('=') {
            continue;
        }
        return s.char_indices().nth(i).map(|(b, _)| b);
    }
    None
}

/// Whitespace-insensitive structural equivalence of two expression texts.
pub fn equivalent(a: &str, b: &str) -> bool {
    let squash = |s: &str| {
        let mut out = String::with_capacity(s.len());
        let mut last_space = true;
        for ch in s.chars() {
            if ch.is_whitespace() {
                if !last_space {
                    out.push(' ');
                    last_space = true;
                }
            } else {
                out.push(ch);
                last_space = false;
            }
        }
        out.trim_end().to_string()
    };
    squash(a) == squash(b)
}

/// Every parameter name of every function literal (`x -> ...`,
/// `(a, b) -> ...`) appearing anywhere inside `text`.
pub fn lambda_param_names(text: &str) -> Vec<String> {
    let info = analyze(text);
    let chars: Vec<char> = info.iter().map(|c| c.ch).collect();
    let mut names = Vec::new();
    let mut i = 0;
    while i + 1 < chars.len() {
        if info[i].in_code && chars[i] == '-' && chars[i + 1] == '>' && info[i + 1].in_code {
            // look backwards for the parameter list
            let mut j = i;
            while j > 0 && chars[j - 1].is_whitespace() {
                j -= 1;
            }
            if j > 0 && chars[j - 1] == ')' {
                let close = j - 1;
                let mut depth = 0;
                let mut open = None;
                for k in (0..=close).rev() {
                    if !info[k].in_code {
                        continue;
                    }
                    match chars[k] {
                        ')' => depth += 1,
                        '(' => {
                            depth -= 1;
                            if depth == 0 {
                                open = Some(k);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                if let Some(open) = open {
                    let inner: String = chars[open + 1..close].iter().collect();
                    for part in inner.split(',') {
                        // the name is the last identifier (a type may precede it)
                        if let Some(name) = part.split_whitespace().last() {
                            if is_bare_ident(name) {
                                names.push(name.to_string());
                            }
                        }
                    }
                }
            } else if j > 0 && is_ident_continue(chars[j - 1]) {
                let end = j;
                let mut k = j;
                while k > 0 && is_ident_continue(chars[k - 1]) {
                    k -= 1;
                }
                let name: String = chars[k..end].iter().collect();
                if is_bare_ident(&name) {
                    names.push(name);
                }
            }
        }
        i += 1;
    }
    names
}

/// Suggest a variable name from an expression: the final method-call
/// segment, with a `get`/`is` prefix stripped.
pub fn suggest_name_from_expr(expr: &str) -> Option<String> {
    let t = expr.trim();
    if !t.ends_with(')') {
        return None;
    }
    let info = analyze(t);
    let chars: Vec<char> = info.iter().map(|c| c.ch).collect();
    // find the '(' matching the final ')'
    let mut depth = 0;
    let mut open = None;
    for k in (0..chars.len()).rev() {
        if !info[k].in_code {
            continue;
        }
        match chars[k] {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    open = Some(k);
                    break;
                }
            }
            _ => {}
        }
    }
    let open = open?;
    let mut k = open;
    while k > 0 && is_ident_continue(chars[k - 1]) {
        k -= 1;
    }
    let method: String = chars[k..open].iter().collect();
    decompose_accessor(&method)
}

/// Strip a `get`/`is` accessor prefix and lowercase the first letter.
fn decompose_accessor(method: &str) -> Option<String> {
    if method.is_empty() {
        return None;
    }
    let stripped = method
        .strip_prefix("get")
        .or_else(|| method.strip_prefix("is"))
        .filter(|rest| rest.chars().next().is_some_and(|c| c.is_uppercase()))
        .unwrap_or(method);
    let mut chars = stripped.chars();
    let first = chars.next()?;
    if !is_ident_start(first.to_ascii_lowercase()) {
        return None;
    }
    Some(first.to_lowercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_skips_literals_and_members() {
        assert_eq!(replace_ident("x + \"x\"", "x", "v"), "v + \"x\"");
        assert_eq!(replace_ident("x.x()", "x", "v"), "v.x()");
        assert_eq!(replace_ident("xy + x", "x", "v"), "xy + v");
    }

    #[test]
    fn top_level_search_ignores_nesting() {
        assert!(has_top_level("a || b", "||"));
        assert!(!has_top_level("f(a || b)", "||"));
        assert!(!has_top_level("\"a || b\"", "||"));
    }

    #[test]
    fn negation_shapes() {
        assert_eq!(negate_expr("p(v)"), "!p(v)");
        assert_eq!(negate_expr("!p(v)"), "p(v)");
        assert_eq!(negate_expr("v == null"), "v != null");
        assert_eq!(negate_expr("a || b"), "!(a || b)");
        assert_eq!(negate_expr("true"), "false");
    }

    #[test]
    fn joins_preserve_precedence() {
        assert_eq!(and_join("a || b", "c"), "(a || b) && c");
        assert_eq!(and_join("a", "b"), "a && b");
        assert_eq!(or_join("a == null", "!p(a)"), "a == null || !p(a)");
    }

    #[test]
    fn lambda_params_are_collected() {
        assert_eq!(lambda_param_names("s -> s.trim()"), vec!["s"]);
        assert_eq!(lambda_param_names("(a, b) -> a + b"), vec!["a", "b"]);
        assert_eq!(
            lambda_param_names("list.map(x -> x + 1).filter(y -> y > 0)"),
            vec!["x", "y"]
        );
        assert!(lambda_param_names("\"x -> y\"").is_empty());
    }

    #[test]
    fn name_suggestions_strip_accessors() {
        assert_eq!(suggest_name_from_expr("user.getName()"), Some("name".into()));
        assert_eq!(suggest_name_from_expr("obj.isEmpty()"), Some("empty".into()));
        assert_eq!(suggest_name_from_expr("value()"), Some("value".into()));
        assert_eq!(suggest_name_from_expr("plain"), None);
    }

    #[test]
    fn outer_parens_strip_only_when_matching() {
        assert_eq!(strip_outer_parens("(a + b)"), "a + b");
        assert_eq!(strip_outer_parens("(a) + (b)"), "(a) + (b)");
        assert_eq!(strip_outer_parens("x"), "x");
    }
}
