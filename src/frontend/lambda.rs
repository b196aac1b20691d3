//! Function-literal capability
//!
//! Intermediate and terminal operations capture function literals from
//! the host (`x -> x.trim()`, `() -> fetchDefault()`). The host hands the
//! literal over as parameter names plus body text; everything here works
//! on that text, identifier-aware.

use smallvec::SmallVec;

use crate::error::LowerError;
use crate::util::text;

/// A captured function literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaArg {
    params: SmallVec<[String; 2]>,
    body: String,
}

impl LambdaArg {
    /// Build from explicit parameter names and body text
    pub fn new<P, S>(params: P, body: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            body: body.into(),
        }
    }

    /// Zero-parameter literal (a supplier or runnable body)
    pub fn supplier(body: impl Into<String>) -> Self {
        Self { params: SmallVec::new(), body: body.into() }
    }

    /// Parse `x -> body` / `(a, b) -> body` notation.
    pub fn parse(source: &str) -> Result<Self, LowerError> {
        let source = source.trim();
        let arrow = text::find_top_level(source, "->")
            .ok_or_else(|| LowerError::lambda(format!("no arrow in `{source}`")))?;
        let head = source[..arrow].trim();
        let body = source[arrow + 2..].trim();
        if body.is_empty() {
            return Err(LowerError::lambda("empty body"));
        }
        let mut params: SmallVec<[String; 2]> = SmallVec::new();
        let inner = if head.starts_with('(') && head.ends_with(')') {
            &head[1..head.len() - 1]
        } else {
            head
        };
        for part in inner.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            // drop an optional type annotation, keep the name
            let name = part.split_whitespace().last().unwrap_or(part);
            if !text::is_bare_ident(name) {
                return Err(LowerError::lambda(format!("parameter `{part}` is not a name")));
            }
            params.push(name.to_string());
        }
        Ok(Self { params, body: body.to_string() })
    }

    /// Number of parameters
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter name at `index`
    pub fn parameter_name(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Raw body text
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Substitute every parameter with the matching argument text.
    ///
    /// Aborts on an arity mismatch, and when an argument name is already
    /// bound by a nested function literal inside the body (substituting
    /// would capture it).
    pub fn transform(&self, args: &[&str]) -> Result<String, LowerError> {
        if args.len() != self.params.len() {
            return Err(LowerError::lambda(format!(
                "expected {} argument(s), got {}",
                self.params.len(),
                args.len()
            )));
        }
        let inner = text::lambda_param_names(&self.body);
        for arg in args {
            if inner.iter().any(|p| p == arg) {
                return Err(LowerError::lambda(format!(
                    "`{arg}` is shadowed by a nested function literal"
                )));
            }
        }
        let mut out = self.body.clone();
        for (param, arg) in self.params.iter().zip(args) {
            out = text::replace_ident(&out, param, arg);
        }
        Ok(out)
    }

    /// If the body is nothing but a bare reference to the sole parameter,
    /// the literal is a pure rename; return the parameter name.
    pub fn try_light_transform(&self) -> Option<&str> {
        if self.params.len() == 1 && self.body.trim() == self.params[0] {
            Some(&self.params[0])
        } else {
            None
        }
    }

    /// Name suggestions for a variable holding this literal's result.
    pub fn suggest_output_names(&self) -> SmallVec<[String; 2]> {
        let mut out: SmallVec<[String; 2]> = SmallVec::new();
        if let Some(name) = text::suggest_name_from_expr(&self.body) {
            if !self.params.iter().any(|p| *p == name) {
                out.push(name);
            }
        }
        out
    }

    /// Conservative syntactic purity: the body may only consist of
    /// identifiers, literals, member access and operators. Any call,
    /// allocation or assignment counts as a possible side effect.
    pub fn is_side_effect_free(&self) -> bool {
        let body = self.body.trim();
        let mut prev_ident = false;
        let mut literal: Option<char> = None;
        let mut escaped = false;
        let mut chars = body.chars().peekable();
        while let Some(ch) = chars.next() {
            if let Some(quote) = literal {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    literal = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => {
                    literal = Some(ch);
                    prev_ident = false;
                }
                '(' if prev_ident => return false, // a call
                '=' => {
                    // comparison is fine, assignment is not
                    let next = chars.peek().copied();
                    if next != Some('=') {
                        return false;
                    }
                    chars.next();
                    prev_ident = false;
                }
                '+' | '-' => {
                    if chars.peek() == Some(&ch) {
                        return false; // increment / decrement
                    }
                    prev_ident = false;
                }
                _ => {
                    if prev_ident && ch.is_whitespace() {
                        // `new Foo`, keyword followed by more code
                        let tail: String = chars.clone().collect();
                        if !tail.trim_start().is_empty()
                            && body.split_whitespace().any(|w| w == "new")
                        {
                            return false;
                        }
                    }
                    prev_ident = text::is_ident_continue(ch);
                }
            }
        }
        true
    }

    /// Substitute a captured variable reference inside the body (the
    /// parameters themselves are left alone).
    pub fn renamed(&self, old: &str, new: &str) -> Self {
        Self {
            params: self.params.clone(),
            body: text::replace_ident(&self.body, old, new),
        }
    }
}
