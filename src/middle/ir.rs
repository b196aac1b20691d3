//! Instruction IR and ingestion
//!
//! Statement-level nodes used only during simplification. The generator's
//! raw statement text is re-read into this tree by structural shape;
//! anything that does not classify becomes an opaque `Statement` leaf —
//! ingestion never aborts.
//!
//! `Assignment`/`Declaration` carry the owning chain-variable identity
//! when one resolves, so the simplifier matches bindings by identity, not
//! by name.

use crate::frontend::variable::{VarArena, VarId};
use crate::util::text;

/// One statement-level node
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// A bare brace block, flattened into its statements at render time
    Block(Vec<Instruction>),
    /// Opaque statement text (trailing `;` included)
    Statement(String),
    Assignment {
        var: Option<VarId>,
        name: String,
        rhs: String,
    },
    Declaration {
        var: Option<VarId>,
        ty: String,
        name: String,
        rhs: Option<String>,
    },
    /// Conditional; only the else-less form is restructured by the
    /// simplifier
    Check {
        cond: String,
        then: Vec<Instruction>,
        els: Option<Vec<Instruction>>,
    },
    Return(String),
    Throw(String),
}

impl Instruction {
    /// Does control leave the enclosing function here?
    pub fn is_exit(&self) -> bool {
        matches!(self, Instruction::Return(_) | Instruction::Throw(_))
    }
}

/// Is the condition text statically true?
pub fn is_always_true(cond: &str) -> bool {
    text::strip_outer_parens(cond) == "true"
}

/// Is the condition text statically false?
pub fn is_always_false(cond: &str) -> bool {
    text::strip_outer_parens(cond) == "false"
}

/// Re-read raw statement text into instructions.
pub fn ingest_block(source: &str, arena: &VarArena) -> Vec<Instruction> {
    Cursor::new(source, arena).parse_statements()
}

struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    arena: &'a VarArena,
}

impl<'a> Cursor<'a> {
    fn new(source: &str, arena: &'a VarArena) -> Self {
        Self { chars: source.chars().collect(), pos: 0, arena }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn starts_with_word(&self, word: &str) -> bool {
        let end = self.pos + word.len();
        if end > self.chars.len() {
            return false;
        }
        if !self.chars[self.pos..end].iter().copied().eq(word.chars()) {
            return false;
        }
        !self.chars.get(end).copied().is_some_and(text::is_ident_continue)
    }

    fn parse_statements(&mut self) -> Vec<Instruction> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() {
                break;
            }
            out.push(self.parse_statement());
        }
        out
    }

    fn parse_statement(&mut self) -> Instruction {
        self.skip_ws();
        if self.starts_with_word("if") {
            return self.parse_check();
        }
        if self.peek() == Some('{') {
            let inner = self.take_balanced('{', '}');
            return Instruction::Block(ingest_block(&inner, self.arena));
        }
        if self.starts_with_word("return") {
            self.pos += "return".len();
            let expr = self.take_until_semicolon();
            return Instruction::Return(strip_semicolon(&expr));
        }
        if self.starts_with_word("throw") {
            self.pos += "throw".len();
            let expr = self.take_until_semicolon();
            return Instruction::Throw(strip_semicolon(&expr));
        }
        let raw = self.take_until_semicolon();
        self.classify_simple(&raw)
    }

    fn parse_check(&mut self) -> Instruction {
        self.pos += "if".len();
        self.skip_ws();
        let cond = if self.peek() == Some('(') {
            self.take_balanced('(', ')')
        } else {
            // malformed; swallow the rest as the condition
            self.take_until_semicolon()
        };
        let then = self.parse_body();
        self.skip_ws();
        let els = if self.starts_with_word("else") {
            self.pos += "else".len();
            Some(self.parse_body())
        } else {
            None
        };
        Instruction::Check { cond: cond.trim().to_string(), then, els }
    }

    fn parse_body(&mut self) -> Vec<Instruction> {
        self.skip_ws();
        if self.peek() == Some('{') {
            let inner = self.take_balanced('{', '}');
            ingest_block(&inner, self.arena)
        } else if self.at_end() {
            Vec::new()
        } else {
            vec![self.parse_statement()]
        }
    }

    /// Consume a balanced `open`..`close` group, returning the inside.
    fn take_balanced(&mut self, open: char, close: char) -> String {
        debug_assert_eq!(self.peek(), Some(open));
        self.pos += 1;
        let start = self.pos;
        let mut depth = 1;
        let mut literal: Option<char> = None;
        let mut escaped = false;
        while let Some(ch) = self.peek() {
            self.pos += 1;
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
                '"' | '\'' => literal = Some(ch),
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return self.chars[start..self.pos - 1].iter().collect();
                    }
                }
                _ => {}
            }
        }
        self.chars[start..].iter().collect()
    }

    /// Consume up to and including the next top-level `;`.
    fn take_until_semicolon(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0i32;
        let mut literal: Option<char> = None;
        let mut escaped = false;
        while let Some(ch) = self.peek() {
            self.pos += 1;
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
                '"' | '\'' => literal = Some(ch),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ';' if depth == 0 => break,
                _ => {}
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Classify a flat statement: declaration, assignment, or opaque.
    fn classify_simple(&self, raw: &str) -> Instruction {
        let stmt = raw.trim();
        let core = stmt.strip_suffix(';').unwrap_or(stmt).trim();
        if let Some(eq) = text::find_assign_op(core) {
            let lhs = core[..eq].trim();
            let rhs = core[eq + 1..].trim().to_string();
            if text::is_bare_ident(lhs) {
                if let Some(var) = self.arena.find_by_name(lhs) {
                    return Instruction::Assignment {
                        var: Some(var),
                        name: lhs.to_string(),
                        rhs,
                    };
                }
                // no owning variable: keep the statement opaque
                return Instruction::Statement(stmt.to_string());
            }
            if let Some((ty, name)) = split_declaration_head(lhs) {
                if let Some(var) = self.arena.find_by_name(&name) {
                    return Instruction::Declaration { var: Some(var), ty, name, rhs: Some(rhs) };
                }
            }
            return Instruction::Statement(stmt.to_string());
        }
        if !core.contains('(') {
            if let Some((ty, name)) = split_declaration_head(core) {
                if let Some(var) = self.arena.find_by_name(&name) {
                    return Instruction::Declaration { var: Some(var), ty, name, rhs: None };
                }
            }
        }
        Instruction::Statement(stmt.to_string())
    }
}

/// Split `Type name` into its parts, if that is what the text is.
fn split_declaration_head(lhs: &str) -> Option<(String, String)> {
    let mut tokens: Vec<&str> = lhs.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let name = tokens.pop()?;
    if !text::is_bare_ident(name) {
        return None;
    }
    let ty = tokens.join(" ");
    let type_like = ty.chars().all(|c| {
        text::is_ident_continue(c) || matches!(c, '<' | '>' | '[' | ']' | ',' | '.' | '?' | ' ')
    });
    type_like.then(|| (ty, name.to_string()))
}

fn strip_semicolon(s: &str) -> String {
    s.trim().strip_suffix(';').unwrap_or(s.trim()).trim().to_string()
}
