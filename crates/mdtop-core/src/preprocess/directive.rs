use phf::{Set, phf_set};

/// The directive keywords the preprocessor understands. Any other line whose
/// first token starts with `#` is an unknown directive.
static DIRECTIVE_KEYWORDS: Set<&'static str> = phf_set! {
    "#ifdef", "#ifndef", "#else", "#endif",
    "#define", "#undef",
    "#error", "#warning",
    "#include",
};

/// A classified preprocessor directive with its parsed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Ifdef(String),
    Ifndef(String),
    Else,
    Endif,
    Define { name: String, replacement: String },
    Undef(String),
    Error(String),
    Warning(String),
    /// `#include "path"` (searches the current file's directory first) or
    /// `#include <path>` (searches only the include directories).
    Include { path: String, angled: bool },
}

impl Directive {
    /// Whether this directive is echoed verbatim into the output stream when
    /// conditional handling is disabled. `#include` lines are never echoed.
    pub fn echoed_when_not_handling(&self) -> bool {
        !matches!(self, Directive::Include { .. })
    }
}

/// Classification failures, without source location; the caller attaches the
/// file and line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// First token starts with `#` but is not a recognized directive keyword.
    Unknown(String),
    /// Recognized keyword with a missing or unparsable argument.
    Malformed(String),
}

/// Strips an end-of-line `;` comment.
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Classifies one logical line. Comment text after `;` is ignored for
/// recognition. Returns `Ok(None)` for non-directive lines (including pure
/// comment lines and blank lines).
pub fn classify(line: &str) -> Result<Option<Directive>, ClassifyError> {
    let code = strip_comment(line).trim();
    let mut tokens = code.split_whitespace();
    let keyword = match tokens.next() {
        Some(t) if t.starts_with('#') => t,
        _ => return Ok(None),
    };
    if !DIRECTIVE_KEYWORDS.contains(keyword) {
        return Err(ClassifyError::Unknown(keyword.to_string()));
    }

    // The line is trimmed, so everything after the keyword is the argument.
    let arg = code[keyword.len()..].trim_start();

    let directive = match keyword {
        "#ifdef" => Directive::Ifdef(required_name(code, tokens.next())?),
        "#ifndef" => Directive::Ifndef(required_name(code, tokens.next())?),
        "#else" => Directive::Else,
        "#endif" => Directive::Endif,
        "#define" => {
            let name = required_name(code, tokens.next())?;
            let replacement = arg[name.len()..].trim().to_string();
            Directive::Define { name, replacement }
        }
        "#undef" => Directive::Undef(required_name(code, tokens.next())?),
        "#error" => Directive::Error(arg.trim_end().to_string()),
        "#warning" => Directive::Warning(arg.trim_end().to_string()),
        "#include" => parse_include(code)?,
        _ => unreachable!("keyword set and match arms out of sync"),
    };
    Ok(Some(directive))
}

fn required_name(code: &str, token: Option<&str>) -> Result<String, ClassifyError> {
    token
        .map(str::to_string)
        .ok_or_else(|| ClassifyError::Malformed(code.to_string()))
}

fn parse_include(code: &str) -> Result<Directive, ClassifyError> {
    let arg = code["#include".len()..].trim();
    let (open, close, angled) = match arg.chars().next() {
        Some('"') => ('"', '"', false),
        Some('<') => ('<', '>', true),
        _ => return Err(ClassifyError::Malformed(code.to_string())),
    };
    let inner = &arg[open.len_utf8()..];
    let end = inner
        .find(close)
        .ok_or_else(|| ClassifyError::Malformed(code.to_string()))?;
    if end == 0 {
        return Err(ClassifyError::Malformed(code.to_string()));
    }
    Ok(Directive::Include {
        path: inner[..end].to_string(),
        angled,
    })
}
