/// One active `#ifdef`/`#ifndef` scope.
///
/// `expected` is `true` for `#ifdef` and `false` for `#ifndef`; `#else` flips
/// it. Whether the frame is satisfied is evaluated dynamically against the
/// current macro list, since a `#define` encountered after the frame was
/// opened still counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConditionalFrame {
    pub name: String,
    pub expected: bool,
}

/// Mutable preprocessor state threaded through recursive `#include` expansion.
///
/// Holds the ordered macro list (insertion order determines substitution
/// priority) and the stack of open conditional frames. One instance is shared
/// across all files of a single parse invocation, so conditionals and macro
/// definitions cross include boundaries.
#[derive(Debug, Clone, Default)]
pub struct PreprocessorState {
    defines: Vec<(String, String)>,
    frames: Vec<ConditionalFrame>,
}

impl PreprocessorState {
    pub fn new(defines: Vec<(String, String)>) -> Self {
        Self {
            defines,
            frames: Vec::new(),
        }
    }

    /// Whether a macro with the given name is currently defined.
    pub fn defined(&self, name: &str) -> bool {
        self.defines.iter().any(|(n, _)| n == name)
    }

    /// Appends a macro definition. Redefinition appends a second entry; the
    /// earlier one keeps substitution priority.
    pub fn define(&mut self, name: String, replacement: String) {
        self.defines.push((name, replacement));
    }

    /// Removes every macro entry with the given name.
    pub fn undefine(&mut self, name: &str) {
        self.defines.retain(|(n, _)| n != name);
    }

    pub(crate) fn push_frame(&mut self, name: String, expected: bool) {
        self.frames.push(ConditionalFrame { name, expected });
    }

    /// Flips the satisfied sense of the innermost frame (`#else`). Returns
    /// `false` if no frame is open.
    pub(crate) fn flip_innermost(&mut self) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.expected = !frame.expected;
                true
            }
            None => false,
        }
    }

    /// Pops the innermost frame (`#endif`). Returns `false` if no frame is
    /// open.
    pub(crate) fn pop_frame(&mut self) -> bool {
        self.frames.pop().is_some()
    }

    /// The number of currently open conditional frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether all currently open conditional frames are satisfied, i.e.
    /// whether reading (and macro/include handling) is enabled at this point.
    pub fn allows_reading(&self) -> bool {
        self.frames
            .iter()
            .all(|frame| self.defined(&frame.name) == frame.expected)
    }

    /// Substitutes every defined macro occurring as a literal substring of
    /// `line`, in macro-list order. Each macro is applied in a single pass
    /// over the line; a macro's own replacement text is not re-expanded by
    /// itself, but later macros in the list do see the already-substituted
    /// text.
    pub fn substitute(&self, line: &str) -> String {
        let mut out = line.to_string();
        for (name, replacement) in &self.defines {
            out = out.replace(name.as_str(), replacement);
        }
        out
    }
}
