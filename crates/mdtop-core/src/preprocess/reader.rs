use super::directive::{ClassifyError, Directive, classify};
use super::state::PreprocessorState;
use super::{PreprocessError, PreprocessWarning};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One logical output line, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The line text, without the line terminator. Continuation lines are
    /// already joined and, where enabled, macros are substituted.
    pub text: String,
    /// The file this line originated from (the included file for lines coming
    /// from an `#include`).
    pub file: PathBuf,
    /// 1-based line number within `file`. Joined continuation lines carry the
    /// number of their first physical line.
    pub line: usize,
}

/// Configuration for a [`Preprocessor`] run.
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Directories searched by `#include`, in order. The quoted form
    /// additionally searches the directory of the including file first.
    pub include_dirs: Vec<PathBuf>,
    /// Macros defined before the first line is read, as `(name, replacement)`
    /// pairs in substitution-priority order.
    pub defines: Vec<(String, String)>,
    /// When off, conditional state is still tracked but nothing is suppressed:
    /// directive lines (except `#include`) are echoed verbatim and every
    /// `#include` is followed unconditionally.
    pub handle_conditionals: bool,
    /// When off, emitted lines are not macro-substituted.
    pub substitute_macros: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            include_dirs: Vec::new(),
            defines: Vec::new(),
            handle_conditionals: true,
            substitute_macros: true,
        }
    }
}

/// One open file on the inclusion path.
struct FileFrame {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    /// Canonicalized path, used for include-cycle detection.
    canonical: PathBuf,
    lineno: usize,
}

impl FileFrame {
    fn open(path: PathBuf) -> Result<Self, PreprocessError> {
        let file = File::open(&path).map_err(|source| PreprocessError::Io {
            path: path.clone(),
            source,
        })?;
        let canonical = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path,
            canonical,
            lineno: 0,
        })
    }

    /// Reads the next logical line, joining physical lines that end with a
    /// backslash. Returns the line and the number of its first physical line,
    /// or `None` at end of file. An unterminated continuation at end of file
    /// yields the accumulated text as-is.
    fn next_logical_line(&mut self) -> Result<Option<(String, usize)>, PreprocessError> {
        let mut pending: Option<(String, usize)> = None;
        loop {
            let Some(result) = self.lines.next() else {
                return Ok(pending);
            };
            self.lineno += 1;
            let physical = result.map_err(|source| PreprocessError::Io {
                path: self.path.clone(),
                source,
            })?;
            let (text, start) = match pending.take() {
                None => (physical, self.lineno),
                Some((prefix, start)) => (format!("{} {}", prefix, physical), start),
            };
            match text.trim_end().strip_suffix('\\') {
                Some(head) => pending = Some((head.trim_end().to_string(), start)),
                None => return Ok(Some((text, start))),
            }
        }
    }
}

/// Line-oriented C-style preprocessor over a tree of included files.
///
/// Created with [`Preprocessor::open`] or [`Preprocessor::with_options`] and
/// consumed as an `Iterator` of `Result<SourceLine, PreprocessError>`. The
/// first error is fatal: it is yielded once and the iterator is exhausted
/// afterwards.
pub struct Preprocessor {
    include_dirs: Vec<PathBuf>,
    handle_conditionals: bool,
    substitute_macros: bool,
    state: PreprocessorState,
    frames: Vec<FileFrame>,
    warnings: Vec<PreprocessWarning>,
    /// Position of the most recently read line, for end-of-input diagnostics.
    last_position: (PathBuf, usize),
    done: bool,
}

impl Preprocessor {
    /// Opens `path` with default options (conditional handling and macro
    /// substitution enabled, no include directories, no predefined macros).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreprocessError> {
        Self::with_options(path, PreprocessOptions::default())
    }

    pub fn with_options(
        path: impl AsRef<Path>,
        options: PreprocessOptions,
    ) -> Result<Self, PreprocessError> {
        let path = path.as_ref().to_path_buf();
        let root = FileFrame::open(path.clone())?;
        Ok(Self {
            include_dirs: options.include_dirs,
            handle_conditionals: options.handle_conditionals,
            substitute_macros: options.substitute_macros,
            state: PreprocessorState::new(options.defines),
            frames: vec![root],
            warnings: Vec::new(),
            last_position: (path, 0),
            done: false,
        })
    }

    /// Whether a macro with the given name is currently defined.
    pub fn defined(&self, name: &str) -> bool {
        self.state.defined(name)
    }

    /// The `#warning` diagnostics collected so far.
    pub fn warnings(&self) -> &[PreprocessWarning] {
        &self.warnings
    }

    fn advance(&mut self) -> Result<Option<SourceLine>, PreprocessError> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                if self.state.depth() > 0 {
                    let (file, line) = self.last_position.clone();
                    return Err(PreprocessError::MalformedConditional {
                        file,
                        line,
                        reason: format!(
                            "{} conditional frame(s) left open at end of input",
                            self.state.depth()
                        ),
                    });
                }
                return Ok(None);
            };

            let Some((raw, lineno)) = frame.next_logical_line()? else {
                // File exhausted: close it and resume the including file.
                if let Some(popped) = self.frames.pop() {
                    self.last_position = (popped.path, popped.lineno);
                }
                continue;
            };
            let file = frame.path.clone();
            self.last_position = (file.clone(), lineno);

            if raw.trim().is_empty() {
                if self.state.allows_reading() || !self.handle_conditionals {
                    return Ok(Some(SourceLine {
                        text: raw,
                        file,
                        line: lineno,
                    }));
                }
                continue;
            }

            let directive = classify(&raw).map_err(|err| match err {
                ClassifyError::Unknown(directive) => PreprocessError::UnknownDirective {
                    directive,
                    file: file.clone(),
                    line: lineno,
                },
                ClassifyError::Malformed(text) => PreprocessError::MalformedDirective {
                    file: file.clone(),
                    line: lineno,
                    text,
                },
            })?;

            match directive {
                None => {
                    if self.state.allows_reading() || !self.handle_conditionals {
                        let text = if self.substitute_macros {
                            self.state.substitute(&raw)
                        } else {
                            raw
                        };
                        return Ok(Some(SourceLine {
                            text,
                            file,
                            line: lineno,
                        }));
                    }
                }
                Some(directive) => {
                    self.handle_directive(&directive, &file, lineno)?;
                    if !self.handle_conditionals && directive.echoed_when_not_handling() {
                        return Ok(Some(SourceLine {
                            text: raw,
                            file,
                            line: lineno,
                        }));
                    }
                }
            }
        }
    }

    fn handle_directive(
        &mut self,
        directive: &Directive,
        file: &Path,
        lineno: usize,
    ) -> Result<(), PreprocessError> {
        match directive {
            Directive::Ifdef(name) => self.state.push_frame(name.clone(), true),
            Directive::Ifndef(name) => self.state.push_frame(name.clone(), false),
            Directive::Else => {
                if !self.state.flip_innermost() {
                    return Err(PreprocessError::MalformedConditional {
                        file: file.to_path_buf(),
                        line: lineno,
                        reason: "#else without a matching #ifdef/#ifndef".to_string(),
                    });
                }
            }
            Directive::Endif => {
                if !self.state.pop_frame() {
                    return Err(PreprocessError::MalformedConditional {
                        file: file.to_path_buf(),
                        line: lineno,
                        reason: "#endif without a matching #ifdef/#ifndef".to_string(),
                    });
                }
            }
            Directive::Define { name, replacement } => {
                if self.state.allows_reading() {
                    self.state.define(name.clone(), replacement.clone());
                }
            }
            Directive::Undef(name) => {
                if self.state.allows_reading() {
                    self.state.undefine(name);
                }
            }
            Directive::Error(message) => {
                if self.state.allows_reading() {
                    return Err(PreprocessError::Directive {
                        message: message.clone(),
                        file: file.to_path_buf(),
                        line: lineno,
                    });
                }
            }
            Directive::Warning(message) => {
                if self.state.allows_reading() {
                    warn!(
                        file = %file.display(),
                        line = lineno,
                        "#warning directive: {}",
                        message
                    );
                    self.warnings.push(PreprocessWarning {
                        message: message.clone(),
                        file: file.to_path_buf(),
                        line: lineno,
                    });
                }
            }
            Directive::Include { path, angled } => {
                if self.state.allows_reading() || !self.handle_conditionals {
                    self.push_include(path, *angled, file)?;
                }
            }
        }
        Ok(())
    }

    /// Resolves an `#include` argument and pushes the file onto the inclusion
    /// stack. The quoted form searches the directory of the including file
    /// before the configured include directories; the angled form does not.
    fn push_include(
        &mut self,
        name: &str,
        angled: bool,
        including_file: &Path,
    ) -> Result<(), PreprocessError> {
        let mut searched: Vec<PathBuf> = Vec::new();
        if !angled {
            searched.push(including_file.parent().unwrap_or(Path::new("")).to_path_buf());
        }
        searched.extend(self.include_dirs.iter().cloned());

        let candidate = searched
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| PreprocessError::IncludeNotFound {
                name: name.to_string(),
                searched,
            })?;

        let canonical = std::fs::canonicalize(&candidate).unwrap_or_else(|_| candidate.clone());
        if self.frames.iter().any(|frame| frame.canonical == canonical) {
            return Err(PreprocessError::IncludeCycle { path: candidate });
        }
        self.frames.push(FileFrame::open(candidate)?);
        Ok(())
    }
}

impl Iterator for Preprocessor {
    type Item = Result<SourceLine, PreprocessError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn collect_texts(pp: Preprocessor) -> Vec<String> {
        pp.map(|r| r.unwrap().text).collect()
    }

    #[test]
    fn satisfied_ifdef_emits_substituted_body() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "a.top", "#ifdef FLEX\nVALUE FLEX\n#endif\n");
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                defines: vec![("FLEX".into(), "1".into())],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(collect_texts(pp), vec!["VALUE 1"]);
    }

    #[test]
    fn unsatisfied_ifdef_takes_else_branch() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "a.top",
            "#ifdef MISSING\nVALUE 1\n#else\nVALUE 2\n#endif\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["VALUE 2"]);
    }

    #[test]
    fn ifndef_is_satisfied_when_name_is_undefined() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "a.top", "#ifndef MISSING\nkept\n#endif\n");
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["kept"]);
    }

    #[test]
    fn define_inside_disabled_block_is_ignored() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "a.top",
            "#ifdef MISSING\n#define FLEX 1\n#endif\nFLEX\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        // FLEX was never defined, so the bare word passes through untouched.
        assert_eq!(collect_texts(pp), vec!["FLEX"]);
    }

    #[test]
    fn undef_removes_a_macro_mid_stream() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "a.top",
            "#define W water\nW\n#undef W\nW\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["water", "W"]);
    }

    #[test]
    fn later_define_satisfies_an_already_open_frame() {
        // Frame satisfaction is evaluated against the current macro list, not
        // the list at the time the frame was opened.
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "a.top",
            "#ifdef LATE\nbefore\n#endif\n#define LATE\n#ifdef LATE\nafter\n#endif\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["after"]);
    }

    #[test]
    fn blank_lines_respect_conditional_gating() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "a.top",
            "\n#ifdef MISSING\n\n#endif\n\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["", ""]);
    }

    #[test]
    fn continuation_lines_are_joined_with_a_space() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "a.top", "alpha \\\nbeta \\\ngamma\ndelta\n");
        let pp = Preprocessor::open(&root).unwrap();
        let lines: Vec<SourceLine> = pp.map(|r| r.unwrap()).collect();
        assert_eq!(lines[0].text, "alpha beta gamma");
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].text, "delta");
        assert_eq!(lines[1].line, 4);
    }

    #[test]
    fn quoted_include_resolves_relative_to_the_including_file() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("ff");
        fs::create_dir(&sub).unwrap();
        write(&sub, "bonded.itp", "from-bonded\n");
        let root = write(&sub, "main.top", "#include \"bonded.itp\"\ntail\n");
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["from-bonded", "tail"]);
    }

    #[test]
    fn angled_include_skips_the_current_directory() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("local");
        let system = dir.path().join("system");
        fs::create_dir(&local).unwrap();
        fs::create_dir(&system).unwrap();
        write(&local, "x.itp", "local copy\n");
        write(&system, "x.itp", "system copy\n");
        let root = write(&local, "main.top", "#include <x.itp>\n");
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                include_dirs: vec![system],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(collect_texts(pp), vec!["system copy"]);
    }

    #[test]
    fn included_lines_carry_their_own_file_and_line_numbers() {
        let dir = tempdir().unwrap();
        let inc = write(dir.path(), "inc.itp", "one\ntwo\n");
        let root = write(dir.path(), "main.top", "head\n#include \"inc.itp\"\ntail\n");
        let pp = Preprocessor::open(&root).unwrap();
        let lines: Vec<SourceLine> = pp.map(|r| r.unwrap()).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!((lines[0].text.as_str(), lines[0].line), ("head", 1));
        assert_eq!(lines[1].file, inc);
        assert_eq!((lines[1].text.as_str(), lines[1].line), ("one", 1));
        assert_eq!((lines[2].text.as_str(), lines[2].line), ("two", 2));
        assert_eq!(lines[3].file, root);
        assert_eq!((lines[3].text.as_str(), lines[3].line), ("tail", 3));
    }

    #[test]
    fn macros_defined_in_an_include_survive_the_return() {
        let dir = tempdir().unwrap();
        write(dir.path(), "defs.itp", "#define SOLVENT tip3p\n");
        let root = write(dir.path(), "main.top", "#include \"defs.itp\"\nSOLVENT\n");
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["tip3p"]);
    }

    #[test]
    fn conditional_opened_in_includer_may_close_in_includee() {
        let dir = tempdir().unwrap();
        write(dir.path(), "closer.itp", "inner\n#endif\n");
        let root = write(
            dir.path(),
            "main.top",
            "#ifndef MISSING\n#include \"closer.itp\"\nouter\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["inner", "outer"]);
    }

    #[test]
    fn include_inside_disabled_block_is_not_followed() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#ifdef MISSING\n#include \"does-not-exist.itp\"\n#endif\nok\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["ok"]);
    }

    #[test]
    fn missing_include_reports_name_and_searched_directories() {
        let dir = tempdir().unwrap();
        let extra = dir.path().join("extra");
        fs::create_dir(&extra).unwrap();
        let root = write(dir.path(), "main.top", "#include \"nope.itp\"\n");
        let mut pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                include_dirs: vec![extra.clone()],
                ..Default::default()
            },
        )
        .unwrap();
        match pp.next() {
            Some(Err(PreprocessError::IncludeNotFound { name, searched })) => {
                assert_eq!(name, "nope.itp");
                assert_eq!(searched, vec![dir.path().to_path_buf(), extra]);
            }
            other => panic!("expected IncludeNotFound, got {:?}", other.map(|r| r.map(|l| l.text))),
        }
        assert!(pp.next().is_none(), "iterator must fuse after an error");
    }

    #[test]
    fn self_include_is_detected_as_a_cycle() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "loop.itp", "#include \"loop.itp\"\n");
        let mut pp = Preprocessor::open(&root).unwrap();
        assert!(matches!(
            pp.next(),
            Some(Err(PreprocessError::IncludeCycle { .. }))
        ));
    }

    #[test]
    fn mutual_includes_are_detected_as_a_cycle() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.itp", "#include \"b.itp\"\n");
        write(dir.path(), "b.itp", "#include \"a.itp\"\n");
        let pp = Preprocessor::open(dir.path().join("a.itp")).unwrap();
        let result: Result<Vec<_>, _> = pp.collect();
        assert!(matches!(
            result,
            Err(PreprocessError::IncludeCycle { .. })
        ));
    }

    #[test]
    fn error_directive_is_fatal_inside_an_enabled_block() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#error no water model selected\n",
        );
        let mut pp = Preprocessor::open(&root).unwrap();
        match pp.next() {
            Some(Err(PreprocessError::Directive { message, line, .. })) => {
                assert_eq!(message, "no water model selected");
                assert_eq!(line, 1);
            }
            other => panic!("expected Directive error, got {:?}", other.map(|r| r.map(|l| l.text))),
        }
    }

    #[test]
    fn error_directive_is_ignored_inside_a_disabled_block() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#ifdef MISSING\n#error unreachable\n#endif\nok\n",
        );
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(collect_texts(pp), vec!["ok"]);
    }

    #[test]
    fn warning_directive_is_collected_and_non_fatal() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#warning deprecated parameters\nbody\n",
        );
        let mut pp = Preprocessor::open(&root).unwrap();
        let lines: Vec<String> = pp.by_ref().map(|r| r.unwrap().text).collect();
        assert_eq!(lines, vec!["body"]);
        assert_eq!(pp.warnings().len(), 1);
        assert_eq!(pp.warnings()[0].message, "deprecated parameters");
        assert_eq!(pp.warnings()[0].line, 1);
    }

    #[test]
    fn unknown_directive_is_fatal() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "#pragma pack\n");
        let mut pp = Preprocessor::open(&root).unwrap();
        assert!(matches!(
            pp.next(),
            Some(Err(PreprocessError::UnknownDirective { directive, .. })) if directive == "#pragma"
        ));
    }

    #[test]
    fn unbalanced_endif_is_malformed() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "#endif\n");
        let mut pp = Preprocessor::open(&root).unwrap();
        assert!(matches!(
            pp.next(),
            Some(Err(PreprocessError::MalformedConditional { line: 1, .. }))
        ));
    }

    #[test]
    fn unbalanced_else_is_malformed() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "#else\n");
        let mut pp = Preprocessor::open(&root).unwrap();
        assert!(matches!(
            pp.next(),
            Some(Err(PreprocessError::MalformedConditional { .. }))
        ));
    }

    #[test]
    fn unclosed_conditional_at_end_of_input_is_malformed() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "#ifdef POSRES\nbody\n");
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                defines: vec![("POSRES".into(), String::new())],
                ..Default::default()
            },
        )
        .unwrap();
        let result: Result<Vec<_>, _> = pp.collect();
        assert!(matches!(
            result,
            Err(PreprocessError::MalformedConditional { .. })
        ));
    }

    #[test]
    fn disabled_conditional_handling_echoes_directives_and_gated_lines() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#ifdef MISSING\nhidden\n#else\nshown\n#endif\n",
        );
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                handle_conditionals: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            collect_texts(pp),
            vec!["#ifdef MISSING", "hidden", "#else", "shown", "#endif"]
        );
    }

    #[test]
    fn disabled_conditional_handling_still_gates_defines() {
        // Macro definitions obey conditionals even when conditional handling
        // is switched off for line emission.
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#ifdef MISSING\n#define FLEX 1\n#endif\nFLEX\n",
        );
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                handle_conditionals: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            collect_texts(pp),
            vec!["#ifdef MISSING", "#define FLEX 1", "#endif", "FLEX"]
        );
    }

    #[test]
    fn include_lines_are_never_echoed() {
        let dir = tempdir().unwrap();
        write(dir.path(), "inc.itp", "included\n");
        let root = write(dir.path(), "main.top", "#include \"inc.itp\"\n");
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                handle_conditionals: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(collect_texts(pp), vec!["included"]);
    }

    #[test]
    fn substitution_can_be_disabled() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "#define FLEX 1\nVALUE FLEX\n");
        let pp = Preprocessor::with_options(
            &root,
            PreprocessOptions {
                substitute_macros: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(collect_texts(pp), vec!["VALUE FLEX"]);
    }

    #[test]
    fn preprocessing_its_own_output_is_a_no_op() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.top",
            "#define FLEX 1\n#ifdef FLEX\nVALUE FLEX\n#else\nVALUE 0\n#endif\nplain\n",
        );
        let first: Vec<String> = collect_texts(Preprocessor::open(&root).unwrap());
        let rerun_input = write(dir.path(), "rerun.top", &(first.join("\n") + "\n"));
        let second = collect_texts(
            Preprocessor::with_options(
                &rerun_input,
                PreprocessOptions {
                    handle_conditionals: false,
                    substitute_macros: false,
                    ..Default::default()
                },
            )
            .unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn comment_only_lines_pass_through_as_content() {
        let dir = tempdir().unwrap();
        let root = write(dir.path(), "main.top", "; header comment\nbody ; trailing\n");
        let pp = Preprocessor::open(&root).unwrap();
        assert_eq!(
            collect_texts(pp),
            vec!["; header comment", "body ; trailing"]
        );
    }
}
