use crate::cli::PreprocessArgs;
use crate::error::{CliError, Result};
use mdtop::preprocess::{PreprocessOptions, Preprocessor};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: PreprocessArgs) -> Result<()> {
    if is_same_file(&args.input, &args.output) {
        return Err(CliError::Argument(
            "input and output topology must not be the same file".to_string(),
        ));
    }

    let options = PreprocessOptions {
        include_dirs: args.include_dirs.clone(),
        defines: args.defines.iter().map(|d| split_define(d)).collect(),
        handle_conditionals: !args.no_conditionals,
        substitute_macros: !args.no_substitute,
    };

    let mut preprocessor = Preprocessor::with_options(&args.input, options)?;
    let mut writer = BufWriter::new(File::create(&args.output)?);
    let mut emitted = 0usize;
    for line in preprocessor.by_ref() {
        writeln!(writer, "{}", line?.text)?;
        emitted += 1;
    }
    writer.flush()?;

    for warning in preprocessor.warnings() {
        warn!(
            "{}:{}: {}",
            warning.file.display(),
            warning.line,
            warning.message
        );
    }
    info!(
        "Wrote {} lines to '{}'.",
        emitted,
        args.output.display()
    );
    Ok(())
}

/// Splits a `-D` argument into a macro name and replacement. A bare name
/// defines the macro with an empty replacement.
fn split_define(arg: &str) -> (String, String) {
    match arg.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (arg.to_string(), String::new()),
    }
}

/// Whether the two paths refer to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(input: PathBuf, output: PathBuf) -> PreprocessArgs {
        PreprocessArgs {
            input,
            output,
            defines: Vec::new(),
            include_dirs: Vec::new(),
            no_substitute: false,
            no_conditionals: false,
        }
    }

    #[test]
    fn split_define_handles_bare_names_and_values() {
        assert_eq!(split_define("FLEXIBLE"), ("FLEXIBLE".into(), String::new()));
        assert_eq!(
            split_define("POSRES_FC=1000"),
            ("POSRES_FC".into(), "1000".into())
        );
        assert_eq!(split_define("A=b=c"), ("A".into(), "b=c".into()));
    }

    #[test]
    fn refuses_identical_input_and_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topol.top");
        fs::write(&path, "x\n").unwrap();
        let result = run(args(path.clone(), path));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn expands_conditionals_and_defines_into_the_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.top");
        let output = dir.path().join("out.top");
        fs::write(
            &input,
            "#define FC 1000\n\
             #ifdef FC\n\
             posre FC\n\
             #endif\n",
        )
        .unwrap();
        run(args(input, output.clone())).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "posre 1000\n");
    }

    #[test]
    fn cli_defines_gate_conditional_blocks() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.top");
        let output = dir.path().join("out.top");
        fs::write(&input, "#ifdef POSRES\nrestrained\n#else\nfree\n#endif\n").unwrap();

        let mut with_define = args(input.clone(), output.clone());
        with_define.defines = vec!["POSRES".to_string()];
        run(with_define).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "restrained\n");

        run(args(input, output.clone())).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "free\n");
    }

    #[test]
    fn no_conditionals_echoes_directives() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.top");
        let output = dir.path().join("out.top");
        fs::write(&input, "#ifdef POSRES\nrestrained\n#endif\n").unwrap();
        let mut echoed = args(input, output.clone());
        echoed.no_conditionals = true;
        run(echoed).unwrap();
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "#ifdef POSRES\nrestrained\n#endif\n"
        );
    }
}
