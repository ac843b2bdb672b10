//! foobc-drv - Compiler driver.
//!
//! Orchestrates the pipeline for one invocation: load and merge the
//! multi-file program, generate the C translation unit, write it to disk,
//! and hand it to the host C compiler. Each phase is narrated at `info`
//! level for `--verbose` runs.
//!
//! The host compiler is `cc` (overridable via the `CC` environment
//! variable), invoked with flags equivalent to
//! `cc -std=c99 <output>.c -lm -o <output>`.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

use foobc_util::Handler;

/// One compilation's configuration, as assembled by the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry `.foob` file.
    pub input: PathBuf,

    /// Output executable path; defaults to the input with its suffix
    /// stripped.
    pub output: Option<PathBuf>,

    /// Keep the intermediate C file after a successful build.
    pub keep_c: bool,

    /// Verbose phase narration.
    pub verbose: bool,
}

/// Paths produced by a successful compilation.
#[derive(Debug)]
pub struct Artifacts {
    /// The intermediate C file (deleted on success unless `keep_c`).
    pub c_file: PathBuf,

    /// The native executable.
    pub executable: PathBuf,
}

/// Driver-level failures.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Load(#[from] foobc_load::LoadError),

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot invoke C compiler '{cc}': {source}")]
    CompilerMissing {
        cc: String,
        #[source]
        source: std::io::Error,
    },

    #[error("C compiler exited with status {status}:\n{stderr}")]
    CompilerFailed { status: i32, stderr: String },
}

/// Resolves the output executable and intermediate C paths for a config.
pub fn output_paths(config: &Config) -> (PathBuf, PathBuf) {
    let executable = match &config.output {
        Some(path) => path.clone(),
        None => config.input.with_extension(""),
    };
    let mut c_file = executable.clone().into_os_string();
    c_file.push(".c");
    (executable, PathBuf::from(c_file))
}

/// Loads and merges the program rooted at `entry`, then generates its C
/// translation unit. No files are written.
pub fn generate_c(entry: &Path, handler: &Handler) -> Result<String, foobc_load::LoadError> {
    info!(entry = %entry.display(), "collecting imports");
    let program = foobc_load::load(entry, handler)?;

    info!(
        declarations = program.declarations.len(),
        "generating C code"
    );
    Ok(foobc_gen::generate(&program))
}

/// Runs the full pipeline: load, generate, write the C file, invoke the
/// host C compiler, and clean up the intermediate unless `keep_c`.
pub fn compile(config: &Config, handler: &Handler) -> Result<Artifacts, DriverError> {
    let (executable, c_file) = output_paths(config);

    info!(
        input = %config.input.display(),
        c_file = %c_file.display(),
        executable = %executable.display(),
        "compiling"
    );

    let c_code = generate_c(&config.input, handler)?;

    std::fs::write(&c_file, c_code).map_err(|source| DriverError::Io {
        path: c_file.clone(),
        source,
    })?;

    run_host_compiler(&c_file, &executable)?;

    if !config.keep_c {
        info!(c_file = %c_file.display(), "removing intermediate C file");
        // best effort: the executable is already in place
        let _ = std::fs::remove_file(&c_file);
    }

    Ok(Artifacts {
        c_file,
        executable,
    })
}

/// Invokes the host C compiler on the generated translation unit.
fn run_host_compiler(c_file: &Path, executable: &Path) -> Result<(), DriverError> {
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());

    info!(compiler = %cc, "invoking host C compiler");

    let output = Command::new(&cc)
        .arg("-std=c99")
        .arg(c_file)
        .arg("-lm")
        .arg("-o")
        .arg(executable)
        .output()
        .map_err(|source| DriverError::CompilerMissing { cc, source })?;

    if !output.status.success() {
        return Err(DriverError::CompilerFailed {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_strips_suffix() {
        let config = Config {
            input: PathBuf::from("/tmp/demo/program.foob"),
            output: None,
            keep_c: false,
            verbose: false,
        };
        let (executable, c_file) = output_paths(&config);
        assert_eq!(executable, PathBuf::from("/tmp/demo/program"));
        assert_eq!(c_file, PathBuf::from("/tmp/demo/program.c"));
    }

    #[test]
    fn test_explicit_output_is_used() {
        let config = Config {
            input: PathBuf::from("program.foob"),
            output: Some(PathBuf::from("myapp")),
            keep_c: true,
            verbose: false,
        };
        let (executable, c_file) = output_paths(&config);
        assert_eq!(executable, PathBuf::from("myapp"));
        assert_eq!(c_file, PathBuf::from("myapp.c"));
    }
}
