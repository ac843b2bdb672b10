//! foobc-load - Multi-file program loader.
//!
//! Given an entry-file path, transitively parses every imported file,
//! verifies the import graph is acyclic, and merges everything into a
//! single [`Program`] whose `Main` is the entry file's `Main`.
//!
//! Ordering is load-bearing: the entry file's declarations come first, the
//! remaining files follow in the order they were first parsed off the
//! work-list. That order fixes the order of forward declarations and
//! definitions in the emitted C, keeping output reproducible.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use foobc_par::{Declaration, Program};
use foobc_util::Handler;

/// Errors raised while loading and merging a multi-file program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A source file could not be read.
    #[error("cannot read file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `import` target does not exist on disk.
    #[error(
        "cannot find imported file: '{import}'\n  referenced in: {}\n  searched for: {}",
        .referrer.display(),
        .resolved.display()
    )]
    MissingImport {
        import: String,
        referrer: PathBuf,
        resolved: PathBuf,
    },

    /// The import graph contains a cycle; the full path is reported.
    #[error("circular import detected:\n  -> {}", fmt_cycle(.cycle))]
    CircularImport { cycle: Vec<PathBuf> },

    /// Two files declare the same class, enumeration, or function name.
    #[error(
        "duplicate {kind} definition: '{name}'\n  first defined in: {}\n  also defined in: {}",
        .first.display(),
        .second.display()
    )]
    Duplicate {
        kind: &'static str,
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The entry file defines no `Main()`.
    #[error("no Main() function found in {}", .0.display())]
    NoMain(PathBuf),

    /// A file failed to lex or parse; details are in the [`Handler`].
    #[error("{}: {count} syntax error(s)", .path.display())]
    Syntax { path: PathBuf, count: usize },
}

fn fmt_cycle(cycle: &[PathBuf]) -> String {
    cycle
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n  -> ")
}

/// Loads the program rooted at `entry` and merges it with every
/// transitively imported file.
///
/// Lex and parse diagnostics are reported into `handler`; the first file
/// that produces any aborts the load with [`LoadError::Syntax`].
pub fn load(entry: &Path, handler: &Handler) -> Result<Program, LoadError> {
    let entry = absolutize(entry);

    let asts = collect_imports(&entry, handler)?;
    check_circular_imports(&asts)?;
    combine_programs(asts, &entry)
}

/// Resolves an import string relative to the declaring file.
///
/// The path is joined with the declaring file's directory, lexically
/// normalized, and given a `.foob` suffix when it has none.
pub fn resolve_import_path(current_file: &Path, import_path: &str) -> PathBuf {
    let current_dir = current_file.parent().unwrap_or_else(|| Path::new("."));
    let mut resolved = normalize(&current_dir.join(import_path));

    if resolved.extension().map_or(true, |ext| ext != "foob") {
        let mut name = resolved
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".foob");
        resolved.set_file_name(name);
    }

    resolved
}

/// Makes a path absolute against the current directory, without touching
/// the filesystem.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        normalize(&base.join(path))
    }
}

/// Lexical path normalization: removes `.` components and folds `..`
/// into their parent where possible.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            },
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Parses a single source file into its [`Program`].
fn parse_file(path: &Path, handler: &Handler) -> Result<Program, LoadError> {
    debug!(path = %path.display(), "parsing");

    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let errors_before = handler.error_count();
    let tokens = foobc_lex::tokenize(&source, handler);
    let program = foobc_par::parse(tokens, handler);

    let new_errors = handler.error_count() - errors_before;
    if new_errors > 0 {
        return Err(LoadError::Syntax {
            path: path.to_path_buf(),
            count: new_errors,
        });
    }

    Ok(program)
}

/// Work-list traversal: parses the entry file and everything it reaches.
///
/// Files are recorded in first-parse order (LIFO pop order), which the
/// merge step later relies on.
fn collect_imports(entry: &Path, handler: &Handler) -> Result<IndexMap<PathBuf, Program>, LoadError> {
    let mut asts: IndexMap<PathBuf, Program> = IndexMap::new();
    let mut to_process = vec![entry.to_path_buf()];
    let mut processed: FxHashSet<PathBuf> = FxHashSet::default();

    while let Some(current) = to_process.pop() {
        if !processed.insert(current.clone()) {
            continue;
        }

        let program = parse_file(&current, handler)?;

        for import in &program.imports {
            let resolved = resolve_import_path(&current, &import.filepath);

            if !resolved.exists() {
                return Err(LoadError::MissingImport {
                    import: import.filepath.clone(),
                    referrer: current.clone(),
                    resolved,
                });
            }

            if !processed.contains(&resolved) {
                to_process.push(resolved);
            }
        }

        asts.insert(current, program);
    }

    Ok(asts)
}

/// Detects cycles in the import graph by depth-first search with a
/// recursion stack. The error carries the full cycle path.
fn check_circular_imports(asts: &IndexMap<PathBuf, Program>) -> Result<(), LoadError> {
    let graph: IndexMap<PathBuf, Vec<PathBuf>> = asts
        .iter()
        .map(|(path, program)| {
            let imports = program
                .imports
                .iter()
                .map(|imp| resolve_import_path(path, &imp.filepath))
                .collect();
            (path.clone(), imports)
        })
        .collect();

    fn visit(
        node: &PathBuf,
        graph: &IndexMap<PathBuf, Vec<PathBuf>>,
        visited: &mut FxHashSet<PathBuf>,
        rec_stack: &mut FxHashSet<PathBuf>,
        path: &mut Vec<PathBuf>,
    ) -> Result<(), LoadError> {
        visited.insert(node.clone());
        rec_stack.insert(node.clone());
        path.push(node.clone());

        if let Some(neighbors) = graph.get(node) {
            for neighbor in neighbors {
                if !visited.contains(neighbor) {
                    visit(neighbor, graph, visited, rec_stack, path)?;
                } else if rec_stack.contains(neighbor) {
                    let start = path
                        .iter()
                        .position(|p| p == neighbor)
                        .unwrap_or(0);
                    let mut cycle: Vec<PathBuf> = path[start..].to_vec();
                    cycle.push(neighbor.clone());
                    return Err(LoadError::CircularImport { cycle });
                }
            }
        }

        path.pop();
        rec_stack.remove(node);
        Ok(())
    }

    let mut visited = FxHashSet::default();
    for node in graph.keys() {
        if !visited.contains(node) {
            let mut rec_stack = FxHashSet::default();
            let mut path = Vec::new();
            visit(node, &graph, &mut visited, &mut rec_stack, &mut path)?;
        }
    }

    Ok(())
}

/// Merges all parsed files into one program.
///
/// The entry file is appended first so its `Main` wins; any `Main` in
/// another file is skipped with a warning. Class, enumeration, and
/// non-`Main` function names must be globally unique.
fn combine_programs(
    asts: IndexMap<PathBuf, Program>,
    entry: &Path,
) -> Result<Program, LoadError> {
    let mut declarations: Vec<Declaration> = Vec::new();
    let mut decl_files: Vec<PathBuf> = Vec::new();
    let mut main_found = false;

    // the entry file is parsed first, so it leads the map's iteration
    // order and its declarations come first in the merged program
    for (path, program) in asts {
        let is_entry = path == entry;

        for decl in program.declarations {
            if let Declaration::Method(method) = &decl {
                if method.name == "Main" {
                    if is_entry {
                        main_found = true;
                    } else {
                        warn!(
                            skipped = %path.display(),
                            using = %entry.display(),
                            "skipping Main() from imported file"
                        );
                        continue;
                    }
                }
            }

            declarations.push(decl);
            decl_files.push(path.clone());
        }
    }

    check_duplicate_names(&declarations, &decl_files)?;

    if !main_found {
        return Err(LoadError::NoMain(entry.to_path_buf()));
    }

    Ok(Program {
        imports: Vec::new(),
        declarations,
    })
}

/// Rejects duplicate class/enum/function names across the merged unit.
fn check_duplicate_names(
    declarations: &[Declaration],
    files: &[PathBuf],
) -> Result<(), LoadError> {
    let mut classes: IndexMap<&str, &PathBuf> = IndexMap::new();
    let mut enums: IndexMap<&str, &PathBuf> = IndexMap::new();
    let mut functions: IndexMap<&str, &PathBuf> = IndexMap::new();

    for (decl, file) in declarations.iter().zip(files) {
        match decl {
            Declaration::Class(class) => {
                if let Some(first) = classes.insert(&class.name, file) {
                    return Err(LoadError::Duplicate {
                        kind: "class",
                        name: class.name.clone(),
                        first: first.clone(),
                        second: file.clone(),
                    });
                }
            },
            Declaration::Enum(decl_enum) => {
                if let Some(first) = enums.insert(&decl_enum.name, file) {
                    return Err(LoadError::Duplicate {
                        kind: "enumeration",
                        name: decl_enum.name.clone(),
                        first: first.clone(),
                        second: file.clone(),
                    });
                }
            },
            Declaration::Method(method) => {
                if method.name == "Main" {
                    continue;
                }
                if let Some(first) = functions.insert(&method.name, file) {
                    return Err(LoadError::Duplicate {
                        kind: "function",
                        name: method.name.clone(),
                        first: first.clone(),
                        second: file.clone(),
                    });
                }
            },
        }
    }

    Ok(())
}
