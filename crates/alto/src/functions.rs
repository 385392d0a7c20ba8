//! Host functions that touch the filesystem or the run itself.
//!
//! | Name | Arity | Result |
//! |---|---|---|
//! | `uniqueFp` | 1 | argument, re-evaluated with `%index%` = 1, 2, ... until the path is free |
//! | `exists` | 1 | argument if that path exists, else empty |
//! | `print` | any | empty; logs the concatenated arguments |
//! | `skip` | 0 | skips the current file |
//! | `clean` | at least 1 | argument with characters illegal in file names replaced by `-` |

use std::collections::HashSet;
use std::fs::symlink_metadata;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use alto_dsl::parser::Field;
use alto_dsl::{Arity, Callable, Control, EvalError, EvalResult, FunctionRegistry, Scope};
use regex::Regex;
use thiserror::Error;
use tracing::info;

/// How many `%index%` values `uniqueFp` tries before giving up.
pub const MAX_UNIQUE_ATTEMPTS: usize = 10_000;

/// Variable that `uniqueFp` increments.
pub const INDEX_VARIABLE: &str = "index";

#[cfg(windows)]
static ILLEGAL_CHARACTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\pC"*/:<>?\\|]+"#).expect("illegal character pattern should compile")
});

#[cfg(not(windows))]
static ILLEGAL_CHARACTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[/\x00]+").expect("illegal character pattern should compile")
});

/// Failures raised by host functions.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("cannot check {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("no free path after {attempts} attempts, last tried {}", last.display())]
    NoUniquePath { attempts: usize, last: PathBuf },
}

/// Answers whether a path is taken.
pub trait PathProbe: Send + Sync {
    /// Returns true if something exists at `path`. Symlinks count as
    /// existing even when dangling.
    fn exists(&self, path: &Path) -> Result<bool, IoError>;
}

/// Probes the real filesystem, resolving relative paths against `root`.
#[derive(Debug, Clone)]
pub struct FileSystem {
    root: PathBuf,
}

impl FileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathProbe for FileSystem {
    fn exists(&self, path: &Path) -> Result<bool, IoError> {
        match symlink_metadata(self.root.join(path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Paths created during a `--dry-run`, layered over another probe so that
/// planned copies collide with each other the way real copies would.
pub struct Planned<P> {
    inner: P,
    claimed: Mutex<HashSet<PathBuf>>,
}

impl<P: PathProbe> Planned<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Mark `path` as taken.
    pub fn claim(&self, path: impl Into<PathBuf>) {
        if let Ok(mut claimed) = self.claimed.lock() {
            claimed.insert(path.into());
        }
    }
}

impl<P: PathProbe> PathProbe for Planned<P> {
    fn exists(&self, path: &Path) -> Result<bool, IoError> {
        let claimed = self
            .claimed
            .lock()
            .is_ok_and(|claimed| claimed.contains(path));
        Ok(claimed || self.inner.exists(path)?)
    }
}

/// Register the host functions into `registry`, replacing any with the same
/// name.
pub fn register_host_functions(registry: &mut FunctionRegistry, probe: Arc<dyn PathProbe>) {
    registry.register(
        "uniqueFp",
        UniquePath {
            probe: Arc::clone(&probe),
        },
    );
    registry.register("exists", Exists { probe });
    registry.register("print", Print);
    registry.register("skip", Skip);
    registry.register("clean", Clean);
}

/// Replace runs of characters that cannot appear in a file name with `-`.
pub fn clean(s: &str) -> String {
    ILLEGAL_CHARACTERS.replace_all(s, "-").into_owned()
}

fn probe(probe: &dyn PathProbe, function: &str, path: &Path) -> EvalResult<bool> {
    probe.exists(path).map_err(|source| {
        EvalError::host(
            function,
            HostError::Probe {
                path: path.to_path_buf(),
                source,
            },
        )
        .into()
    })
}

/// `uniqueFp(path)`
struct UniquePath {
    probe: Arc<dyn PathProbe>,
}

impl UniquePath {
    fn search(&self, arg: &Field, scope: &mut Scope) -> EvalResult {
        let mut last = PathBuf::new();
        for attempt in 0..MAX_UNIQUE_ATTEMPTS {
            if attempt > 0 {
                scope.set(INDEX_VARIABLE, attempt.to_string());
            }
            let candidate = arg.eval(scope)?;
            last = PathBuf::from(&candidate);
            if !probe(self.probe.as_ref(), "uniqueFp", &last)? {
                return Ok(candidate);
            }
        }
        Err(EvalError::host(
            "uniqueFp",
            HostError::NoUniquePath {
                attempts: MAX_UNIQUE_ATTEMPTS,
                last,
            },
        )
        .into())
    }
}

impl Callable for UniquePath {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        // `index` only exists while searching.
        let saved = scope.remove(INDEX_VARIABLE);
        let result = self.search(&args[0], scope);
        scope.remove(INDEX_VARIABLE);
        if let Some(value) = saved {
            scope.set(INDEX_VARIABLE, value);
        }
        result
    }
}

/// `exists(path)`
struct Exists {
    probe: Arc<dyn PathProbe>,
}

impl Callable for Exists {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let path = args[0].eval(scope)?;
        if path.is_empty() {
            return Ok(path);
        }
        if probe(self.probe.as_ref(), "exists", Path::new(&path))? {
            Ok(path)
        } else {
            Ok(String::new())
        }
    }
}

/// `print(a|b|...)`
struct Print;

impl Callable for Print {
    fn arity(&self) -> Arity {
        Arity::Variadic
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let mut message = String::new();
        for arg in args {
            message.push_str(&arg.eval(scope)?);
        }
        info!(target: "alto::print", "{message}");
        Ok(String::new())
    }
}

/// `skip()`
struct Skip;

impl Callable for Skip {
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn call(&self, _args: &[Field], _scope: &mut Scope) -> EvalResult {
        Err(Control::Skip.into())
    }
}

/// `clean(value)` or `clean(a|b|...|separator)`
struct Clean;

impl Callable for Clean {
    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let Some((separator, parts)) = args.split_last() else {
            return Ok(String::new());
        };
        if parts.is_empty() {
            return Ok(clean(&separator.eval(scope)?));
        }

        let separator = separator.eval(scope)?;
        let mut cleaned = Vec::with_capacity(parts.len());
        for part in parts {
            let text = part.eval(scope)?;
            if !text.is_empty() {
                cleaned.push(clean(&text));
            }
        }
        Ok(cleaned.join(&separator))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir, write};
    #[cfg(unix)]
    use std::os::unix::fs::symlink;

    use alto_dsl::{Format, Outcome, variables};
    use tempfile::TempDir;

    use super::*;

    /// A probe over a fixed set of taken paths.
    struct Taken(HashSet<PathBuf>);

    impl Taken {
        fn new(paths: &[&str]) -> Self {
            Self(paths.iter().map(PathBuf::from).collect())
        }
    }

    impl PathProbe for Taken {
        fn exists(&self, path: &Path) -> Result<bool, IoError> {
            Ok(self.0.contains(path))
        }
    }

    fn scope(probe: impl PathProbe + 'static) -> Scope {
        let mut registry = FunctionRegistry::with_defaults();
        register_host_functions(&mut registry, Arc::new(probe));
        Scope::builder()
            .functions(Arc::new(registry))
            .variables(variables! { "title" => "Song" })
            .build()
    }

    fn render(format: &str, scope: &mut Scope) -> Outcome {
        Format::parse(format).unwrap().render(scope).unwrap()
    }

    fn value(s: &str) -> Outcome {
        Outcome::Value(s.to_string())
    }

    #[test]
    fn unique_path_returns_free_candidate() {
        let mut scope = scope(Taken::new(&[]));
        assert_eq!(render("<uniqueFp(%title%{ %index%}.mp3)>", &mut scope), value("Song.mp3"));
    }

    #[test]
    fn unique_path_counts_up_until_free() {
        let mut scope = scope(Taken::new(&["Song.mp3", "Song 1.mp3"]));
        assert_eq!(
            render("<uniqueFp(%title%{ %index%}.mp3)>", &mut scope),
            value("Song 2.mp3")
        );
        assert!(!scope.contains(INDEX_VARIABLE));
    }

    #[test]
    fn unique_path_restores_existing_index() {
        let mut scope = scope(Taken::new(&["a"]));
        scope.set(INDEX_VARIABLE, "kept");
        assert_eq!(render("<uniqueFp(a{%index%})>", &mut scope), value("a1"));
        assert_eq!(scope.get(INDEX_VARIABLE), "kept");
    }

    #[test]
    fn unique_path_gives_up() {
        let mut scope = scope(Taken::new(&["same"]));
        let err = Format::parse("<uniqueFp(same)>")
            .unwrap()
            .render(&mut scope)
            .unwrap_err();
        assert!(matches!(err, EvalError::Host { ref function, .. } if function == "uniqueFp"));
        assert!(err.to_string().contains("no free path after 10000 attempts"));
    }

    #[test]
    fn exists_returns_path_only_when_present() {
        let mut scope = scope(Taken::new(&["cover.jpg"]));
        assert_eq!(render("<exists(cover.jpg)>", &mut scope), value("cover.jpg"));
        assert_eq!(render("<exists(folder.jpg)>", &mut scope), value(""));
    }

    #[test]
    fn exists_makes_group_fall_back() {
        let mut scope = scope(Taken::new(&[]));
        assert_eq!(render("{<exists(a)>|b}", &mut scope), value("b"));
    }

    #[test]
    fn print_returns_empty() {
        let mut scope = scope(Taken::new(&[]));
        assert_eq!(render("x<print(hello |%title%)>y", &mut scope), value("xy"));
    }

    #[test]
    fn skip_signals_control() {
        let mut scope = scope(Taken::new(&[]));
        assert_eq!(
            render("{<skip()>|never}", &mut scope),
            Outcome::Control(Control::Skip)
        );
    }

    #[test]
    fn clean_replaces_separators() {
        let mut scope = scope(Taken::new(&[]));
        scope.set("artist", "AC/DC");
        assert_eq!(render("<clean(%artist%)>", &mut scope), value("AC-DC"));
        assert_eq!(clean("a//b"), "a-b");
    }

    #[test]
    fn clean_joins_non_empty_arguments() {
        let mut scope = scope(Taken::new(&[]));
        scope.set("artist", "AC/DC");
        assert_eq!(
            render("<clean(%artist%|%missing%|%title%|, )>", &mut scope),
            value("AC-DC, Song")
        );
    }

    #[test]
    fn filesystem_probe_is_relative_to_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("a.mp3"), b"x").unwrap();
        create_dir(dir.path().join("sub")).unwrap();

        let probe = FileSystem::new(dir.path());
        assert!(probe.exists(Path::new("a.mp3")).unwrap());
        assert!(probe.exists(Path::new("sub")).unwrap());
        assert!(!probe.exists(Path::new("b.mp3")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn filesystem_probe_sees_dangling_symlinks() {
        let dir = TempDir::new().unwrap();
        symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();
        assert!(FileSystem::new(dir.path()).exists(Path::new("link")).unwrap());
    }

    #[test]
    fn planned_paths_count_as_taken() {
        let probe = Planned::new(Taken::new(&["a"]));
        probe.claim("b");
        assert!(probe.exists(Path::new("a")).unwrap());
        assert!(probe.exists(Path::new("b")).unwrap());
        assert!(!probe.exists(Path::new("c")).unwrap());
    }
}
