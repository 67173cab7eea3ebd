//! Reading composite sources and resolving `INCLUDE "path"` directives.
//!
//! File access goes through the [`SourceFs`] trait so that shaders can be
//! served from disk ([`StdFs`]) or from memory ([`MemoryFs`]).

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::trace;

use crate::error::ShaderError;

/// Directive token replaced by the contents of the quoted file that follows.
pub const INCLUDE_DIRECTIVE: &str = "INCLUDE";

/// Nesting limit for `INCLUDE`. Guards against files that include themselves.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Read access to shader files and their modification times.
pub trait SourceFs {
    /// Read the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Last modification time of the file.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// [`SourceFs`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl SourceFs for StdFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

#[derive(Debug, Default)]
struct MemoryTree {
    files: HashMap<PathBuf, MemoryFile>,
    clock: u64,
}

#[derive(Debug)]
struct MemoryFile {
    text: String,
    modified: SystemTime,
}

/// In-memory [`SourceFs`] with its own monotonic clock.
///
/// Clones share the same tree, so a caller can keep a handle and edit files
/// while a shader holds another one.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    tree: Rc<RefCell<MemoryTree>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a file. Its modification time moves strictly past
    /// every time handed out before.
    pub fn write(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let mut tree = self.tree.borrow_mut();
        tree.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(tree.clock);
        tree.files.insert(
            path.into(),
            MemoryFile {
                text: text.into(),
                modified,
            },
        );
    }

    /// Overwrite a file's contents but keep its modification time.
    pub fn write_untimed(&self, path: impl AsRef<Path>, text: impl Into<String>) -> bool {
        match self.tree.borrow_mut().files.get_mut(path.as_ref()) {
            Some(file) => {
                file.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Bump a file's modification time without changing its contents.
    pub fn touch(&self, path: impl AsRef<Path>) -> bool {
        let mut tree = self.tree.borrow_mut();
        tree.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(tree.clock);
        match tree.files.get_mut(path.as_ref()) {
            Some(file) => {
                file.modified = modified;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.tree.borrow_mut().files.remove(path.as_ref()).is_some()
    }
}

impl SourceFs for MemoryFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.tree
            .borrow()
            .files
            .get(path)
            .map(|file| file.text.clone())
            .ok_or_else(|| not_found(path))
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.tree
            .borrow()
            .files
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

/// Location of one `INCLUDE` directive inside a source text.
struct IncludeDirective {
    /// From the token up to and including the terminating newline.
    line: Range<usize>,
    target: PathBuf,
}

fn find_include(source: &str) -> Option<Result<IncludeDirective, ()>> {
    let start = source.find(INCLUDE_DIRECTIVE)?;
    let end = source[start..]
        .find('\n')
        .map_or(source.len(), |newline| start + newline + 1);

    let rest = &source[start + INCLUDE_DIRECTIVE.len()..end];
    let Some(open) = rest.find('"') else {
        return Some(Err(()));
    };
    let Some(len) = rest[open + 1..].find('"') else {
        return Some(Err(()));
    };

    Some(Ok(IncludeDirective {
        line: start..end,
        target: PathBuf::from(&rest[open + 1..open + 1 + len]),
    }))
}

/// Load a composite source, resolving `INCLUDE "path"` directives.
///
/// The first `INCLUDE` in a file is replaced (token through end of line) by
/// the fully resolved text of the named file. Further directives in the same
/// file are left as they are. Include paths are used as written, so relative
/// paths resolve against the working directory.
pub fn load_source<F: SourceFs + ?Sized>(fs: &F, path: &Path) -> Result<String, ShaderError> {
    load_nested(fs, path, 0)
}

fn load_nested<F: SourceFs + ?Sized>(
    fs: &F,
    path: &Path,
    depth: usize,
) -> Result<String, ShaderError> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(ShaderError::IncludeDepth {
            path: path.to_path_buf(),
            limit: MAX_INCLUDE_DEPTH,
        });
    }

    let mut source = fs
        .read_to_string(path)
        .map_err(|source| ShaderError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

    let directive = match find_include(&source) {
        None => return Ok(source),
        Some(Ok(directive)) => directive,
        Some(Err(())) => {
            return Err(ShaderError::MalformedInclude {
                path: path.to_path_buf(),
            })
        }
    };

    trace!(file = %path.display(), include = %directive.target.display(), "resolving INCLUDE");

    let included = load_nested(fs, &directive.target, depth + 1)?;
    source.replace_range(directive.line, &included);

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_is_returned_verbatim() {
        let fs = MemoryFs::new();
        let text = "VERTEX\nvoid main() {}\nFRAGMENT\nvoid main() {}\n";
        fs.write("plain.glsl", text);

        assert_eq!(load_source(&fs, Path::new("plain.glsl")).unwrap(), text);
    }

    #[test]
    fn test_include_replaces_directive_line() {
        let fs = MemoryFs::new();
        fs.write("vertex.glsl", "VERTEX\nvoid main() {}\n");
        fs.write(
            "main.glsl",
            "INCLUDE \"vertex.glsl\"\nFRAGMENT\nvoid main() {}\n",
        );

        assert_eq!(
            load_source(&fs, Path::new("main.glsl")).unwrap(),
            "VERTEX\nvoid main() {}\nFRAGMENT\nvoid main() {}\n"
        );
    }

    #[test]
    fn test_nested_includes_flatten_in_place() {
        let fs = MemoryFs::new();
        fs.write("c.glsl", "// c\n");
        fs.write("b.glsl", "// b before\nINCLUDE \"c.glsl\"\n// b after\n");
        fs.write("a.glsl", "// a before\nINCLUDE \"b.glsl\"\n// a after\n");

        assert_eq!(
            load_source(&fs, Path::new("a.glsl")).unwrap(),
            "// a before\n// b before\n// c\n// b after\n// a after\n"
        );
    }

    #[test]
    fn test_only_first_include_is_resolved() {
        let fs = MemoryFs::new();
        fs.write("one.glsl", "// one\n");
        fs.write("two.glsl", "// two\n");
        fs.write(
            "main.glsl",
            "INCLUDE \"one.glsl\"\nINCLUDE \"two.glsl\"\n",
        );

        assert_eq!(
            load_source(&fs, Path::new("main.glsl")).unwrap(),
            "// one\nINCLUDE \"two.glsl\"\n"
        );
    }

    #[test]
    fn test_include_on_last_line_without_newline() {
        let fs = MemoryFs::new();
        fs.write("tail.glsl", "void main() {}\n");
        fs.write("main.glsl", "FRAGMENT\nINCLUDE \"tail.glsl\"");

        assert_eq!(
            load_source(&fs, Path::new("main.glsl")).unwrap(),
            "FRAGMENT\nvoid main() {}\n"
        );
    }

    #[test]
    fn test_missing_file_is_file_open_error() {
        let fs = MemoryFs::new();
        let err = load_source(&fs, Path::new("nope.glsl")).unwrap_err();
        assert!(matches!(err, ShaderError::FileOpen { ref path, .. } if path == Path::new("nope.glsl")));
    }

    #[test]
    fn test_missing_include_propagates() {
        let fs = MemoryFs::new();
        fs.write("main.glsl", "INCLUDE \"gone.glsl\"\nFRAGMENT\n");

        let err = load_source(&fs, Path::new("main.glsl")).unwrap_err();
        assert!(matches!(err, ShaderError::FileOpen { ref path, .. } if path == Path::new("gone.glsl")));
    }

    #[test]
    fn test_unquoted_include_is_malformed() {
        let fs = MemoryFs::new();
        fs.write("main.glsl", "INCLUDE common.glsl\n\"elsewhere\"\n");

        let err = load_source(&fs, Path::new("main.glsl")).unwrap_err();
        assert!(matches!(err, ShaderError::MalformedInclude { .. }));
    }

    #[test]
    fn test_self_include_hits_depth_limit() {
        let fs = MemoryFs::new();
        fs.write("loop.glsl", "INCLUDE \"loop.glsl\"\n");

        let err = load_source(&fs, Path::new("loop.glsl")).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::IncludeDepth { limit: MAX_INCLUDE_DEPTH, .. }
        ));
    }

    #[test]
    fn test_memory_fs_clock_is_monotonic() {
        let fs = MemoryFs::new();
        fs.write("a.glsl", "a");
        let first = fs.modified(Path::new("a.glsl")).unwrap();

        assert!(fs.write_untimed("a.glsl", "b"));
        assert_eq!(fs.modified(Path::new("a.glsl")).unwrap(), first);
        assert_eq!(fs.read_to_string(Path::new("a.glsl")).unwrap(), "b");

        assert!(fs.touch("a.glsl"));
        assert!(fs.modified(Path::new("a.glsl")).unwrap() > first);

        assert!(fs.remove("a.glsl"));
        assert!(fs.modified(Path::new("a.glsl")).is_err());
    }

    #[test]
    fn test_std_fs_reads_real_files() {
        let path = std::env::temp_dir().join(format!("hotshader-{}.glsl", std::process::id()));
        std::fs::write(&path, "COMPUTE\nvoid main() {}\n").unwrap();

        assert_eq!(
            load_source(&StdFs, &path).unwrap(),
            "COMPUTE\nvoid main() {}\n"
        );
        assert!(StdFs.modified(&path).is_ok());

        std::fs::remove_file(&path).unwrap();
    }
}
