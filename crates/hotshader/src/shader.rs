//! [`Shader`]: one program built from a composite source, with hot reload.

use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hotshader_core::{load_source, split_stages, ShaderError, SourceFs, SourceOrigin, StdFs};
use hotshader_gl::{GlApi, GLint, GLuint};
use tracing::{debug, error, info, warn};

use crate::config::ShaderConfig;
use crate::pipeline::build_program;
use crate::program::Program;
use crate::uniforms::UniformTable;
use crate::watch::ModificationWatch;

/// Result of a reload attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new program replaced the old one. Rebind it; previously fetched
    /// uniform locations are stale.
    Swapped,
    /// Nothing to do: the file has not changed since it was last seen.
    Unchanged,
}

impl ReloadOutcome {
    pub fn is_swapped(self) -> bool {
        self == ReloadOutcome::Swapped
    }
}

/// A shader program built from one composite source.
///
/// Either holds a linked program (valid) or nothing (unbuilt). A failed build
/// or reload never disturbs what is held: the previous program, its uniform
/// table and its inactive-name set stay as they were. The program object is
/// released when the `Shader` is dropped or when a reload replaces it.
///
/// Not `Clone`; moving a `Shader` moves ownership of the program.
pub struct Shader<G: GlApi, F: SourceFs = StdFs> {
    gl: G,
    fs: F,
    id: String,
    origin: SourceOrigin,
    config: ShaderConfig,
    program: Option<Program<G>>,
    uniforms: UniformTable,
    watch: Option<ModificationWatch>,
}

impl<G: GlApi> Shader<G, StdFs> {
    /// Build from a file on disk with the default [`ShaderConfig`].
    pub fn from_file(gl: G, path: impl Into<PathBuf>) -> Self {
        Self::with_fs(gl, StdFs, path, ShaderConfig::default())
    }

    /// Build from a file on disk.
    pub fn from_file_with_config(gl: G, path: impl Into<PathBuf>, config: ShaderConfig) -> Self {
        Self::with_fs(gl, StdFs, path, config)
    }

    /// Build from source text held in memory. `id` labels diagnostics.
    ///
    /// Such a shader never reloads.
    pub fn from_source(gl: G, source: impl Into<String>, id: impl Into<String>) -> Self {
        let text = source.into();
        let origin = SourceOrigin::FromLiteral {
            text: text.clone(),
            id: id.into(),
        };
        let mut shader = Self::unbuilt(gl, StdFs, origin, ShaderConfig::default());

        if let Err(err) = shader.rebuild(&text) {
            shader.log_failure("build failed", &err);
        }

        shader
    }
}

impl<G: GlApi, F: SourceFs> Shader<G, F> {
    /// Build from a file read through `fs`.
    ///
    /// A missing timestamp is logged and treated as the oldest possible time,
    /// so the next real modification is picked up. A file that cannot be read
    /// or does not build leaves the shader unbuilt.
    pub fn with_fs(gl: G, fs: F, path: impl Into<PathBuf>, config: ShaderConfig) -> Self {
        let path = path.into();
        let mut shader = Self::unbuilt(gl, fs, SourceOrigin::FromFile(path.clone()), config);

        let modified = match shader.file_modified(&path) {
            Ok(modified) => modified,
            Err(err) => {
                shader.log_failure("initial timestamp", &err);
                UNIX_EPOCH
            }
        };
        shader.watch = Some(ModificationWatch::new(modified, config.poll_interval));

        if let Err(err) = shader.load(&path).and_then(|text| shader.rebuild(&text)) {
            shader.log_failure("build failed", &err);
        }

        shader
    }

    fn unbuilt(gl: G, fs: F, origin: SourceOrigin, config: ShaderConfig) -> Self {
        Self {
            gl,
            fs,
            id: origin.diagnostic_id(),
            origin,
            config,
            program: None,
            uniforms: UniformTable::default(),
            watch: None,
        }
    }

    /// `true` iff a linked program is held.
    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    /// Diagnostic id: the file path, or the id given with literal source.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    /// GL name of the current program, if any.
    pub fn program_id(&self) -> Option<GLuint> {
        self.program.as_ref().map(Program::id)
    }

    /// Uniform table of the current program generation.
    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    /// Last modification time seen for the backing file.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.watch.as_ref().map(ModificationWatch::last_modified)
    }

    /// Location of a uniform in the current program.
    ///
    /// `None` means the program has no such active uniform (or no program is
    /// held). The first miss per name and generation is logged.
    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        self.uniforms.lookup(name, &self.id)
    }

    /// Make the program current. An unbuilt shader binds program `0`.
    ///
    /// With [`ShaderConfig::hot_reload`] on, a file-backed shader first checks
    /// its file and reloads if it changed. Returns whether that swapped the
    /// program.
    pub fn bind(&mut self) -> bool {
        let swapped = self.config.hot_reload
            && self.origin.is_reloadable()
            && self.hot_swap();

        self.gl.use_program(self.program_id().unwrap_or(0));
        swapped
    }

    /// Rebuild from the file if it is strictly newer than last seen.
    ///
    /// The recorded time advances on any detected change, even if the new
    /// source fails to build, so a broken file is not recompiled until it
    /// changes again. On failure the current program, uniform table and
    /// inactive set are kept.
    pub fn reload(&mut self) -> Result<ReloadOutcome, ShaderError> {
        let outcome = self.reload_if_changed();
        self.report(&outcome, "reload succeeded");
        outcome
    }

    /// Rebuild from the file whether or not it changed.
    ///
    /// The recorded time still advances if the file is newer.
    pub fn force_reload(&mut self) -> Result<ReloadOutcome, ShaderError> {
        let outcome = self.reloadable_path().and_then(|path| {
            match self.file_modified(&path) {
                Ok(modified) => {
                    if let Some(watch) = self.watch.as_mut() {
                        watch.observe(modified);
                    }
                }
                Err(err) => self.log_failure("reload", &err),
            }
            self.reload_from(&path)
        });
        self.report(&outcome, "reload succeeded");
        outcome
    }

    /// Accumulate frame time and check the file once per poll interval.
    ///
    /// Polls any file-backed shader; [`ShaderConfig::hot_reload`] only gates
    /// the check in [`Shader::bind`], not this one. Returns whether the
    /// program was swapped.
    pub fn hot_reload(&mut self, elapsed: Duration) -> bool {
        let due = self
            .watch
            .as_mut()
            .is_some_and(|watch| watch.tick(elapsed));

        due && self.hot_swap()
    }

    fn hot_swap(&mut self) -> bool {
        let outcome = self.reload_if_changed();
        self.report(&outcome, "hot reload succeeded");
        matches!(outcome, Ok(outcome) if outcome.is_swapped())
    }

    fn reload_if_changed(&mut self) -> Result<ReloadOutcome, ShaderError> {
        let path = self.reloadable_path()?;

        let modified = self.file_modified(&path)?;
        let changed = self
            .watch
            .as_mut()
            .is_some_and(|watch| watch.observe(modified));
        if !changed {
            return Ok(ReloadOutcome::Unchanged);
        }

        debug!(shader = %self.id, "file changed, reloading");
        self.reload_from(&path)
    }

    fn report(&self, outcome: &Result<ReloadOutcome, ShaderError>, success: &str) {
        match outcome {
            Ok(ReloadOutcome::Swapped) => info!(shader = %self.id, "{success}"),
            Ok(ReloadOutcome::Unchanged) => {}
            Err(err) => self.log_failure("reload failed", err),
        }
    }

    fn log_failure(&self, context: &str, err: &ShaderError) {
        match err {
            ShaderError::StageCompile(failures) => {
                for failure in failures {
                    error!(shader = %self.id, stage = %failure.stage, "{context}: {failure}");
                }
            }
            ShaderError::Timestamp { .. } | ShaderError::ReloadNotApplicable => {
                warn!(shader = %self.id, "{context}: {err}");
            }
            _ => error!(shader = %self.id, "{context}: {err}"),
        }
    }

    fn reloadable_path(&self) -> Result<PathBuf, ShaderError> {
        self.origin
            .path()
            .map(Path::to_path_buf)
            .ok_or(ShaderError::ReloadNotApplicable)
    }

    fn reload_from(&mut self, path: &Path) -> Result<ReloadOutcome, ShaderError> {
        let text = self.load(path)?;
        self.rebuild(&text)?;
        Ok(ReloadOutcome::Swapped)
    }

    fn file_modified(&self, path: &Path) -> Result<SystemTime, ShaderError> {
        self.fs
            .modified(path)
            .map_err(|source| ShaderError::Timestamp {
                path: path.to_path_buf(),
                source,
            })
    }

    fn load(&self, path: &Path) -> Result<String, ShaderError> {
        let text = load_source(&self.fs, path)?;
        if text.is_empty() {
            return Err(ShaderError::EmptySource);
        }
        Ok(text)
    }

    /// Build `source` and, only on success, swap it in with a fresh uniform
    /// table. The replaced program is released here.
    fn rebuild(&mut self, source: &str) -> Result<(), ShaderError> {
        let program = build_program(&self.gl, &split_stages(source), &self.id)?;
        let uniforms = UniformTable::introspect(&self.gl, program.id());

        self.program = Some(program);
        self.uniforms = uniforms;

        Ok(())
    }
}

impl<G: GlApi, F: SourceFs> Debug for Shader<G, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id)
            .field("program", &self.program_id())
            .field("uniforms", &self.uniforms.len())
            .field("hot_reload", &self.config.hot_reload)
            .finish()
    }
}
