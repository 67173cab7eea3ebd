//! Owned GL objects: linked programs and in-flight stage objects.
//!
//! Both wrappers delete their object on drop, so every early return in the
//! build pipeline releases what it created. Neither is `Clone`.

use hotshader_core::StageKind;
use hotshader_gl::{GlApi, GLuint};

/// A linked program object, exclusively owned.
///
/// Holding one means linking succeeded. The object is deleted exactly once,
/// when the `Program` is dropped.
pub struct Program<G: GlApi> {
    id: GLuint,
    gl: G,
}

impl<G: GlApi> Program<G> {
    pub(crate) fn create(gl: &G) -> Self {
        Self {
            id: gl.create_program(),
            gl: gl.clone(),
        }
    }

    /// The GL program name. Never `0`.
    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl<G: GlApi> Drop for Program<G> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.gl.delete_program(self.id);
        }
    }
}

impl<G: GlApi> std::fmt::Debug for Program<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program").field("id", &self.id).finish()
    }
}

/// A shader object that lives only for the duration of one build.
pub(crate) struct StageObject<G: GlApi> {
    id: GLuint,
    kind: StageKind,
    gl: G,
}

impl<G: GlApi> StageObject<G> {
    /// Create a shader object for `kind` and compile `source` into it.
    pub(crate) fn compile(gl: &G, kind: StageKind, source: &str) -> Self {
        let id = gl.create_shader(kind);
        gl.compile_shader(id, source);
        Self {
            id,
            kind,
            gl: gl.clone(),
        }
    }

    pub(crate) fn id(&self) -> GLuint {
        self.id
    }

    pub(crate) fn kind(&self) -> StageKind {
        self.kind
    }

    /// `None` if compilation succeeded, otherwise the compiler's log.
    pub(crate) fn error(&self) -> Option<String> {
        if self.gl.compile_status(self.id) {
            None
        } else {
            Some(self.gl.shader_info_log(self.id))
        }
    }
}

impl<G: GlApi> Drop for StageObject<G> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.gl.delete_shader(self.id);
        }
    }
}
