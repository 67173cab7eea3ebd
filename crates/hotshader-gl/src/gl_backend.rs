//! Loading OpenGL function pointers for the current context.

use std::ffi::c_void;
use std::sync::Once;

use anyhow::{bail, Result};

pub(crate) static GL_INIT_ONCE: Once = Once::new();

/// Load GL function pointers through `gl_loader`, exactly once per process.
pub(crate) fn load_system_gl() -> Result<()> {
    GL_INIT_ONCE.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|s| gl_loader::get_proc_address(s).cast());
    });

    check_entry_points()
}

/// Load GL function pointers from a caller-supplied resolver (e.g. the
/// windowing library's `get_proc_address`).
pub(crate) fn load_with<F>(mut loader: F) -> Result<()>
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(|s| loader(s));

    check_entry_points()
}

/// Fail if any entry point the shader pipeline calls is missing.
fn check_entry_points() -> Result<()> {
    let required = [
        ("glCreateShader", gl::CreateShader::is_loaded()),
        ("glShaderSource", gl::ShaderSource::is_loaded()),
        ("glCompileShader", gl::CompileShader::is_loaded()),
        ("glGetShaderiv", gl::GetShaderiv::is_loaded()),
        ("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded()),
        ("glDeleteShader", gl::DeleteShader::is_loaded()),
        ("glCreateProgram", gl::CreateProgram::is_loaded()),
        ("glAttachShader", gl::AttachShader::is_loaded()),
        ("glDetachShader", gl::DetachShader::is_loaded()),
        ("glLinkProgram", gl::LinkProgram::is_loaded()),
        ("glGetProgramiv", gl::GetProgramiv::is_loaded()),
        ("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded()),
        ("glDeleteProgram", gl::DeleteProgram::is_loaded()),
        ("glUseProgram", gl::UseProgram::is_loaded()),
        ("glGetActiveUniform", gl::GetActiveUniform::is_loaded()),
        ("glGetUniformLocation", gl::GetUniformLocation::is_loaded()),
    ];

    let missing: Vec<_> = required
        .iter()
        .filter(|(_, loaded)| !loaded)
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        bail!("OpenGL entry points not loaded: {}", missing.join(", "));
    }

    tracing::debug!("OpenGL shader entry points loaded");
    Ok(())
}
