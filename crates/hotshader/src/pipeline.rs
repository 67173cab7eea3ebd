//! Compiling stage slices and linking them into one program.

use hotshader_core::{ShaderError, StageFailure, StageSlice};
use hotshader_gl::GlApi;
use tracing::trace;

use crate::program::{Program, StageObject};

/// Compile every stage and link them into a new program.
///
/// All stages are compiled even after one fails, so a single attempt reports
/// every stage's errors. Stage objects are released before this returns,
/// whatever the outcome; on link failure the program object is released too.
/// `id` only labels trace events; failures are returned, not logged.
pub fn build_program<G: GlApi>(
    gl: &G,
    stages: &[StageSlice<'_>],
    id: &str,
) -> Result<Program<G>, ShaderError> {
    if stages.is_empty() {
        return Err(ShaderError::NoStages);
    }

    let mut objects = Vec::with_capacity(stages.len());
    let mut failures = Vec::new();

    for slice in stages {
        let object = StageObject::compile(gl, slice.kind, slice.source);

        if let Some(log) = object.error() {
            trace!(shader = %id, stage = %object.kind(), "stage compilation failed");
            failures.push(StageFailure {
                stage: object.kind(),
                log,
            });
        }

        objects.push(object);
    }

    if !failures.is_empty() {
        return Err(ShaderError::StageCompile(failures));
    }

    let program = Program::create(gl);

    for object in &objects {
        gl.attach_shader(program.id(), object.id());
    }

    gl.link_program(program.id());

    for object in &objects {
        gl.detach_shader(program.id(), object.id());
    }
    drop(objects);

    if !gl.link_status(program.id()) {
        let log = gl.program_info_log(program.id());
        return Err(ShaderError::Link { log });
    }

    trace!(shader = %id, program = program.id(), stages = stages.len(), "program linked");
    Ok(program)
}
