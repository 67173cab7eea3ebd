//! Test doubles: a recording [`GlApi`] and a warning counter.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hotshader_core::StageKind;
use hotshader_gl::{GlApi, GLint, GLuint};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

struct MockShader {
    kind: StageKind,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct MockState {
    next_id: GLuint,
    shaders: HashMap<GLuint, MockShader>,
    programs: HashMap<GLuint, MockProgram>,
    compiled: Vec<StageKind>,
    deleted_programs: Vec<GLuint>,
    bound: GLuint,
    optimized_out: HashSet<String>,
}

/// In-process stand-in for a GL context.
///
/// - a stage fails to compile if its source contains `#error`
/// - linking needs a vertex stage, or a compute stage on its own
/// - active uniforms are the `uniform <type> <name>;` lines of the attached
///   stages, located by declaration order
/// - names passed to [`MockGl::optimize_out`] stay active but locate at `-1`
#[derive(Clone, Default)]
pub(crate) struct MockGl {
    state: Rc<RefCell<MockState>>,
}

impl MockGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn is_live_program(&self, program: GLuint) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    pub(crate) fn deleted_programs(&self) -> Vec<GLuint> {
        self.state.borrow().deleted_programs.clone()
    }

    /// Stage kinds in the order they were compiled.
    pub(crate) fn compiled_stages(&self) -> Vec<StageKind> {
        self.state.borrow().compiled.clone()
    }

    /// Report `name` as active with location `-1` from now on.
    pub(crate) fn optimize_out(&self, name: &str) {
        self.state.borrow_mut().optimized_out.insert(name.to_string());
    }

    pub(crate) fn bound_program(&self) -> GLuint {
        self.state.borrow().bound
    }

    fn next_id(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("uniform "))
        .filter_map(|rest| rest.split(';').next())
        .filter_map(|decl| decl.split_whitespace().last())
        .map(|name| match name.find('[') {
            Some(bracket) => format!("{}[0]", &name[..bracket]),
            None => name.to_string(),
        })
        .collect()
}

impl GlApi for MockGl {
    fn create_shader(&self, stage: StageKind) -> GLuint {
        let id = self.next_id();
        self.state.borrow_mut().shaders.insert(
            id,
            MockShader {
                kind: stage,
                source: String::new(),
                compiled: false,
            },
        );
        id
    }

    fn compile_shader(&self, shader: GLuint, source: &str) {
        let mut state = self.state.borrow_mut();
        let kind = {
            let object = state.shaders.get_mut(&shader).expect("live shader");
            object.source = source.to_string();
            object.compiled = !source.contains("#error");
            object.kind
        };
        state.compiled.push(kind);
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let state = self.state.borrow();
        let object = &state.shaders[&shader];
        if object.compiled {
            String::new()
        } else {
            format!("ERROR: 0:1: '#error' : {} stage rejected", object.kind)
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        let removed = self.state.borrow_mut().shaders.remove(&shader);
        assert!(removed.is_some(), "shader {shader} deleted twice");
    }

    fn create_program(&self) -> GLuint {
        let id = self.next_id();
        self.state
            .borrow_mut()
            .programs
            .insert(id, MockProgram::default());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader));
        state
            .programs
            .get_mut(&program)
            .expect("live program")
            .attached
            .push(shader);
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        let attached = &mut state.programs.get_mut(&program).expect("live program").attached;
        let before = attached.len();
        attached.retain(|&s| s != shader);
        assert_eq!(attached.len() + 1, before, "shader {shader} was not attached");
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let stages: Vec<(StageKind, String)> = state.programs[&program]
            .attached
            .iter()
            .map(|id| {
                let shader = &state.shaders[id];
                (shader.kind, shader.source.clone())
            })
            .collect();

        let has = |kind: StageKind| stages.iter().any(|(k, _)| *k == kind);
        let log = if has(StageKind::Compute) && stages.len() > 1 {
            Some("error: compute shader linked with other stages")
        } else if !has(StageKind::Compute) && !has(StageKind::Vertex) {
            Some("error: no vertex shader attached")
        } else {
            None
        };

        let mut uniforms: Vec<String> = Vec::new();
        for (_, source) in &stages {
            for name in declared_uniforms(source) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }

        let object = state.programs.get_mut(&program).expect("live program");
        object.linked = log.is_none();
        object.log = log.unwrap_or_default().to_string();
        object.uniforms = if object.linked { uniforms } else { Vec::new() };
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state.borrow().programs[&program].log.clone()
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let removed = state.programs.remove(&program);
        assert!(removed.is_some(), "program {program} deleted twice");
        state.deleted_programs.push(program);
    }

    fn use_program(&self, program: GLuint) {
        self.state.borrow_mut().bound = program;
    }

    fn active_uniform_names(&self, program: GLuint) -> Vec<String> {
        self.state.borrow().programs[&program].uniforms.clone()
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let state = self.state.borrow();
        if state.optimized_out.contains(name) {
            return -1;
        }
        state.programs[&program]
            .uniforms
            .iter()
            .position(|n| n == name)
            .map_or(-1, |index| index as GLint)
    }
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` and count the warnings it logs on this thread.
pub(crate) fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(counter.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.load(Ordering::SeqCst))
}

pub(crate) const TRIANGLE: &str = "\
VERTEX
#version 330
uniform mat4 MVP;
layout (location = 0) in vec2 vPos;
void main() { gl_Position = MVP * vec4(vPos, 0.0, 1.0); }

FRAGMENT
#version 330
uniform vec4 tint;
out vec4 color;
void main() { color = tint; }
";
