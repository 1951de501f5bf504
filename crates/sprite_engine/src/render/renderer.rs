//! Batch submission
//!
//! [`SpriteRenderer`] owns the sprite shader program and issues one indexed
//! draw per [`RenderBatch`]. Everything API-specific lives behind
//! [`DrawBackend`].

use super::batch::{BatchStats, RenderBatch};
use super::shader::{ShaderError, ShaderStage};
use super::RenderError;
use crate::foundation::time::Stopwatch;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// GPU operations the sprite renderer needs
pub trait DrawBackend {
    /// Compiled shader stage handle
    type Shader;
    /// Linked program handle
    type Program;

    /// Compile one stage; `Err` carries the driver's info log
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;

    /// Link two stages; `Err` carries the driver's info log
    fn link_program(&mut self, vertex: Self::Shader, fragment: Self::Shader) -> Result<Self::Program, String>;

    /// Upload a batch and draw it as an indexed triangle list
    fn draw_batch(&mut self, program: &Self::Program, batch: &RenderBatch) -> BackendResult<()>;
}

/// Draws batches with the sprite program
pub struct SpriteRenderer<B: DrawBackend> {
    backend: B,
    program: Option<B::Program>,
    stats: BatchStats,
}

impl<B: DrawBackend> SpriteRenderer<B> {
    /// Wrap a backend; call [`SpriteRenderer::compile_program`] before drawing
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            program: None,
            stats: BatchStats::default(),
        }
    }

    /// Compile and link the sprite program
    ///
    /// Failures are logged with an annotated source listing and returned.
    pub fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<(), RenderError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, vertex_source)?;
        let fragment = self.compile_stage(ShaderStage::Fragment, fragment_source)?;

        let program = self.backend.link_program(vertex, fragment).map_err(|info_log| {
            let err = ShaderError::Link { log: info_log };
            log::error!("{}", err);
            RenderError::ShaderCompile(err)
        })?;

        log::debug!("Sprite shader program ready");
        self.program = Some(program);
        Ok(())
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<B::Shader, RenderError> {
        self.backend.compile_shader(stage, source).map_err(|info_log| {
            let err = ShaderError::compile(stage, source, &info_log);
            log::error!("{}", err);
            RenderError::ShaderCompile(err)
        })
    }

    /// Whether a program has been linked
    pub fn is_ready(&self) -> bool {
        self.program.is_some()
    }

    /// Draw every batch in order
    pub fn submit(&mut self, batches: &[RenderBatch]) -> Result<BatchStats, RenderError> {
        let program = self.program.as_ref().ok_or(RenderError::ProgramNotReady)?;
        let stopwatch = Stopwatch::start_new();

        for batch in batches.iter().filter(|batch| !batch.is_empty()) {
            self.backend.draw_batch(program, batch)?;
        }

        let mut stats = BatchStats::from_batches(batches);
        stats.submission_time_us = stopwatch.elapsed_micros();
        self.stats = stats.clone();
        Ok(stats)
    }

    /// Statistics of the last submission
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The wrapped backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
