use super::store::{GpuResource, Registry};

/// Discriminates the two pipeline variants at lookup time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PipelineKind {
    Render,
    Compute,
}

/// A render or compute pipeline stored under one name.
#[derive(Debug)]
pub enum Pipeline {
    Render(wgpu::RenderPipeline),
    Compute(wgpu::ComputePipeline),
}

impl Pipeline {
    pub fn kind(&self) -> PipelineKind {
        match self {
            Pipeline::Render(_) => PipelineKind::Render,
            Pipeline::Compute(_) => PipelineKind::Compute,
        }
    }

    pub fn as_render(&self) -> Option<&wgpu::RenderPipeline> {
        match self {
            Pipeline::Render(p) => Some(p),
            Pipeline::Compute(_) => None,
        }
    }

    pub fn as_compute(&self) -> Option<&wgpu::ComputePipeline> {
        match self {
            Pipeline::Render(_) => None,
            Pipeline::Compute(p) => Some(p),
        }
    }
}

impl GpuResource for Pipeline {
    const KIND: &'static str = "pipeline";
}

/// One name-keyed map holding both pipeline kinds.
#[derive(Default)]
pub(crate) struct PipelineRegistry {
    inner: Registry<Pipeline>,
}

impl PipelineRegistry {
    pub(crate) fn insert(&mut self, name: &str, pipeline: Pipeline) -> &Pipeline {
        self.inner.insert(name, pipeline)
    }

    /// Returns the entry only if it is of the requested kind.
    pub(crate) fn get(&self, name: &str, kind: PipelineKind) -> Option<&Pipeline> {
        let entry = self.inner.get(name)?;
        match (kind, entry) {
            (PipelineKind::Render, Pipeline::Render(_))
            | (PipelineKind::Compute, Pipeline::Compute(_)) => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn render(&self, name: &str) -> Option<&wgpu::RenderPipeline> {
        self.inner.get(name).and_then(Pipeline::as_render)
    }

    pub(crate) fn compute(&self, name: &str) -> Option<&wgpu::ComputePipeline> {
        self.inner.get(name).and_then(Pipeline::as_compute)
    }
}
