// ── Client-side state ──

mod resource;

pub use resource::ResourceView;
pub(crate) use resource::ResourceState;
