pub mod relay;
pub mod scene_session;
pub mod snapshot;
