#![forbid(unsafe_code)]

pub mod animation;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod session;
pub mod timing;

pub use animation::node::{NodeAnimator, NodeFrame};
pub use animation::path::{MarkerFrame, PathEffect, PathState};
pub use foundation::color::Color;
pub use foundation::core::{Canvas, Vec3};
pub use foundation::error::{SceneError, SceneResult};
pub use render::preview::{Camera, render_preview, render_preview_with, write_png};
pub use scene::palette::PaletteId;
pub use scene::selector::{SceneConfig, select, select_by_name};
pub use scene::stage::Stage;
pub use scene::tuning::SceneTuning;
pub use session::relay::EventRelay;
pub use session::scene_session::SceneSession;
pub use session::snapshot::FrameSnapshot;
pub use timing::scheduler::{Scheduler, TimerId};
