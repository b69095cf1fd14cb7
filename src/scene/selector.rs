use crate::foundation::core::Vec3;
use crate::scene::palette::PaletteId;
use crate::scene::stage::Stage;
use smallvec::{SmallVec, smallvec};

/// One orb to display.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NodeConfig {
    pub position: Vec3,
    pub palette: PaletteId,
    pub muted: bool,
}

impl NodeConfig {
    fn new(x: f64, palette: PaletteId) -> Self {
        Self {
            position: Vec3::on_x(x),
            palette,
            muted: false,
        }
    }

    fn muted(x: f64, palette: PaletteId) -> Self {
        Self {
            muted: true,
            ..Self::new(x, palette)
        }
    }
}

/// Straight line between two scene points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LineConfig {
    pub start: Vec3,
    pub end: Vec3,
}

impl LineConfig {
    fn on_x(x0: f64, x1: f64) -> Self {
        Self {
            start: Vec3::on_x(x0),
            end: Vec3::on_x(x1),
        }
    }
}

/// Polyline followed by the traveling marker.
///
/// Waypoint `i` is `points[i]`; the marker starts at waypoint 0 and reports every later one.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathConfig {
    pub points: SmallVec<[Vec3; 4]>,
    /// Walk every segment in order. When `false` the path is a single start/end segment.
    pub chained: bool,
}

impl PathConfig {
    pub fn segment(start: Vec3, end: Vec3) -> Self {
        Self {
            points: smallvec![start, end],
            chained: false,
        }
    }

    pub fn chain(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            points: points.into_iter().collect(),
            chained: true,
        }
    }

    /// Number of segments (zero for degenerate paths).
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Everything the scene shows for one stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneConfig {
    pub stage: Stage,
    pub nodes: SmallVec<[NodeConfig; 4]>,
    /// Pulsing ambient light, shown only while no orbs are.
    pub ambient_glow: bool,
    pub attribute_line: Option<LineConfig>,
    pub connections: SmallVec<[LineConfig; 3]>,
    pub path: Option<PathConfig>,
}

impl SceneConfig {
    /// Orbs are "activated" while a path effect feeds them hits.
    pub fn activated(&self) -> bool {
        self.path.is_some()
    }
}

const PAIR: [f64; 2] = [-1.5, 1.5];
const ROW: [f64; 4] = [-4.5, -1.5, 1.5, 4.5];

/// Scene layout for `stage`. Total over [`Stage`] and free of hidden state.
pub fn select(stage: Stage) -> SceneConfig {
    use PaletteId::{Blue, Cyan, Pink, Purple};

    let empty = SceneConfig {
        stage,
        nodes: SmallVec::new(),
        ambient_glow: false,
        attribute_line: None,
        connections: SmallVec::new(),
        path: None,
    };
    let pair_nodes = || -> SmallVec<[NodeConfig; 4]> {
        smallvec![NodeConfig::new(PAIR[0], Purple), NodeConfig::new(PAIR[1], Blue)]
    };
    let row_links = || {
        ROW.windows(2)
            .map(|w| LineConfig::on_x(w[0], w[1]))
            .collect::<SmallVec<[LineConfig; 3]>>()
    };

    match stage {
        Stage::Empty => SceneConfig {
            ambient_glow: true,
            ..empty
        },
        Stage::Entity => SceneConfig {
            nodes: smallvec![NodeConfig::new(0.0, Purple)],
            ..empty
        },
        Stage::Attribute => SceneConfig {
            nodes: smallvec![NodeConfig::new(0.0, Purple)],
            attribute_line: Some(LineConfig::on_x(1.1, 3.0)),
            ..empty
        },
        Stage::Activity => SceneConfig {
            nodes: pair_nodes(),
            path: Some(PathConfig::segment(Vec3::on_x(PAIR[0]), Vec3::on_x(PAIR[1]))),
            ..empty
        },
        Stage::Relevance => SceneConfig {
            nodes: pair_nodes(),
            connections: smallvec![LineConfig::on_x(PAIR[0], PAIR[1])],
            path: Some(PathConfig::segment(Vec3::on_x(PAIR[0]), Vec3::on_x(PAIR[1]))),
            ..empty
        },
        // The first three orbs recede so the goal stands out.
        Stage::Goal => SceneConfig {
            nodes: smallvec![
                NodeConfig::muted(ROW[0], Purple),
                NodeConfig::muted(ROW[1], Blue),
                NodeConfig::muted(ROW[2], Cyan),
                NodeConfig::new(ROW[3], Pink),
            ],
            connections: row_links(),
            ..empty
        },
        Stage::Task => SceneConfig {
            nodes: smallvec![
                NodeConfig::new(ROW[0], Purple),
                NodeConfig::new(ROW[1], Blue),
                NodeConfig::new(ROW[2], Cyan),
                NodeConfig::new(ROW[3], Pink),
            ],
            connections: row_links(),
            path: Some(PathConfig::chain(ROW.map(Vec3::on_x))),
            ..empty
        },
    }
}

/// [`select`] keyed by a stage name; unknown names render the empty scene.
pub fn select_by_name(name: &str) -> SceneConfig {
    select(Stage::from_name_lossy(name))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
