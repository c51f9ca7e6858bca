pub mod model;
pub mod config;
pub mod connectivity;
pub mod sampling;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod quad;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod placement;
    pub mod select;
}
mod svg;

use algorithms::placement::{place_paths, Placer, SelectedPaths};
use algorithms::select::select_edges;
use config::{Config, ConfigError};
use connectivity::ConnectivityModel;
use log::debug;
use model::{PassStats, PathKind, Point, Polygon};
use sampling::{Sampler, SeededSampler};

pub use algorithms::select::{BranchParams, Composition};
pub use connectivity::MatchStrategy;

/// Owns one configuration, its connectivity model and the sampler, and runs
/// generation passes over them.
///
/// A pass goes Idle -> SelectingPaths -> PlacingShapes -> Idle; connectivity
/// is built when the configuration is set. Results of the last pass stay
/// readable until the next pass or `clear`.
pub struct Composer<S: Sampler = SeededSampler> {
    config: Config,
    model: ConnectivityModel,
    sampler: S,
    paths: SelectedPaths,
    polygons: Vec<Polygon>,
    placer: Placer,
    stats: PassStats,
}

impl Composer<SeededSampler> {
    pub fn new(config: Config, seed: u64) -> Self {
        Composer::with_sampler(config, SeededSampler::new(seed))
    }

    pub fn from_json_str(s: &str, seed: u64) -> Result<Self, ConfigError> {
        Ok(Composer::new(Config::from_json_str(s)?, seed))
    }

    pub fn reseed(&mut self, seed: u64) {
        self.sampler = SeededSampler::new(seed);
    }
}

impl<S: Sampler> Composer<S> {
    pub fn with_sampler(config: Config, sampler: S) -> Self {
        let model = build_model(&config);
        Composer {
            config,
            model,
            sampler,
            paths: SelectedPaths::default(),
            polygons: Vec::new(),
            placer: Placer::default(),
            stats: PassStats::default(),
        }
    }

    /// Replace the configuration wholesale; rebuilds connectivity and drops
    /// the previous pass output.
    pub fn set_config(&mut self, config: Config) {
        self.model = build_model(&config);
        self.config = config;
        self.clear();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn model(&self) -> &ConnectivityModel {
        &self.model
    }

    /// Run one generation pass: select lines, place paths, then polygons.
    pub fn generate(&mut self) -> PassStats {
        self.clear();

        let target = self.config.number_of_lines.draw_count(&mut self.sampler) as usize;
        debug!("pass: selecting up to {} lines ({:?})", target, self.config.line_composition);
        let edges = select_edges(
            &self.model,
            self.config.line_composition,
            target,
            self.config.branch_params(),
            &mut self.sampler,
        );
        self.paths = place_paths(
            &self.model,
            &edges,
            self.config.line_type,
            self.config.line_width,
            self.config.miss_area,
            &mut self.sampler,
        );

        debug!("pass: placing {} shape configs", self.config.shapes.len());
        self.placer.begin_pass(&mut self.sampler);
        let mut stats = PassStats {
            selected: edges.len() as u32,
            straight: self.paths.straight.len() as u32,
            curved: self.paths.curved.len() as u32,
            ..PassStats::default()
        };
        for shape in &self.config.shapes {
            let (requested, placed) = self.placer.place_polygons(
                shape,
                &self.paths,
                &self.model,
                &mut self.sampler,
                &mut self.polygons,
            );
            stats.polygons_requested += requested;
            stats.polygons_placed += placed;
        }
        stats.polygons_skipped = stats.polygons_requested - stats.polygons_placed;
        debug!("pass done: {:?}", stats);
        self.stats = stats;
        stats
    }

    pub fn clear(&mut self) {
        self.paths = SelectedPaths::default();
        self.polygons.clear();
        self.stats = PassStats::default();
    }

    pub fn points(&self) -> &[Point] {
        self.model.points()
    }
    pub fn selected_paths(&self) -> &SelectedPaths {
        &self.paths
    }
    pub fn paths_of_kind(&self, kind: PathKind) -> &[model::PlacedSegment] {
        self.paths.of_kind(kind)
    }
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
    pub fn last_stats(&self) -> PassStats {
        self.stats
    }

    // SVG
    pub fn to_svg_paths(&self) -> Vec<String> {
        svg::to_svg_paths_impl(&self.paths, &self.polygons)
    }
}

fn build_model(config: &Config) -> ConnectivityModel {
    debug!("building connectivity ({} points, {} lines)", config.points.len(), config.lines.len());
    ConnectivityModel::build(&config.points, &config.lines, config.matching)
}
