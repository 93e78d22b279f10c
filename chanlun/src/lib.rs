pub mod analyzer;
pub mod bar;
pub mod config;
pub mod constant;
pub mod fractal;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod stroke;
pub mod utils;
pub mod validate;

pub use analyzer::{
    AnalysisSummary, BarRecord, ChanAnalyzer, ChanExport, FractalRecord, MergedBarRecord,
    StrokeRecord,
};
pub use bar::{MergedBar, RawBar};
pub use config::{ChanConfig, ChanConfigPatch};
pub use constant::{AnalysisError, Direction, FractalType};
pub use fractal::{Fractal, detect_fractals};
pub use loader::load_raw_bars;
pub use logging::init_logging;
pub use merge::merge_bars;
pub use stroke::{Stroke, build_strokes};
pub use validate::validate_bars;
