//! SVG normalization and colour extraction.
//!
//! ```ignore
//! let normalized = normalize_svg(&raw, "icon-arrows-up", &MinifyOptimizer);
//! let colors = extract_colors(&normalized.content)?;
//! ```

mod extract;
mod gradient;
mod normalize;
mod optimize;
mod prefix;

pub use extract::{extract_colors, ColorExtraction};
pub use gradient::{ExtractedGradient, GradientInfo, GradientKind, GradientStop};
pub use normalize::{normalize_svg, strip_root_dimensions, NormalizedSvg};
pub use optimize::{optimizer_for, MinifyOptimizer, Passthrough, SvgOptimizer, UsvgOptimizer};
pub use prefix::{icon_prefix, prefix_ids};
