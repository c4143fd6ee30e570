pub mod control;
pub mod dashboard;
pub mod format;
pub mod metrics;
pub mod narrative;

pub use control::PriceControl;
pub use dashboard::{render_dashboard, waterfall_bars, Dashboard, WaterfallBar};
pub use metrics::{headline_metrics, Metric};
pub use narrative::{render_narrative, render_template, NarrativeSection};
