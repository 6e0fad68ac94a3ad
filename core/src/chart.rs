//! Chart descriptor pipeline: turns an [`EvaluationResult`] into radar and
//! bar chart specs, and owns the live chart instances bound to display
//! slots. A slot holds at most one live instance; mounting a new spec
//! destroys the prior one first. Materialization waits for the
//! presentation layer to report the analysis view as mounted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::model::{EvaluationResult, ResultItem};

/// Four-tier score classification on the [0, 1] scale. The same mapping
/// backs badges, level text, and bar colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Excellent
        } else if score >= 0.6 {
            Self::Good
        } else if score >= 0.4 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Collapse to the three-color band used for bars: excellent scores
    /// read as success, good as warning, everything below as danger.
    pub fn band(self) -> ScoreBand {
        match self {
            Self::Excellent => ScoreBand::Success,
            Self::Good => ScoreBand::Warning,
            Self::Fair | Self::Poor => ScoreBand::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Success,
    Warning,
    Danger,
}

/// Radar descriptor: one axis per label, values on [0, 1], displayed as
/// percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<RadarSeriesSpec>,
    pub axis_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeriesSpec {
    pub label: String,
    pub values: Vec<f64>,
}

/// Bar descriptor: one bar per result item, heights on [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub bars: Vec<BarSpec>,
    pub axis_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub label: String,
    pub value: f64,
    pub band: ScoreBand,
}

/// Missing radar data degrades to empty axes rather than failing.
pub fn radar_spec(result: &EvaluationResult) -> RadarChartSpec {
    let data = result.radar_chart_data.clone().unwrap_or_default();
    RadarChartSpec {
        labels: data.labels,
        datasets: data
            .datasets
            .into_iter()
            .map(|series| RadarSeriesSpec {
                label: series.label,
                values: series.data,
            })
            .collect(),
        axis_max: 1.0,
    }
}

pub fn bar_spec(result: &EvaluationResult) -> BarChartSpec {
    BarChartSpec {
        bars: result.result_items.iter().map(bar_for_item).collect(),
        axis_max: 100.0,
    }
}

fn bar_for_item(item: &ResultItem) -> BarSpec {
    BarSpec {
        label: item.indicator_name.clone(),
        value: item.score * 100.0,
        band: ScoreTier::from_score(item.score).band(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Radar(RadarChartSpec),
    Bar(BarChartSpec),
}

/// A materialized chart bound to a display slot. Dropping it releases the
/// slot's live count, which is how the one-instance-per-slot invariant is
/// observed.
#[derive(Debug)]
pub struct ChartInstance {
    spec: ChartSpec,
    live: Arc<AtomicUsize>,
}

impl ChartInstance {
    fn new(spec: ChartSpec, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { spec, live }
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A named display target owning at most one live chart.
#[derive(Debug)]
pub struct ChartSlot {
    target: &'static str,
    live: Arc<AtomicUsize>,
    instance: Option<ChartInstance>,
}

impl ChartSlot {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            live: Arc::new(AtomicUsize::new(0)),
            instance: None,
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Destroys any prior instance before materializing the new spec.
    pub fn mount(&mut self, spec: ChartSpec) {
        self.instance.take();
        self.instance = Some(ChartInstance::new(spec, Arc::clone(&self.live)));
        tracing::debug!(target: "evaldash.chart", slot = self.target, "chart mounted");
    }

    pub fn clear(&mut self) {
        if self.instance.take().is_some() {
            tracing::debug!(target: "evaldash.chart", slot = self.target, "chart destroyed");
        }
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    /// Number of instances currently alive for this slot.
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Drives the two slots of the analysis view. Specs built while the view
/// is not mounted are parked and flushed on the mount signal.
#[derive(Debug)]
pub struct ChartPipeline {
    radar: ChartSlot,
    bar: ChartSlot,
    pending: Option<(RadarChartSpec, BarChartSpec)>,
    mounted: bool,
}

impl Default for ChartPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPipeline {
    pub fn new() -> Self {
        Self {
            radar: ChartSlot::new("radar"),
            bar: ChartSlot::new("bar"),
            pending: None,
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Build both descriptors for the result. If the analysis view is
    /// mounted they materialize immediately, otherwise they wait for
    /// [`Self::view_mounted`].
    pub fn render(&mut self, result: &EvaluationResult) {
        let radar = radar_spec(result);
        let bar = bar_spec(result);
        if self.mounted {
            self.radar.mount(ChartSpec::Radar(radar));
            self.bar.mount(ChartSpec::Bar(bar));
        } else {
            self.pending = Some((radar, bar));
        }
    }

    /// Mount signal from the presentation layer: the display targets now
    /// exist, so any parked specs materialize.
    pub fn view_mounted(&mut self) {
        self.mounted = true;
        if let Some((radar, bar)) = self.pending.take() {
            self.radar.mount(ChartSpec::Radar(radar));
            self.bar.mount(ChartSpec::Bar(bar));
        }
    }

    /// The view went away; release both rendering contexts.
    pub fn view_unmounted(&mut self) {
        self.mounted = false;
        self.radar.clear();
        self.bar.clear();
    }

    pub fn radar(&self) -> &ChartSlot {
        &self.radar
    }

    pub fn bar(&self) -> &ChartSlot {
        &self.bar
    }
}
