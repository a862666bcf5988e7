use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::models::{ChannelColors, ChartData, MergedTimeline, SlotColor};
use crate::utils::errors::DashboardError;

/// A display surface that can build chart handles bound to it
pub trait ChartSurface {
    type Handle: ChartHandle;

    /// Construct a handle without drawing anything yet
    fn build(&mut self, data: ChartData) -> Result<Self::Handle, DashboardError>;
}

/// A live chart bound to a surface
pub trait ChartHandle {
    /// Draw the current state onto the surface
    fn paint(&mut self) -> Result<(), DashboardError>;

    /// Replace bar colors in place, keeping labels and values
    fn recolor(&mut self, colors: &ChannelColors);

    /// Release the handle and whatever it holds on the surface
    fn destroy(self);
}

/// Owns at most one live chart and replaces it wholesale on refresh
pub struct ChartManager<S: ChartSurface> {
    surface: S,
    live: Option<S::Handle>,
}

impl<S: ChartSurface> ChartManager<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, live: None }
    }

    /// Replace the live chart with one built from `timeline` and `colors`.
    ///
    /// The new handle is built before the old one is released, so a failed
    /// build leaves the previous chart showing and is the only error returned.
    /// A paint failure after the swap is logged; the next repaint retries it.
    pub fn render(
        &mut self,
        currency: &str,
        timeline: &MergedTimeline,
        colors: &ChannelColors,
    ) -> Result<(), DashboardError> {
        let mut next = self.surface.build(ChartData::new(currency, timeline, colors))?;

        if let Some(previous) = self.live.take() {
            previous.destroy();
        }

        if let Err(e) = next.paint() {
            warn!("New chart installed but not painted: {}", e);
        }
        self.live = Some(next);
        Ok(())
    }

    /// Recolor the live chart in place. Returns `false` when there is no chart yet.
    pub fn repaint(&mut self, colors: &ChannelColors) -> Result<bool, DashboardError> {
        let Some(handle) = self.live.as_mut() else {
            debug!("Repaint dropped, no live chart");
            return Ok(false);
        };

        handle.recolor(colors);
        handle.paint()?;
        Ok(true)
    }

    pub fn is_live(&self) -> bool {
        self.handle().is_some()
    }

    pub fn handle(&self) -> Option<&S::Handle> {
        self.live.as_ref()
    }
}

fn rgb(color: SlotColor) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

/// Bitmap surface writing the chart to a PNG file
pub struct PngChartSurface {
    path: PathBuf,
    size: (u32, u32),
    built: u64,
}

impl PngChartSurface {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
            built: 0,
        }
    }
}

impl ChartSurface for PngChartSurface {
    type Handle = PngChart;

    fn build(&mut self, data: ChartData) -> Result<PngChart, DashboardError> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(DashboardError::Chart(format!(
                "Chart size {}x{} has no area",
                self.size.0, self.size.1
            )));
        }

        self.built += 1;
        Ok(PngChart {
            id: self.built,
            path: self.path.clone(),
            size: self.size,
            data,
        })
    }
}

/// Bar chart drawn into a PNG file
pub struct PngChart {
    id: u64,
    path: PathBuf,
    size: (u32, u32),
    data: ChartData,
}

impl PngChart {
    fn draw(&self) -> Result<(), DashboardError> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| DashboardError::Chart(format!("Failed to fill canvas: {}", e)))?;

        let slots = self.data.labels.len().max(1);

        // Bars start at zero, so the range always includes it
        let (min_price, max_price) = self.data.value_range().unwrap_or((0.0, 1.0));
        let price_range = (max_price.max(0.0) - min_price.min(0.0)).max(1e-8);
        let padding = price_range * 0.1;
        let y_min = if min_price < 0.0 { min_price - padding } else { 0.0 };
        let y_max = max_price.max(0.0) + padding;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.data.title, ("sans-serif", 28.0).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..slots as f64, y_min..y_max)
            .map_err(|e| DashboardError::Chart(format!("Failed to build chart: {}", e)))?;

        let labels = &self.data.labels;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots.min(24))
            .x_label_formatter(&|x| {
                labels
                    .get(x.floor() as usize)
                    .map(|l| l.to_string())
                    .unwrap_or_default()
            })
            .x_desc("Time")
            .label_style(("sans-serif", 16))
            .draw()
            .map_err(|e| DashboardError::Chart(format!("Failed to draw mesh: {}", e)))?;

        for dataset in &self.data.datasets {
            let bars = dataset
                .values
                .iter()
                .zip(&dataset.colors)
                .enumerate()
                .filter_map(|(i, (value, color))| {
                    value.map(|v| {
                        let x = i as f64;
                        Rectangle::new([(x + 0.1, 0.0), (x + 0.9, v)], rgb(*color).filled())
                    })
                });

            let swatch = rgb(dataset.legend);
            chart
                .draw_series(bars)
                .map_err(|e| DashboardError::Chart(format!("Failed to draw bars: {}", e)))?
                .label(dataset.label.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], swatch.filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| DashboardError::Chart(format!("Failed to draw legend: {}", e)))?;

        root.present()
            .map_err(|e| DashboardError::Chart(format!("Failed to render chart: {}", e)))?;

        Ok(())
    }
}

impl ChartHandle for PngChart {
    fn paint(&mut self) -> Result<(), DashboardError> {
        self.draw()?;
        debug!("Chart {} painted to {}", self.id, self.path.display());
        Ok(())
    }

    fn recolor(&mut self, colors: &ChannelColors) {
        self.data.apply_colors(colors);
    }

    fn destroy(self) {
        info!("Released chart {}", self.id);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::services::color_service::baseline;
    use crate::services::merge_service::{merge, tests::series};

    /// What happened on a recording surface, in order
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Built(u64),
        Painted(u64),
        Destroyed(u64),
    }

    /// In-memory surface that records the handle lifecycle
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSurface {
        pub events: Rc<RefCell<Vec<Event>>>,
        pub fail_next_build: Rc<RefCell<bool>>,
        pub last_colors: Rc<RefCell<Option<ChannelColors>>>,
        built: u64,
    }

    impl RecordingSurface {
        /// Handles built but not yet destroyed
        pub(crate) fn live_handles(&self) -> usize {
            let events = self.events.borrow();
            let built = events.iter().filter(|e| matches!(e, Event::Built(_))).count();
            let destroyed = events.iter().filter(|e| matches!(e, Event::Destroyed(_))).count();
            built - destroyed
        }

        pub(crate) fn paints(&self) -> usize {
            self.events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Event::Painted(_)))
                .count()
        }
    }

    pub(crate) struct RecordingHandle {
        id: u64,
        pub data: ChartData,
        surface: RecordingSurface,
    }

    impl ChartSurface for RecordingSurface {
        type Handle = RecordingHandle;

        fn build(&mut self, data: ChartData) -> Result<RecordingHandle, DashboardError> {
            if self.fail_next_build.replace(false) {
                return Err(DashboardError::Chart("surface unavailable".to_string()));
            }
            self.built += 1;
            self.events.borrow_mut().push(Event::Built(self.built));
            Ok(RecordingHandle {
                id: self.built,
                data,
                surface: self.clone(),
            })
        }
    }

    impl ChartHandle for RecordingHandle {
        fn paint(&mut self) -> Result<(), DashboardError> {
            self.surface.events.borrow_mut().push(Event::Painted(self.id));
            let colors = ChannelColors {
                today: self.data.datasets[0].colors.clone(),
                tomorrow: self.data.datasets.get(1).map(|d| d.colors.clone()),
            };
            *self.surface.last_colors.borrow_mut() = Some(colors);
            Ok(())
        }

        fn recolor(&mut self, colors: &ChannelColors) {
            self.data.apply_colors(colors);
        }

        fn destroy(self) {
            self.surface.events.borrow_mut().push(Event::Destroyed(self.id));
        }
    }

    #[test]
    fn test_render_replaces_previous_handle() {
        let surface = RecordingSurface::default();
        let mut manager = ChartManager::new(surface.clone());
        let timeline = merge(&series(18, 0, &[0.1, 0.2]), None);
        let colors = baseline(&timeline, &timeline.labels[0].clone());

        manager.render("SEK_per_kWh", &timeline, &colors).unwrap();
        manager.render("SEK_per_kWh", &timeline, &colors).unwrap();

        assert_eq!(
            *surface.events.borrow(),
            vec![
                Event::Built(1),
                Event::Painted(1),
                Event::Built(2),
                Event::Destroyed(1),
                Event::Painted(2),
            ]
        );
        assert_eq!(surface.live_handles(), 1);
    }

    #[test]
    fn test_failed_build_keeps_previous_chart() {
        let surface = RecordingSurface::default();
        let mut manager = ChartManager::new(surface.clone());
        let timeline = merge(&series(18, 0, &[0.1]), None);
        let colors = baseline(&timeline, &timeline.labels[0].clone());

        manager.render("SEK_per_kWh", &timeline, &colors).unwrap();
        *surface.fail_next_build.borrow_mut() = true;
        assert!(manager.render("SEK_per_kWh", &timeline, &colors).is_err());

        assert!(manager.is_live());
        assert_eq!(surface.live_handles(), 1);
        assert!(!surface.events.borrow().contains(&Event::Destroyed(1)));
    }

    #[test]
    fn test_repaint_without_chart_is_noop() {
        let surface = RecordingSurface::default();
        let mut manager = ChartManager::new(surface.clone());
        let colors = ChannelColors {
            today: vec![],
            tomorrow: None,
        };

        assert!(!manager.repaint(&colors).unwrap());
        assert!(surface.events.borrow().is_empty());
    }

    #[test]
    fn test_repaint_keeps_handle() {
        let surface = RecordingSurface::default();
        let mut manager = ChartManager::new(surface.clone());
        let timeline = merge(&series(18, 0, &[0.1, 0.2]), None);
        let colors = baseline(&timeline, &timeline.labels[0].clone());
        manager.render("SEK_per_kWh", &timeline, &colors).unwrap();

        let recolored = ChannelColors {
            today: vec![SlotColor::BelowThreshold, SlotColor::DefaultToday],
            tomorrow: None,
        };
        assert!(manager.repaint(&recolored).unwrap());

        assert_eq!(
            *surface.events.borrow(),
            vec![Event::Built(1), Event::Painted(1), Event::Painted(1)]
        );
        assert_eq!(manager.handle().unwrap().data.datasets[0].colors, recolored.today);
    }

    #[test]
    fn test_png_surface_rejects_empty_size() {
        let mut surface = PngChartSurface::new("unused.png", (0, 480));
        let timeline = merge(&series(18, 0, &[0.1]), None);
        let colors = baseline(&timeline, &timeline.labels[0].clone());
        let data = ChartData::new("SEK_per_kWh", &timeline, &colors);
        assert!(matches!(surface.build(data), Err(DashboardError::Chart(_))));
    }
}
