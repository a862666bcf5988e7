use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{ChannelColors, Device, MergedTimeline, Threshold};
use crate::services::chart_service::{ChartManager, ChartSurface};
use crate::services::color_service::{baseline, highlighted};
use crate::services::slot_service::{current_label, Clock};
use crate::utils::errors::DashboardError;

/// The timeline currently on the chart and its baseline coloring
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub currency: String,
    pub timeline: MergedTimeline,
    pub baseline: ChannelColors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverState {
    Idle,
    Hovered { device: String, threshold: Threshold },
}

/// Idle/Hovered state machine over registered device cards
pub struct HighlightController {
    cards: HashMap<String, Threshold>,
    state: HoverState,
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightController {
    pub fn new() -> Self {
        Self {
            cards: HashMap::new(),
            state: HoverState::Idle,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Subscribe a card, or update the thresholds of an already registered one
    pub fn register(&mut self, name: &str, threshold: Threshold) {
        self.cards.insert(name.to_string(), threshold);
    }

    pub fn unregister(&mut self, name: &str) {
        self.cards.remove(name);
    }

    /// Make the registered cards match `devices` exactly
    pub fn sync_cards(&mut self, devices: &[Device]) {
        let stale: Vec<String> = self
            .cards
            .keys()
            .filter(|name| !devices.iter().any(|d| &&d.name == name))
            .cloned()
            .collect();
        for name in stale {
            self.unregister(&name);
        }
        for device in devices {
            self.register(&device.name, device.threshold());
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    /// Pointer entered `device`'s card.
    ///
    /// Moving straight from one card to another is a single transition with one
    /// repaint using the new card's thresholds.
    pub fn enter<S: ChartSurface>(
        &mut self,
        device: &str,
        view: Option<&RenderedView>,
        chart: &mut ChartManager<S>,
    ) -> Result<(), DashboardError> {
        let Some(threshold) = self.cards.get(device).copied() else {
            warn!("Hover on unregistered device card '{}'", device);
            return Ok(());
        };

        self.state = HoverState::Hovered {
            device: device.to_string(),
            threshold,
        };
        debug!("Hovering '{}' with {:?}", device, threshold);

        if let Some(view) = view {
            let colors = highlighted(&view.timeline, &view.baseline, &threshold);
            chart.repaint(&colors)?;
        }
        Ok(())
    }

    /// Pointer left the hovered card.
    ///
    /// The baseline is recomputed from the clock now, so a hover spanning a slot
    /// boundary marks the new current slot.
    pub fn leave<S: ChartSurface>(
        &mut self,
        view: Option<&mut RenderedView>,
        chart: &mut ChartManager<S>,
        clock: &dyn Clock,
    ) -> Result<(), DashboardError> {
        if self.state == HoverState::Idle {
            return Ok(());
        }
        self.state = HoverState::Idle;

        if let Some(view) = view {
            view.baseline = baseline(&view.timeline, &current_label(clock));
            chart.repaint(&view.baseline)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotColor, TriggerPrice};
    use crate::services::chart_service::tests::RecordingSurface;
    use crate::services::merge_service::{merge, tests::series};
    use crate::services::slot_service::tests::at;

    fn threshold(today: f64) -> Threshold {
        Threshold {
            today: TriggerPrice::At(today),
            tomorrow: TriggerPrice::Unset,
        }
    }

    // today 10:00..11:00 at [0.5, 1.5, 0.5, 1.5], rendered with 10:15 as now
    fn rendered(surface: &RecordingSurface) -> (RenderedView, ChartManager<RecordingSurface>) {
        let timeline = merge(&series(18, 10, &[0.5, 1.5, 0.5, 1.5]), None);
        let colors = baseline(&timeline, &current_label(&at(10, 20)));
        let mut chart = ChartManager::new(surface.clone());
        chart.render("SEK_per_kWh", &timeline, &colors).unwrap();
        let view = RenderedView {
            currency: "SEK_per_kWh".to_string(),
            timeline,
            baseline: colors,
        };
        (view, chart)
    }

    fn painted_today(surface: &RecordingSurface) -> Vec<SlotColor> {
        surface.last_colors.borrow().as_ref().unwrap().today.clone()
    }

    #[test]
    fn test_enter_highlights_and_keeps_current() {
        let surface = RecordingSurface::default();
        let (view, mut chart) = rendered(&surface);
        let mut controller = HighlightController::new();
        controller.register("Heater", threshold(2.0));

        controller.enter("Heater", Some(&view), &mut chart).unwrap();

        assert!(matches!(
            controller.state(),
            HoverState::Hovered { device, .. } if device == "Heater"
        ));
        assert_eq!(
            painted_today(&surface),
            vec![
                SlotColor::BelowThreshold,
                SlotColor::Current,
                SlotColor::BelowThreshold,
                SlotColor::BelowThreshold,
            ]
        );
    }

    #[test]
    fn test_direct_transition_repaints_once() {
        let surface = RecordingSurface::default();
        let (view, mut chart) = rendered(&surface);
        let mut controller = HighlightController::new();
        controller.register("Heater", threshold(2.0));
        controller.register("Pump", threshold(1.0));

        controller.enter("Heater", Some(&view), &mut chart).unwrap();
        let paints = surface.paints();
        controller.enter("Pump", Some(&view), &mut chart).unwrap();

        assert_eq!(surface.paints(), paints + 1);
        assert_eq!(
            painted_today(&surface),
            vec![
                SlotColor::BelowThreshold,
                SlotColor::Current,
                SlotColor::BelowThreshold,
                SlotColor::DefaultToday,
            ]
        );
    }

    #[test]
    fn test_leave_uses_fresh_clock() {
        let surface = RecordingSurface::default();
        let (mut view, mut chart) = rendered(&surface);
        let mut controller = HighlightController::new();
        controller.register("Heater", threshold(2.0));

        controller.enter("Heater", Some(&view), &mut chart).unwrap();
        // slot boundary passed while hovering
        controller.leave(Some(&mut view), &mut chart, &at(10, 31)).unwrap();

        assert_eq!(controller.state(), &HoverState::Idle);
        let expected = vec![
            SlotColor::DefaultToday,
            SlotColor::DefaultToday,
            SlotColor::Current,
            SlotColor::DefaultToday,
        ];
        assert_eq!(painted_today(&surface), expected);
        assert_eq!(view.baseline.today, expected);
    }

    #[test]
    fn test_leave_when_idle_does_nothing() {
        let surface = RecordingSurface::default();
        let (mut view, mut chart) = rendered(&surface);
        let mut controller = HighlightController::new();
        let paints = surface.paints();

        controller.leave(Some(&mut view), &mut chart, &at(10, 20)).unwrap();
        assert_eq!(surface.paints(), paints);
    }

    #[test]
    fn test_unregistered_card_ignored() {
        let surface = RecordingSurface::default();
        let (view, mut chart) = rendered(&surface);
        let mut controller = HighlightController::new();
        controller.register("Ghost", threshold(9.0));
        controller.unregister("Ghost");
        let paints = surface.paints();

        controller.enter("Ghost", Some(&view), &mut chart).unwrap();
        assert_eq!(controller.state(), &HoverState::Idle);
        assert_eq!(surface.paints(), paints);
    }

    #[test]
    fn test_hover_before_first_render() {
        let surface = RecordingSurface::default();
        let mut chart = ChartManager::new(surface.clone());
        let mut controller = HighlightController::new();
        controller.register("Heater", threshold(2.0));

        controller.enter("Heater", None, &mut chart).unwrap();
        controller.leave(None, &mut chart, &at(10, 0)).unwrap();
        assert!(surface.events.borrow().is_empty());
    }

    #[test]
    fn test_sync_cards_drops_removed_devices() {
        let mut controller = HighlightController::new();
        controller.register("Old", threshold(1.0));
        let devices: Vec<Device> = serde_json::from_value(serde_json::json!([
            { "name": "Heater", "today_trigger_price": "0.8" }
        ]))
        .unwrap();

        controller.sync_cards(&devices);
        assert!(!controller.is_registered("Old"));
        assert!(controller.is_registered("Heater"));
    }
}
