// Selection state machine: reconciles scroll, hover and click into one selected region.
// Rule: the popup anchor only moves when the selected region changes, never per scroll tick.
//
// `transition` is a pure reducer so any binding (wasm, plain listeners, tests) can drive it.
// `SelectionMachine` owns one view's state and fires the completion callback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::HotspotError;
use crate::geometry;
use crate::registry::HotspotRegistry;
use crate::types::*;

/// Discrete input delivered by the host view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HotspotEvent {
    /// New value from the external scroll tracker.
    ScrollProgress { progress: f64 },
    /// Pointer entered a region polygon.
    HoverEnter { region_id: RegionId },
    /// Pointer left the region it was over.
    HoverLeave,
    /// Region polygon clicked.
    Click {
        region_id: RegionId,
        event_id: PointerEventId,
    },
    /// Pointer interaction outside the rendered popup.
    ClickOutside { event_id: PointerEventId },
}

/// What the host must do with its click-outside listener after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ListenerChange {
    #[default]
    Unchanged,
    Register,
    Deregister,
}

/// Side effects of one transition, for the host to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransitionOutcome {
    /// Scroll reached the last region for the first time.
    pub selection_completed: bool,
    /// The triggering pointer event must not bubble further.
    pub propagation_stopped: bool,
    pub click_outside_listener: ListenerChange,
}

/// Read-only collaborators a transition is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct MapContext<'a> {
    pub registry: &'a HotspotRegistry,
    pub settings: &'a MapSettings,
}

/// Mutable selection state of one mounted map view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    hovered_region_id: Option<RegionId>,
    active_region_id: Option<RegionId>,
    anchor_position: Option<AnchorPosition>,
    /// Region the current anchor was computed for.
    anchor_region_id: Option<RegionId>,
    completion_fired: bool,
    /// Click whose propagation was stopped; its click-outside twin is ignored.
    stopped_event: Option<PointerEventId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered_region_id(&self) -> Option<&RegionId> {
        self.hovered_region_id.as_ref()
    }

    pub fn active_region_id(&self) -> Option<&RegionId> {
        self.active_region_id.as_ref()
    }

    /// Hover wins over both scroll-driven and pinned selection.
    pub fn selected_region_id(&self) -> Option<&RegionId> {
        self.hovered_region_id
            .as_ref()
            .or(self.active_region_id.as_ref())
    }

    pub fn anchor_position(&self) -> Option<AnchorPosition> {
        self.anchor_position
    }

    pub fn completion_fired(&self) -> bool {
        self.completion_fired
    }

    /// A click-outside listener is only needed while something is active.
    pub fn listens_for_click_outside(&self) -> bool {
        self.active_region_id.is_some()
    }

    fn refresh_anchor(&mut self, ctx: &MapContext<'_>) {
        let Some(selected) = self.selected_region_id().cloned() else {
            // Keep the last anchor so a fading popup doesn't jump.
            return;
        };
        if self.anchor_region_id.as_ref() == Some(&selected) {
            return;
        }

        if let Some(region) = ctx.registry.get(&selected) {
            self.anchor_position = geometry::anchor_for(region, ctx.registry.diagram());
            debug!(region = %selected, anchor = ?self.anchor_position, "anchor recomputed");
            self.anchor_region_id = Some(selected);
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SelectionState,
    pub outcome: TransitionOutcome,
}

/// Pure reducer: `(state, event) -> state'` plus the effects the host must perform.
///
/// Never fails. Unknown region ids and non-finite progress leave the state as is.
pub fn transition(
    state: &SelectionState,
    event: &HotspotEvent,
    ctx: &MapContext<'_>,
) -> Transition {
    let mut next = state.clone();
    let mut outcome = TransitionOutcome::default();

    match event {
        HotspotEvent::ScrollProgress { progress } => {
            if !progress.is_finite() {
                warn!(progress, "ignoring non-finite scroll progress");
                return Transition {
                    state: next,
                    outcome,
                };
            }
            apply_scroll(&mut next, &mut outcome, *progress, ctx);
        }

        HotspotEvent::HoverEnter { region_id } => {
            if ctx.registry.contains(region_id) {
                next.hovered_region_id = Some(region_id.clone());
            } else {
                warn!(region = %region_id, "hover on unknown region ignored");
            }
        }

        HotspotEvent::HoverLeave => {
            next.hovered_region_id = None;
        }

        HotspotEvent::Click {
            region_id,
            event_id,
        } => {
            if ctx.registry.contains(region_id) {
                debug!(region = %region_id, "region pinned by click");
                next.active_region_id = Some(region_id.clone());
                next.stopped_event = Some(*event_id);
                outcome.propagation_stopped = true;
            } else {
                warn!(region = %region_id, "click on unknown region ignored");
            }
        }

        HotspotEvent::ClickOutside { event_id } => {
            if next.stopped_event.take() == Some(*event_id) {
                debug!(event = event_id.as_u32(), "click-outside from stopped click ignored");
            } else if next.active_region_id.take().is_some() {
                debug!("selection dismissed by click outside");
            }
        }
    }

    next.refresh_anchor(ctx);

    outcome.click_outside_listener = match (
        state.listens_for_click_outside(),
        next.listens_for_click_outside(),
    ) {
        (false, true) => ListenerChange::Register,
        (true, false) => ListenerChange::Deregister,
        _ => ListenerChange::Unchanged,
    };

    Transition {
        state: next,
        outcome,
    }
}

// Scroll always overwrites the active region, including one pinned by click.
fn apply_scroll(
    next: &mut SelectionState,
    outcome: &mut TransitionOutcome,
    progress: f64,
    ctx: &MapContext<'_>,
) {
    let total = ctx.registry.len();
    let Some((index, region)) = ctx
        .settings
        .map_progress(progress, total)
        .and_then(|i| ctx.registry.by_index(i).map(|r| (i, r)))
    else {
        next.active_region_id = None;
        return;
    };

    if next.active_region_id.as_ref() != Some(&region.id) {
        debug!(region = %region.id, index, progress, "scroll activated region");
        next.active_region_id = Some(region.id.clone());
    }

    if index + 1 == total && !next.completion_fired {
        next.completion_fired = true;
        outcome.selection_completed = true;
    }
}

/// Popup content for the selected region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub description: String,
    pub product_ref: ProductRef,
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub selected_region_id: Option<RegionId>,
    pub anchor_position: Option<AnchorPosition>,
    pub popup: Option<PopupContent>,
    pub listens_for_click_outside: bool,
}

type CompletionCallback = Box<dyn FnMut(&RegionId)>;

/// Selection state of one mounted map view, bound to its registry and settings.
pub struct SelectionMachine {
    registry: Arc<HotspotRegistry>,
    settings: MapSettings,
    state: SelectionState,
    on_complete: Option<CompletionCallback>,
}

impl SelectionMachine {
    pub fn new(registry: Arc<HotspotRegistry>, settings: MapSettings) -> Result<Self, HotspotError> {
        settings.validate()?;
        Ok(SelectionMachine {
            registry,
            settings,
            state: SelectionState::new(),
            on_complete: None,
        })
    }

    /// Callback invoked once, with the last region, when scroll first reaches it.
    pub fn with_on_complete(mut self, callback: impl FnMut(&RegionId) + 'static) -> Self {
        self.set_on_complete(callback);
        self
    }

    pub fn set_on_complete(&mut self, callback: impl FnMut(&RegionId) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn dispatch(&mut self, event: &HotspotEvent) -> TransitionOutcome {
        let ctx = MapContext {
            registry: &self.registry,
            settings: &self.settings,
        };
        let Transition { state, outcome } = transition(&self.state, event, &ctx);
        self.state = state;

        if outcome.selection_completed {
            if let (Some(callback), Some(last)) = (self.on_complete.as_mut(), self.registry.last()) {
                callback(&last.id);
            }
        }

        outcome
    }

    pub fn on_scroll_progress(&mut self, progress: f64) -> TransitionOutcome {
        self.dispatch(&HotspotEvent::ScrollProgress { progress })
    }

    pub fn on_hover(&mut self, region_id: impl Into<RegionId>) -> TransitionOutcome {
        self.dispatch(&HotspotEvent::HoverEnter {
            region_id: region_id.into(),
        })
    }

    pub fn on_hover_end(&mut self) -> TransitionOutcome {
        self.dispatch(&HotspotEvent::HoverLeave)
    }

    pub fn on_click(
        &mut self,
        region_id: impl Into<RegionId>,
        event_id: PointerEventId,
    ) -> TransitionOutcome {
        self.dispatch(&HotspotEvent::Click {
            region_id: region_id.into(),
            event_id,
        })
    }

    pub fn on_click_outside(&mut self, event_id: PointerEventId) -> TransitionOutcome {
        self.dispatch(&HotspotEvent::ClickOutside { event_id })
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn registry(&self) -> &HotspotRegistry {
        &self.registry
    }

    pub fn settings(&self) -> MapSettings {
        self.settings
    }

    pub fn selected_region_id(&self) -> Option<&RegionId> {
        self.state.selected_region_id()
    }

    pub fn selected_region(&self) -> Option<&RegionDefinition> {
        self.selected_region_id().and_then(|id| self.registry.get(id))
    }

    pub fn anchor_position(&self) -> Option<AnchorPosition> {
        self.state.anchor_position()
    }

    pub fn listens_for_click_outside(&self) -> bool {
        self.state.listens_for_click_outside()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let region = self.selected_region();
        ViewSnapshot {
            selected_region_id: region.map(|r| r.id.clone()),
            anchor_position: self.anchor_position(),
            popup: region.map(|r| PopupContent {
                title: r.title.clone(),
                description: r.description.clone(),
                product_ref: r.product_ref.clone(),
            }),
            listens_for_click_outside: self.listens_for_click_outside(),
        }
    }

    /// Back to Idle, as on a fresh mount. The callback stays attached.
    pub fn reset(&mut self) {
        self.state = SelectionState::new();
    }
}
