//! Terminal panel: view model, key bindings and rendering.
mod input;
mod model;
mod panel;
mod render;


pub use input::{PanelAction, map_key};
pub use model::{
    LayerLine, POSITION_SCALE, PendingLabels, SliderMark, SliderView, TOGGLE_LABEL_RUNNING,
    TOGGLE_LABEL_STOPPED, ViewContext,
};
pub use panel::{PanelFlow, PanelSettings, apply_panel_action, run_panel, slider_view};
pub use render::{Ui, UiActions, draw_frame};
