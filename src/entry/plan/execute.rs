use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::AppResult;
use crate::layers::SharedLayer;
use crate::playback::{PlaybackController, PlaybackControllerBuilder};
use crate::system::shutdown::{
    ShutdownSender, request_shutdown, setup_signal_shutdown_handler, shutdown_channel,
};
use crate::time::{Clock, SystemClock};
use crate::ui::run_panel;

use super::super::headless::{HeadlessOptions, run_headless};
use super::types::{RunPlan, SliderSettings};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = run_plan(plan, &shutdown_tx).await;

    request_shutdown(&shutdown_tx, "finished");
    signal_handle.await?;
    result
}

async fn run_plan(plan: RunPlan, shutdown_tx: &ShutdownSender) -> AppResult<()> {
    match plan {
        RunPlan::Panel { settings, panel } => {
            let autoplay = settings.autoplay;
            let controller = controller_builder(settings).build();
            if autoplay {
                controller.start();
            }
            run_panel(&controller, &panel, shutdown_tx).await
        }
        RunPlan::Headless { settings, ticks } => {
            let (change_tx, change_rx) = mpsc::unbounded_channel();
            let layers = settings.layers.clone();
            let autoplay = settings.autoplay;
            let controller = controller_builder(settings)
                .on_change(move |value| drop(change_tx.send(value)))
                .build();
            let options = HeadlessOptions { autoplay, ticks };
            let mut stdout = std::io::stdout();
            run_headless(
                &controller,
                &layers,
                change_rx,
                options,
                shutdown_tx,
                &mut stdout,
            )
            .await
            .map(drop)
        }
    }
}

fn controller_builder(settings: SliderSettings) -> PlaybackControllerBuilder {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    PlaybackController::builder()
        .clock(clock)
        .layers(
            settings
                .layers
                .into_iter()
                .map(|layer| layer as SharedLayer),
        )
        .initial_state(settings.initial)
}
