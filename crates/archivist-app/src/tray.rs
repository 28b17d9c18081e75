//! Tray icon that owns the main thread while the API serves in the background.
//!
//! Choosing Close triggers the shared [`Shutdown`]; the event loop exits once
//! the server task reports that it has drained and stopped.

use std::time::{Duration, Instant};

use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::error::{AppError, AppResult};
use crate::shutdown::Shutdown;

const TRAY_TITLE: &str = "Design Projects Archives";
const TRAY_TOOLTIP: &str = "Design Projects archives listener";
const CLOSE_LABEL: &str = "Close";
const ICON_EDGE: u16 = 32;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the tray event loop until the server finishes.
///
/// The loop terminates the process when it exits, so this only returns if
/// the tray cannot be set up before the loop starts.
pub(crate) fn run(shutdown: Shutdown, mut done: oneshot::Receiver<AppResult<()>>) -> AppResult<()> {
    let event_loop = EventLoopBuilder::new().build();
    let menu = Menu::new();
    let close = MenuItem::new(CLOSE_LABEL, true, None);
    menu.append(&close)
        .map_err(|source| AppError::TrayMenu {
            operation: "tray.menu.append",
            source,
        })?;
    let close_id = close.id().clone();
    let mut menu = Some(menu);
    let mut tray: Option<TrayIcon> = None;
    let menu_events = MenuEvent::receiver();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL);

        if let Event::NewEvents(StartCause::Init) = event
            && let Some(menu) = menu.take()
        {
            match build_tray(menu) {
                Ok(icon) => {
                    info!("Tray icon ready");
                    tray = Some(icon);
                }
                Err(err) => warn!(error = %err, "tray icon unavailable; use a signal to stop"),
            }
        }

        if let Ok(event) = menu_events.try_recv()
            && event.id == close_id
        {
            info!("Close chosen from tray");
            shutdown.trigger();
        }

        match done.try_recv() {
            Ok(Ok(())) => {
                drop(tray.take());
                info!("Goodbye");
                *control_flow = ControlFlow::Exit;
            }
            Ok(Err(err)) => {
                drop(tray.take());
                error!(error = %err, "Archivist stopped with an error");
                *control_flow = ControlFlow::ExitWithCode(1);
            }
            Err(TryRecvError::Closed) => {
                drop(tray.take());
                let err = AppError::ServerTask {
                    operation: "tray.server_result",
                };
                error!(error = %err, "Archivist stopped with an error");
                *control_flow = ControlFlow::ExitWithCode(1);
            }
            Err(TryRecvError::Empty) => {}
        }
    })
}

fn build_tray(menu: Menu) -> AppResult<TrayIcon> {
    TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_title(TRAY_TITLE)
        .with_tooltip(TRAY_TOOLTIP)
        .with_icon(tray_icon()?)
        .build()
        .map_err(|source| AppError::Tray {
            operation: "tray.build",
            source,
        })
}

/// Filled circle rendered in memory so the binary carries no image assets.
fn tray_icon() -> AppResult<Icon> {
    let edge = u32::from(ICON_EDGE);
    let center = (f32::from(ICON_EDGE) - 1.0) / 2.0;
    let radius = f32::from(ICON_EDGE) / 2.0;
    let mut rgba = Vec::with_capacity(usize::from(ICON_EDGE).pow(2) * 4);
    for y in 0..ICON_EDGE {
        for x in 0..ICON_EDGE {
            let dx = f32::from(x) - center;
            let dy = f32::from(y) - center;
            let alpha = if dx.hypot(dy) <= radius { 0xff } else { 0x00 };
            rgba.extend_from_slice(&[0x2e, 0x7d, 0x32, alpha]);
        }
    }
    Icon::from_rgba(rgba, edge, edge).map_err(|source| AppError::TrayIcon {
        operation: "tray.icon",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn generated_icon_is_accepted() -> Result<()> {
        tray_icon()?;
        Ok(())
    }
}
