use std::time::Duration;

use crate::config::DesktopConfig;
use crate::desktop::Desktop;
use crate::drivers::{ConsoleInputDriver, ConsoleOutputDriver, InputDriver, OutputDriver};
use crate::error::Result;
use crate::event_loop::{ControlFlow, EventLoop};

/// Drive `desktop` until it asks to quit.
///
/// Input events are routed as they arrive. Each loop iteration also ticks
/// the desktop once and draws a frame. Mouse capture changes made by the
/// desktop are forwarded to `input` after every step.
pub fn run_desktop<D, O>(
    desktop: &mut Desktop,
    input: D,
    output: &mut O,
    tick: Duration,
) -> Result<()>
where
    D: InputDriver,
    O: OutputDriver,
{
    let mut event_loop = EventLoop::new(input, tick);
    event_loop
        .driver()
        .set_mouse_capture(desktop.state().mouse_capture_enabled())?;

    event_loop.run(|driver, event| {
        match event {
            Some(event) => {
                if desktop.handle_event(&event) {
                    return Ok(ControlFlow::Quit);
                }
            }
            None => {
                desktop.tick();
                output.draw(|mut frame| desktop.render(&mut frame))?;
            }
        }
        if let Some(enabled) = desktop.state_mut().take_mouse_capture_change() {
            driver.set_mouse_capture(enabled)?;
        }
        Ok(ControlFlow::Continue)
    })?;
    tracing::info!("desktop session ended");
    Ok(())
}

/// Run a desktop session on the controlling terminal.
pub fn run(config: &DesktopConfig) -> Result<()> {
    let mut desktop = Desktop::new(config);
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    tracing::info!(locale = %config.locale, open = ?config.open, "desktop session started");
    let result = run_desktop(
        &mut desktop,
        ConsoleInputDriver::new(),
        &mut output,
        config.tick,
    );
    output.exit()?;
    result
}
