// What you SEE:
// • A black canvas. Hold Left Mouse to write a math expression in white.
// • Ctrl/Cmd+Z or UNDO removes the last stroke. CLEAR wipes the canvas.
// • ENTER or CALCULATE sends the drawing to the model; the answer appears in
//   orange to the right of where you stopped writing.
// • ESC quits.

use math_notes::draw::Drawer;
use math_notes::{App, Config, Error, OpenAiGateway, logging};
use std::sync::Arc;
use tracing::info;

const WINDOW_TITLE: &str = "AI Math Notes";

fn main() -> Result<(), Error> {
    /* --- Config + logging ---
       No API key means no window at all. */
    let config = Config::from_env()?;
    logging::init(config.debug);
    info!(?config, "starting");

    /* --- Solver + app state --- */
    let gateway = OpenAiGateway::new(&config)?;
    let mut app = App::new(config.canvas_width, config.canvas_height, Arc::new(gateway));

    /* --- Window ---
       Visual: window opens with an empty black canvas and the toolbar. */
    let mut drawer = Drawer::new(WINDOW_TITLE, config.canvas_width as usize, config.canvas_height as usize)?;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        for event in drawer.poll_events() {
            app.handle(event);
        }
        // Paint the answer if the solver finished since last frame.
        app.poll();
        drawer.present(app.surface().canvas().frame(), &app.status().text())?;
    }

    app.cancel_pending();
    info!("bye");
    Ok(())
}
