// Application state: ledger + both surfaces + the solver, owned by the event loop.
// Nothing here touches the window, so the whole draw/undo/solve flow runs headless.
//
// Flow:
// • pointer down starts an action, drags paint segments, pointer up commits it
// • undo pops an action and repaints everything from the ledger
// • submit exports the bitmap and solves it in the background; `poll` paints
//   the answer once it arrives

use crate::error::Error;
use crate::gateway::Solver;
use crate::job::{SolveJob, SolveOutcome};
use crate::ledger::StrokeLedger;
use crate::surface::DualSurface;
use crate::toolbar::ToolbarCommand;
use crate::types::Point;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Discrete input the app reacts to. Window code turns raw mouse/keyboard
/// state into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Undo,
    Clear,
    Submit,
}

impl From<ToolbarCommand> for InputEvent {
    fn from(cmd: ToolbarCommand) -> Self {
        match cmd {
            ToolbarCommand::Clear => InputEvent::Clear,
            ToolbarCommand::Undo => InputEvent::Undo,
            ToolbarCommand::Calculate => InputEvent::Submit,
        }
    }
}

/// What the status line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Solving,
    Answered(String),
    Failed,
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Ready => "READY".to_owned(),
            Status::Solving => "SOLVING...".to_owned(),
            Status::Answered(answer) => format!("ANSWER: {answer}"),
            Status::Failed => "ERROR (SEE LOG)".to_owned(),
        }
    }
}

pub struct App {
    ledger: StrokeLedger,
    surface: DualSurface,
    solver: Arc<dyn Solver>,
    pen: Option<Point>, // last pointer position while the button is held
    pending: Option<SolveJob>,
    status: Status,
}

impl App {
    pub fn new(width: u32, height: u32, solver: Arc<dyn Solver>) -> Self {
        Self {
            ledger: StrokeLedger::new(),
            surface: DualSurface::new(width, height),
            solver,
            pen: None,
            pending: None,
            status: Status::Ready,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Undo => self.undo(),
            InputEvent::Clear => self.clear(),
            InputEvent::Submit => {
                if let Err(e) = self.submit() {
                    error!(error = %e, "could not submit drawing");
                    self.status = Status::Failed;
                }
            }
        }
    }

    pub fn pointer_down(&mut self, p: Point) {
        self.ledger.begin_action();
        self.pen = Some(p);
    }

    /// Visual: ink follows the pointer on both surfaces.
    pub fn pointer_move(&mut self, p: Point) {
        let Some(last) = self.pen else {
            return;
        };
        let segment = self.surface.draw_segment(last, p);
        self.ledger.extend(segment);
        self.pen = Some(p);
    }

    pub fn pointer_up(&mut self) {
        self.pen = None;
        self.ledger.commit_action();
    }

    /// Remove the newest action and repaint from the ledger. An open gesture
    /// is committed first so the surfaces never show uncommitted ink.
    pub fn undo(&mut self) {
        if self.pen.is_some() {
            self.pointer_up();
        }
        if self.ledger.undo().is_none() {
            debug!("undo with empty ledger");
            return;
        }
        self.cancel_pending();
        self.surface.rebuild_from(&self.ledger);
        // the rebuild wiped any answer, so stop echoing it
        if matches!(self.status, Status::Answered(_)) {
            self.status = Status::Ready;
        }
    }

    /// Visual: the canvas goes blank.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.pen = None;
        self.ledger.clear();
        self.surface.rebuild_from(&self.ledger);
        self.status = Status::Ready;
        debug!("canvas cleared");
    }

    /// Export the bitmap and start solving it. Nothing drawn means nothing to
    /// solve: silently ignored. Replaces any solve already in flight. An open
    /// gesture is committed first so the picture and the anchor agree.
    pub fn submit(&mut self) -> Result<(), Error> {
        if self.pen.is_some() {
            self.pointer_up();
        }
        let Some(anchor) = self.ledger.anchor() else {
            debug!("submit with empty ledger ignored");
            return Ok(());
        };
        let png = self.surface.export_png()?;
        self.cancel_pending();
        info!(png_bytes = png.len(), ?anchor, "submitting drawing");
        self.pending = Some(SolveJob::spawn(Arc::clone(&self.solver), png, anchor));
        self.status = Status::Solving;
        Ok(())
    }

    /// Non-blocking: paint the answer if the solver is done. Call once per frame.
    pub fn poll(&mut self) {
        let Some(outcome) = self.pending.as_ref().and_then(SolveJob::poll) else {
            return;
        };
        self.pending = None;
        if let Err(e) = self.apply(outcome) {
            debug!(error = %e, "no answer to paint");
        }
    }

    /// Block until the in-flight solve finishes and paint its answer.
    /// `None` when nothing is pending.
    pub fn wait_for_answer(&mut self) -> Option<Result<String, Error>> {
        let job = self.pending.take()?;
        Some(self.apply(job.wait()))
    }

    /// Abandon any in-flight solve, e.g. on shutdown.
    pub fn cancel_pending(&mut self) {
        if let Some(job) = self.pending.take() {
            job.cancel();
            debug!("pending solve cancelled");
            if self.status == Status::Solving {
                self.status = Status::Ready;
            }
        }
    }

    fn apply(&mut self, outcome: SolveOutcome) -> Result<String, Error> {
        match outcome.result {
            Ok(answer) => {
                let overlay = self.surface.composite_answer(&answer, outcome.anchor);
                info!(answer = %answer, origin = ?overlay.origin, "answer composited");
                self.status = Status::Answered(answer.clone());
                Ok(answer)
            }
            Err(Error::Cancelled) => {
                warn!("solve ended without an answer");
                self.status = Status::Ready;
                Err(Error::Cancelled)
            }
            Err(e) => {
                error!(error = %e, "solver failed");
                self.status = Status::Failed;
                Err(e)
            }
        }
    }

    pub fn ledger(&self) -> &StrokeLedger {
        &self.ledger
    }

    pub fn surface(&self) -> &DualSurface {
        &self.surface
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_solving(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Records every PNG it sees and answers with a fixed string.
    struct Recorder {
        answer: Result<&'static str, ()>,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl Recorder {
        fn answering(answer: &'static str) -> Arc<Self> {
            Arc::new(Self { answer: Ok(answer), seen: Mutex::new(Vec::new()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { answer: Err(()), seen: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> usize {
            self.seen.lock().expect("lock").len()
        }
    }

    impl Solver for Recorder {
        fn solve(&self, png: &[u8]) -> Result<String, Error> {
            self.seen.lock().expect("lock").push(png.to_vec());
            self.answer
                .map(str::to_owned)
                .map_err(|()| Error::MalformedResponse("stub failure".into()))
        }
    }

    fn stroke(app: &mut App, pts: &[(i32, i32)]) {
        app.handle(InputEvent::PointerDown(pts[0].into()));
        for &p in &pts[1..] {
            app.handle(InputEvent::PointerMove(p.into()));
        }
        app.handle(InputEvent::PointerUp);
    }

    #[test]
    fn toolbar_commands_map_to_events() {
        assert_eq!(InputEvent::from(ToolbarCommand::Clear), InputEvent::Clear);
        assert_eq!(InputEvent::from(ToolbarCommand::Undo), InputEvent::Undo);
        assert_eq!(InputEvent::from(ToolbarCommand::Calculate), InputEvent::Submit);
    }

    #[test]
    fn move_without_press_draws_nothing() {
        let mut app = App::new(60, 60, Recorder::answering("1"));
        app.handle(InputEvent::PointerMove(Point::new(10, 10)));
        app.handle(InputEvent::PointerUp);
        assert!(app.ledger().is_empty());
        assert!(app.surface().canvas().items().is_empty());
    }

    #[test]
    fn submit_on_empty_canvas_sends_nothing() {
        let solver = Recorder::answering("1");
        let mut app = App::new(60, 60, solver.clone());
        app.handle(InputEvent::Submit);
        assert!(!app.is_solving());
        assert!(app.wait_for_answer().is_none());
        assert_eq!(solver.calls(), 0);
        assert_eq!(app.status(), &Status::Ready);
    }

    #[test]
    fn submit_sends_the_exported_bitmap() {
        let solver = Recorder::answering("2");
        let mut app = App::new(80, 80, solver.clone());
        stroke(&mut app, &[(5, 5), (40, 40)]);
        let expected = app.surface().export_png().expect("png");

        app.handle(InputEvent::Submit);
        assert_eq!(app.status(), &Status::Solving);
        assert_eq!(app.wait_for_answer().expect("pending").expect("answer"), "2");
        assert_eq!(solver.seen.lock().expect("lock").as_slice(), &[expected]);
        assert_eq!(app.status(), &Status::Answered("2".into()));
    }

    #[test]
    fn solver_failure_leaves_drawing_untouched() {
        let mut app = App::new(80, 80, Recorder::failing());
        stroke(&mut app, &[(5, 5), (40, 40)]);
        let before = app.surface().bitmap().clone();

        app.handle(InputEvent::Submit);
        assert!(matches!(app.wait_for_answer(), Some(Err(Error::MalformedResponse(_)))));
        assert_eq!(app.surface().bitmap(), &before);
        assert!(app.surface().overlays().is_empty());
        assert_eq!(app.ledger().len(), 1);
        assert_eq!(app.status(), &Status::Failed);
    }

    #[test]
    fn undo_and_clear_cancel_pending_solve() {
        let mut app = App::new(80, 80, Recorder::answering("9"));
        stroke(&mut app, &[(5, 5), (40, 40)]);
        stroke(&mut app, &[(50, 5), (60, 40)]);

        app.handle(InputEvent::Submit);
        app.handle(InputEvent::Undo);
        assert!(!app.is_solving());
        assert_eq!(app.status(), &Status::Ready);

        app.handle(InputEvent::Submit);
        app.handle(InputEvent::Clear);
        assert!(!app.is_solving());
        assert!(app.surface().overlays().is_empty());
    }

    fn poll_until_settled(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_solving() {
            app.poll();
            assert!(Instant::now() < deadline, "solver never answered");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn frame_polling_paints_the_answer() {
        let mut app = App::new(300, 200, Recorder::answering("4"));
        stroke(&mut app, &[(10, 100), (60, 100)]);
        app.handle(InputEvent::Submit);
        poll_until_settled(&mut app);

        assert_eq!(app.status(), &Status::Answered("4".into()));
        let overlays = app.surface().overlays();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].origin, Point::new(130, 80));
        assert!(app.surface().surfaces_match());
    }

    #[test]
    fn frame_polling_reports_failure() {
        let mut app = App::new(300, 200, Recorder::failing());
        stroke(&mut app, &[(10, 100), (60, 100)]);
        app.handle(InputEvent::Submit);
        poll_until_settled(&mut app);

        assert_eq!(app.status(), &Status::Failed);
        assert!(app.surface().overlays().is_empty());
    }

    #[test]
    fn submit_mid_gesture_commits_it_and_anchors_on_it() {
        let solver = Recorder::answering("6");
        let mut app = App::new(300, 200, solver.clone());
        stroke(&mut app, &[(10, 10), (20, 10)]);

        app.handle(InputEvent::PointerDown(Point::new(40, 120)));
        app.handle(InputEvent::PointerMove(Point::new(90, 120)));
        app.handle(InputEvent::Submit);
        let png_at_submit = app.surface().export_png().expect("png");
        assert_eq!(app.ledger().len(), 2);

        app.wait_for_answer().expect("pending").expect("answer");
        assert_eq!(app.surface().overlays()[0].origin, Point::new(160, 100));
        assert_eq!(solver.seen.lock().expect("lock").as_slice(), &[png_at_submit]);

        // further drag events belong to no gesture
        app.handle(InputEvent::PointerMove(Point::new(95, 125)));
        app.handle(InputEvent::PointerUp);
        assert_eq!(app.ledger().len(), 2);
    }

    #[test]
    fn undo_mid_gesture_commits_it_then_removes_it() {
        let mut app = App::new(80, 80, Recorder::answering("0"));
        stroke(&mut app, &[(5, 5), (20, 5)]);
        let after_first = app.surface().bitmap().clone();

        app.handle(InputEvent::PointerDown(Point::new(30, 30)));
        app.handle(InputEvent::PointerMove(Point::new(60, 60)));
        app.handle(InputEvent::Undo);
        app.handle(InputEvent::PointerMove(Point::new(70, 70)));
        app.handle(InputEvent::PointerUp);

        assert_eq!(app.ledger().len(), 1);
        assert_eq!(app.surface().bitmap(), &after_first);
        assert!(app.surface().surfaces_match());
    }
}
