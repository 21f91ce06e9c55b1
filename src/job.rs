// Runs one solver call off the event thread.
// Visual: the window keeps repainting while the answer is on its way; when it
// arrives, the event thread (and only it) paints it.

use crate::error::Error;
use crate::gateway::Solver;
use crate::types::Point;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, warn};

/// What the worker posts back.
#[derive(Debug)]
pub struct SolveOutcome {
    pub anchor: Point,
    pub result: Result<String, Error>,
}

/// Handle to an in-flight solve.
pub struct SolveJob {
    anchor: Point,
    cancelled: Arc<AtomicBool>,
    rx: Receiver<Result<String, Error>>,
}

impl SolveJob {
    /// Start solving `png` on a worker thread. `anchor` rides along so the answer
    /// lands where the drawing was when the user asked.
    pub fn spawn(solver: Arc<dyn Solver>, png: Vec<u8>, anchor: Point) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        thread::spawn(move || {
            if flag.load(Ordering::Acquire) {
                return;
            }
            let result = solver.solve(&png);
            if flag.load(Ordering::Acquire) {
                debug!("solve finished after cancel; result dropped");
                return;
            }
            // Receiver gone means the app shut down.
            let _ = tx.send(result);
        });
        Self { anchor, cancelled, rx }
    }

    /// Ask the worker to discard its result. The HTTP call itself runs to
    /// completion (or its timeout) in the background.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Non-blocking check, called once per frame. `None` while still running.
    pub fn poll(&self) -> Option<SolveOutcome> {
        if self.is_cancelled() {
            return Some(self.outcome(Err(Error::Cancelled)));
        }
        match self.rx.try_recv() {
            Ok(result) => Some(self.outcome(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("solve worker exited without a result");
                Some(self.outcome(Err(Error::Cancelled)))
            }
        }
    }

    /// Block until the worker answers.
    pub fn wait(self) -> SolveOutcome {
        if self.is_cancelled() {
            return self.outcome(Err(Error::Cancelled));
        }
        let result = self.rx.recv().unwrap_or(Err(Error::Cancelled));
        self.outcome(result)
    }

    fn outcome(&self, result: Result<String, Error>) -> SolveOutcome {
        SolveOutcome { anchor: self.anchor, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc::Sender;
    use std::time::{Duration, Instant};

    struct Fixed(&'static str);

    impl Solver for Fixed {
        fn solve(&self, _png: &[u8]) -> Result<String, Error> {
            Ok(self.0.to_owned())
        }
    }

    /// Holds the worker until the test releases it.
    struct Gated {
        release: Mutex<Receiver<()>>,
        done: Mutex<Sender<()>>,
    }

    impl Solver for Gated {
        fn solve(&self, _png: &[u8]) -> Result<String, Error> {
            let _ = self.release.lock().expect("lock").recv();
            let _ = self.done.lock().expect("lock").send(());
            Ok("late".into())
        }
    }

    #[test]
    fn wait_returns_solver_answer_with_anchor() {
        let job = SolveJob::spawn(Arc::new(Fixed("7")), vec![1, 2, 3], Point::new(4, 5));
        let outcome = job.wait();
        assert_eq!(outcome.anchor, Point::new(4, 5));
        assert_eq!(outcome.result.expect("answer"), "7");
    }

    #[test]
    fn poll_eventually_yields_the_answer() {
        let job = SolveJob::spawn(Arc::new(Fixed("42")), Vec::new(), Point::new(0, 0));
        let deadline = Instant::now() + Duration::from_secs(5);
        let outcome = loop {
            if let Some(outcome) = job.poll() {
                break outcome;
            }
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(outcome.result.expect("answer"), "42");
    }

    #[test]
    fn cancelled_job_discards_a_late_answer() {
        let (release_tx, release_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let solver = Gated { release: Mutex::new(release_rx), done: Mutex::new(done_tx) };
        let job = SolveJob::spawn(Arc::new(solver), Vec::new(), Point::new(1, 1));

        job.cancel();
        release_tx.send(()).expect("release worker");
        done_rx.recv_timeout(Duration::from_secs(5)).expect("worker finished");

        assert!(matches!(job.poll().map(|o| o.result), Some(Err(Error::Cancelled))));
        assert!(matches!(job.wait().result, Err(Error::Cancelled)));
    }
}
