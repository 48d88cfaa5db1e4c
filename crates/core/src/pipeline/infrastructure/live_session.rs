use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::pipeline::measure_use_case::MeasureUseCase;
use crate::pipeline::measurement::Measurement;
use crate::roi::domain::face_geometry::FaceGeometry;
use crate::shared::yuv_frame::YuvFrame;

/// Live measurement over a frame stream: one worker thread, no queue.
///
/// The submission channel is a rendezvous (capacity zero), so `try_send`
/// succeeds exactly when the worker is parked waiting for work. A frame
/// arriving while a measurement is in flight is dropped, not buffered:
/// freshness over completeness. Results overwrite a single slot; the host
/// polls for the latest.
pub struct LiveSession {
    frame_tx: Option<crossbeam_channel::Sender<(YuvFrame, Option<FaceGeometry>)>>,
    latest: Arc<Mutex<Option<Measurement>>>,
    dropped: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl LiveSession {
    pub fn spawn(use_case: MeasureUseCase) -> Self {
        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<(YuvFrame, Option<FaceGeometry>)>(0);
        let latest: Arc<Mutex<Option<Measurement>>> = Arc::new(Mutex::new(None));
        let slot = latest.clone();

        let worker = std::thread::spawn(move || {
            for (frame, geometry) in frame_rx {
                match use_case.execute(&frame, geometry.as_ref()) {
                    Ok(Some(measurement)) => {
                        *slot.lock().expect("result slot lock poisoned") = Some(measurement);
                    }
                    Ok(None) => {}
                    Err(e) => log::warn!("dropping frame {}: {e}", frame.index()),
                }
            }
        });

        Self {
            frame_tx: Some(frame_tx),
            latest,
            dropped: Arc::new(AtomicU64::new(0)),
            worker: Some(worker),
        }
    }

    /// Offers a frame to the worker.
    ///
    /// Returns `false` when a measurement was in flight and the frame was
    /// dropped. Processing failures never surface here; they are logged by
    /// the worker and the stream moves on.
    pub fn submit(&self, frame: YuvFrame, geometry: Option<FaceGeometry>) -> bool {
        let Some(tx) = self.frame_tx.as_ref() else {
            return false;
        };
        match tx.try_send((frame, geometry)) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("measurement in flight, frame dropped ({dropped} total)");
                false
            }
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => false,
        }
    }

    /// Takes the most recent measurement, if a new one has landed since the
    /// last call.
    pub fn take_latest(&self) -> Option<Measurement> {
        self.latest.lock().expect("result slot lock poisoned").take()
    }

    /// Frames dropped because a measurement was in flight.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stops accepting frames and waits for the worker to finish its
    /// current frame, if any.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.frame_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("measurement worker panicked");
            }
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
