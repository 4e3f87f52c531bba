use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use factcheck_logging::{fc_debug, fc_error, fc_info};

use crate::client::PredictionClient;
use crate::{EngineEvent, FailureKind, PredictionError, PredictionRequest, RequestId};

enum EngineCommand {
    Predict {
        request_id: RequestId,
        request: PredictionRequest,
    },
    Shutdown,
}

/// Runs prediction calls on a background tokio runtime.
///
/// Each submitted request is spawned as its own task and reports back through
/// a single `EngineEvent::PredictionCompleted`. There is no per-request
/// cancellation; `shutdown` drops the runtime along with anything in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn PredictionClient>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let worker = thread::Builder::new()
            .name("factcheck-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    if matches!(command, EngineCommand::Shutdown) {
                        fc_info!("Engine shutting down");
                        break;
                    }
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Hands the request to the runtime. Fails only once the engine thread
    /// is gone, in which case no completion event will ever arrive.
    pub fn submit(
        &self,
        request_id: RequestId,
        request: PredictionRequest,
    ) -> Result<(), PredictionError> {
        self.cmd_tx
            .send(EngineCommand::Predict {
                request_id,
                request,
            })
            .map_err(|_| {
                fc_error!("Engine stopped; request {} was not sent", request_id);
                PredictionError::new(FailureKind::EngineStopped, "engine thread is not running")
            })
    }

    /// Stops the engine thread and waits for it. Later submissions fail.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        let worker = self.worker.lock().ok().and_then(|mut worker| worker.take());
        if let Some(worker) = worker {
            if worker.join().is_err() {
                fc_error!("Engine thread panicked");
            }
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    client: &dyn PredictionClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Predict {
            request_id,
            request,
        } => {
            fc_debug!("request {} dispatched", request_id);
            let result = client.predict(&request).await;
            let _ = event_tx.send(EngineEvent::PredictionCompleted { request_id, result });
        }
        EngineCommand::Shutdown => {}
    }
}
