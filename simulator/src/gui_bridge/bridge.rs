use crate::gui_bridge::model::SessionModel;
use log::{error, info};
use serde_json::json;
use squatcore::pose::{RepEvent, TimedFrame};
use squatcore::processing::TrainingSession;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    thread,
};
use tokio::runtime::Builder;
use warp::{Filter, Rejection, Reply};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct SessionPoisoned;

impl warp::reject::Reject for SessionPoisoned {}

struct BridgeState {
    session: TrainingSession,
    last_event: RepEvent,
}

type SharedState = Arc<Mutex<BridgeState>>;

/// Locks the session for one whole request so frames and start/stop never interleave.
fn with_state<T>(
    state: &SharedState,
    f: impl FnOnce(&mut BridgeState) -> T,
) -> Result<T, Rejection> {
    match state.lock() {
        Ok(mut guard) => Ok(f(&mut guard)),
        Err(_) => {
            error!("session lock poisoned");
            Err(warp::reject::custom(SessionPoisoned))
        }
    }
}

/// HTTP bridge an external pose model pushes frames into.
pub struct IngestBridge {
    state: SharedState,
}

impl IngestBridge {
    pub fn new(session: TrainingSession) -> Self {
        Self {
            state: Arc::new(Mutex::new(BridgeState {
                session,
                last_event: RepEvent::None,
            })),
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let status_route = warp::path!("status")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: SharedState| async move {
                let model = with_state(&state, |state| SessionModel {
                    status: state.session.status(),
                    last_event: state.last_event.clone(),
                })?;
                Ok::<_, Rejection>(warp::reply::json(&model))
            });

        let start_route = warp::path!("session" / "start")
            .and(warp::post())
            .and(state_filter.clone())
            .and_then(|state: SharedState| async move {
                with_state(&state, |state| {
                    state.session.start();
                    state.last_event = RepEvent::None;
                })?;
                Ok::<_, Rejection>(warp::reply::json(&json!({"status": "ok"})))
            });

        let stop_route = warp::path!("session" / "stop")
            .and(warp::post())
            .and(state_filter.clone())
            .and_then(|state: SharedState| async move {
                let summary = with_state(&state, |state| {
                    state.last_event = RepEvent::None;
                    state.session.stop()
                })?;
                info!("[GUI] session stopped with {} reps", summary.rep_count);
                Ok::<_, Rejection>(warp::reply::json(&summary))
            });

        let frame_route = warp::path!("frame")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and_then(|frame: TimedFrame, state: SharedState| async move {
                let event = with_state(&state, |state| {
                    let event = state.session.process(&frame);
                    if event != RepEvent::None {
                        state.last_event = event.clone();
                    }
                    event
                })?;
                Ok::<_, Rejection>(warp::reply::json(&event))
            });

        status_route.or(start_route).or(stop_route).or(frame_route)
    }

    /// Serves the routes on a background thread with its own runtime.
    pub fn serve(&self, address: SocketAddr) {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });
        info!("[GUI] ingest bridge listening on {}", address);
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SessionModel {
        let state = self.state.lock().unwrap();
        SessionModel {
            status: state.session.status(),
            last_event: state.last_event.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_session_frames, GeneratorConfig};
    use squatcore::processing::SessionSummary;

    fn post_json<T: serde::Serialize>(path: &str, body: &T) -> warp::test::RequestBuilder {
        warp::test::request().method("POST").path(path).json(body)
    }

    #[tokio::test]
    async fn frames_are_ignored_until_session_starts() {
        let bridge = IngestBridge::new(TrainingSession::default());
        let routes = bridge.routes();
        let frames = build_session_frames(&GeneratorConfig::default()).unwrap();

        let reply = post_json("/frame", &frames[0]).reply(&routes).await;
        assert_eq!(reply.status(), 200);
        let event: RepEvent = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(event, RepEvent::None);
        assert!(!bridge.snapshot().status.active);
    }

    #[tokio::test]
    async fn bridge_counts_pushed_frames() {
        let bridge = IngestBridge::new(TrainingSession::default());
        let routes = bridge.routes();
        let config = GeneratorConfig {
            reps: 2,
            ..Default::default()
        };
        let frames = build_session_frames(&config).unwrap();

        let started = warp::test::request()
            .method("POST")
            .path("/session/start")
            .reply(&routes)
            .await;
        assert_eq!(started.status(), 200);

        for frame in &frames {
            let reply = post_json("/frame", frame).reply(&routes).await;
            assert_eq!(reply.status(), 200);
        }

        let status = warp::test::request()
            .method("GET")
            .path("/status")
            .reply(&routes)
            .await;
        let model: SessionModel = serde_json::from_slice(status.body()).unwrap();
        assert_eq!(model.status.rep_count, 2);
        assert_eq!(model.last_event, RepEvent::RepCompleted { total_count: 2 });

        let stopped = warp::test::request()
            .method("POST")
            .path("/session/stop")
            .reply(&routes)
            .await;
        let summary: SessionSummary = serde_json::from_slice(stopped.body()).unwrap();
        assert_eq!(summary.rep_count, 2);
        assert_eq!(summary.frames_processed, frames.len());
        assert_eq!(bridge.snapshot().status.rep_count, 0);
    }
}
