use std::pin::pin;
use std::rc::Rc;

use futures_util::future::{select, Either};
use gloo::net::http::Request;
use gloo::timers::future::TimeoutFuture;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use zaseki_core::{CommitError, CommitOutcome, PlayRequest};

/// A hung network call would otherwise pin the card in `committing` forever.
pub(crate) const COMMIT_TIMEOUT_MS: u32 = 8_000;

pub(crate) type CommitHook = Rc<dyn Fn(CommitOutcome)>;

/// Seam between the board and whatever acknowledges a play. The hook fires
/// exactly once per submitted request, back on the UI context.
pub(crate) trait CommitSink {
    fn submit(&self, request: PlayRequest, on_done: CommitHook);
}

/// Endpoint-less mode: every play is acknowledged locally on the next tick,
/// so the board works standalone.
pub(crate) struct LocalCommitAdapter;

impl CommitSink for LocalCommitAdapter {
    fn submit(&self, request: PlayRequest, on_done: CommitHook) {
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            gloo::console::log!(
                "local play acknowledged",
                request.card_id.to_string(),
                request.seat_id.to_string()
            );
            on_done(CommitOutcome::Acknowledged);
        });
    }
}

/// Posts the play to the configured endpoint. Success requires a 2xx status
/// and a JSON-parseable body; everything else, including the timeout, is a
/// uniform failure.
pub(crate) struct RemoteCommitAdapter {
    endpoint: String,
}

impl RemoteCommitAdapter {
    pub(crate) fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

impl CommitSink for RemoteCommitAdapter {
    fn submit(&self, request: PlayRequest, on_done: CommitHook) {
        let endpoint = self.endpoint.clone();
        spawn_local(async move {
            let outcome = match post_play(&endpoint, &request).await {
                Ok(body) => {
                    gloo::console::log!(
                        "play acknowledged",
                        request.card_id.to_string(),
                        request.seat_id.to_string(),
                        body.to_string()
                    );
                    CommitOutcome::Acknowledged
                }
                Err(err) => {
                    gloo::console::warn!("play rejected", err.to_string());
                    CommitOutcome::Failed(err)
                }
            };
            on_done(outcome);
        });
    }
}

async fn post_play(endpoint: &str, request: &PlayRequest) -> Result<Value, CommitError> {
    let http_request = Request::post(endpoint)
        .json(request)
        .map_err(|err| CommitError::Transport(err.to_string()))?;

    let send = pin!(http_request.send());
    let timeout = pin!(TimeoutFuture::new(COMMIT_TIMEOUT_MS));
    let response = match select(send, timeout).await {
        Either::Left((result, _)) => {
            result.map_err(|err| CommitError::Transport(err.to_string()))?
        }
        Either::Right(_) => return Err(CommitError::TimedOut),
    };

    if !response.ok() {
        return Err(CommitError::Status(response.status()));
    }
    response
        .json::<Value>()
        .await
        .map_err(|err| CommitError::InvalidBody(err.to_string()))
}
