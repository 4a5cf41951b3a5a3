//! Test support: logging setup and a scripted HTTP transport

use std::collections::VecDeque;
use std::env;
use std::io;
use std::sync::{Mutex, MutexGuard, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{ApiRequest, ApiResponse, HttpTransport};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["ureq", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Build a response with the canonical reason for `status`.
pub fn response(status: u16, body: &str) -> ApiResponse {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "",
    };
    ApiResponse {
        status,
        reason: reason.to_string(),
        body: body.to_string(),
    }
}

enum Scripted {
    Respond(ApiResponse),
    Fail(String),
}

/// Transport that records every request and replays queued responses in order.
///
/// Running out of responses is a connection error.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, status: u16, body: &str) -> Self {
        lock(&self.script).push_back(Scripted::Respond(response(status, body)));
        self
    }

    /// Queue a connection failure.
    pub fn fail(self, message: &str) -> Self {
        lock(&self.script).push_back(Scripted::Fail(message.to_string()));
        self
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> io::Result<ApiResponse> {
        lock(&self.requests).push(request.clone());
        match lock(&self.script).pop_front() {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(io::Error::new(io::ErrorKind::ConnectionRefused, message)),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("no scripted response for {}", request.url),
            )),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
