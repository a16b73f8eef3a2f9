use reqwest::Response;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

// Reddit allows 60 OAuth requests per minute per client.
const SOFT_LIMIT_PER_MINUTE: u32 = 60;

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
}

struct RateLimitState {
    remaining: f32,
    reset_at: Option<std::time::Instant>,
    requests_this_minute: u32,
    minute_start: std::time::Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: SOFT_LIMIT_PER_MINUTE as f32,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: std::time::Instant::now(),
            })),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        // Header-driven wait when the API says the window is exhausted.
        if state.remaining < 1.0 {
            if let Some(reset_at) = state.reset_at {
                let now = std::time::Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Rate limited, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                    state.remaining = SOFT_LIMIT_PER_MINUTE as f32;
                }
            }
        }

        // Soft rate limiting regardless of headers.
        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= SOFT_LIMIT_PER_MINUTE {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                drop(state);
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state = self.state.lock().await;
                state.requests_this_minute = 0;
                state.minute_start = std::time::Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = std::time::Instant::now();
        }

        state.requests_this_minute += 1;
    }

    /// Reads Reddit's rate headers: `x-ratelimit-remaining` is a float
    /// count, `x-ratelimit-reset` is seconds until the window resets.
    pub fn update_from_response(&self, response: &Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f32>().ok())
        {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let state = self.state.clone();
            tokio::spawn(async move {
                let mut state = state.lock().await;
                state.remaining = remaining;
                if let Some(reset_secs) = reset {
                    state.reset_at =
                        Some(std::time::Instant::now() + Duration::from_secs(reset_secs));
                }
            });
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
