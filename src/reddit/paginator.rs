use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::post::Listing;
use crate::reddit::rate_limiter::RateLimiter;

/// Walks a Reddit listing via the `after` cursor.
pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    /// Fetches pages until `keep` rejects an item, `max_items` is reached,
    /// or the cursor runs out. Listings come back newest first, so a
    /// rejection means everything older is out of range too: the rejected
    /// item and the rest of the feed are dropped.
    pub async fn fetch_while<T, F>(
        &self,
        base_url: &str,
        bearer: &str,
        page_size: u32,
        max_items: u32,
        keep: F,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut all_items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            self.rate_limiter.wait().await;

            let separator = if base_url.contains('?') { "&" } else { "?" };
            let mut url = format!("{}{}limit={}", base_url, separator, page_size);
            if let Some(cursor) = &after {
                url.push_str(&format!("&after={}", cursor));
            }

            tracing::debug!("Fetching: {}", url);
            let response = self.client.get(&url).bearer_auth(bearer).send().await?;
            self.rate_limiter.update_from_response(&response);

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::HttpStatus { status, body });
            }

            let listing: Listing<T> = response.json().await?;
            let page_len = listing.data.children.len();

            let mut out_of_range = false;
            for thing in listing.data.children {
                if !keep(&thing.data) {
                    out_of_range = true;
                    break;
                }
                all_items.push(thing.data);
                if all_items.len() >= max_items as usize {
                    break;
                }
            }

            after = listing.data.after;

            if out_of_range
                || after.is_none()
                || all_items.len() >= max_items as usize
                || page_len == 0
            {
                break;
            }
        }

        all_items.truncate(max_items as usize);
        Ok(all_items)
    }
}
