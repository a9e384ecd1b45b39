use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};

const MAX_ENTRIES: usize = 64;

static CACHE: Lazy<Mutex<HttpCache>> = Lazy::new(|| Mutex::new(HttpCache::default()));

#[derive(Debug, Default)]
struct HttpCache {
    entries: HashMap<String, CacheEntry>,
    // Bumped on every store; the smallest value is evicted first.
    clock: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    stored_at: u64,
}

impl HttpCache {
    fn store(&mut self, key: &str, mut entry: CacheEntry) {
        self.clock += 1;
        entry.stored_at = self.clock;
        self.entries.insert(key.to_string(), entry);
        while self.entries.len() > MAX_ENTRIES {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

fn with_cache<T>(f: impl FnOnce(&mut HttpCache) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// GET with `If-None-Match`/`If-Modified-Since` revalidation. A 304 answers
/// with the body kept from the previous 200 for the same URL.
pub fn fetch_text_cached(client: &Client, url: &str, accept: &str) -> Result<String> {
    let cached_entry = with_cache(|cache| cache.entries.get(url).cloned());

    let mut req = client.get(url).header(ACCEPT, accept);
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached_entry {
            let body = entry.body.clone();
            with_cache(|cache| cache.store(url, entry));
            return Ok(body);
        }
        return Err(anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }

    let header_text = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let etag = header_text(ETAG);
    let last_modified = header_text(LAST_MODIFIED);
    if etag.is_some() || last_modified.is_some() {
        let entry = CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            stored_at: 0,
        };
        with_cache(|cache| cache.store(url, entry));
    }
    Ok(body)
}
