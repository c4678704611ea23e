//! Browser-side service worker
//!
//! Renders the `sw.js` the site registers, from the same bucket name and
//! manifest the server-side cache uses, so both stay in step on deploy.

/// JavaScript source of the service worker
pub fn render_service_worker(cache_name: &str, manifest: &[String]) -> String {
    // serde_json gives correctly escaped JS string/array literals
    let name = serde_json::Value::from(cache_name).to_string();
    let urls = serde_json::to_string_pretty(manifest).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"const CACHE_NAME = {name};
const urlsToCache = {urls};

self.addEventListener("install", (event) => {{
  event.waitUntil(
    caches.open(CACHE_NAME).then((cache) => cache.addAll(urlsToCache))
  );
}});

self.addEventListener("fetch", (event) => {{
  event.respondWith(
    caches.match(event.request).then((response) => response || fetch(event.request))
  );
}});
"#
    )
}
