//! Extraction of result media URLs from API responses.

use serde_json::Value;

use crate::history::GenerationType;

fn http_string(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| s.starts_with("http"))
}

fn non_empty_string(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn item_url(item: &Value) -> Option<&str> {
    non_empty_string(item).or_else(|| item.get("url").and_then(non_empty_string))
}

/// Collects image URLs from `{ data: [string | {url}] }`, in order.
#[must_use]
pub fn extract_image_urls(response: &Value) -> Vec<String> {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item_url).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Finds the video URL in any of the shapes the video endpoint returns.
///
/// Accepted: a bare `http…` string, `{url}`, or `{data}` where `data` is an
/// `http…` string, a non-empty array whose first entry is a string or
/// `{url}`, or an object with `url`.
#[must_use]
pub fn extract_video_url(response: &Value) -> Option<String> {
    if let Some(url) = http_string(response) {
        return Some(url.to_string());
    }
    if let Some(url) = response.get("url").and_then(non_empty_string) {
        return Some(url.to_string());
    }

    let data = response.get("data")?;
    let found = match data {
        Value::String(_) => http_string(data),
        Value::Array(items) => items.first().and_then(item_url),
        _ => data.get("url").and_then(non_empty_string),
    };
    found.map(str::to_string)
}

/// Result URLs for a generation kind, primary first.
#[must_use]
pub fn extract_result_urls(kind: GenerationType, response: &Value) -> Vec<String> {
    match kind {
        GenerationType::TextToImage | GenerationType::ImageToImage => extract_image_urls(response),
        GenerationType::VideoGeneration => extract_video_url(response).into_iter().collect(),
    }
}
