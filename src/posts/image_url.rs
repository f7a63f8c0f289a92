// src/posts/image_url.rs
//! Rewrites Notion asset URLs into image-proxy URLs.
//!
//! Every proxied URL has the form
//! `https://www.notion.so/image/<encoded source>?table=<t>&id=<block>&cache=v2`.

use crate::constants::{IMAGE_CACHE_VERSION, NOTION_ORIGIN};
use crate::error::ImageUrlError;
use crate::model::Block;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Unsplash images are served directly, not through the proxy.
const UNSPLASH_ORIGIN: &str = "https://images.unsplash.com";

const SIGNED_URL_PARAMS: [&str; 3] = ["X-Amz-Credential", "X-Amz-Signature", "X-Amz-Algorithm"];

/// Maps a raw asset URL of `block` to its proxied form.
pub fn map_image_url(url: &str, block: &Block) -> Result<String, ImageUrlError> {
    if url.is_empty() {
        return Err(ImageUrlError::Empty);
    }

    if url.starts_with("data:") || url.starts_with(UNSPLASH_ORIGIN) {
        return Ok(url.to_string());
    }

    let mut url = strip_signature(url).unwrap_or_else(|| url.to_string());

    if url.starts_with("/images") {
        url = format!("{}{}", NOTION_ORIGIN, url);
    }

    let proxied = if url.starts_with("/image") {
        format!("{}{}", NOTION_ORIGIN, url)
    } else {
        format!(
            "{}/image/{}",
            NOTION_ORIGIN,
            utf8_percent_encode(&url, URI_COMPONENT)
        )
    };

    let mut proxied =
        Url::parse(&proxied).map_err(|e| ImageUrlError::Malformed(format!("{}: {}", proxied, e)))?;
    set_block_params(&mut proxied, block);
    Ok(proxied.to_string())
}

/// Drops the query of an already signed S3 asset URL.
///
/// Returns `None` when the URL does not parse or is not a fully signed
/// `secure.notion-static.com` asset.
fn strip_signature(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if !parsed.path().starts_with("/secure.notion-static.com") || !host.ends_with(".amazonaws.com")
    {
        return None;
    }

    let signed = SIGNED_URL_PARAMS
        .iter()
        .all(|name| parsed.query_pairs().any(|(key, _)| key == *name));
    signed.then(|| format!("{}{}", parsed.origin().ascii_serialization(), parsed.path()))
}

/// The record table a block's assets are served from.
fn asset_table(block: &Block) -> &str {
    match block.parent_table.as_deref() {
        None | Some("space") | Some("collection") | Some("team") => "block",
        Some(other) => other,
    }
}

/// Sets `table`, `id` and `cache`.
///
/// An existing key keeps its position and drops any repeats; a new key is
/// appended.
fn set_block_params(url: &mut Url, block: &Block) {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    for (name, value) in [
        ("table", asset_table(block)),
        ("id", block.id.as_str()),
        ("cache", IMAGE_CACHE_VERSION),
    ] {
        set_param(&mut pairs, name, value);
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

fn set_param(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter().position(|(key, _)| key == name) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(key, _)| {
                let keep = key != name || index == first;
                index += 1;
                keep
            });
        }
        None => pairs.push((name.to_string(), value.to_string())),
    }
}
