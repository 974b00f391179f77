use crate::error::FetchError;
use crate::pipeline::{CancelToken, FetchBatch, FetchContext, FetchReply, PendingFetch};
use crate::suggestion::{RawItem, Suggestion};
use net::Transport;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tools::text::prefix_key;

fn list_str<'a>(ctx: &'a FetchContext<'_>) -> Result<&'a str, FetchError> {
    ctx.options()
        .list
        .as_str()
        .ok_or(FetchError::ListShape { expected: "a string" })
}

/// The `list` option verbatim.
pub fn array(ctx: &FetchContext<'_>, _: &str, _: CancelToken) -> FetchReply {
    match &ctx.options().list {
        Value::Array(items) => FetchReply::items(items.iter().cloned().map(RawItem::from).collect()),
        _ => FetchReply::failed(FetchError::ListShape { expected: "an array" }),
    }
}

/// Trimmed text of every element matching the selector in `list`.
pub fn elements(ctx: &FetchContext<'_>, _: &str, _: CancelToken) -> FetchReply {
    let result = list_str(ctx)
        .and_then(|selector| ctx.doc.many(selector, None).map_err(FetchError::from));
    match result {
        Ok(found) => FetchReply::items(
            found
                .into_iter()
                .map(|el| Suggestion::from_value(ctx.doc.text_content(el).trim()).into())
                .collect(),
        ),
        Err(err) => FetchReply::failed(err),
    }
}

/// `<option>` children of the `<datalist>` (or `<select>`) matching `list`.
pub fn data_list(ctx: &FetchContext<'_>, _: &str, _: CancelToken) -> FetchReply {
    let result = list_str(ctx).and_then(|selector| -> Result<_, FetchError> {
        let Some(list) = ctx.doc.one(selector, None)? else {
            return Ok(Vec::new());
        };
        Ok(ctx.doc.many("option", Some(list))?)
    });
    match result {
        Ok(options) => FetchReply::items(
            options
                .into_iter()
                .map(|option| {
                    let label = ctx.doc.text_content(option).trim().to_string();
                    let value = ctx
                        .doc
                        .attribute(option, "value")
                        .map_or_else(|| label.clone(), str::to_string);
                    Suggestion::new(label, value).into()
                })
                .collect(),
        ),
        Err(err) => FetchReply::failed(err),
    }
}

/// `list` parsed as a JSON array.
pub fn json(ctx: &FetchContext<'_>, _: &str, _: CancelToken) -> FetchReply {
    let result = list_str(ctx)
        .and_then(|raw| serde_json::from_str::<Vec<Value>>(raw).map_err(FetchError::from));
    match result {
        Ok(items) => FetchReply::items(items.into_iter().map(RawItem::from).collect()),
        Err(err) => FetchReply::failed(err),
    }
}

/// `list` split on commas; entries are trimmed and empty ones dropped.
pub fn string(ctx: &FetchContext<'_>, _: &str, _: CancelToken) -> FetchReply {
    match list_str(ctx) {
        Ok(raw) => FetchReply::items(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(RawItem::from)
                .collect(),
        ),
        Err(err) => FetchReply::failed(err),
    }
}

#[derive(Deserialize)]
struct AjaxResponse {
    status: String,
    #[serde(default)]
    payload: AjaxPayload,
}

#[derive(Deserialize, Default)]
struct AjaxPayload {
    items: Option<Vec<Value>>,
    suggestions: Option<Vec<Value>>,
}

/// GETs `list?q=<query>` on a worker thread. Batches are served from the
/// prefix cache when possible and marked for caching on success.
pub fn ajax(ctx: &FetchContext<'_>, query: &str, cancel: CancelToken) -> FetchReply {
    let options = ctx.options();
    let key = prefix_key(query, options.min_chars);

    if !options.disable_cache {
        if let Some(items) = ctx.typeahead.cache().get(&key) {
            log::trace!(target: "typeahead.fetch", "cache hit for {key:?}");
            return FetchReply::items(items.to_vec());
        }
    }

    let base = match list_str(ctx) {
        Ok(base) => base,
        Err(err) => return FetchReply::failed(err),
    };
    let url = net::with_query_param(base, "q", query);
    let transport = ctx.typeahead.transport();
    let cache_key = (!options.disable_cache).then_some(key);

    // A cacheable request runs even once superseded; its batch still fills
    // the cache when it lands.
    let skip = match cache_key {
        Some(_) => Arc::new(AtomicBool::new(false)),
        None => cancel.flag(),
    };
    log::debug!(target: "typeahead.fetch", "GET {url}");
    let rx = net::spawn_job(skip, move || -> Result<FetchBatch, FetchError> {
        let items = request(transport.as_ref(), &url)?;
        Ok(match (items, cache_key) {
            (Some(items), Some(key)) => FetchBatch::new(items).cached_under(key),
            (Some(items), None) => FetchBatch::new(items),
            (None, _) => FetchBatch::default(),
        })
    });
    FetchReply::Pending(PendingFetch::new(rx))
}

/// `Ok(None)` for a well-formed response whose status is not `success`.
fn request(transport: &dyn Transport, url: &str) -> Result<Option<Vec<RawItem>>, FetchError> {
    let response = transport.get(url)?;
    let parsed: AjaxResponse = serde_json::from_str(&response.body)?;
    if parsed.status != "success" {
        log::debug!(target: "typeahead.fetch", "{url} answered status {:?}", parsed.status);
        return Ok(None);
    }
    let items = parsed
        .payload
        .items
        .or(parsed.payload.suggestions)
        .unwrap_or_default();
    Ok(Some(items.into_iter().map(RawItem::from).collect()))
}
