//! HTTP front end: a link form on `GET /` and the archive endpoint on `POST /`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use log::{error, info};
use serde::Serialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::constants::LINK_FORM_FIELD;
use crate::service::Archiver;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MAX_BODY_BYTES: u64 = 16 * 1024;

pub async fn run(address: SocketAddr, archiver: Archiver) {
    info!("Listening on http://{}", address);
    warp::serve(routes(archiver)).run(address).await
}

pub fn routes(archiver: Archiver) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index_route = warp::path::end()
        .and(warp::get())
        .and(with_archiver(archiver.clone()))
        .map(index);

    let upload_route = warp::path::end()
        .and(warp::post())
        .and(link_body())
        .and(with_archiver(archiver))
        .and_then(upload);

    index_route.or(upload_route).recover(rejection)
}

fn with_archiver(archiver: Archiver) -> impl Filter<Extract = (Archiver,), Error = Infallible> + Clone {
    warp::any().map(move || archiver.clone())
}

/// The link comes from the form field, or from the raw body when the
/// request is not form-encoded.
fn link_body() -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    let form = warp::header::<String>("content-type")
        .and_then(|content_type: String| async move {
            if content_type.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE) {
                Ok(())
            } else {
                Err(warp::reject())
            }
        })
        .untuple_one()
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::form::<HashMap<String, String>>())
        .map(|mut form: HashMap<String, String>| {
            form.remove(LINK_FORM_FIELD).unwrap_or_default()
        });

    let raw = warp::body::content_length_limit(MAX_BODY_BYTES)
        .and(warp::body::bytes())
        .and_then(|body: Bytes| async move {
            String::from_utf8(body.to_vec()).map_err(|_| warp::reject::custom(InvalidBody))
        });

    form.or(raw).unify()
}

fn index(archiver: Archiver) -> impl Reply {
    warp::reply::html(render_index(archiver.bucket()))
}

async fn upload(link: String, archiver: Archiver) -> Result<impl Reply, Infallible> {
    let report = archiver.archive(&link).await;
    let status = StatusCode::from_u16(report.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(warp::reply::with_status(warp::reply::json(&report), status))
}

fn render_index(bucket: Option<&str>) -> String {
    let bucket = bucket.map(escape_html).unwrap_or_else(|| "(not configured)".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>video-vault</title></head>
<body>
<h1>Archive a video</h1>
<p>Destination bucket: <code>{bucket}</code></p>
<form method="post" action="/">
<input type="text" name="{field}" placeholder="https://" size="60">
<button type="submit">Upload</button>
</form>
</body>
</html>
"#,
        bucket = bucket,
        field = LINK_FORM_FIELD
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug)]
struct InvalidBody;
impl warp::reject::Reject for InvalidBody {}

#[derive(Serialize)]
struct ErrorMessage {
    code: u16,
    message: String,
}

async fn rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found.")
    } else if err.find::<InvalidBody>().is_some() {
        (StatusCode::BAD_REQUEST, "Request body must be UTF-8 text.")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large.")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header required.")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
    } else {
        error!("Error: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
    };

    let json = warp::reply::json(&ErrorMessage {
        code: code.as_u16(),
        message: message.into(),
    });

    Ok(warp::reply::with_status(json, code))
}
