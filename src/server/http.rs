use std::collections::HashMap;

use http::StatusCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ServerError;

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
pub(crate) struct HttpRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Vec<u8>,
}

impl HttpRequest {
    pub(crate) fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Header lookup by lowercase name.
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// A request that could not be parsed; answered with `status` and closed.
#[derive(Debug)]
pub(crate) struct RequestError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl RequestError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub(crate) async fn read_http_request<R>(socket: &mut R) -> Result<HttpRequest, RequestError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::bad_request(format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(RequestError::bad_request("Empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::bad_request("Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(RequestError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request too large",
            ));
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| RequestError::bad_request("Malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| RequestError::bad_request(format!("Invalid request encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| RequestError::bad_request("Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RequestError::bad_request("Missing HTTP method"))?;
    let target = parts
        .next()
        .ok_or_else(|| RequestError::bad_request("Missing request path"))?;
    if !parts.next().is_some_and(|version| version.starts_with("HTTP/")) {
        return Err(RequestError::bad_request("Missing HTTP version"));
    }

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(RequestError::bad_request("Malformed header"));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    let content_length = match headers.get("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_parse| RequestError::bad_request("Invalid Content-Length"))?,
        None => 0,
    };
    if content_length > MAX_REQUEST_BYTES {
        return Err(RequestError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large",
        ));
    }
    let body_start = header_end
        .checked_add(4)
        .ok_or_else(|| RequestError::bad_request("Malformed request headers"))?;
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::bad_request(format!("Failed to read body: {}", err)))?;
        if bytes == 0 {
            break;
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::bad_request("Invalid read length"))?;
        body.extend_from_slice(read_slice);
    }
    body.truncate(content_length);

    let (path, query) = split_target(target);

    Ok(HttpRequest {
        method: method.to_ascii_uppercase(),
        path,
        query,
        headers,
        body,
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn split_target(target: &str) -> (String, Vec<(String, String)>) {
    let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
    let query = url::form_urlencoded::parse(raw_query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    (path.to_owned(), query)
}

#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub(crate) status: StatusCode,
    pub(crate) content_type: &'static str,
    pub(crate) headers: Vec<(&'static str, String)>,
    pub(crate) body: Vec<u8>,
}

impl HttpResponse {
    pub(crate) fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            headers: Vec::new(),
            body: body.into().into_bytes(),
        }
    }

    pub(crate) fn html(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html; charset=utf-8",
            headers: Vec::new(),
            body: body.into_bytes(),
        }
    }

    pub(crate) fn png(body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "image/png",
            headers: vec![("Cache-Control", "public, max-age=86400".to_owned())],
            body: body.to_vec(),
        }
    }

    pub(crate) fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub(crate) fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl From<RequestError> for HttpResponse {
    fn from(err: RequestError) -> Self {
        Self::text(err.status, err.message)
    }
}

pub(crate) async fn write_response<W>(socket: &mut W, response: &HttpResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("Unknown"),
        response.content_type,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("Connection: close\r\n\r\n");

    socket
        .write_all(head.as_bytes())
        .await
        .map_err(|err| ServerError::WriteResponse { source: err })?;
    socket
        .write_all(&response.body)
        .await
        .map_err(|err| ServerError::WriteResponse { source: err })?;
    socket
        .flush()
        .await
        .map_err(|err| ServerError::WriteResponse { source: err })
}
