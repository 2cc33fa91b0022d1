use repose_reactive::LocalBoxFuture;
use reqwest::multipart::{Form, Part};

use crate::body::{FormData, FormPart};
use crate::client::{HttpClient, OutgoingBody, Request, Response};
use crate::error::TransportError;

/// [`HttpClient`] backed by `reqwest`.
///
/// On wasm this goes through the browser's `fetch`. Natively the returned
/// futures need a Tokio reactor: build the [`FetchRuntime`](crate::FetchRuntime)
/// with a [`TokioSpawner`](repose_reactive::TokioSpawner) and drive it with
/// its `block_on`.
#[derive(Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, TransportError>> {
        let client = self.inner.clone();
        Box::pin(async move {
            let mut builder = client
                .request(request.method, request.url.as_str())
                .headers(request.headers);

            builder = match request.body {
                None => builder,
                Some(OutgoingBody::Text(text)) => builder.body(text),
                Some(OutgoingBody::Bytes(bytes)) => builder.body(bytes),
                Some(OutgoingBody::Multipart(form)) => builder.multipart(to_multipart(form)?),
            };

            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, TransportError>(Response::new(status, headers, body))
        })
    }
}

fn to_multipart(form: FormData) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for (name, part) in form.parts().iter().cloned() {
        out = match part {
            FormPart::Text(text) => out.text(name, text),
            FormPart::File {
                file_name,
                content_type,
                data,
            } => {
                let mut p = Part::bytes(data.to_vec());
                if let Some(file_name) = file_name {
                    p = p.file_name(file_name);
                }
                if let Some(mime) = content_type {
                    p = p.mime_str(&mime)?;
                }
                out.part(name, p)
            }
        };
    }
    Ok(out)
}
