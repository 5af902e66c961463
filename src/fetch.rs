use anyhow::Context as _;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::ids::WorkId;
use crate::session::Session;

const ADULT_MARKER: &str = "This work could have adult content";
const RESTRICTED_MARKER: &str = "This work is only available to registered users";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("work not found (404)")]
    NotFound,
    #[error("work is only available to registered users")]
    Restricted,
    #[error("unexpected status {status}")]
    Status { status: u16 },
    #[error("empty response body")]
    EmptyBody,
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::EmptyBody | Self::Transport(_)
        )
    }
}

pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let base = Url::parse(raw).context("parse --base-url")?;
    if base.scheme() != "http" && base.scheme() != "https" {
        anyhow::bail!("--base-url must be http/https: {base}");
    }
    Ok(base)
}

pub fn work_url(base: &Url, id: &WorkId) -> Url {
    let mut url = base.clone();
    let path = format!("{}/works/{}", url.path().trim_end_matches('/'), id);
    url.set_path(&path);
    url.set_query(None);
    url
}

fn adult_url(base: &Url, id: &WorkId) -> Url {
    let mut url = work_url(base, id);
    url.set_query(Some("view_adult=true"));
    url
}

pub async fn fetch_work(session: &Session, base: &Url, id: &WorkId) -> Result<String, FetchError> {
    let mut body = get_page(session, work_url(base, id)).await?;

    if body.contains(ADULT_MARKER) {
        tracing::debug!(%id, "adult content notice, refetching with view_adult");
        body = get_page(session, adult_url(base, id)).await?;
    }

    if body.contains(RESTRICTED_MARKER) {
        return Err(FetchError::Restricted);
    }
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    Ok(body)
}

async fn get_page(session: &Session, url: Url) -> Result<String, FetchError> {
    let response = session.client().get(url).send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
