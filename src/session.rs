use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context as _;
use scraper::{Html, Selector};
use url::Url;

static TOKEN_INPUT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name="authenticity_token"]"#).expect("valid selector")
});

const USER_AGENT: &str = "Mozilla/5.0";

pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> anyhow::Result<Self> {
        let username = std::env::var("WORKSCRAPE_USERNAME")
            .context("WORKSCRAPE_USERNAME is required to scrape restricted works")?;
        let username = username.trim().to_string();
        if username.is_empty() {
            anyhow::bail!("WORKSCRAPE_USERNAME is empty");
        }

        let password = std::env::var("WORKSCRAPE_PASSWORD")
            .context("WORKSCRAPE_PASSWORD is required to scrape restricted works")?;
        if password.is_empty() {
            anyhow::bail!("WORKSCRAPE_PASSWORD is empty");
        }

        Ok(Self { username, password })
    }
}

pub struct Session {
    client: reqwest::Client,
}

impl Session {
    pub fn anonymous(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn login(
        base: &Url,
        credentials: &Credentials,
        timeout: Duration,
        debug_path: &Path,
    ) -> anyhow::Result<Self> {
        let session = Self::anonymous(timeout)?;
        let home = base.clone();
        let login = login_url(base);

        // The archive sets session cookies on the landing page; the form
        // POST needs them.
        session
            .client
            .get(home.clone())
            .send()
            .await
            .with_context(|| format!("fetch landing page: {home}"))?;

        let form_body = session
            .client
            .get(login.clone())
            .send()
            .await
            .with_context(|| format!("fetch login form: {login}"))?
            .text()
            .await
            .context("read login form")?;
        let token = authenticity_token(&form_body)
            .ok_or_else(|| anyhow::anyhow!("login form has no authenticity_token input"))?;

        let params = [
            ("authenticity_token", token.as_str()),
            ("user[login]", credentials.username.as_str()),
            ("user[password]", credentials.password.as_str()),
        ];
        session
            .client
            .post(login)
            .form(&params)
            .send()
            .await
            .context("submit login form")?;

        let confirm = session
            .client
            .get(home)
            .send()
            .await
            .context("confirm login")?
            .text()
            .await
            .context("read login confirmation")?;

        let user_path = format!("/users/{}", credentials.username);
        if !confirm.contains(&user_path) && !confirm.contains("logged-in") {
            std::fs::write(debug_path, &confirm)
                .with_context(|| format!("write login debug page: {}", debug_path.display()))?;
            anyhow::bail!(
                "login for {} was not recognized; response saved to {}",
                credentials.username,
                debug_path.display()
            );
        }

        tracing::info!(username = %credentials.username, "logged in");
        Ok(session)
    }
}

fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("build http client")
}

fn login_url(base: &Url) -> Url {
    let mut url = base.clone();
    let path = format!("{}/users/login", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url
}

fn authenticity_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let input = document.select(&TOKEN_INPUT).next()?;
    input.value().attr("value").map(str::to_owned)
}
