use std::collections::HashMap;
use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const TOKEN: &str = "stub-token-123";
const USERNAME: &str = "testuser";

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum WorkRoute {
    Open,
    Adult,
    Restricted,
    AlwaysRestricted,
    NotFound,
    ServerError,
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveStubConfig {
    pub works: HashMap<String, WorkRoute>,
    pub accept_login: bool,
}

pub struct ArchiveStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ArchiveStub {
    pub fn spawn(config: ArchiveStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start archive stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut logged_in = false;

            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                log.lock()
                    .expect("request log")
                    .push((request.method().to_string(), url.clone()));

                let path = url.split('?').next().unwrap_or(&url).to_string();
                let query = url.split_once('?').map(|(_, q)| q.to_string());

                let (status, body) = if path == "/" {
                    (200, landing_page(logged_in))
                } else if path == "/users/login" {
                    if request.method() == &tiny_http::Method::Post {
                        let mut form = String::new();
                        let _ = request.as_reader().read_to_string(&mut form);
                        if config.accept_login
                            && form.contains(&format!("authenticity_token={TOKEN}"))
                            && form.contains("user%5Blogin%5D=")
                            && form.contains("user%5Bpassword%5D=")
                        {
                            logged_in = true;
                        }
                        (200, "<html><body>submitted</body></html>".to_owned())
                    } else {
                        (200, login_form())
                    }
                } else if let Some(id) = path.strip_prefix("/works/") {
                    match config.works.get(id) {
                        Some(WorkRoute::Open) => (200, work_page(id)),
                        Some(WorkRoute::Adult) => {
                            if query.as_deref() == Some("view_adult=true") {
                                (200, work_page(id))
                            } else {
                                (200, adult_notice(id))
                            }
                        }
                        Some(WorkRoute::Restricted) => {
                            if logged_in {
                                (200, work_page(id))
                            } else {
                                (200, restricted_notice())
                            }
                        }
                        Some(WorkRoute::AlwaysRestricted) => (200, restricted_notice()),
                        Some(WorkRoute::NotFound) | None => (404, "not found".to_owned()),
                        Some(WorkRoute::ServerError) => (500, "internal error".to_owned()),
                        Some(WorkRoute::Empty) => (200, String::new()),
                    }
                } else {
                    (404, "not found".to_owned())
                };

                let mut response = tiny_http::Response::from_string(body).with_status_code(status);
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("build header");
                response = response.with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for ArchiveStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn landing_page(logged_in: bool) -> String {
    if logged_in {
        format!(
            r#"<html><body class="logged-in">
  <a href="/users/{USERNAME}">Hi, {USERNAME}!</a>
</body></html>
"#
        )
    } else {
        r#"<html><body>
  <a href="/users/login">Log In</a>
</body></html>
"#
        .to_owned()
    }
}

fn login_form() -> String {
    format!(
        r#"<html><body>
  <form action="/users/login" method="post">
    <input type="hidden" name="authenticity_token" value="{TOKEN}" />
    <input id="user_login" name="user[login]" type="text" />
    <input id="user_password" name="user[password]" type="password" />
    <input type="submit" value="Log In" />
  </form>
</body></html>
"#
    )
}

fn work_page(id: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><title>Work {id}</title></head>
<body>
  <dl class="work meta group">
    <dt class="rating tags">Rating:</dt>
    <dd class="rating tags"><ul class="commas"><li><a class="tag" href="/tags/general">General Audiences</a></li></ul></dd>
    <dt class="fandom tags">Fandoms:</dt>
    <dd class="fandom tags"><ul class="commas"><li><a class="tag" href="/tags/testdom">Testdom</a></li></ul></dd>
  </dl>
  <div id="workskin">
    <div class="preface group">
      <h2 class="title heading">Work {id} Title</h2>
      <h3 class="byline heading"><a rel="author" href="/users/author{id}">author{id}</a></h3>
      <div class="summary module">
        <h3 class="heading">Summary:</h3>
        <blockquote class="userstuff"><p>Summary of work {id}.</p></blockquote>
      </div>
    </div>
  </div>
</body>
</html>
"#
    )
}

fn adult_notice(id: &str) -> String {
    format!(
        r#"<html><body>
  <p class="caution">This work could have adult content. If you proceed you have
  agreed that you are willing to see such content.</p>
  <a href="/works/{id}?view_adult=true">Proceed</a>
</body></html>
"#
    )
}

fn restricted_notice() -> String {
    r#"<html><body>
  <p class="notice">This work is only available to registered users of the
  Archive. Log in or create an account.</p>
</body></html>
"#
    .to_owned()
}
