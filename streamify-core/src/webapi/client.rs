use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::{http::Response, Agent, Body};
use url::Url;

use crate::{
    error::Error,
    session::Identity,
    util::default_ureq_agent_builder,
};

use super::{
    model::{
        AccountUpdate, AuthResponse, AvatarEnvelope, AvatarSets, ContentBuckets, ContentRef,
        Credentials, ErrorBody, Id, PinCheck, Profile, Registration, SynopsisResponse,
    },
    ApiRoot, Backend,
};

/// Blocking HTTP client for the Streamify backend.
pub struct WebApi {
    agent: Agent,
    root: ApiRoot,
}

impl WebApi {
    pub fn new(root: ApiRoot, proxy_url: Option<&str>) -> Self {
        Self {
            agent: default_ureq_agent_builder(proxy_url).build().into(),
            root,
        }
    }

    pub fn with_timeout(root: ApiRoot, proxy_url: Option<&str>, timeout: Duration) -> Self {
        Self {
            agent: default_ureq_agent_builder(proxy_url)
                .timeout_global(Some(timeout))
                .build()
                .into(),
            root,
        }
    }

    pub fn root(&self) -> &ApiRoot {
        &self.root
    }

    fn request(&self, request: &RequestBuilder) -> Result<Response<Body>, Error> {
        let url = request.build(&self.root)?;
        log::debug!("{:?} {}", request.method, url.path());

        let auth = request.token.as_ref().map(|t| format!("Bearer {}", t));
        let response = match request.method {
            Method::Get => {
                let mut req = self.agent.get(url.as_str());
                if let Some(auth) = &auth {
                    req = req.header("Authorization", auth);
                }
                req.call()?
            }
            Method::Post | Method::Put => {
                let mut req = match request.method {
                    Method::Put => self.agent.put(url.as_str()),
                    _ => self.agent.post(url.as_str()),
                };
                if let Some(auth) = &auth {
                    req = req.header("Authorization", auth);
                }
                match &request.body {
                    Some(body) => req.send_json(body)?,
                    None => req.send_empty()?,
                }
            }
        };
        Self::check_status(response)
    }

    /// Turn non-success responses into `Error::Rejected`, carrying the
    /// backend's `message` if it sent one.
    fn check_status(mut response: Response<Body>) -> Result<Response<Body>, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .body_mut()
            .read_to_string()
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message);
        log::warn!("request rejected with {}: {:?}", status, message);
        Err(Error::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Send a request, throw away the response body.
    fn send(&self, request: &RequestBuilder) -> Result<(), Error> {
        self.request(request).map(|_| ())
    }

    /// Send a request and return the raw JSON body.
    fn load_value(&self, request: &RequestBuilder) -> Result<serde_json::Value, Error> {
        let mut response = self.request(request)?;
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request and return the deserialized JSON body.
    fn load<T: DeserializeOwned>(&self, request: &RequestBuilder) -> Result<T, Error> {
        let value = self.load_value(request)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Auth endpoints.
impl WebApi {
    fn login_request(&self, credentials: &Credentials) -> Result<Identity, Error> {
        let body = serde_json::to_value(credentials)?;
        let request = RequestBuilder::new("auth/login", Method::Post).body(body);
        let response: AuthResponse = self.load(&request)?;
        Ok(Identity::from_auth(response))
    }

    fn register_request(&self, registration: &Registration) -> Result<(), Error> {
        let body = serde_json::to_value(registration)?;
        self.send(&RequestBuilder::new("auth/register", Method::Post).body(body))
    }

    fn update_account_request(&self, token: &str, update: &AccountUpdate) -> Result<(), Error> {
        let body = serde_json::to_value(update)?;
        self.send(
            &RequestBuilder::new("auth/profile", Method::Put)
                .auth(token)
                .body(body),
        )
    }

    fn avatars_request(&self) -> Result<AvatarSets, Error> {
        let envelope: AvatarEnvelope =
            self.load(&RequestBuilder::new("auth/avatars", Method::Get))?;
        Ok(envelope.into())
    }
}

/// Catalog endpoints.
impl WebApi {
    fn content_request(&self, token: &str) -> Result<ContentBuckets, Error> {
        let value = self.load_value(&RequestBuilder::new("content", Method::Get).auth(token))?;
        Ok(ContentBuckets::from_value(value)?)
    }

    fn synopsis_request(&self, token: &str, name: &str) -> Result<Option<String>, Error> {
        let request = RequestBuilder::new("sinopse", Method::Get)
            .auth(token)
            .query("nome", name);
        let response: SynopsisResponse = self.load(&request)?;
        Ok(response
            .description
            .filter(|description| !description.trim().is_empty()))
    }

    fn content_event(&self, path: &str, token: &str, content: &Id) -> Result<(), Error> {
        let body = serde_json::to_value(ContentRef {
            conteudo_id: content,
        })?;
        self.send(&RequestBuilder::new(path, Method::Post).auth(token).body(body))
    }
}

/// Profile endpoints.
impl WebApi {
    fn profiles_request(&self, token: &str) -> Result<Vec<Profile>, Error> {
        let value = self.load_value(&RequestBuilder::new("perfis", Method::Get).auth(token));
        let value = match value {
            Ok(value) => value,
            Err(err) if err.is_decode() => {
                log::warn!("profile list is not JSON: {}", err);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        match serde_json::from_value(value) {
            Ok(profiles) => Ok(profiles),
            Err(err) => {
                log::warn!("unexpected profile list shape: {}", err);
                Ok(Vec::new())
            }
        }
    }

    fn create_profile_request(&self, token: &str, name: &str) -> Result<Profile, Error> {
        let request = RequestBuilder::new("perfis", Method::Post)
            .auth(token)
            .body(serde_json::json!({ "nome": name }));
        self.load(&request)
    }

    fn validate_pin_request(&self, token: &str, profile: &Id, pin: &str) -> Result<bool, Error> {
        let request = RequestBuilder::new(format!("perfis/validar-pin/{}", profile), Method::Post)
            .auth(token)
            .body(serde_json::json!({ "pin": pin }));
        match self.load::<PinCheck>(&request) {
            Ok(check) => Ok(check.valid),
            // Unknown profiles and wrong PINs look the same to the caller.
            Err(Error::Rejected { status, .. }) if (400..500).contains(&status) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl Backend for WebApi {
    fn login(&self, credentials: &Credentials) -> Result<Identity, Error> {
        self.login_request(credentials)
    }

    fn register(&self, registration: &Registration) -> Result<(), Error> {
        self.register_request(registration)
    }

    fn update_account(&self, token: &str, update: &AccountUpdate) -> Result<(), Error> {
        self.update_account_request(token, update)
    }

    fn content(&self, token: &str) -> Result<ContentBuckets, Error> {
        self.content_request(token)
    }

    fn synopsis(&self, token: &str, name: &str) -> Result<Option<String>, Error> {
        self.synopsis_request(token, name)
    }

    fn avatars(&self) -> Result<AvatarSets, Error> {
        self.avatars_request()
    }

    fn profiles(&self, token: &str) -> Result<Vec<Profile>, Error> {
        self.profiles_request(token)
    }

    fn create_profile(&self, token: &str, name: &str) -> Result<Profile, Error> {
        self.create_profile_request(token, name)
    }

    fn validate_pin(&self, token: &str, profile: &Id, pin: &str) -> Result<bool, Error> {
        self.validate_pin_request(token, profile, pin)
    }

    fn favorite(&self, token: &str, content: &Id) -> Result<(), Error> {
        self.content_event("favorites", token, content)
    }

    fn register_watch(&self, token: &str, content: &Id) -> Result<(), Error> {
        self.content_event("watch", token, content)
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
    Put,
}

#[derive(Debug, Clone)]
struct RequestBuilder {
    path: String,
    method: Method,
    token: Option<String>,
    queries: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl RequestBuilder {
    fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
            token: None,
            queries: Vec::new(),
            body: None,
        }
    }

    fn auth(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.queries.push((key.into(), value.into()));
        self
    }

    fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    fn build(&self, root: &ApiRoot) -> Result<Url, Error> {
        let mut url = root.endpoint(&self.path)?;
        if !self.queries.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.queries {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    use super::*;

    /// Answer exactly one request with `status` and `body`, returning the
    /// request line it saw.
    fn serve_once(status: &str, body: &str) -> (WebApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let root = ApiRoot::new(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            request_line.trim_end().to_string()
        });
        // Never route the local stub through a proxy from the environment.
        let api = WebApi {
            agent: default_ureq_agent_builder(None)
                .proxy(None)
                .timeout_global(Some(Duration::from_secs(5)))
                .build()
                .into(),
            root,
        };
        (api, server)
    }

    #[test]
    fn query_values_are_escaped() {
        let root = ApiRoot::new("https://api.streamhivex.icu").unwrap();
        let url = RequestBuilder::new("sinopse", Method::Get)
            .query("nome", "Lost in Time & Space")
            .build(&root)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.streamhivex.icu/api/sinopse?nome=Lost+in+Time+%26+Space"
        );
    }

    #[test]
    fn unreachable_backend_is_a_connectivity_error() {
        let root = ApiRoot::new("http://127.0.0.1:9").unwrap();
        let api = WebApi::with_timeout(root, None, Duration::from_millis(500));
        let err = api.content("token").unwrap_err();
        assert!(err.is_connectivity(), "unexpected error: {err}");
    }

    #[test]
    fn profile_list_that_is_not_json_is_empty() {
        let (api, server) = serve_once("200 OK", "<html>maintenance</html>");
        assert_eq!(api.profiles("token").unwrap(), Vec::new());
        assert_eq!(server.join().unwrap(), "GET /api/perfis HTTP/1.1");
    }

    #[test]
    fn wrapped_profile_list_is_empty() {
        let (api, server) = serve_once("200 OK", r#"{"data":[{"id":1,"nome":"Ana"}]}"#);
        assert_eq!(api.profiles("token").unwrap(), Vec::new());
        server.join().unwrap();
    }

    #[test]
    fn bare_profile_list_is_decoded() {
        let (api, server) = serve_once("200 OK", r#"[{"id":1,"nome":"Ana","pin":4321}]"#);
        let profiles = api.profiles("token").unwrap();
        assert_eq!(profiles.len(), 1);
        assert!(profiles[0].is_protected());
        server.join().unwrap();
    }

    #[test]
    fn forbidden_pin_check_is_an_invalid_pin() {
        let (api, server) = serve_once("403 Forbidden", r#"{"message":"PIN incorreto"}"#);
        assert!(!api.validate_pin("token", &Id::from(7), "0000").unwrap());
        assert_eq!(server.join().unwrap(), "POST /api/perfis/validar-pin/7 HTTP/1.1");
    }

    #[test]
    fn server_failure_during_pin_check_is_reported() {
        let (api, server) = serve_once("500 Internal Server Error", "{}");
        let err = api.validate_pin("token", &Id::from(7), "0000").unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 500, .. }));
        server.join().unwrap();
    }

    #[test]
    fn rejected_account_update_carries_backend_message() {
        let (api, server) = serve_once("409 Conflict", r#"{"message":"Email already registered"}"#);
        let update = AccountUpdate {
            email: Some("taken@mail.test".into()),
            ..AccountUpdate::default()
        };
        let err = api.update_account("token", &update).unwrap_err();
        assert!(matches!(
            err,
            Error::Rejected { status: 409, message: Some(ref m) } if m == "Email already registered"
        ));
        assert_eq!(server.join().unwrap(), "PUT /api/auth/profile HTTP/1.1");
    }
}
