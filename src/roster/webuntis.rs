//! WebUntis JSON-RPC client.
//!
//! Each fetch opens its own session: `authenticate`, one data call, `logout`.

use super::{RosterReply, RosterRequest, RosterSource, RosterStudent};
use crate::config::RosterConfig;
use crate::errors::{AppError, AppResult};
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const REQUEST_ID: &str = "rattendance";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct RpcRequest<'a> {
    id: &'a str,
    method: &'a str,
    params: Value,
    jsonrpc: &'a str,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResult {
    session_id: String,
}

#[derive(Deserialize)]
struct UntisClass {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UntisStudent {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fore_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    klasse: Option<String>,
}

pub struct WebUntisClient {
    http: Client,
    endpoint: String,
    username: String,
    password: String,
    user_agent: String,
}

/// JSON-RPC endpoint for a server and school. A bare host gets `https://`.
pub fn endpoint_url(server: &str, school: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    let base = if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("https://{server}")
    };
    format!("{base}/WebUntis/jsonrpc.do?school={}", school.trim())
}

/// Unwrap a JSON-RPC response body into its result.
fn parse_response<T: DeserializeOwned>(method: &str, body: &str) -> AppResult<T> {
    let resp: RpcResponse<T> = serde_json::from_str(body)
        .map_err(|e| AppError::Remote(format!("{method}: malformed response: {e}")))?;

    if let Some(err) = resp.error {
        return Err(AppError::Remote(format!(
            "{method}: {} (code {})",
            err.message, err.code
        )));
    }

    // `"result": null` is a valid answer for calls like logout
    match resp.result {
        Some(result) => Ok(result),
        None => serde_json::from_value(Value::Null)
            .map_err(|_| AppError::Remote(format!("{method}: response carries no result"))),
    }
}

fn display_name(s: &UntisStudent) -> String {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(str::to_string)
    };

    match (non_empty(&s.fore_name), non_empty(&s.long_name)) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (_, Some(last)) => last,
        _ => non_empty(&s.name).unwrap_or_else(|| "Unbekannt".to_string()),
    }
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_roster_students(raw: Vec<UntisStudent>) -> Vec<RosterStudent> {
    raw.iter()
        .map(|s| RosterStudent {
            roster_id: id_string(&s.id),
            name: display_name(s),
            class_label: s.klasse.clone().filter(|k| !k.trim().is_empty()),
        })
        .collect()
}

fn to_class_names(raw: Vec<UntisClass>) -> Vec<String> {
    let mut names: Vec<String> = raw.into_iter().map(|k| k.name).collect();
    names.sort();
    names.dedup();
    names
}

impl WebUntisClient {
    pub fn new(cfg: &RosterConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint_url(&cfg.server, &cfg.school),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            user_agent: cfg.user_agent.clone(),
        })
    }

    fn call<T: DeserializeOwned>(
        &self,
        session: Option<&str>,
        method: &str,
        params: Value,
    ) -> AppResult<T> {
        let body = RpcRequest {
            id: REQUEST_ID,
            method,
            params,
            jsonrpc: "2.0",
        };

        let mut req = self.http.post(self.endpoint.as_str()).json(&body);
        if let Some(sid) = session {
            req = req.header(COOKIE, format!("JSESSIONID={sid}"));
        }

        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(AppError::Remote(format!("{method}: HTTP {status}")));
        }

        parse_response(method, &text)
    }

    fn login(&self) -> AppResult<String> {
        let auth: AuthResult = self.call(
            None,
            "authenticate",
            json!({
                "user": self.username,
                "password": self.password,
                "client": self.user_agent,
            }),
        )?;
        Ok(auth.session_id)
    }

    fn logout(&self, session: &str) {
        if let Err(e) = self.call::<Value>(Some(session), "logout", json!({})) {
            tracing::warn!(error = %e, "WebUntis logout failed");
        }
    }
}

impl RosterSource for WebUntisClient {
    fn fetch(&self, request: RosterRequest) -> AppResult<RosterReply> {
        let session = self.login()?;

        let result = match request {
            RosterRequest::Classes => self
                .call::<Vec<UntisClass>>(Some(&session), "getKlassen", json!({}))
                .map(|k| RosterReply::Classes(to_class_names(k))),
            RosterRequest::Students => self
                .call::<Vec<UntisStudent>>(Some(&session), "getStudents", json!({}))
                .map(|s| RosterReply::Students(to_roster_students(s))),
        };

        self.logout(&session);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Method name and cookie header of one request seen by the local server.
    type SeenCall = (String, Option<String>);

    /// Plain-HTTP JSON-RPC server on a free local port. `reply` maps a method
    /// name to a status code and response body.
    fn local_server(reply: fn(&str) -> (u16, String)) -> (RosterConfig, mpsc::Receiver<SeenCall>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut length = 0;
                let mut cookie = None;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some((key, value)) = line.split_once(':') {
                        let value = value.trim().to_string();
                        match key.to_ascii_lowercase().as_str() {
                            "content-length" => length = value.parse().unwrap(),
                            "cookie" => cookie = Some(value),
                            _ => {}
                        }
                    }
                }

                let mut body = vec![0; length];
                reader.read_exact(&mut body).unwrap();
                let request: Value = serde_json::from_slice(&body).unwrap();
                let method = request["method"].as_str().unwrap_or_default().to_string();

                let (status, text) = reply(&method);
                if tx.send((method, cookie)).is_err() {
                    break;
                }
                write!(
                    stream,
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{text}",
                    text.len()
                )
                .unwrap();
            }
        });

        let cfg = RosterConfig {
            server: format!("http://127.0.0.1:{port}"),
            school: "demo".into(),
            username: "teacher".into(),
            password: "pw".into(),
            ..RosterConfig::default()
        };
        (cfg, rx)
    }

    fn auth_ok() -> (u16, String) {
        (200, r#"{"jsonrpc":"2.0","id":"rattendance","result":{"sessionId":"S1"}}"#.into())
    }

    fn has_session(call: &SeenCall) -> bool {
        call.1.as_deref().is_some_and(|c| c.contains("JSESSIONID=S1"))
    }

    #[test]
    fn endpoint_adds_scheme_only_when_missing() {
        assert_eq!(
            endpoint_url("ajax.webuntis.com", "flbk-bonn"),
            "https://ajax.webuntis.com/WebUntis/jsonrpc.do?school=flbk-bonn"
        );
        assert_eq!(
            endpoint_url("http://localhost:8080/", "demo"),
            "http://localhost:8080/WebUntis/jsonrpc.do?school=demo"
        );
    }

    #[test]
    fn authenticate_response_yields_session_id() {
        let body = r#"{"jsonrpc":"2.0","id":"rattendance","result":{"sessionId":"ABC123","personType":2,"personId":17,"klasseId":0}}"#;
        let auth: AuthResult = parse_response("authenticate", body).unwrap();
        assert_eq!(auth.session_id, "ABC123");
    }

    #[test]
    fn rpc_error_becomes_remote_error() {
        let body = r#"{"jsonrpc":"2.0","id":"rattendance","error":{"message":"bad credentials","code":-8504}}"#;
        let err = parse_response::<AuthResult>("authenticate", body).unwrap_err();
        match err {
            AppError::Remote(msg) => {
                assert!(msg.contains("bad credentials"));
                assert!(msg.contains("-8504"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_response::<AuthResult>("authenticate", "<html>").is_err());
        assert!(parse_response::<AuthResult>("authenticate", r#"{"result":null}"#).is_err());
    }

    #[test]
    fn null_result_is_fine_for_logout() {
        let v: Value = parse_response("logout", r#"{"jsonrpc":"2.0","result":null}"#).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn classes_are_sorted_and_unique() {
        let body = r#"{"result":[{"id":2,"name":"6b","longName":"Klasse 6b"},{"id":1,"name":"5a"},{"id":3,"name":"5a"}]}"#;
        let raw: Vec<UntisClass> = parse_response("getKlassen", body).unwrap();
        assert_eq!(to_class_names(raw), ["5a", "6b"]);
    }

    #[test]
    fn student_names_prefer_full_name() {
        let body = r#"{"result":[
            {"id":1,"key":"x","name":"MusterAnn","foreName":"Anna","longName":"Muster","gender":"female"},
            {"id":2,"name":"BeiBer","longName":"Beispiel"},
            {"id":"3","name":"KurzName","foreName":"","longName":" "},
            {"id":4},
            {"id":5,"name":"Z","foreName":"Zoe","longName":"Zett","klasse":"5a"}
        ]}"#;
        let raw: Vec<UntisStudent> = parse_response("getStudents", body).unwrap();
        let students = to_roster_students(raw);

        let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Anna Muster", "Beispiel", "KurzName", "Unbekannt", "Zoe Zett"]);
        assert_eq!(students[2].roster_id, "3");
        assert_eq!(students[0].roster_id, "1");
        assert_eq!(students[0].class_label, None);
        assert_eq!(students[4].class_label.as_deref(), Some("5a"));
    }

    #[test]
    fn fetch_runs_authenticate_call_logout() {
        let (cfg, seen) = local_server(|method| match method {
            "authenticate" => auth_ok(),
            "getKlassen" => (200, r#"{"result":[{"id":2,"name":"6b"},{"id":1,"name":"5a"}]}"#.into()),
            _ => (200, r#"{"result":null}"#.into()),
        });

        let reply = WebUntisClient::new(&cfg)
            .unwrap()
            .fetch(RosterRequest::Classes)
            .unwrap();
        let RosterReply::Classes(names) = reply else {
            panic!("expected a class list");
        };
        assert_eq!(names, ["5a", "6b"]);

        let calls: Vec<SeenCall> = seen.try_iter().collect();
        let methods: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(methods, ["authenticate", "getKlassen", "logout"]);
        assert_eq!(calls[0].1, None);
        assert!(has_session(&calls[1]));
        assert!(has_session(&calls[2]));
    }

    #[test]
    fn http_error_on_authenticate_is_remote_error() {
        let (cfg, seen) = local_server(|_| (500, "oops".into()));

        let err = WebUntisClient::new(&cfg)
            .unwrap()
            .fetch(RosterRequest::Classes)
            .unwrap_err();
        match err {
            AppError::Remote(msg) => {
                assert!(msg.starts_with("authenticate:"));
                assert!(msg.contains("HTTP 500"));
            }
            other => panic!("unexpected {other:?}"),
        }

        // no session, so nothing to log out of
        let methods: Vec<String> = seen.try_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, ["authenticate"]);
    }

    #[test]
    fn failed_data_call_still_logs_out() {
        let (cfg, seen) = local_server(|method| match method {
            "authenticate" => auth_ok(),
            "getStudents" => (503, String::new()),
            _ => (200, r#"{"result":null}"#.into()),
        });

        let err = WebUntisClient::new(&cfg)
            .unwrap()
            .fetch(RosterRequest::Students)
            .unwrap_err();
        assert!(matches!(err, AppError::Remote(msg) if msg.contains("getStudents: HTTP 503")));

        let calls: Vec<SeenCall> = seen.try_iter().collect();
        let methods: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(methods, ["authenticate", "getStudents", "logout"]);
        assert!(has_session(&calls[2]));
    }
}
