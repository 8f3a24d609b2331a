// tests/common/mod.rs
//! Shared fixtures: an in-memory Notion that answers scripted requests and
//! records every call, and a harness that runs CLI commands against it.

#![allow(dead_code)]

use clap::Parser;
use notion_cli::{
    dispatch, AppError, Cli, CredentialStore, Method, NotionErrorCode, NotionTransport, Printer,
    Result, Session, UploadPart,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One request the fake received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Ok(Value),
    Fail { code: String, message: String, status: u16 },
}

#[derive(Default)]
struct Inner {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
    uploads: Mutex<Vec<(String, UploadPart)>>,
}

/// Scripted transport. Replies queued for a route are served in order and
/// the last one repeats. Unscripted routes answer `object_not_found`.
#[derive(Clone, Default)]
pub struct FakeNotion {
    inner: Arc<Inner>,
}

impl FakeNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, response: Value) -> &Self {
        self.push(method, path, Reply::Ok(response))
    }

    pub fn fail(&self, method: Method, path: &str, code: &str, message: &str, status: u16) -> &Self {
        self.push(
            method,
            path,
            Reply::Fail {
                code: code.to_string(),
                message: message.to_string(),
                status,
            },
        )
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.inner
            .routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Calls other than `GET`s.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != Method::GET)
            .collect()
    }

    pub fn uploads(&self) -> Vec<(String, UploadPart)> {
        self.inner.uploads.lock().unwrap().clone()
    }

    fn reply(&self, method: &Method, path: &str) -> Result<Value> {
        let mut routes = self.inner.routes.lock().unwrap();
        let reply = match routes.get_mut(&(method.clone(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Fail { code, message, status }) => Err(AppError::NotionService {
                code: NotionErrorCode::from_api_response(&code),
                message,
                status: StatusCode::from_u16(status).unwrap(),
            }),
            None => Err(AppError::NotionService {
                code: NotionErrorCode::ObjectNotFound,
                message: format!("no route for {} {}", method, path),
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}

#[async_trait::async_trait]
impl NotionTransport for FakeNotion {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.inner.calls.lock().unwrap().push(Call {
            method: method.clone(),
            path: path.to_string(),
            body: body.cloned(),
        });
        self.reply(&method, path)
    }

    async fn upload(&self, path: &str, part: UploadPart) -> Result<Value> {
        self.inner
            .uploads
            .lock()
            .unwrap()
            .push((path.to_string(), part));
        self.reply(&Method::POST, path)
    }
}

/// Runs commands as the binary would, with captured output, scripted
/// stdin and a credential file in a temporary directory.
pub struct Harness {
    pub notion: FakeNotion,
    pub env_token: Option<String>,
    pub stdin: String,
    pub piped: bool,
    dir: TempDir,
}

impl Harness {
    /// A harness whose environment already carries a token.
    pub fn new() -> Self {
        colored::control::set_override(false);
        Self {
            notion: FakeNotion::new(),
            env_token: Some("ntn_test_token".to_string()),
            stdin: String::new(),
            piped: false,
            dir: TempDir::new().unwrap(),
        }
    }

    /// A harness with no token anywhere.
    pub fn logged_out() -> Self {
        Self {
            env_token: None,
            ..Self::new()
        }
    }

    pub fn store(&self) -> CredentialStore {
        CredentialStore::new(self.dir.path().join("notion-cli").join("config.json"))
    }

    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    /// Parses `args` after the program name and runs the command. Returns
    /// the outcome and everything written to standard output.
    pub async fn run(&self, args: &[&str]) -> (Result<()>, String) {
        let cli = Cli::try_parse_from(std::iter::once("notion").chain(args.iter().copied()))
            .unwrap_or_else(|e| panic!("bad test arguments {:?}: {}", args, e));

        let mut out: Vec<u8> = Vec::new();
        let mut input = Cursor::new(self.stdin.clone().into_bytes());
        let notion = self.notion.clone();
        let result = {
            let mut session = Session {
                format: cli.format,
                out: Printer::new(&mut out),
                input: &mut input,
                input_is_piped: self.piped,
                store: self.store(),
                env_token: self.env_token.clone(),
            };
            dispatch(cli.command, &mut session, move |_key| Ok(notion.clone())).await
        };
        (result, String::from_utf8(out).unwrap())
    }

    /// Like [`run`](Self::run) but the command must succeed.
    pub async fn ok(&self, args: &[&str]) -> String {
        let (result, output) = self.run(args).await;
        if let Err(e) = result {
            panic!("{:?} failed: {}\noutput:\n{}", args, e, output);
        }
        output
    }
}

/// A database object with the given `(name, type)` columns.
pub fn database(id: &str, title: &str, columns: &[(&str, &str)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, kind) in columns {
        let mut definition = serde_json::Map::new();
        definition.insert("id".into(), json!(format!("{}-id", name)));
        definition.insert("type".into(), json!(kind));
        definition.insert(kind.to_string(), json!({}));
        properties.insert(name.to_string(), Value::Object(definition));
    }
    json!({
        "object": "database",
        "id": id,
        "url": format!("https://www.notion.so/{}", id),
        "title": [{ "plain_text": title }],
        "properties": properties,
    })
}

/// A page object whose title property is `Name`.
pub fn page(id: &str, title: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{}", id),
        "last_edited_time": "2026-03-04T05:06:07.000Z",
        "properties": {
            "Name": { "id": "title", "type": "title", "title": [{ "plain_text": title }] }
        }
    })
}

/// A list response.
pub fn list(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}

/// A block as the API returns it.
pub fn wire_block(id: &str, kind: &str, text: &str, has_children: bool) -> Value {
    let mut block = serde_json::Map::new();
    block.insert("object".into(), json!("block"));
    block.insert("id".into(), json!(id));
    block.insert("type".into(), json!(kind));
    block.insert("has_children".into(), json!(has_children));
    block.insert(
        kind.to_string(),
        json!({ "rich_text": [{ "type": "text", "text": { "content": text }, "plain_text": text }] }),
    );
    Value::Object(block)
}
