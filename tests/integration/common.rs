//! In-memory stand-in for a C•CURE server, built on wiremock.
//!
//! Supports the subset of the victorwebservice API the library uses:
//! login/logout/keepalive, searches whose WHERE clause uses the default
//! filter shape (`(A LIKE 'x' OR B LIKE 'y') AND (...)`), counts, and the
//! form-encoded create, add-child, edit and delete calls.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use acslib::client::ClientConfig;
use acslib::{CcureConfig, ResourceClient, SessionConnection};

pub const USERNAME: &str = "svc-acslib";
pub const PASSWORD: &str = "correct horse";

#[derive(Default)]
struct State {
    objects: Vec<Value>,
    next_id: i64,
    sessions: HashSet<String>,
    logins: u32,
}

/// A running fake server and a handle on its state.
pub struct FakeCcure {
    pub server: MockServer,
    state: Arc<Mutex<State>>,
}

impl FakeCcure {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(State {
            next_id: 5001,
            ..Default::default()
        }));

        let s = state.clone();
        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/Authenticate/Login"))
            .respond_with(move |req: &Request| login(&s, req))
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/Authenticate/Logout"))
            .respond_with(move |req: &Request| {
                if let Some(token) = session(req) {
                    s.lock().unwrap().sessions.remove(&token);
                }
                ResponseTemplate::new(200)
            })
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/v2/session/keepalive"))
            .respond_with(move |req: &Request| authorized(&s, req, |_| ResponseTemplate::new(200)))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/Generic/Versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "webServiceVersion": "3.0.1",
                "appServerVersion": "3.00.1",
            })))
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/Objects/FindObjsWithCriteriaFilter"))
            .respond_with(move |req: &Request| authorized(&s, req, |state| find(state, req)))
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("POST"))
            .and(path("/victorwebservice/api/Objects/PersistToContainer"))
            .respond_with(move |req: &Request| authorized(&s, req, |state| persist(state, req)))
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("PUT"))
            .and(path("/victorwebservice/api/Objects/Put"))
            .respond_with(move |req: &Request| authorized(&s, req, |state| edit(state, req)))
            .mount(&server)
            .await;

        let s = state.clone();
        Mock::given(method("DELETE"))
            .and(path("/victorwebservice/api/Objects/Delete"))
            .respond_with(move |req: &Request| authorized(&s, req, |state| delete(state, req)))
            .mount(&server)
            .await;

        Self { server, state }
    }

    /// Account configuration pointing at this server.
    pub fn config(&self) -> CcureConfig {
        CcureConfig::new(self.server.uri(), USERNAME, PASSWORD).with_client(
            "acslib-integration",
            "1.0",
            "4f1c2a9e",
        )
    }

    pub fn connection(&self) -> Arc<SessionConnection> {
        let client_config = ClientConfig::builder().with_tracing(false).build();
        Arc::new(SessionConnection::with_client_config(self.config(), client_config).unwrap())
    }

    pub fn resource(&self) -> ResourceClient {
        ResourceClient::new(self.connection())
    }

    /// Invalidate every session, as an idle timeout on the server would.
    pub fn expire_sessions(&self) {
        self.state.lock().unwrap().sessions.clear();
    }

    pub fn logins(&self) -> u32 {
        self.state.lock().unwrap().logins
    }

    pub fn objects(&self) -> Vec<Value> {
        self.state.lock().unwrap().objects.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

fn session(req: &Request) -> Option<String> {
    req.headers
        .get("session-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn form(req: &Request) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes(&req.body).unwrap_or_default()
}

fn query(req: &Request, name: &str) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn login(state: &Mutex<State>, req: &Request) -> ResponseTemplate {
    let pairs = form(req);
    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };
    if field("UserName") != Some(USERNAME) || field("Password") != Some(PASSWORD) {
        return ResponseTemplate::new(401).set_body_string("Invalid user name or password");
    }

    let mut state = state.lock().unwrap();
    state.logins += 1;
    let token = format!("session-{:04}", state.logins);
    state.sessions.insert(token.clone());
    ResponseTemplate::new(200).insert_header("session-id", token.as_str())
}

fn authorized(
    state: &Mutex<State>,
    req: &Request,
    handler: impl FnOnce(&mut State) -> ResponseTemplate,
) -> ResponseTemplate {
    let mut state = state.lock().unwrap();
    match session(req) {
        Some(token) if state.sessions.contains(&token) => handler(&mut state),
        _ => ResponseTemplate::new(401).set_body_string("Session is not valid"),
    }
}

fn find(state: &mut State, req: &Request) -> ResponseTemplate {
    let Ok(body) = serde_json::from_slice::<Value>(&req.body) else {
        return ResponseTemplate::new(400).set_body_string("body is not JSON");
    };
    let type_name = body["TypeFullName"].as_str().unwrap_or_default();
    let where_clause = body["WhereClause"].as_str().unwrap_or_default();

    let matches: Vec<&Value> = state
        .objects
        .iter()
        .filter(|obj| obj["TypeFullName"] == type_name)
        .filter(|obj| where_matches(where_clause, obj))
        .collect();

    if body["CountOnly"] == json!(true) {
        return ResponseTemplate::new(200).set_body_json(json!(matches.len()));
    }

    let page_size = body["pageSize"].as_u64().unwrap_or(100) as usize;
    let page_number = body["pageNumber"].as_u64().unwrap_or(1).max(1) as usize;
    let display: Vec<&str> = body["DisplayProperties"]
        .as_array()
        .map(|props| props.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let page: Vec<&Value> = if page_size == 0 {
        matches
    } else {
        matches
            .into_iter()
            .skip((page_number - 1) * page_size)
            .take(page_size)
            .collect()
    };

    let rows: Vec<Value> = page
        .into_iter()
        .map(|obj| {
            let mut row = Map::new();
            row.insert("ObjectID".into(), obj["ObjectID"].clone());
            for prop in &display {
                if let Some(value) = obj.get(*prop) {
                    row.insert(prop.to_string(), value.clone());
                }
            }
            Value::Object(row)
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(Value::Array(rows))
}

/// Evaluate a WHERE clause of the default shape against an object.
fn where_matches(clause: &str, obj: &Value) -> bool {
    let clause = clause.trim();
    if clause.is_empty() {
        return true;
    }
    let inner = clause.trim_start_matches('(').trim_end_matches(')');
    inner.split(") AND (").all(|group| {
        group.split(" OR ").any(|comparison| {
            let Some((field, pattern)) = comparison.split_once(" LIKE ") else {
                return false;
            };
            let pattern = pattern.trim_matches('\'').to_lowercase();
            let value = match obj.get(field.trim()) {
                Some(Value::String(s)) => s.to_lowercase(),
                Some(other) => other.to_string(),
                None => return false,
            };
            like(&value, &pattern)
        })
    })
}

fn like(value: &str, pattern: &str) -> bool {
    match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
        (Some(rest), Some(_)) => value.contains(rest.trim_end_matches('%')),
        (Some(suffix), None) => value.ends_with(suffix),
        (None, Some(prefix)) => value.starts_with(prefix),
        (None, None) => value == pattern,
    }
}

fn persist(state: &mut State, req: &Request) -> ResponseTemplate {
    let pairs = form(req);
    let parent_id = pairs
        .iter()
        .find(|(k, _)| k == "ID")
        .and_then(|(_, v)| v.parse::<i64>().ok());

    let mut created = Vec::new();
    match parent_id {
        Some(parent_id) => {
            let mut index = 0;
            while let Some(child_type) = pair(&pairs, &format!("Children[{index}][Type]")) {
                let mut obj = properties(
                    &pairs,
                    &format!("Children[{index}][PropertyNames]"),
                    &format!("Children[{index}][Propertyvalues]"),
                );
                obj.insert("TypeFullName".into(), json!(child_type));
                obj.insert("ParentID".into(), json!(parent_id));
                created.push(insert(state, obj));
                index += 1;
            }
        }
        None => {
            let mut obj: Map<String, Value> = pairs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let Some(class_type) = obj.remove("ClassType") else {
                return ResponseTemplate::new(400).set_body_string("ClassType is required");
            };
            obj.insert("TypeFullName".into(), class_type);
            created.push(insert(state, obj));
        }
    }

    match created.as_slice() {
        [] => ResponseTemplate::new(400).set_body_string("nothing to create"),
        [id] => ResponseTemplate::new(200).set_body_json(json!({"ObjectID": id})),
        ids => ResponseTemplate::new(200).set_body_json(json!({"ObjectIDs": ids})),
    }
}

fn edit(state: &mut State, req: &Request) -> ResponseTemplate {
    let Some(id) = query(req, "id").and_then(|id| id.parse::<i64>().ok()) else {
        return ResponseTemplate::new(400).set_body_string("id is required");
    };
    let updates = properties(&form(req), "PropertyNames", "PropertyValues");

    match state.objects.iter_mut().find(|obj| obj["ObjectID"] == id) {
        Some(Value::Object(obj)) => {
            obj.extend(updates);
            ResponseTemplate::new(200)
        }
        _ => ResponseTemplate::new(500).set_body_string(format!("Object {id} does not exist")),
    }
}

fn delete(state: &mut State, req: &Request) -> ResponseTemplate {
    let Some(id) = query(req, "id").and_then(|id| id.parse::<i64>().ok()) else {
        return ResponseTemplate::new(400).set_body_string("id is required");
    };
    let before = state.objects.len();
    state.objects.retain(|obj| obj["ObjectID"] != id);
    if state.objects.len() == before {
        ResponseTemplate::new(500).set_body_string(format!("Object {id} does not exist"))
    } else {
        ResponseTemplate::new(200)
    }
}

fn insert(state: &mut State, mut obj: Map<String, Value>) -> i64 {
    let id = state.next_id;
    state.next_id += 1;
    obj.insert("ObjectID".into(), json!(id));
    state.objects.push(Value::Object(obj));
    id
}

fn pair<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Zip `names[i]` and `values[i]` form fields into an object.
fn properties(pairs: &[(String, String)], names: &str, values: &str) -> Map<String, Value> {
    let mut obj = Map::new();
    let mut i = 0;
    while let Some(name) = pair(pairs, &format!("{names}[{i}]")) {
        let value = pair(pairs, &format!("{values}[{i}]")).unwrap_or_default();
        obj.insert(name.to_string(), json!(value));
        i += 1;
    }
    obj
}
