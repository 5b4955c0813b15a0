//! The six CRUD handlers the dispatcher routes to.
//!
//! Status and body contract follows json-server: lookups on unknown ids
//! answer `404 {}`, creates answer 201 with the stored record, and writes with
//! a missing or non-object body answer 400.

use std::sync::RwLock;

use serde_json::{json, Map, Value};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::store::Store;

fn not_found() -> HandlerResponse {
    HandlerResponse::json(404, json!({}))
}

fn body_object(req: &HandlerRequest) -> Result<Map<String, Value>, HandlerResponse> {
    req.body
        .as_ref()
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| HandlerResponse::error(400, "request body must be a JSON object"))
}

/// Equality filter for list queries, e.g. `GET /todos?userId=1`.
///
/// A record matches when every query parameter equals the field of the same
/// name, comparing numbers numerically and everything else as strings.
fn matches_filters(record: &Value, query_params: &std::collections::HashMap<String, String>) -> bool {
    query_params.iter().all(|(key, expected)| {
        match record.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Bool(b)) => expected.parse() == Ok(*b),
            Some(Value::Number(n)) => n.to_string() == *expected,
            _ => false,
        }
    })
}

pub fn list_records(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let store = store.read().unwrap();
    let records: Vec<Value> = store
        .list(&req.collection)
        .iter()
        .filter(|r| matches_filters(r, &req.query_params))
        .cloned()
        .collect();
    HandlerResponse::json(200, Value::Array(records))
}

pub fn get_record(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let store = store.read().unwrap();
    match req.id.and_then(|id| store.get(&req.collection, id)) {
        Some(record) => HandlerResponse::json(200, record.clone()),
        None => not_found(),
    }
}

pub fn create_record(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let record = match body_object(req) {
        Ok(record) => record,
        Err(resp) => return resp,
    };
    let created = store.write().unwrap().create(&req.collection, record);
    HandlerResponse::json(201, created)
}

pub fn replace_record(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let record = match body_object(req) {
        Ok(record) => record,
        Err(resp) => return resp,
    };
    let replaced = req
        .id
        .and_then(|id| store.write().unwrap().replace(&req.collection, id, record));
    match replaced {
        Some(record) => HandlerResponse::json(200, record),
        None => not_found(),
    }
}

pub fn update_record(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let patch = match body_object(req) {
        Ok(patch) => patch,
        Err(resp) => return resp,
    };
    let merged = req
        .id
        .and_then(|id| store.write().unwrap().merge(&req.collection, id, patch));
    match merged {
        Some(record) => HandlerResponse::json(200, record),
        None => not_found(),
    }
}

pub fn delete_record(store: &RwLock<Store>, req: &HandlerRequest) -> HandlerResponse {
    let removed = req
        .id
        .and_then(|id| store.write().unwrap().remove(&req.collection, id));
    match removed {
        Some(_) => HandlerResponse::json(200, json!({})),
        None => not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use may::sync::mpsc;
    use std::collections::HashMap;

    fn request(
        method: &str,
        collection: &str,
        id: Option<u64>,
        body: Option<Value>,
    ) -> HandlerRequest {
        let (reply_tx, _reply_rx) = mpsc::channel();
        HandlerRequest {
            method: method.to_string(),
            path: format!("/{collection}"),
            collection: collection.to_string(),
            id,
            query_params: HashMap::new(),
            body,
            reply_tx,
        }
    }

    fn store() -> RwLock<Store> {
        let mut collections = HashMap::new();
        collections.insert(
            "todos".to_string(),
            vec![
                json!({ "userId": 1, "id": 1, "title": "a", "completed": false }),
                json!({ "userId": 2, "id": 2, "title": "b", "completed": true }),
            ],
        );
        RwLock::new(Store::new(collections))
    }

    #[test]
    fn list_returns_all_records() {
        let store = store();
        let resp = list_records(&store, &request("GET", "todos", None, None));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.as_array().unwrap().len(), 2);
    }

    #[test]
    fn list_applies_query_filters() {
        let store = store();
        let mut req = request("GET", "todos", None, None);
        req.query_params.insert("userId".to_string(), "2".to_string());
        let resp = list_records(&store, &req);
        let records = resp.body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "b");

        let mut req = request("GET", "todos", None, None);
        req.query_params
            .insert("completed".to_string(), "true".to_string());
        let resp = list_records(&store, &req);
        assert_eq!(resp.body.as_array().unwrap().len(), 1);
    }

    #[test]
    fn get_answers_404_with_empty_object_for_unknown_id() {
        let store = store();
        let resp = get_record(&store, &request("GET", "todos", Some(9), None));
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, json!({}));
    }

    #[test]
    fn create_answers_201_with_the_stored_record() {
        let store = store();
        let resp = create_record(
            &store,
            &request("POST", "todos", None, Some(json!({ "title": "c" }))),
        );
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body["id"], 3);
        assert_eq!(store.read().unwrap().list("todos").len(), 3);
    }

    #[test]
    fn create_rejects_non_object_bodies() {
        let store = store();
        let resp = create_record(&store, &request("POST", "todos", None, Some(json!([1, 2]))));
        assert_eq!(resp.status, 400);
        let resp = create_record(&store, &request("POST", "todos", None, None));
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn replace_and_update_follow_json_server_semantics() {
        let store = store();
        let resp = replace_record(
            &store,
            &request("PUT", "todos", Some(1), Some(json!({ "title": "z" }))),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({ "id": 1, "title": "z" }));

        let resp = update_record(
            &store,
            &request("PATCH", "todos", Some(2), Some(json!({ "completed": false }))),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["completed"], false);
        assert_eq!(resp.body["title"], "b");
    }

    #[test]
    fn delete_answers_empty_object() {
        let store = store();
        let resp = delete_record(&store, &request("DELETE", "todos", Some(1), None));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({}));
        let resp = delete_record(&store, &request("DELETE", "todos", Some(1), None));
        assert_eq!(resp.status, 404);
    }
}
