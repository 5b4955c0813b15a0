//! juniper schema and resolvers over the working store.
//!
//! Queries read whatever the working store currently holds; records are
//! deserialized into typed objects on the way out. Execution is synchronous
//! (`execute_sync`), which fits the may coroutine runtime. The schema has no
//! mutations or subscriptions.

use std::sync::{Arc, RwLock};

use juniper::{
    graphql_object, EmptyMutation, EmptySubscription, FieldError, FieldResult, GraphQLObject,
    RootNode, Value as GraphQLValue,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::Store;

/// Shared state available to every resolver.
pub struct GraphQLContext {
    pub store: Arc<RwLock<Store>>,
}

impl juniper::Context for GraphQLContext {}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i32,
    pub id: i32,
    pub title: String,
    pub body: String,
}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i32,
    pub id: i32,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub user_id: i32,
    pub id: i32,
    pub title: String,
}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub album_id: i32,
    pub id: i32,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: i32,
    pub id: i32,
    pub title: String,
    pub completed: bool,
}

#[derive(GraphQLObject, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

fn collection<T: DeserializeOwned>(
    context: &GraphQLContext,
    name: &str,
) -> FieldResult<Vec<T>> {
    let store = context.store.read().unwrap();
    store
        .list(name)
        .iter()
        .map(|record| {
            serde_json::from_value(record.clone()).map_err(|e| {
                FieldError::new(
                    format!("malformed `{name}` record: {e}"),
                    GraphQLValue::null(),
                )
            })
        })
        .collect()
}

fn record<T: DeserializeOwned>(
    context: &GraphQLContext,
    name: &str,
    id: i32,
) -> FieldResult<Option<T>> {
    if id < 0 {
        return Ok(None);
    }
    let store = context.store.read().unwrap();
    match store.get(name, id as u64) {
        Some(found) => serde_json::from_value(found.clone()).map(Some).map_err(|e| {
            FieldError::new(
                format!("malformed `{name}` record: {e}"),
                GraphQLValue::null(),
            )
        }),
        None => Ok(None),
    }
}

pub struct Query;

#[graphql_object(context = GraphQLContext)]
impl Query {
    fn posts(context: &GraphQLContext) -> FieldResult<Vec<Post>> {
        collection(context, "posts")
    }

    fn post(context: &GraphQLContext, id: i32) -> FieldResult<Option<Post>> {
        record(context, "posts", id)
    }

    fn comments(context: &GraphQLContext) -> FieldResult<Vec<Comment>> {
        collection(context, "comments")
    }

    fn comment(context: &GraphQLContext, id: i32) -> FieldResult<Option<Comment>> {
        record(context, "comments", id)
    }

    fn albums(context: &GraphQLContext) -> FieldResult<Vec<Album>> {
        collection(context, "albums")
    }

    fn album(context: &GraphQLContext, id: i32) -> FieldResult<Option<Album>> {
        record(context, "albums", id)
    }

    fn photos(context: &GraphQLContext) -> FieldResult<Vec<Photo>> {
        collection(context, "photos")
    }

    fn photo(context: &GraphQLContext, id: i32) -> FieldResult<Option<Photo>> {
        record(context, "photos", id)
    }

    fn todos(context: &GraphQLContext) -> FieldResult<Vec<Todo>> {
        collection(context, "todos")
    }

    fn todo(context: &GraphQLContext, id: i32) -> FieldResult<Option<Todo>> {
        record(context, "todos", id)
    }

    fn users(context: &GraphQLContext) -> FieldResult<Vec<User>> {
        collection(context, "users")
    }

    fn user(context: &GraphQLContext, id: i32) -> FieldResult<Option<User>> {
        record(context, "users", id)
    }
}

pub type Schema =
    RootNode<'static, Query, EmptyMutation<GraphQLContext>, EmptySubscription<GraphQLContext>>;

#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, EmptyMutation::new(), EmptySubscription::new())
}
