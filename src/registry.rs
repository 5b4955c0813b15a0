//! Handler registration with the dispatcher.

use std::sync::{Arc, RwLock};

use crate::dispatcher::Dispatcher;
use crate::handlers;
use crate::store::Store;

macro_rules! register {
    ($dispatcher:expr, $store:expr, $name:literal, $handler:path) => {{
        let store = Arc::clone($store);
        $dispatcher.register_handler($name, move |req| {
            let response = $handler(&store, &req);
            let _ = req.reply_tx.send(response);
        });
    }};
}

/// Register all six CRUD handlers against the shared working store.
///
/// # Safety
///
/// Spawns handler coroutines via [`Dispatcher::register_handler`]; the may
/// runtime must be initialized first.
pub unsafe fn register_all(dispatcher: &mut Dispatcher, store: &Arc<RwLock<Store>>) {
    register!(dispatcher, store, "list_records", handlers::list_records);
    register!(dispatcher, store, "get_record", handlers::get_record);
    register!(dispatcher, store, "create_record", handlers::create_record);
    register!(dispatcher, store, "replace_record", handlers::replace_record);
    register!(dispatcher, store, "update_record", handlers::update_record);
    register!(dispatcher, store, "delete_record", handlers::delete_record);
}
