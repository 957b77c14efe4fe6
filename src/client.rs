//! View-models for the browser-facing side: session store, route guard,
//! listing, editor, dashboard and settings. They talk to the service only
//! through the traits in `backend`.

pub mod backend;
pub mod dashboard;
pub mod editor;
pub mod guard;
pub mod http;
pub mod info;
pub mod listing;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod fake;
