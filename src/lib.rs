// Library root
// -----------
// This crate exposes the catalog admin logic as a library. The binary
// (`main.rs`) wires these modules into an interactive terminal tool.
//
// Module responsibilities:
// - `api`: HTTP interactions with the remote product API and the
//   `CatalogApi` seam the views are written against.
// - `list` / `form`: the product list and product form view models.
// - `validation`: the rule table the form is checked against.
// - `gate`: the in-flight request flag shared by both views.
// - `route`: navigation between the list and the form.
// - `config` / `session`: startup configuration and the admin context.
// - `ui`: terminal flows that drive the view models.
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod gate;
pub mod list;
pub mod route;
pub mod session;
pub mod ui;
pub mod validation;
