//! Built-in stubs used when no stub path is configured, and written out by
//! `apigen init` as a starting point for customisation.

pub const CONTROLLER: &str = include_str!("templates/controller.stub");
pub const TRANSFORMER: &str = include_str!("templates/transformer.stub");
pub const ROUTE: &str = include_str!("templates/route.stub");

/// Routes file with an empty marker block
pub const ROUTES_FILE: &str = include_str!("templates/routes_file.stub");

/// File names used when the stubs are written to disk
pub const CONTROLLER_FILE: &str = "controller.stub";
pub const TRANSFORMER_FILE: &str = "transformer.stub";
pub const ROUTE_FILE: &str = "route.stub";

/// `(file name, contents)` of every customisable stub
pub fn all() -> [(&'static str, &'static str); 3] {
    [(CONTROLLER_FILE, CONTROLLER), (TRANSFORMER_FILE, TRANSFORMER), (ROUTE_FILE, ROUTE)]
}
