// handlers/protected/mod.rs - Handlers on private paths
//
// The access gate redirects anonymous requests on these paths to /login, so
// every handler here can rely on a `Session` being present.

pub mod upload;
