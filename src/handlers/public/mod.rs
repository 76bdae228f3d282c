// handlers/public/mod.rs - Handlers on paths the access gate always lets through
//
// Auth-flow paths: /api/auth/*, /login, /register
// Public paths:    /, /api/videos
//
// A session may still be attached by the gate; handlers that act on behalf
// of a user ask for it with `RequireSession`.

pub mod auth;
pub mod pages;
pub mod videos;
