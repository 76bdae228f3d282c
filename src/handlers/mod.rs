// handlers/mod.rs - Handlers grouped by how the access gate treats their paths
//
// Public (auth-flow and public listing paths, no session needed)
// → Protected (private paths, the gate has already checked the session)
pub mod protected;
pub mod public;
