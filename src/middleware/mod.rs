pub mod access_gate;
pub mod response;
pub mod session;

pub use access_gate::{access_gate, authorize, classify, AccessGate, GateDecision, GateMatcher, RouteClass};
pub use response::{ApiResponse, ApiResult};
pub use session::{RequireSession, Session};
