//! Liveness and readiness probes.
//!
//! | Probe | Path | Answer |
//! |---|---|---|
//! | **Liveness** | `/healthz` | `ok` while the process can answer HTTP at all. |
//! | **Readiness** | `/readyz` | `ready`; the store is built before the listener opens, so there is no warm-up. |
//!
//! Neither probe touches the post store or is rate limited.

use crate::{Request, Response};

pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
