// Keyrank - keyword-research backend runtime
//
// This facade crate re-exports the HTTP middleware seam and the response
// compression subsystem so applications depend on a single crate.

// Re-export core functionality
pub use keyrank_core::*;

// Response compression middleware and its services
pub use keyrank_compression;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Error,
        HandlerFn,
        HttpRequest,
        HttpResponse,
        Json,
        Middleware,
        MiddlewareChain,
        Next,
    };
    pub use keyrank_compression::{
        CompressionConfig,
        CompressionMiddleware,
    };
}
