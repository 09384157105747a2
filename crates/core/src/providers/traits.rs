use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::analysis::{AnalysisReport, AnalysisRequest};

/// Port for the external text-generation service that writes analysis blurbs.
///
/// The session only ever talks to this trait, so the real HTTP client can
/// be swapped for a scripted fake in tests.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Issue one request. Implementations report every transport, empty-body
    /// and parse failure as an error; callers decide how to degrade.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, CoreError>;
}
