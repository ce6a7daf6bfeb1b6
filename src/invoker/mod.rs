//! Generation tool invocation
//!
//! The catalog pipeline treats the text generator as an opaque prompt-in, text-out
//! call behind [`GenerationInvoker`], so the subprocess-backed [`CommandInvoker`] can
//! be swapped for [`MockInvoker`] in tests.

mod command;
mod mock;

pub use command::CommandInvoker;
pub use mock::MockInvoker;

use crate::error::InvokeError;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationInvoker: Send + Sync {
    /// Runs one generation for `prompt` and returns the tool's raw output
    async fn generate(&self, prompt: &str) -> Result<String, InvokeError>;

    fn name(&self) -> &str;
}
