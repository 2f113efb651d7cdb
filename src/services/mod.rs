pub mod forecast;
pub mod gemini;
pub mod prompts;
pub mod reconcile;
pub mod report;
pub mod retry;
pub mod snow;
pub mod travel;
