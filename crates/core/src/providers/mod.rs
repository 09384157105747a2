pub mod traits;

// Analysis provider implementations
pub mod gemini;
