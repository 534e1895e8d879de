pub mod openrouter;
pub mod provider;
