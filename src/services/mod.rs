// ScrollWise services
// Services provide shared functionality: the summary cache, settings, and logging setup.

pub mod logging;
pub mod settings_engine;
pub mod summary_cache;
