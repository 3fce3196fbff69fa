// ScrollWise screen state
// Managers hold the loaded data for each screen and derive what is shown from it.

pub mod aggregation;
pub mod bookmark_view;
pub mod grouped_view;
pub mod submission_view;
