// ScrollWise presentation
// Terminal rendering of the screens.

pub mod text;
