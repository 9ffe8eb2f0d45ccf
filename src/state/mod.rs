/// State management module
///
/// This module handles all application state, including:
/// - The in-memory list of uploaded images (library.rs)
/// - Shared data structures (data.rs)
/// - The two-image selection (selection.rs)
/// - Per-image transforms, hit testing and drag state (compositor.rs)

pub mod compositor;
pub mod data;
pub mod library;
pub mod selection;
