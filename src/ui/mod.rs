/// User interface pieces
///
/// - The interactive compositing canvas (canvas.rs)
/// - The image list sidebar (sidebar.rs)
/// - Toast notices (notice.rs)

pub mod canvas;
pub mod notice;
pub mod sidebar;
