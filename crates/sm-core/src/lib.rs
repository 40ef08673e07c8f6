pub mod css;
pub mod geom;
pub mod message;
pub mod mirror;
pub mod model;
pub mod selection;
pub mod settings;
pub mod text;
pub mod theme;
pub mod tree;

pub use geom::{FrameOffset, Rect, Viewport};
pub use message::{FrameMessage, RuntimeMessage, ShowRequest};
pub use mirror::{ControlKind, EngineQuirks};
pub use model::*;
pub use selection::{
    CaretGeometry, ControlSelection, DomSelection, resolve_control, resolve_selection,
};
pub use settings::{OptionsForm, SearchEngine, StoredOptions, search_url};
pub use tree::{BoundaryPoint, DomRange, DomTree};
