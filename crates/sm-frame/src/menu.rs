//! Top-frame popup controller.
//!
//! Owns the visibility state machine and the selected text; everything
//! visual goes through a `MenuView`. Duplicate show/hide messages are
//! no-ops, so out-of-order or repeated relay traffic never causes flicker.

use crate::placement::{MenuSize, Placement, place_menu};
use sm_core::{FrameMessage, MenuConfiguration, ShowRequest, Viewport, Visibility};

/// The popup's DOM, as seen by the controller.
pub trait MenuView {
    fn set_visible(&mut self, visible: bool);
    /// Rendered size. Only meaningful while visible.
    fn measure(&self) -> MenuSize;
    fn viewport(&self) -> Viewport;
    fn place(&mut self, placement: &Placement);
    /// Font family, button labels and theme class, updated in place.
    fn apply_config(&mut self, config: &MenuConfiguration);
}

/// Sends a search request to the background worker.
pub trait SearchDispatch {
    fn search(&self, selected: &str);
}

/// Writes text to the system clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str);
}

/// A button on the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Search,
    Copy,
}

pub struct SelectionMenuController<V: MenuView> {
    view: V,
    visibility: Visibility,
    selected: Option<String>,
    config: MenuConfiguration,
}

impl<V: MenuView> SelectionMenuController<V> {
    /// Take over a freshly built view: apply the configuration and start
    /// hidden.
    pub fn new(mut view: V, config: MenuConfiguration) -> Self {
        view.apply_config(&config);
        view.set_visible(false);
        Self {
            view,
            visibility: Visibility::Hidden,
            selected: None,
            config,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn config(&self) -> &MenuConfiguration {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Handle a fully translated relay message. Returns true if the state
    /// changed.
    pub fn handle(&mut self, message: FrameMessage) -> bool {
        match message {
            FrameMessage::Show(request) => self.show(request),
            FrameMessage::Hide => self.hide(),
        }
    }

    pub fn show(&mut self, request: ShowRequest) -> bool {
        if self.visibility == Visibility::Shown {
            log::trace!("menu already shown; ignoring show");
            return false;
        }
        // Size is only known once the element takes part in layout.
        self.view.set_visible(true);
        let placement = place_menu(&request, self.view.measure(), self.view.viewport());
        self.view.place(&placement);
        log::debug!(
            "menu shown {:?} at ({}, {})",
            placement.side,
            placement.left,
            placement.top
        );
        self.visibility = Visibility::Shown;
        self.selected = Some(request.selected_string);
        true
    }

    pub fn hide(&mut self) -> bool {
        if self.visibility == Visibility::Hidden {
            return false;
        }
        self.view.set_visible(false);
        self.visibility = Visibility::Hidden;
        self.selected = None;
        log::debug!("menu hidden");
        true
    }

    /// A menu button was released.
    pub fn on_action(
        &mut self,
        action: MenuAction,
        search: &dyn SearchDispatch,
        clipboard: &dyn Clipboard,
    ) {
        let Some(text) = self.selected.as_deref() else {
            log::trace!("{action:?} pressed with nothing selected");
            return;
        };
        match action {
            MenuAction::Search => search.search(text),
            MenuAction::Copy => clipboard.write_text(text),
        }
        self.hide();
    }

    /// Live configuration change. Visibility is left alone.
    pub fn apply_config(&mut self, config: MenuConfiguration) {
        if config == self.config {
            return;
        }
        self.view.apply_config(&config);
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sm_core::{Direction, Rect};

    #[derive(Default)]
    struct CountingView {
        visible: bool,
        visibility_writes: u32,
        placements: u32,
        configs: u32,
    }

    impl MenuView for CountingView {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
            self.visibility_writes += 1;
        }

        fn measure(&self) -> MenuSize {
            if self.visible {
                MenuSize {
                    width: 120.0,
                    height: 40.0,
                }
            } else {
                MenuSize::default()
            }
        }

        fn viewport(&self) -> Viewport {
            Viewport::default()
        }

        fn place(&mut self, _placement: &Placement) {
            self.placements += 1;
        }

        fn apply_config(&mut self, _config: &MenuConfiguration) {
            self.configs += 1;
        }
    }

    fn request(text: &str) -> ShowRequest {
        ShowRequest {
            selected_string: text.into(),
            selection_direction: Direction::Forward,
            on_one_line: true,
            selection_end: Rect::new(300.0, 200.0, 300.0, 218.0),
        }
    }

    #[test]
    fn starts_hidden_with_config_applied() {
        let menu = SelectionMenuController::new(CountingView::default(), MenuConfiguration::default());
        assert_eq!(menu.visibility(), Visibility::Hidden);
        assert_eq!(menu.view().configs, 1);
        assert!(!menu.view().visible);
    }

    #[test]
    fn show_then_hide_round_trip() {
        let mut menu =
            SelectionMenuController::new(CountingView::default(), MenuConfiguration::default());
        assert!(menu.show(request("hello")));
        assert_eq!(menu.visibility(), Visibility::Shown);
        assert_eq!(menu.selected_text(), Some("hello"));

        assert!(menu.hide());
        assert_eq!(menu.visibility(), Visibility::Hidden);
        assert_eq!(menu.selected_text(), None);
    }

    #[test]
    fn second_show_is_a_no_op() {
        let mut menu =
            SelectionMenuController::new(CountingView::default(), MenuConfiguration::default());
        menu.show(request("first"));
        let writes = menu.view().visibility_writes;

        assert!(!menu.show(request("second")));
        assert_eq!(menu.selected_text(), Some("first"));
        assert_eq!(menu.view().placements, 1);
        assert_eq!(menu.view().visibility_writes, writes);
    }

    #[test]
    fn hide_while_hidden_is_a_no_op() {
        let mut menu =
            SelectionMenuController::new(CountingView::default(), MenuConfiguration::default());
        let writes = menu.view().visibility_writes;
        assert!(!menu.handle(FrameMessage::Hide));
        assert_eq!(menu.view().visibility_writes, writes);
    }

    #[test]
    fn config_change_keeps_visibility() {
        let mut menu =
            SelectionMenuController::new(CountingView::default(), MenuConfiguration::default());
        menu.show(request("x"));
        menu.apply_config(MenuConfiguration {
            dark_theme: true,
            ..MenuConfiguration::default()
        });
        assert_eq!(menu.visibility(), Visibility::Shown);
        assert!(menu.config().dark_theme);
        assert_eq!(menu.view().configs, 2);

        // Unchanged config is not re-applied.
        menu.apply_config(menu.config().clone());
        assert_eq!(menu.view().configs, 2);
    }
}
